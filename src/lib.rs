//! blobsize - Azure Blob Storage usage reporting
//!
//! Lists the containers of one or more storage accounts, sizes every
//! container concurrently by paging through its blob listing, and reports
//! per-container and per-account totals.

pub mod auth;
pub mod blob;
pub mod cli;
pub mod config;
pub mod error;
pub mod subscription;
pub mod utils;

// Re-export commonly used types
pub use error::{BlobsizeError, Result};
