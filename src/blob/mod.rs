//! Azure Blob Storage size aggregation
//!
//! This module provides paginated container and blob listing, the
//! per-container size calculation and the concurrent per-account
//! aggregation driven sequentially across accounts.

pub mod aggregator;
pub mod listing;
pub mod models;
pub mod runner;
pub mod sizer;

// Re-export commonly used types
pub use aggregator::AccountAggregator;
pub use listing::{AccountListing, AzureStorageBackend, PageStream, StorageBackend};
pub use models::*;
pub use runner::run_accounts;
