//! Utility modules for blobsize
//!
//! This module contains various utility functions and helpers
//! used throughout the application.

pub mod format;
pub mod helpers;
pub mod network;
pub mod retry;
