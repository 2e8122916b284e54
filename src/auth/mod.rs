//! Authentication module for Azure services
//!
//! This module provides the credential handle shared by the storage
//! listing backend and the resource-manager subscription listing.

pub mod provider;

pub use provider::*;
