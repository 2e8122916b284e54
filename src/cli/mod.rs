//! CLI module for blobsize
//!
//! This module contains the command-line interface definition and the
//! orchestration of a reporting run.

pub mod commands;

pub use commands::*;
