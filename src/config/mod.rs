//! Configuration management module
//!
//! This module handles configuration loading and validation from
//! environment variables, an optional configuration file, and default
//! values. Command-line flags are applied on top by the CLI.

pub mod settings;

pub use settings::*;
