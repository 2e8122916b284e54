//! Data models for blob storage size aggregation
//!
//! This module defines the listing pages produced by the backends and the
//! per-container and per-account results produced by the aggregator.

use serde::{Deserialize, Serialize};

/// A storage account targeted by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    name: String,
}

impl Account {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blob service endpoint derived from the account name
    pub fn endpoint(&self) -> String {
        format!("https://{}.blob.core.windows.net/", self.name)
    }
}

/// One backend round trip worth of listing results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Whether the backend reported a continuation after this page
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// A page that ends the sequence
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, false)
    }
}

/// Blob metadata as read from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub name: String,
    pub content_length: u64,
}

impl BlobEntry {
    pub fn new<S: Into<String>>(name: S, content_length: u64) -> Self {
        Self {
            name: name.into(),
            content_length,
        }
    }
}

/// Size of a container whose listing completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub name: String,
    pub size: u64,
}

/// A container whose listing was interrupted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerFailure {
    pub name: String,
    pub reason: String,
}

/// Result of one container worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Sized(ContainerSize),
    Failed(ContainerFailure),
}

impl ContainerOutcome {
    pub fn sized<S: Into<String>>(name: S, size: u64) -> Self {
        Self::Sized(ContainerSize {
            name: name.into(),
            size,
        })
    }

    pub fn failed<S: Into<String>, R: Into<String>>(name: S, reason: R) -> Self {
        Self::Failed(ContainerFailure {
            name: name.into(),
            reason: reason.into(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Sized(size) => &size.name,
            Self::Failed(failure) => &failure.name,
        }
    }
}

/// Per-account breakdown and total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountReport {
    pub account: String,
    pub containers: Vec<ContainerSize>,
    pub failures: Vec<ContainerFailure>,
    /// Set when the account was abandoned before or during container listing
    pub error: Option<String>,
}

impl AccountReport {
    pub fn new<S: Into<String>>(account: S) -> Self {
        Self {
            account: account.into(),
            ..Default::default()
        }
    }

    /// Report for an account whose processing was aborted
    pub fn failed<S: Into<String>, E: ToString>(account: S, error: E) -> Self {
        Self {
            account: account.into(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: ContainerOutcome) {
        match outcome {
            ContainerOutcome::Sized(size) => self.containers.push(size),
            ContainerOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Sort the breakdown by container name so output does not depend on
    /// worker completion order.
    pub fn finish(mut self) -> Self {
        self.containers.sort_by(|a, b| a.name.cmp(&b.name));
        self.failures.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Sum over the containers that completed; failures contribute nothing.
    pub fn total_bytes(&self) -> u64 {
        self.containers.iter().map(|c| c.size).sum()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
