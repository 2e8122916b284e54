//! Per-account size aggregation
//!
//! Lists every container in an account, sizes each container on its own
//! task and joins all of them before the account total is produced.
//! Concurrent listings are gated by a semaphore so large accounts do not
//! open an unbounded number of connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

use crate::blob::listing::{collect_items, AccountListing, StorageBackend};
use crate::blob::models::{Account, AccountReport, ContainerOutcome};
use crate::blob::sizer::container_size;
use crate::error::{BlobsizeError, Result};

pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Computes container and account sizes for one account at a time
pub struct AccountAggregator {
    backend: Arc<dyn StorageBackend>,
    max_concurrency: usize,
    account_timeout: Option<Duration>,
}

impl AccountAggregator {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            account_timeout: None,
        }
    }

    /// Limit on container listings in flight at once. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Deadline for a whole account pass; in-flight workers are aborted
    /// when it elapses.
    pub fn with_account_timeout(mut self, account_timeout: Option<Duration>) -> Self {
        self.account_timeout = account_timeout;
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Aggregate one account.
    ///
    /// Errors are account-scoped: the client could not be built, the
    /// container listing failed, or the deadline elapsed. Container
    /// failures are recorded on the report instead.
    pub async fn aggregate(&self, account: &Account) -> Result<AccountReport> {
        let listing = self.backend.connect(account)?;

        match self.account_timeout {
            Some(limit) => tokio::time::timeout(limit, self.aggregate_with(account, listing))
                .await
                .map_err(|_| BlobsizeError::Timeout(limit))?,
            None => self.aggregate_with(account, listing).await,
        }
    }

    async fn aggregate_with(
        &self,
        account: &Account,
        listing: Arc<dyn AccountListing>,
    ) -> Result<AccountReport> {
        let containers = collect_items(listing.container_pages()).await?;
        info!(
            "Account {}: sizing {} containers (max {} concurrent)",
            account.name(),
            containers.len(),
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut workers = JoinSet::new();
        // A worker that panics returns no outcome; its name comes from here
        let mut names: HashMap<Id, String> = HashMap::with_capacity(containers.len());

        for container in containers {
            let listing = Arc::clone(&listing);
            let semaphore = Arc::clone(&semaphore);
            let name = container.clone();

            let handle = workers.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return ContainerOutcome::failed(container, e.to_string()),
                };

                match container_size(listing.blob_pages(&container)).await {
                    Ok(size) => ContainerOutcome::sized(container, size),
                    Err(e) => ContainerOutcome::failed(container, e.to_string()),
                }
            });
            names.insert(handle.id(), name);
        }

        let mut report = AccountReport::new(account.name());
        while let Some(joined) = workers.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, outcome)) => {
                    names.remove(&id);
                    outcome
                }
                Err(e) => {
                    let name = names.remove(&e.id()).unwrap_or_default();
                    ContainerOutcome::failed(name, format!("worker did not complete: {}", e))
                }
            };

            match &outcome {
                ContainerOutcome::Failed(failure) => warn!(
                    "Error processing container {} in account {}: {}",
                    failure.name,
                    account.name(),
                    failure.reason
                ),
                ContainerOutcome::Sized(size) => {
                    debug!("Container {}: {} bytes", outcome.name(), size.size)
                }
            }
            report.record(outcome);
        }

        Ok(report.finish())
    }
}
