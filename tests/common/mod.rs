//! Scripted in-memory storage backend shared by the integration tests

#![allow(dead_code)]

use blobsize::blob::{Account, AccountListing, BlobEntry, Page, PageStream, StorageBackend};
use blobsize::{BlobsizeError, Result};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GIB: u64 = 1024 * 1024 * 1024;

/// One backend round trip: a page of items or a failure
#[derive(Debug, Clone)]
pub enum Step<T> {
    Page(Vec<T>),
    Fail(&'static str),
    /// The listing task panics when it reaches this step
    Panic,
}

fn into_pages<T: Send + 'static>(steps: Vec<Step<T>>) -> PageStream<T> {
    let count = steps.len();
    let items: Vec<Result<Page<T>>> = steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| match step {
            Step::Page(items) => Ok(Page::new(items, i + 1 < count)),
            Step::Fail(reason) => Err(BlobsizeError::listing(reason)),
            Step::Panic => panic!("listing backend crashed"),
        })
        .collect();
    stream::iter(items).boxed()
}

#[derive(Debug, Clone, Default)]
pub struct FakeAccount {
    pub connect_error: Option<&'static str>,
    /// Overrides the storage-wide blob listing delay for this account
    pub delay: Option<Duration>,
    pub containers: Vec<Step<String>>,
    pub blobs: HashMap<String, Vec<Step<u64>>>,
}

impl FakeAccount {
    /// Single container page with one blob page per container
    pub fn with_sizes(sizes: &[(&str, u64)]) -> Self {
        let mut account = Self::default();
        account.containers = vec![Step::Page(
            sizes.iter().map(|(name, _)| name.to_string()).collect(),
        )];
        for (name, size) in sizes {
            account
                .blobs
                .insert(name.to_string(), vec![Step::Page(vec![*size])]);
        }
        account
    }

    pub fn container_listing_fails(names: &[&str]) -> Self {
        let mut account = Self::default();
        account.containers = vec![
            Step::Page(names.iter().map(|n| n.to_string()).collect()),
            Step::Fail("AuthorizationPermissionMismatch"),
        ];
        account
    }
}

#[derive(Default)]
pub struct Probe {
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub completed: AtomicUsize,
    pub blob_listings: Mutex<Vec<String>>,
}

impl Probe {
    fn enter(&self, container: &str) {
        self.blob_listings
            .lock()
            .unwrap()
            .push(container.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn listed(&self) -> Vec<String> {
        self.blob_listings.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeStorage {
    accounts: HashMap<String, FakeAccount>,
    delay: Option<Duration>,
    pub probe: Arc<Probe>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, name: &str, account: FakeAccount) -> Self {
        self.accounts.insert(name.to_string(), account);
        self
    }

    /// Hold every blob listing open for `delay` before its pages arrive
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl StorageBackend for FakeStorage {
    fn connect(&self, account: &Account) -> Result<Arc<dyn AccountListing>> {
        let fake = self
            .accounts
            .get(account.name())
            .ok_or_else(|| BlobsizeError::account_client(account.name(), "unknown account"))?;

        if let Some(reason) = fake.connect_error {
            return Err(BlobsizeError::account_client(account.name(), reason));
        }

        Ok(Arc::new(FakeListing {
            account: fake.clone(),
            delay: fake.delay.or(self.delay),
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct FakeListing {
    account: FakeAccount,
    delay: Option<Duration>,
    probe: Arc<Probe>,
}

impl AccountListing for FakeListing {
    fn container_pages(&self) -> PageStream<String> {
        into_pages(self.account.containers.clone())
    }

    fn blob_pages(&self, container: &str) -> PageStream<BlobEntry> {
        let steps: Vec<Step<BlobEntry>> = self
            .account
            .blobs
            .get(container)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, step)| match step {
                Step::Page(lengths) => Step::Page(
                    lengths
                        .into_iter()
                        .enumerate()
                        .map(|(j, len)| BlobEntry::new(format!("{container}/{i}-{j}"), len))
                        .collect(),
                ),
                Step::Fail(reason) => Step::Fail(reason),
                Step::Panic => Step::Panic,
            })
            .collect();

        let probe = Arc::clone(&self.probe);
        let delay = self.delay;
        let container = container.to_string();

        stream::once(async move {
            probe.enter(&container);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            probe.exit();
            into_pages(steps)
        })
        .flatten()
        .boxed()
    }
}
