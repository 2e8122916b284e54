//! Paginated listing backends
//!
//! Listings are exposed as lazy, forward-only streams of pages. A page is
//! requested only after the previous one reported a continuation, and the
//! first failed round trip ends the stream. Nothing here retries.

use azure_storage_blobs::prelude::*;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::auth::provider::AzureAuthProvider;
use crate::blob::models::{Account, BlobEntry, Page};
use crate::error::{BlobsizeError, Result};
use crate::utils::helpers::validate_storage_account_name;

/// Lazy sequence of listing pages
pub type PageStream<T> = BoxStream<'static, Result<Page<T>>>;

/// Resolves accounts to listing clients
pub trait StorageBackend: Send + Sync {
    /// Build a listing client for one account. Failure here only affects
    /// that account.
    fn connect(&self, account: &Account) -> Result<Arc<dyn AccountListing>>;
}

/// Listing operations scoped to a single storage account
pub trait AccountListing: Send + Sync {
    /// Pages of container names, starting from the beginning
    fn container_pages(&self) -> PageStream<String>;

    /// Pages of blob metadata for one container, starting from the beginning
    fn blob_pages(&self, container: &str) -> PageStream<BlobEntry>;
}

enum Cursor<C> {
    Start,
    Next(C),
    Done,
}

/// Build a page stream from a "fetch the page at this cursor" function.
///
/// `fetch` receives `None` for the first page and the cursor returned by the
/// previous call afterwards. Returning no cursor marks the final page.
pub fn paged<T, C, F, Fut>(fetch: F) -> PageStream<T>
where
    T: Send + 'static,
    C: Send + 'static,
    F: FnMut(Option<C>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(Vec<T>, Option<C>)>> + Send + 'static,
{
    stream::try_unfold((Cursor::Start, fetch), |(cursor, mut fetch)| async move {
        let marker = match cursor {
            Cursor::Done => return Ok::<_, BlobsizeError>(None),
            Cursor::Start => None,
            Cursor::Next(marker) => Some(marker),
        };

        let (items, next) = fetch(marker).await?;
        let page = Page::new(items, next.is_some());
        let cursor = match next {
            Some(marker) => Cursor::Next(marker),
            None => Cursor::Done,
        };

        Ok(Some((page, (cursor, fetch))))
    })
    .boxed()
}

/// Drain a page stream into a flat list. The first failed page discards
/// everything collected so far.
pub async fn collect_items<T>(mut pages: PageStream<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while let Some(page) = pages.try_next().await? {
        items.extend(page.items);
    }
    Ok(items)
}

/// Azure Blob Storage backend authenticated with a shared token credential
pub struct AzureStorageBackend {
    auth_provider: Arc<dyn AzureAuthProvider>,
}

impl AzureStorageBackend {
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>) -> Self {
        Self { auth_provider }
    }
}

impl StorageBackend for AzureStorageBackend {
    fn connect(&self, account: &Account) -> Result<Arc<dyn AccountListing>> {
        validate_storage_account_name(account.name())
            .map_err(|details| BlobsizeError::account_client(account.name(), details))?;

        debug!("Creating blob service client for {}", account.endpoint());
        let token_credential = self.auth_provider.get_token_credential();
        let client = BlobServiceClient::new(account.name(), token_credential);

        Ok(Arc::new(AzureAccountListing {
            account: account.name().to_string(),
            client,
        }))
    }
}

struct AzureAccountListing {
    account: String,
    client: BlobServiceClient,
}

impl AccountListing for AzureAccountListing {
    fn container_pages(&self) -> PageStream<String> {
        let account = self.account.clone();

        self.client
            .list_containers()
            .into_stream()
            .map(move |response| -> Result<Page<String>> {
                let response = response.map_err(|e| {
                    BlobsizeError::listing(format!(
                        "Failed to list containers in account '{account}': {e}"
                    ))
                })?;

                let names: Vec<String> = response
                    .containers
                    .into_iter()
                    .map(|container| container.name)
                    .collect();
                debug!("Account {account}: container page with {} entries", names.len());

                Ok(Page::new(names, response.next_marker.is_some()))
            })
            .boxed()
    }

    fn blob_pages(&self, container: &str) -> PageStream<BlobEntry> {
        let container_name = container.to_string();

        self.client
            .container_client(container.to_string())
            .list_blobs()
            .into_stream()
            .map(move |response| -> Result<Page<BlobEntry>> {
                let response = response.map_err(|e| {
                    BlobsizeError::listing(format!(
                        "Failed to list blobs in container '{container_name}': {e}"
                    ))
                })?;

                let entries: Vec<BlobEntry> = response
                    .blobs
                    .blobs()
                    .map(|blob| BlobEntry::new(blob.name.clone(), blob.properties.content_length))
                    .collect();
                debug!(
                    "Container {container_name}: blob page with {} entries",
                    entries.len()
                );

                Ok(Page::new(entries, response.next_marker.is_some()))
            })
            .boxed()
    }
}
