//! Subscription listing against Azure Resource Manager

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::auth::provider::{AzureAuthProvider, MANAGEMENT_SCOPE};
use crate::blob::listing::{collect_items, paged};
use crate::error::{BlobsizeError, Result};
use crate::utils::network::{classify_network_error, create_http_client, NetworkConfig};
use crate::utils::retry::{parse_retry_after, retry_with_backoff, RetryOptions};

const SUBSCRIPTIONS_URL: &str =
    "https://management.azure.com/subscriptions?api-version=2022-12-01";

/// An Azure subscription as returned by the resource manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    pub display_name: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionListResponse {
    #[serde(default)]
    value: Vec<Subscription>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Source of selectable subscriptions
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>>;
}

/// Lists subscriptions visible to the shared credential
pub struct ArmSubscriptionSource {
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
}

impl ArmSubscriptionSource {
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>) -> Result<Self> {
        let http_client = create_http_client(&NetworkConfig::default())?;
        Ok(Self {
            auth_provider,
            http_client,
        })
    }
}

#[async_trait]
impl SubscriptionSource for ArmSubscriptionSource {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let auth_provider = Arc::clone(&self.auth_provider);
        let http_client = self.http_client.clone();

        let pages = paged(move |next_link: Option<String>| {
            let auth_provider = Arc::clone(&auth_provider);
            let http_client = http_client.clone();
            let url = next_link.unwrap_or_else(|| SUBSCRIPTIONS_URL.to_string());

            async move {
                let page = fetch_page_with_retry(auth_provider, http_client, url).await?;
                Ok((page.value, page.next_link))
            }
        });

        collect_items(pages).await
    }
}

async fn fetch_page_with_retry(
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
    url: String,
) -> Result<SubscriptionListResponse> {
    let retry_options = RetryOptions {
        max_retries: 3,
        initial_interval: std::time::Duration::from_millis(1000),
        max_interval: std::time::Duration::from_millis(10000),
        multiplier: 2.0,
    };

    retry_with_backoff(
        || fetch_page(auth_provider.as_ref(), &http_client, &url),
        retry_options,
    )
    .await
}

async fn fetch_page(
    auth_provider: &dyn AzureAuthProvider,
    http_client: &Client,
    url: &str,
) -> Result<SubscriptionListResponse> {
    let token = auth_provider.get_token(&[MANAGEMENT_SCOPE]).await?;
    let bearer = token.token.secret().to_string();

    debug!("Fetching subscriptions page: {}", url);
    let response = http_client
        .get(url)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| classify_network_error(&e, url))?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.unwrap_or_default();
        return Err(BlobsizeError::throttled(
            format!("listing subscriptions: {}", body),
            retry_after,
        ));
    }

    if !response.status().is_success() {
        let status_code = response.status().as_u16();
        let error_body = response.text().await.unwrap_or_default();
        return Err(parse_azure_error(status_code, &error_body));
    }

    response.json::<SubscriptionListResponse>().await.map_err(|e| {
        BlobsizeError::serialization(format!("Failed to parse subscriptions response: {}", e))
    })
}

/// Parse Azure error response
fn parse_azure_error(status: u16, body: &str) -> BlobsizeError {
    if let Ok(error_json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = error_json
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(|m| m.as_str())
        {
            return BlobsizeError::azure_api(format!("HTTP {}: {}", status, message));
        }
    }
    BlobsizeError::azure_api(format!("HTTP {}: {}", status, body))
}
