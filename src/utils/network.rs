use crate::error::BlobsizeError;
use reqwest::Client;
use std::time::Duration;

/// Configuration for HTTP client with proper timeouts
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("blobsize/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a properly configured HTTP client with timeouts
pub fn create_http_client(config: &NetworkConfig) -> crate::error::Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| BlobsizeError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a transport failure into an error the retry policy can classify
pub fn classify_network_error(error: &reqwest::Error, url: &str) -> BlobsizeError {
    if error.is_timeout() {
        return BlobsizeError::connection_timeout(format!("Request to {} timed out", url));
    }

    if error.is_connect() {
        return BlobsizeError::network(format!(
            "Failed to connect to {}. Please check your network connection: {}",
            url, error
        ));
    }

    if let Some(status) = error.status() {
        match status.as_u16() {
            502..=504 => {
                return BlobsizeError::network(format!(
                    "Azure Resource Manager returned {} (temporary) for {}",
                    status, url
                ))
            }
            _ => {}
        }
    }

    BlobsizeError::network(format!("Network error when calling {}: {}", url, error))
}

/// Check if an error is worth retrying
pub fn is_retryable_error(error: &BlobsizeError) -> bool {
    match error {
        BlobsizeError::ConnectionTimeout(_) | BlobsizeError::Throttled { .. } => true,
        BlobsizeError::NetworkError(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("timeout")
                || msg_lower.contains("temporary")
                || msg_lower.contains("503")
                || msg_lower.contains("502")
                || msg_lower.contains("504")
        }
        BlobsizeError::AzureApiError(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("429")
                || msg_lower.contains("503")
                || msg_lower.contains("502")
                || msg_lower.contains("504")
                || msg_lower.contains("throttled")
        }
        _ => false,
    }
}
