use thiserror::Error;

/// Main error type for blobsize operations
#[derive(Debug, Error)]
pub enum BlobsizeError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to create storage client for account '{account}': {details}")]
    AccountClientError { account: String, details: String },

    #[error("Throttled by Azure Resource Manager: {message}")]
    Throttled {
        message: String,
        retry_after: Option<std::time::Duration>,
    },

    #[error("Listing failed: {0}")]
    ListingError(String),

    #[error("Invalid subscription selection: {0}")]
    InvalidSelection(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl BlobsizeError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn account_client<S: Into<String>, D: Into<String>>(account: S, details: D) -> Self {
        Self::AccountClientError {
            account: account.into(),
            details: details.into(),
        }
    }

    pub fn throttled<S: Into<String>>(message: S, retry_after: Option<std::time::Duration>) -> Self {
        Self::Throttled {
            message: message.into(),
            retry_after,
        }
    }

    /// Delay requested by the server before the next attempt, if any
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::Throttled { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn listing<S: Into<String>>(msg: S) -> Self {
        Self::ListingError(msg.into())
    }

    pub fn invalid_selection<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSelection(msg.into())
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn connection_timeout<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionTimeout(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type alias for blobsize operations
pub type Result<T> = std::result::Result<T, BlobsizeError>;

/// Convert Azure Core errors to BlobsizeError
impl From<azure_core::Error> for BlobsizeError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}
