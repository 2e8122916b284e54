//! Authentication provider trait and implementations
//!
//! A single provider is created at startup and handed to every consumer
//! explicitly; accounts processed later in the run reuse the same session.

use async_trait::async_trait;
use azure_core::auth::{AccessToken, TokenCredential};
use azure_identity::{DefaultAzureCredential, TokenCredentialOptions};
use std::sync::Arc;
use tracing::debug;

use crate::error::{BlobsizeError, Result};

/// Scope used for Azure Resource Manager calls
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Trait for Azure authentication providers
#[async_trait]
pub trait AzureAuthProvider: Send + Sync {
    /// Get an access token for the specified scopes
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;

    /// Get the underlying token credential for Azure SDK usage
    fn get_token_credential(&self) -> Arc<dyn TokenCredential>;
}

/// Default Azure Credential Provider using DefaultAzureCredential
pub struct DefaultAzureCredentialProvider {
    credential: Arc<DefaultAzureCredential>,
}

impl DefaultAzureCredentialProvider {
    /// Create a new DefaultAzureCredentialProvider
    pub fn new() -> Result<Self> {
        let credential = DefaultAzureCredential::create(TokenCredentialOptions::default())
            .map_err(|e| {
                BlobsizeError::authentication(format!(
                    "Failed to create DefaultAzureCredential: {}",
                    e
                ))
            })?;
        debug!("Created DefaultAzureCredential");

        Ok(Self {
            credential: Arc::new(credential),
        })
    }
}

#[async_trait]
impl AzureAuthProvider for DefaultAzureCredentialProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        self.credential
            .get_token(scopes)
            .await
            .map_err(|e| BlobsizeError::authentication(format!("Failed to get token: {}", e)))
    }

    fn get_token_credential(&self) -> Arc<dyn TokenCredential> {
        self.credential.clone()
    }
}
