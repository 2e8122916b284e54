//! General utility helper functions
//!
//! Input parsing and Azure naming rules shared by the CLI, configuration
//! and the storage backend.

use regex::Regex;

use crate::blob::models::Account;
use crate::error::{BlobsizeError, Result};

/// Split a comma-separated account list. Entries are trimmed and empty
/// entries dropped; an empty result is an error.
pub fn parse_accounts(raw: &[String]) -> Result<Vec<Account>> {
    let accounts: Vec<Account> = raw
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Account::new)
        .collect();

    if accounts.is_empty() {
        return Err(BlobsizeError::invalid_argument(
            "Please provide a list of accounts using the --accounts flag",
        ));
    }

    Ok(accounts)
}

/// Validate storage account name according to Azure Storage requirements
pub fn validate_storage_account_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Storage account name cannot be empty".to_string());
    }

    if name.len() < 3 || name.len() > 24 {
        return Err("Storage account name must be between 3 and 24 characters".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(
            "Storage account name can only contain lowercase letters and numbers".to_string(),
        );
    }

    Ok(())
}

/// Validate Azure subscription ID format
pub fn validate_subscription_id(subscription_id: &str) -> Result<()> {
    if subscription_id.trim().is_empty() {
        return Err(BlobsizeError::config("Subscription ID cannot be empty"));
    }

    let guid_pattern = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )?;

    if !guid_pattern.is_match(subscription_id.trim()) {
        return Err(BlobsizeError::config(format!(
            "Subscription ID '{}' must be a valid GUID",
            subscription_id
        )));
    }

    Ok(())
}
