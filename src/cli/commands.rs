//! CLI arguments and run orchestration
//!
//! This module defines the command-line interface using clap and wires the
//! credential, subscription selection, storage backend and report writer
//! together for a run.

use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::auth::provider::{AzureAuthProvider, DefaultAzureCredentialProvider};
use crate::blob::{
    run_accounts, Account, AccountAggregator, AccountReport, AzureStorageBackend, StorageBackend,
};
use crate::config::Config;
use crate::error::{BlobsizeError, Result};
use crate::subscription::{
    resolve_subscription, ArmSubscriptionSource, InteractiveSelector, MatchSelector,
    SubscriptionSelector, SubscriptionSource,
};
use crate::utils::format::{OutputFormat, ReportWriter};
use crate::utils::helpers::parse_accounts;

#[derive(Parser, Debug)]
#[command(name = "blobsize")]
#[command(about = "Report Azure Blob Storage usage per container and per account")]
#[command(version, author)]
pub struct Cli {
    /// Comma-separated list of storage account names
    #[arg(long, required = true, value_delimiter = ',', value_name = "NAMES")]
    pub accounts: Vec<String>,

    /// Subscription id or display name to use instead of the interactive prompt
    #[arg(long, value_name = "ID|NAME")]
    pub subscription: Option<String>,

    /// Maximum number of containers listed concurrently per account
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Abort an account if it takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Also print containers whose listing failed
    #[arg(long)]
    pub show_failures: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Command-line flags take precedence over environment and file settings
    pub fn apply_to(&self, config: &mut Config) {
        if self.debug {
            config.debug = true;
        }
        if let Some(subscription) = &self.subscription {
            config.subscription_id = subscription.clone();
        }
        if let Some(limit) = self.max_concurrency {
            config.max_concurrency = limit;
        }
        if let Some(seconds) = self.timeout {
            config.account_timeout_secs = seconds;
        }
        if self.show_failures {
            config.show_failures = true;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
    }

    pub async fn execute(self, mut config: Config) -> Result<()> {
        self.apply_to(&mut config);
        config.validate()?;

        let accounts = parse_accounts(&self.accounts)?;

        let auth_provider: Arc<dyn AzureAuthProvider> =
            Arc::new(DefaultAzureCredentialProvider::new()?);
        let source = ArmSubscriptionSource::new(Arc::clone(&auth_provider))?;
        let backend: Arc<dyn StorageBackend> =
            Arc::new(AzureStorageBackend::new(auth_provider));

        let selector: Box<dyn SubscriptionSelector> = match config.preselected_subscription() {
            Some(needle) => Box::new(MatchSelector::new(needle)),
            None => Box::new(InteractiveSelector),
        };

        execute_report(
            &config,
            &accounts,
            &source,
            selector.as_ref(),
            backend,
            std::io::stdout(),
        )
        .await?;

        Ok(())
    }
}

/// Select a subscription, then size every account in order and write the
/// report to `out`.
pub async fn execute_report<W: Write>(
    config: &Config,
    accounts: &[Account],
    source: &dyn SubscriptionSource,
    selector: &dyn SubscriptionSelector,
    backend: Arc<dyn StorageBackend>,
    out: W,
) -> Result<Vec<AccountReport>> {
    let subscription = resolve_subscription(source, selector).await?;
    info!(
        "Using subscription {} ({})",
        subscription.display_name, subscription.subscription_id
    );

    let aggregator = AccountAggregator::new(backend)
        .with_max_concurrency(config.max_concurrency)
        .with_account_timeout(config.account_timeout());

    let mut writer = ReportWriter::new(out, config.output_format, config.show_failures);
    writer.subscription(&subscription.subscription_id)?;

    let reports = run_accounts(&aggregator, accounts, &mut writer).await?;
    writer.finish()?;

    Ok(reports)
}

/// Print a fatal error once to `out`. Logging may not be initialised yet,
/// so this does not go through tracing.
pub fn report_fatal<W: Write>(out: &mut W, error: &BlobsizeError) {
    let _ = writeln!(out, "Error: {}", error);
}
