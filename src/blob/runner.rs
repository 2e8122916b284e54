//! Sequential run over the requested accounts
//!
//! Accounts are processed strictly one after another in input order. An
//! account-scoped failure is logged and reported with a zero total; the run
//! then moves on to the next account.

use std::io::Write;
use tracing::{error, info};

use crate::blob::aggregator::AccountAggregator;
use crate::blob::models::{Account, AccountReport};
use crate::error::Result;
use crate::utils::format::ReportWriter;

/// Aggregate each account in turn and write its section as soon as it is
/// complete. Only output errors abort the run.
pub async fn run_accounts<W: Write>(
    aggregator: &AccountAggregator,
    accounts: &[Account],
    writer: &mut ReportWriter<W>,
) -> Result<Vec<AccountReport>> {
    let mut reports = Vec::with_capacity(accounts.len());

    for account in accounts {
        info!("Processing account: {}", account.name());
        writer.begin_account(account.name())?;

        let report = match aggregator.aggregate(account).await {
            Ok(report) => report,
            Err(e) => {
                error!("Error processing account {}: {}", account.name(), e);
                AccountReport::failed(account.name(), e)
            }
        };

        writer.account(&report)?;
        reports.push(report);
    }

    Ok(reports)
}
