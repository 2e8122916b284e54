//! Run driver and report output tests
//!
//! Accounts are processed in input order and every account gets a report
//! section, including accounts that could not be processed.

mod common;

use async_trait::async_trait;
use blobsize::blob::{run_accounts, Account, AccountAggregator};
use blobsize::cli::execute_report;
use blobsize::config::Config;
use blobsize::subscription::{IndexSelector, MatchSelector, Subscription, SubscriptionSource};
use blobsize::utils::format::{OutputFormat, ReportWriter};
use blobsize::{BlobsizeError, Result};
use common::{FakeAccount, FakeStorage, Step, GIB};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Source {}
    #[async_trait]
    impl SubscriptionSource for Source {
        async fn list_subscriptions(&self) -> Result<Vec<Subscription>>;
    }
}

fn subscription(id: &str, name: &str) -> Subscription {
    Subscription {
        subscription_id: id.to_string(),
        display_name: name.to_string(),
        state: Some("Enabled".to_string()),
    }
}

fn empty_account() -> FakeAccount {
    let mut account = FakeAccount::default();
    account.containers = vec![Step::Page(vec![])];
    account
}

async fn run_text(storage: FakeStorage, accounts: &[&str], show_failures: bool) -> String {
    let aggregator = AccountAggregator::new(Arc::new(storage));
    let accounts: Vec<Account> = accounts.iter().map(|name| Account::new(*name)).collect();

    let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text, show_failures);
    run_accounts(&aggregator, &accounts, &mut writer).await.unwrap();
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[cfg(test)]
mod run_driver_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_accounts_each_get_a_section() {
        let storage = FakeStorage::new()
            .account("one", empty_account())
            .account("two", empty_account())
            .account("three", empty_account());

        let output = run_text(storage, &["one", "two", "three"], false).await;

        assert_eq!(
            output,
            "Processing account: one\n\
             Total size for account one: 0.00 GB\n\n\
             Processing account: two\n\
             Total size for account two: 0.00 GB\n\n\
             Processing account: three\n\
             Total size for account three: 0.00 GB\n\n"
        );
    }

    #[tokio::test]
    async fn test_listing_failure_moves_on_to_next_account() {
        let storage = FakeStorage::new()
            .account("broken", FakeAccount::container_listing_fails(&["x", "y"]))
            .account("healthy", FakeAccount::with_sizes(&[("data", GIB + GIB / 2)]));
        let probe = Arc::clone(&storage.probe);

        let output = run_text(storage, &["broken", "healthy"], false).await;

        assert_eq!(
            output,
            "Processing account: broken\n\
             Total size for account broken: 0.00 GB\n\n\
             Processing account: healthy\n\
             Container: data, Size: 1.50 GB\n\
             Total size for account healthy: 1.50 GB\n\n"
        );
        assert_eq!(probe.listed(), vec!["data".to_string()]);
    }

    #[tokio::test]
    async fn test_reports_follow_input_order() {
        let storage = FakeStorage::new()
            .account("zeta", FakeAccount::with_sizes(&[("a", GIB)]))
            .account("alpha", FakeAccount::with_sizes(&[("b", 2 * GIB)]));
        let aggregator = AccountAggregator::new(Arc::new(storage));
        let accounts = vec![Account::new("zeta"), Account::new("alpha")];

        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text, false);
        let reports = run_accounts(&aggregator, &accounts, &mut writer).await.unwrap();

        let names: Vec<&str> = reports.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(reports[1].total_bytes(), 2 * GIB);
    }

    #[tokio::test]
    async fn test_show_failures_marks_failed_containers() {
        let mut account = FakeAccount::with_sizes(&[("ok", 0), ("bad", 0)]);
        account
            .blobs
            .insert("bad".to_string(), vec![Step::Fail("403 Forbidden")]);
        let storage = FakeStorage::new().account("acct", account);

        let plain = run_text(
            FakeStorage::new().account("acct", FakeAccount::with_sizes(&[("ok", 0)])),
            &["acct"],
            true,
        )
        .await;
        let marked = run_text(storage, &["acct"], true).await;

        assert!(!plain.contains("Error"));
        assert!(marked.contains("Container: bad, Error: Listing failed: 403 Forbidden"));
        assert!(marked.contains("Container: ok, Size: 0.00 GB"));
    }

    #[tokio::test]
    async fn test_timed_out_account_is_followed_by_next() {
        let mut slow = FakeAccount::with_sizes(&[("big", 5 * GIB)]);
        slow.delay = Some(Duration::from_millis(500));
        let storage = FakeStorage::new()
            .account("slow", slow)
            .account("healthy", FakeAccount::with_sizes(&[("data", GIB)]));
        let probe = Arc::clone(&storage.probe);

        let aggregator = AccountAggregator::new(Arc::new(storage))
            .with_account_timeout(Some(Duration::from_millis(50)));
        let accounts = vec![Account::new("slow"), Account::new("healthy")];
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text, false);

        let reports = run_accounts(&aggregator, &accounts, &mut writer).await.unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert_eq!(
            output,
            "Processing account: slow\n\
             Total size for account slow: 0.00 GB\n\n\
             Processing account: healthy\n\
             Container: data, Size: 1.00 GB\n\
             Total size for account healthy: 1.00 GB\n\n"
        );
        assert!(reports[0].is_failed());
        assert_eq!(reports[1].total_bytes(), GIB);
        // Only the healthy account's listing ran to completion
        assert_eq!(probe.completed(), 1);
    }

    #[tokio::test]
    async fn test_unknown_account_is_reported_as_failed() {
        let aggregator = AccountAggregator::new(Arc::new(FakeStorage::new()));
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text, false);

        let reports = run_accounts(&aggregator, &[Account::new("ghost")], &mut writer)
            .await
            .unwrap();

        assert!(reports[0].is_failed());
        assert_eq!(reports[0].total_bytes(), 0);
    }
}

#[cfg(test)]
mod execute_report_tests {
    use super::*;

    #[tokio::test]
    async fn test_text_report_with_matched_subscription() {
        let mut source = MockSource::new();
        source.expect_list_subscriptions().times(1).returning(|| {
            Ok(vec![
                subscription("11111111-1111-1111-1111-111111111111", "Development"),
                subscription("22222222-2222-2222-2222-222222222222", "Production"),
            ])
        });

        let storage = FakeStorage::new().account("acct", FakeAccount::with_sizes(&[("a", GIB)]));
        let mut out = Vec::new();

        let reports = execute_report(
            &Config::default(),
            &[Account::new("acct")],
            &source,
            &MatchSelector::new("Production"),
            Arc::new(storage),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(reports.len(), 1);
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with(
            "Using subscription: 22222222-2222-2222-2222-222222222222\n\nProcessing account: acct\n"
        ));
        assert!(output.contains("Total size for account acct: 1.00 GB"));
    }

    #[tokio::test]
    async fn test_json_report() {
        let mut source = MockSource::new();
        source
            .expect_list_subscriptions()
            .returning(|| Ok(vec![subscription("11111111-1111-1111-1111-111111111111", "Dev")]));

        let mut account = FakeAccount::with_sizes(&[("a", GIB), ("b", 0)]);
        account.blobs.insert("b".to_string(), vec![Step::Fail("timeout")]);
        let storage = FakeStorage::new().account("acct", account);

        let config = Config {
            output_format: OutputFormat::Json,
            ..Config::default()
        };
        let mut out = Vec::new();

        execute_report(
            &config,
            &[Account::new("acct")],
            &source,
            &IndexSelector::new(0),
            Arc::new(storage),
            &mut out,
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["subscription"], "11111111-1111-1111-1111-111111111111");
        assert_eq!(value["accounts"][0]["total_gb"], "1.00");
        assert_eq!(value["accounts"][0]["failures"][0]["name"], "b");
    }

    #[tokio::test]
    async fn test_invalid_selection_is_fatal() {
        let mut source = MockSource::new();
        source
            .expect_list_subscriptions()
            .returning(|| Ok(vec![subscription("11111111-1111-1111-1111-111111111111", "Dev")]));

        let storage = FakeStorage::new().account("acct", empty_account());
        let probe = Arc::clone(&storage.probe);
        let mut out = Vec::new();

        let result = execute_report(
            &Config::default(),
            &[Account::new("acct")],
            &source,
            &IndexSelector::new(5),
            Arc::new(storage),
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(BlobsizeError::InvalidSelection(_))));
        assert!(out.is_empty());
        assert!(probe.listed().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_listing_failure_is_fatal() {
        let mut source = MockSource::new();
        source
            .expect_list_subscriptions()
            .returning(|| Err(BlobsizeError::azure_api("HTTP 401: token expired")));

        let mut out = Vec::new();
        let result = execute_report(
            &Config::default(),
            &[Account::new("acct")],
            &source,
            &IndexSelector::new(0),
            Arc::new(FakeStorage::new()),
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(BlobsizeError::AzureApiError(_))));
        assert!(out.is_empty());
    }
}
