//! Report formatting and output utilities
//!
//! Sizes are reported in gigabytes computed as bytes / 1024^3 with two
//! decimal places. Text output is streamed account by account; JSON output
//! is buffered and written once the run completes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::blob::models::AccountReport;
use crate::error::Result;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Format a byte count as gigabytes with two decimals, e.g. "1.50"
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2}", bytes_to_gb(bytes))
}

#[derive(Serialize)]
struct JsonContainer<'a> {
    name: &'a str,
    size: u64,
}

#[derive(Serialize)]
struct JsonAccount<'a> {
    account: &'a str,
    containers: Vec<JsonContainer<'a>>,
    failures: &'a [crate::blob::models::ContainerFailure],
    total_bytes: u64,
    total_gb: String,
    error: Option<&'a str>,
}

impl<'a> From<&'a AccountReport> for JsonAccount<'a> {
    fn from(report: &'a AccountReport) -> Self {
        Self {
            account: &report.account,
            containers: report
                .containers
                .iter()
                .map(|c| JsonContainer {
                    name: &c.name,
                    size: c.size,
                })
                .collect(),
            failures: &report.failures,
            total_bytes: report.total_bytes(),
            total_gb: format_gb(report.total_bytes()),
            error: report.error.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct JsonRun<'a> {
    subscription: Option<&'a str>,
    accounts: Vec<JsonAccount<'a>>,
}

/// Writes the run report in the selected format
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
    show_failures: bool,
    subscription: Option<String>,
    buffered: Vec<AccountReport>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat, show_failures: bool) -> Self {
        Self {
            out,
            format,
            show_failures,
            subscription: None,
            buffered: Vec::new(),
        }
    }

    pub fn subscription(&mut self, subscription_id: &str) -> Result<()> {
        self.subscription = Some(subscription_id.to_string());
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Using subscription: {}", subscription_id)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn begin_account(&mut self, account: &str) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Processing account: {}", account)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn account(&mut self, report: &AccountReport) -> Result<()> {
        match self.format {
            OutputFormat::Text => self.write_account_text(report),
            OutputFormat::Json => {
                self.buffered.push(report.clone());
                Ok(())
            }
        }
    }

    fn write_account_text(&mut self, report: &AccountReport) -> Result<()> {
        for container in &report.containers {
            writeln!(
                self.out,
                "Container: {}, Size: {} GB",
                container.name,
                format_gb(container.size)
            )?;
        }

        if self.show_failures {
            for failure in &report.failures {
                writeln!(
                    self.out,
                    "Container: {}, Error: {}",
                    failure.name, failure.reason
                )?;
            }
            if let Some(error) = &report.error {
                writeln!(self.out, "Account error: {}", error)?;
            }
        }

        writeln!(
            self.out,
            "Total size for account {}: {} GB",
            report.account,
            format_gb(report.total_bytes())
        )?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// Flush buffered output and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        if self.format == OutputFormat::Json {
            let run = JsonRun {
                subscription: self.subscription.as_deref(),
                accounts: self.buffered.iter().map(JsonAccount::from).collect(),
            };
            serde_json::to_writer_pretty(&mut self.out, &run)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
