//! Subscription selection strategies

use std::io::{BufRead, Write};

use crate::error::{BlobsizeError, Result};
use crate::subscription::source::Subscription;

/// Picks one subscription out of a listing, returning its index
pub trait SubscriptionSelector {
    fn select(&self, subscriptions: &[Subscription]) -> Result<usize>;
}

/// Presents a numbered list and reads the operator's choice from stdin.
///
/// The list and prompt go to stderr so stdout only carries the report.
#[derive(Debug, Default)]
pub struct InteractiveSelector;

impl SubscriptionSelector for InteractiveSelector {
    fn select(&self, subscriptions: &[Subscription]) -> Result<usize> {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut prompt = std::io::stderr();
        prompt_choice(subscriptions, &mut input, &mut prompt)
    }
}

/// Write the numbered list, read one line and resolve it to an index
pub fn prompt_choice<R: BufRead, W: Write>(
    subscriptions: &[Subscription],
    input: &mut R,
    prompt: &mut W,
) -> Result<usize> {
    writeln!(prompt, "Available subscriptions:")?;
    for (i, sub) in subscriptions.iter().enumerate() {
        writeln!(
            prompt,
            "{}. {} ({})",
            i + 1,
            sub.display_name,
            sub.subscription_id
        )?;
    }
    write!(prompt, "Enter the number of the subscription you want to use: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_choice(&line, subscriptions.len())
}

/// Parse a 1-based choice. Non-numeric or out-of-range input is rejected.
pub fn parse_choice(line: &str, count: usize) -> Result<usize> {
    let choice: usize = line
        .trim()
        .parse()
        .map_err(|_| BlobsizeError::invalid_selection(format!("'{}' is not a number", line.trim())))?;

    if choice < 1 || choice > count {
        return Err(BlobsizeError::invalid_selection(format!(
            "{} is not between 1 and {}",
            choice, count
        )));
    }

    Ok(choice - 1)
}

/// Always picks the subscription at a fixed zero-based position
#[derive(Debug, Clone, Copy)]
pub struct IndexSelector {
    index: usize,
}

impl IndexSelector {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl SubscriptionSelector for IndexSelector {
    fn select(&self, subscriptions: &[Subscription]) -> Result<usize> {
        if self.index < subscriptions.len() {
            Ok(self.index)
        } else {
            Err(BlobsizeError::invalid_selection(format!(
                "index {} out of range for {} subscriptions",
                self.index,
                subscriptions.len()
            )))
        }
    }
}

/// Picks the first subscription whose id or display name matches
#[derive(Debug, Clone)]
pub struct MatchSelector {
    needle: String,
}

impl MatchSelector {
    pub fn new<S: Into<String>>(needle: S) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl SubscriptionSelector for MatchSelector {
    fn select(&self, subscriptions: &[Subscription]) -> Result<usize> {
        subscriptions
            .iter()
            .position(|sub| {
                sub.subscription_id.eq_ignore_ascii_case(&self.needle)
                    || sub.display_name == self.needle
            })
            .ok_or_else(|| {
                BlobsizeError::invalid_selection(format!(
                    "no subscription matches '{}'",
                    self.needle
                ))
            })
    }
}
