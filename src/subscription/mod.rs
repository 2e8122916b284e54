//! Subscription discovery and selection
//!
//! Listing subscriptions from Azure Resource Manager is kept separate from
//! choosing one, so the choice can come from an operator prompt, a fixed
//! index or a configured id.

pub mod selector;
pub mod source;

pub use selector::{IndexSelector, InteractiveSelector, MatchSelector, SubscriptionSelector};
pub use source::{ArmSubscriptionSource, Subscription, SubscriptionSource};

use tracing::info;

use crate::error::{BlobsizeError, Result};

/// List the available subscriptions and pick one with `selector`
pub async fn resolve_subscription(
    source: &dyn SubscriptionSource,
    selector: &dyn SubscriptionSelector,
) -> Result<Subscription> {
    let subscriptions = source.list_subscriptions().await?;
    info!("Found {} subscriptions", subscriptions.len());

    let index = selector.select(&subscriptions)?;
    subscriptions
        .get(index)
        .cloned()
        .ok_or_else(|| BlobsizeError::invalid_selection(format!("index {} out of range", index)))
}
