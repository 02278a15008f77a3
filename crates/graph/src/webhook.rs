//! Webhook subscription listings, as returned by the Graph API for an app.

use crate::error::Result;
use crate::version::compare_versions;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The `object` of subscriptions covering WhatsApp Business Account events.
pub const WHATSAPP_BUSINESS_ACCOUNT: &str = "whatsapp_business_account";
/// The webhook field delivering call events.
pub const CALLS_FIELD: &str = "calls";

/// One subscription of an app, covering a single object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub object: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub fields: Vec<WebhookField>,
}

/// A subscribed field, pinned to the API version it was subscribed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookField {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Whether any active WhatsApp Business Account subscription includes `field`
/// at `min_version` or later (any version when `min_version` is `None`).
///
/// Inactive subscriptions and other object types are skipped. A malformed
/// version on a matching field is an error, not a "no".
#[instrument(skip(subscriptions), fields(subscriptions = subscriptions.len()))]
pub fn is_subscribed_to(subscriptions: &[WebhookSubscription], field: &str, min_version: Option<&str>) -> Result<bool> {
    let candidates = subscriptions
        .iter()
        .filter(|s| s.object == WHATSAPP_BUSINESS_ACCOUNT && s.active)
        .flat_map(|s| s.fields.iter())
        .filter(|f| f.name == field);
    for candidate in candidates {
        let Some(min_version) = min_version else {
            return Ok(true);
        };
        if compare_versions(&candidate.version, min_version)?.is_ge() {
            return Ok(true);
        }
        tracing::debug!(version = %candidate.version, min_version, "Subscribed field predates minimum version");
    }
    Ok(false)
}

/// Shorthand for [`is_subscribed_to`] with the [`CALLS_FIELD`].
pub fn is_subscribed_to_calls(subscriptions: &[WebhookSubscription], min_version: Option<&str>) -> Result<bool> {
    is_subscribed_to(subscriptions, CALLS_FIELD, min_version)
}
