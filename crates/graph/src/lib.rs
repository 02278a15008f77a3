//! Graph API version handling.
//!
//! The upstream Graph API is versioned as `vMAJOR.MINOR`. Fields and
//! capabilities appear in specific versions, so callers holding a configured
//! or negotiated [`ApiVersion`] need to order versions before deciding whether
//! something can be used. Webhook subscriptions are pinned to the version they
//! were created with, see [`is_subscribed_to`].

pub mod error;
mod version;
pub mod webhook;

pub use crate::version::{ApiVersion, compare_versions};
pub use crate::webhook::{WebhookField, WebhookSubscription, is_subscribed_to, is_subscribed_to_calls};
