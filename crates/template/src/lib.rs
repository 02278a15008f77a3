//! Placeholder validation for message template bodies.
//!
//! Message templates submitted to the upstream provider may contain numbered
//! placeholders (`{{1}}`, `{{2}}`, ...) that are substituted at send time. The
//! provider rejects any body whose placeholders do not start at 1 and increase
//! by exactly one in order of appearance, so templates are checked locally
//! before submission to surface the problem immediately.

pub mod error;
mod placeholders;

pub use crate::placeholders::{Placeholders, count_and_validate, validate};
