//! Schema-less metadata for contacts, notes and business records.
//!
//! Records exchanged over the REST and WebSocket protocols carry a free-form
//! `metadata` object. Most code paths only pass it along, so [`CachedMetadata`]
//! keeps the received bytes and defers parsing until a key is actually read
//! or written:
//!
//! - **Empty**: no metadata; serializes as `{}`, never `null`.
//! - **Raw**: bytes as received; serialized back byte-for-byte.
//! - **Parsed**: an ordered key/value map, authoritative once modified.
//!
//! Malformed metadata degrades to "absent" rather than failing the request,
//! and is reported through a [`MetadataObserver`].

mod cache;
pub mod error;
mod observer;

pub use crate::cache::CachedMetadata;
pub use crate::observer::{MetadataObserver, Operation, ParseFailure, TracingObserver};
pub use serde_json::Value;
