//! Metadata Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only typed decoding ([`CachedMetadata::decode_into`](crate::CachedMetadata::decode_into))
//! raises these. Key-level reads and writes never fail; they report malformed
//! data to a [`MetadataObserver`](crate::MetadataObserver) instead.

use derive_more::{Display, Error};

/// A metadata error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stored metadata does not fit the requested shape.
    #[display("invalid metadata")]
    InvalidData,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Metadata is either decodable into the target or it is not.
        false
    }
}
