//! Graph Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A Graph API helper error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for Graph API helper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Version identifiers must start with a lowercase `v`.
    #[display("API version must start with 'v': {_0:?}")]
    MissingPrefix(#[error(not(source))] String),
    /// The major component is missing or not a non-negative integer.
    #[display("invalid major component in API version: {_0:?}")]
    InvalidMajor(#[error(not(source))] String),
    /// The minor component is present but not a non-negative integer.
    #[display("invalid minor component in API version: {_0:?}")]
    InvalidMinor(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Version strings are either well-formed or they are not.
        false
    }
}
