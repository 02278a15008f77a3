//! Template Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A template error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Placeholders must be numbered `{{1}}`, `{{2}}`, ... in order of appearance.
    #[display("placeholder out of sequence: expected {{{{{expected}}}}}, found {{{{{found}}}}}")]
    OutOfSequence {
        /// The placeholder number that should have come next.
        expected: usize,
        /// The digits of the placeholder that was found instead.
        found: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The template body has to be fixed by its author.
        false
    }
}
