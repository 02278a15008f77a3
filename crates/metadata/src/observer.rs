//! Diagnostics for malformed metadata.
//!
//! Metadata is auxiliary, best-effort data: a corrupt payload must never fail
//! the request that carries it. Instead, each failed parse is handed to a
//! [`MetadataObserver`] together with the call site that triggered it, so the
//! source of the corrupt data can be tracked down later.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::panic::Location;

/// The operation that needed the stored bytes to be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Serialize,
}
impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Serialize => "serialize",
        })
    }
}

/// Details of a single failed parse of stored metadata bytes.
#[derive(Debug)]
pub struct ParseFailure<'a> {
    pub operation: Operation,
    pub error: &'a serde_json::Error,
    /// Where the failing call was made from (outside this crate).
    ///
    /// `None` when serialization was driven by `serde`, which cannot carry
    /// the caller's location through its traits.
    pub location: Option<&'static Location<'static>>,
    pub raw: &'a [u8],
}
impl ParseFailure<'_> {
    /// The stored bytes, lossily decoded for display.
    pub fn raw_lossy(&self) -> String {
        String::from_utf8_lossy(self.raw).into_owned()
    }
}

/// Receives reports about metadata that could not be parsed.
pub trait MetadataObserver: Send + Sync {
    fn parse_failed(&self, failure: &ParseFailure<'_>);
}

/// Default observer, emitting an error [`event`](tracing::Event) per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;
impl MetadataObserver for TracingObserver {
    fn parse_failed(&self, failure: &ParseFailure<'_>) {
        tracing::error!(
            operation = %failure.operation,
            error = %failure.error,
            file = failure.location.map(|l| l.file()),
            line = failure.location.map(|l| l.line()),
            raw = %failure.raw_lossy(),
            "Failed to parse cached metadata",
        );
    }
}
