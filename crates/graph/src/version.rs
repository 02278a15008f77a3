use crate::error::{Error, ErrorKind, Result};
use exn::OptionExt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A Graph API version identifier of the form `vMAJOR.MINOR`.
///
/// Ordering compares the major component first, then the minor one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}
impl ApiVersion {
    pub const V15_0: Self = Self::new(15, 0);
    pub const V16_0: Self = Self::new(16, 0);
    pub const V17_0: Self = Self::new(17, 0);
    pub const V20_0: Self = Self::new(20, 0);
    pub const V23_0: Self = Self::new(23, 0);
    /// Used when neither a scoped nor a configured version is available.
    pub const DEFAULT: Self = Self::V15_0;

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Picks the version to talk to the Graph API with: the one negotiated for
    /// the current operation if any, then the configured default, then
    /// [`DEFAULT`](Self::DEFAULT).
    pub fn resolve(scoped: Option<Self>, configured: Option<Self>) -> Self {
        scoped.or(configured).unwrap_or(Self::DEFAULT)
    }

    /// Whether a capability introduced in `introduced_in` is available.
    pub fn supports(&self, introduced_in: &Self) -> bool {
        self >= introduced_in
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Parses `vMAJOR[.MINOR]`; the minor component defaults to zero.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rest = s.strip_prefix('v').ok_or_raise(|| ErrorKind::MissingPrefix(s.to_string()))?;
        let (major, minor) = match rest.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (rest, None),
        };
        let major = parse_component(major).ok_or_raise(|| ErrorKind::InvalidMajor(s.to_string()))?;
        let minor = match minor {
            Some(minor) => parse_component(minor).ok_or_raise(|| ErrorKind::InvalidMinor(s.to_string()))?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}

/// Digits only: `str::parse` would also accept a leading `+`.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl TryFrom<&str> for ApiVersion {
    type Error = Error;
    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: Error| serde::de::Error::custom(&*e))
    }
}

/// Orders two version strings such as `"v15.0"` and `"v16.0"`.
///
/// Use `ordering as i8` where a `-1`/`0`/`1` result is wanted. When either
/// string is malformed there is no ordering at all, only the error.
///
/// ```
/// use std::cmp::Ordering;
/// use wabaman_graph::compare_versions;
///
/// assert_eq!(compare_versions("v15.0", "v16.0").unwrap(), Ordering::Less);
/// assert_eq!(compare_versions("v15.1", "v15.0").unwrap() as i8, 1);
/// assert!(compare_versions("vA", "v15.0").is_err());
/// ```
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let a: ApiVersion = a.parse()?;
    let b: ApiVersion = b.parse()?;
    Ok(a.cmp(&b))
}
