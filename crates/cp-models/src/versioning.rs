//! Contract versioning.
//!
//! A [`ContractVersion`] identifies the wire-level data contract. The client
//! pins [`CONTRACT_VERSION`] and sends it on every request as
//! `X-Contract-Version: {major}.{minor}.{patch}`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use cp_schema::{Field, FieldKind, Shape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The contract version this SDK was built against.
pub const CONTRACT_VERSION: ContractVersion = ContractVersion::new(1, 0, 0);

/// Three-part contract version with an optional pre-release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractVersion {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_release: Option<String>,
}

impl ContractVersion {
    pub const fn new(major: i64, minor: i64, patch: i64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// `{major}.{minor}.{patch}`, as sent in the `X-Contract-Version` header.
    /// The pre-release tag is never part of the wire tag.
    pub fn wire_tag(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl PartialOrd for ContractVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContractVersion {
    /// Numeric triple first; a pre-release sorts before its release.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

/// Error parsing a `M.m.p[-pre]` version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid contract version {input:?}: {reason}")]
pub struct ContractVersionParseError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for ContractVersion {
    type Err = ContractVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ContractVersionParseError {
            input: s.to_string(),
            reason,
        };

        let (core, pre_release) = match s.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return Err(fail("empty pre-release tag")),
            None => (s, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(fail("expected three dot-separated components"));
        }
        let component = |p: &str| {
            p.parse::<u64>()
                .ok()
                .and_then(|n| i64::try_from(n).ok())
                .ok_or_else(|| fail("component is not a non-negative integer"))
        };

        Ok(Self {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: component(parts[2])?,
            pre_release,
        })
    }
}

pub const CONTRACT_VERSION_SHAPE: Shape = Shape {
    name: "ContractVersion",
    fields: &[
        Field::required("major", FieldKind::Integer),
        Field::required("minor", FieldKind::Integer),
        Field::required("patch", FieldKind::Integer),
        Field::optional("preRelease", FieldKind::String),
    ],
};

/// Range of contract versions a component accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRange {
    pub min: ContractVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<ContractVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<ContractVersion>,
}

impl ContractRange {
    /// Whether `version` falls inside this range.
    ///
    /// `exact`, when set, must match. Otherwise `min <= version` and, when
    /// set, `version <= max`.
    pub fn admits(&self, version: &ContractVersion) -> bool {
        if let Some(exact) = &self.exact {
            return exact == version;
        }
        if version < &self.min {
            return false;
        }
        self.max.as_ref().map_or(true, |max| version <= max)
    }
}

pub const CONTRACT_RANGE_SHAPE: Shape = Shape {
    name: "ContractRange",
    fields: &[
        Field::required("min", FieldKind::Record(&CONTRACT_VERSION_SHAPE)),
        Field::optional("max", FieldKind::Record(&CONTRACT_VERSION_SHAPE)),
        Field::optional("exact", FieldKind::Record(&CONTRACT_VERSION_SHAPE)),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ContractVersion {
        s.parse().unwrap()
    }

    #[test]
    fn wire_tag_omits_pre_release() {
        let version = v("1.2.3-rc.1");
        assert_eq!(version.wire_tag(), "1.2.3");
        assert_eq!(version.to_string(), "1.2.3-rc.1");
        assert_eq!(CONTRACT_VERSION.wire_tag(), "1.0.0");
    }

    #[test]
    fn parse_rejects_malformed_versions() {
        assert!("1.0".parse::<ContractVersion>().is_err());
        assert!("1.0.x".parse::<ContractVersion>().is_err());
        assert!("1.0.0-".parse::<ContractVersion>().is_err());
        assert!("-1.0.0".parse::<ContractVersion>().is_err());
        assert!("9223372036854775808.0.0".parse::<ContractVersion>().is_err());
    }

    #[test]
    fn components_beyond_u32_parse() {
        let version = v("5000000000.0.1");
        assert_eq!(version.major, 5_000_000_000);
        assert_eq!(version.wire_tag(), "5000000000.0.1");
    }

    #[test]
    fn pre_release_sorts_before_release() {
        assert!(v("1.0.0-beta") < v("1.0.0"));
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.10.0") > v("1.9.9"));
    }

    #[test]
    fn range_admits_by_bounds_or_exact() {
        let bounded = ContractRange {
            min: v("1.0.0"),
            max: Some(v("1.4.0")),
            exact: None,
        };
        assert!(bounded.admits(&v("1.0.0")));
        assert!(bounded.admits(&v("1.4.0")));
        assert!(!bounded.admits(&v("1.4.1")));
        assert!(!bounded.admits(&v("0.9.0")));

        let open = ContractRange {
            min: v("2.0.0"),
            max: None,
            exact: None,
        };
        assert!(open.admits(&v("9.0.0")));

        let exact = ContractRange {
            min: v("1.0.0"),
            max: None,
            exact: Some(v("1.2.0")),
        };
        assert!(exact.admits(&v("1.2.0")));
        assert!(!exact.admits(&v("1.3.0")));
    }
}
