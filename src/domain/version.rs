//! Version and branch types for image tags
//!
//! Tags are compared as `major.minor.patch` triples:
//! - `9.12.3` parses and is a clean version
//! - `9.12.3-jdk17` parses but is not clean (never an update candidate)
//! - `v9.12.3`, `latest`, `9.12` do not parse

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `X.Y.Z` optionally followed by a `-suffix`
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)(?:-|$)").unwrap());

/// Exactly `X.Y.Z`
static CLEAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

/// A `major.minor.patch` version, ordered lexicographically by component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Creates a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a tag into a version, ignoring any `-suffix`
    ///
    /// Returns `None` for tags that do not start with `X.Y.Z`.
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(tag)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }

    /// Returns the `major.minor` branch of this version
    pub fn branch(&self) -> Branch {
        Branch::new(self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Returns true if the tag is exactly `X.Y.Z` with no suffix
pub fn is_clean_tag(tag: &str) -> bool {
    CLEAN_RE.is_match(tag)
}

/// A `major.minor` release branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Branch {
    pub major: u64,
    pub minor: u64,
}

impl Branch {
    /// Creates a new branch
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Returns true if the version belongs to this branch
    pub fn contains(&self, version: &Version) -> bool {
        version.major == self.major && version.minor == self.minor
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid branch: {}", s))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid major in branch: {}", s))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid minor in branch: {}", s))?;
        Ok(Self { major, minor })
    }
}

impl Serialize for Branch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A parsed version together with the exact tag it was read from
///
/// Pin rewrites always use `tag`, never the re-rendered triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedVersion {
    /// Parsed version
    pub version: Version,
    /// Original tag string
    pub tag: String,
    /// When the registry last updated this tag, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl TaggedVersion {
    /// Parse a tag, returning `None` if it has no `X.Y.Z` prefix
    pub fn parse(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        let version = Version::parse(&tag)?;
        Some(Self {
            version,
            tag,
            released_at: None,
        })
    }

    /// Sets the release timestamp
    pub fn with_released_at(mut self, released_at: Option<DateTime<Utc>>) -> Self {
        self.released_at = released_at;
        self
    }

    /// Returns the branch of this version
    pub fn branch(&self) -> Branch {
        self.version.branch()
    }
}

impl fmt::Display for TaggedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}
