//! Per-product check result types

use super::{Branch, TaggedVersion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How far an update moves the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// Same `major.minor` branch, newer patch
    Patch,
    /// Different `major.minor` branch; the old pin file is archived first
    Branch,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateKind::Patch => write!(f, "patch"),
            UpdateKind::Branch => write!(f, "branch"),
        }
    }
}

/// Outcome of checking one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Pinned version is the selected version (or newer)
    UpToDate,
    /// A newer version was selected
    Update(UpdateKind),
    /// No pin file for the product
    PinMissing,
    /// Pin file exists but holds no recognizable version
    PinNotDetected,
    /// Pin file could not be read
    PinUnreadable(String),
    /// The registry returned no clean versions
    NoVersions,
    /// None of the probed branches is an LTS branch
    NoLtsBranch,
}

impl CheckOutcome {
    /// Returns true if the pin file could not be used
    pub fn is_unchecked(&self) -> bool {
        matches!(
            self,
            CheckOutcome::PinMissing
                | CheckOutcome::PinNotDetected
                | CheckOutcome::PinUnreadable(_)
        )
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::UpToDate => write!(f, "up to date"),
            CheckOutcome::Update(kind) => write!(f, "{} update", kind),
            CheckOutcome::PinMissing => write!(f, "no pin file"),
            CheckOutcome::PinNotDetected => write!(f, "version not detected"),
            CheckOutcome::PinUnreadable(msg) => write!(f, "unreadable pin file: {}", msg),
            CheckOutcome::NoVersions => write!(f, "no valid versions found"),
            CheckOutcome::NoLtsBranch => write!(f, "no LTS version found"),
        }
    }
}

/// One release notes lookup made while searching for the LTS branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtsProbe {
    pub branch: Branch,
    pub is_lts: bool,
}

/// Result of checking a single product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Product name
    pub product: String,
    /// Registry image
    pub image: String,
    /// Path of the pin file that was read
    pub pin_path: PathBuf,
    /// Currently pinned version
    pub current: Option<TaggedVersion>,
    /// Selected target version
    pub latest: Option<TaggedVersion>,
    /// Branches probed for LTS status, newest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probes: Vec<LtsProbe>,
    /// Outcome of the check
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// Creates a result for a product whose pin could not be used
    pub fn unchecked(
        product: impl Into<String>,
        image: impl Into<String>,
        pin_path: impl Into<PathBuf>,
        outcome: CheckOutcome,
    ) -> Self {
        Self {
            product: product.into(),
            image: image.into(),
            pin_path: pin_path.into(),
            current: None,
            latest: None,
            probes: Vec::new(),
            outcome,
        }
    }

    /// Branch of the pinned version
    pub fn current_branch(&self) -> Option<Branch> {
        self.current.as_ref().map(TaggedVersion::branch)
    }

    /// Branch of the selected version
    pub fn latest_branch(&self) -> Option<Branch> {
        self.latest.as_ref().map(TaggedVersion::branch)
    }

    /// Returns true if the selected version is newer than the pin
    pub fn needs_update(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Update(_))
    }

    /// Returns true if the update crosses a `major.minor` boundary
    pub fn major_minor_change(&self) -> bool {
        self.outcome == CheckOutcome::Update(UpdateKind::Branch)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.current, &self.latest, self.needs_update()) {
            (Some(current), Some(latest), true) => {
                write!(f, "{}: {} → {}", self.product, current, latest)
            }
            _ => write!(f, "{}: {}", self.product, self.outcome),
        }
    }
}
