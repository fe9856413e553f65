//! Version selection logic
//!
//! This module provides:
//! - Clean version filtering of registry tags
//! - Branch grouping and latest-in-branch lookup
//! - LTS branch discovery through release notes
//! - Comparison of the pinned version against the selected one

mod lts;

pub use lts::{LtsDetector, DEFAULT_LTS_MARKERS, DEFAULT_PROBE_LIMIT};

use crate::domain::{
    is_clean_tag, Branch, CheckOutcome, LtsProbe, Product, TaggedVersion, UpdateKind, Version,
};
use crate::registry::TagInfo;

/// Target version chosen for a product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected version, if any
    pub latest: Option<TaggedVersion>,
    /// Release notes probes made while selecting
    pub probes: Vec<LtsProbe>,
}

impl Selection {
    /// Selection without probes
    pub fn of(latest: Option<TaggedVersion>) -> Self {
        Self {
            latest,
            probes: Vec::new(),
        }
    }
}

/// Keep tags that are exactly `X.Y.Z`, parsed, in listing order
pub fn clean_versions(tags: &[TagInfo]) -> Vec<TaggedVersion> {
    tags.iter()
        .filter(|tag| is_clean_tag(&tag.name))
        .filter_map(|tag| {
            TaggedVersion::parse(tag.name.as_str())
                .map(|v| v.with_released_at(tag.last_updated))
        })
        .collect()
}

/// Distinct branches of the given versions, newest first
pub fn unique_branches(versions: &[TaggedVersion]) -> Vec<Branch> {
    let mut branches: Vec<Branch> = versions.iter().map(TaggedVersion::branch).collect();
    branches.sort_unstable_by(|a, b| b.cmp(a));
    branches.dedup();
    branches
}

/// Highest version in the list; the first listed wins among equal versions
pub fn latest_version<'a, I>(versions: I) -> Option<&'a TaggedVersion>
where
    I: IntoIterator<Item = &'a TaggedVersion>,
{
    versions.into_iter().fold(None, |best, v| match best {
        Some(b) if b.version >= v.version => Some(b),
        _ => Some(v),
    })
}

/// Highest version within a branch
pub fn latest_in_branch(versions: &[TaggedVersion], branch: Branch) -> Option<&TaggedVersion> {
    latest_version(versions.iter().filter(|v| branch.contains(&v.version)))
}

/// Pick the target version for a product
///
/// LTS-tracked products only ever get a version from a confirmed LTS branch.
pub async fn select_target(
    detector: &mut LtsDetector,
    product: &Product,
    versions: &[TaggedVersion],
) -> Selection {
    if product.lts {
        detector.find_latest_lts(product, versions).await
    } else {
        Selection::of(latest_version(versions).cloned())
    }
}

/// Compare the pinned version with the selected version
pub fn compare(current: &Version, latest: &Version) -> CheckOutcome {
    if latest <= current {
        CheckOutcome::UpToDate
    } else if latest.branch() != current.branch() {
        CheckOutcome::Update(UpdateKind::Branch)
    } else {
        CheckOutcome::Update(UpdateKind::Patch)
    }
}
