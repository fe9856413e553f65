//! Product definitions

use super::Branch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced by the branch in release notes templates
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// A product whose image version is pinned locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product name, also the name of its directory
    pub name: String,
    /// Registry image identifier (e.g. `atlassian/jira-software`)
    pub image: String,
    /// Whether updates follow the LTS branch instead of the latest release
    #[serde(default)]
    pub lts: bool,
    /// Release notes URL template keyed by branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

impl Product {
    /// Creates a product that tracks the latest release
    pub fn latest(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            lts: false,
            release_notes: None,
        }
    }

    /// Creates a product that tracks the LTS branch
    pub fn lts(
        name: impl Into<String>,
        image: impl Into<String>,
        release_notes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            lts: true,
            release_notes: Some(release_notes.into()),
        }
    }

    /// Release notes URL for a branch, if a template is configured
    pub fn release_notes_url(&self, branch: Branch) -> Option<String> {
        self.release_notes
            .as_ref()
            .map(|template| template.replace(VERSION_PLACEHOLDER, &branch.to_string()))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.image)
    }
}
