//! Registry adapters for fetching image tags and release notes
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Docker Hub tag listing adapter with pagination
//! - Release notes page fetcher used for LTS discovery

mod client;
mod docker_hub;
mod release_notes;

pub use client::{
    HttpClient, BROWSER_USER_AGENT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use docker_hub::{DockerHubAdapter, DOCKER_HUB_URL};
pub use release_notes::HttpReleaseNotes;

use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tag as listed by a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name (e.g. `9.12.3`, `9.12.3-jdk17`, `latest`)
    pub name: String,
    /// When the registry last updated the tag
    pub last_updated: Option<DateTime<Utc>>,
}

impl TagInfo {
    /// Creates a tag without a timestamp
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_updated: None,
        }
    }

    /// Sets the last updated timestamp
    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = Some(last_updated);
        self
    }
}

/// Source of image tags
///
/// Listing never fails: transport errors truncate the result to the tags
/// gathered so far.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// List tags for an image, most recently updated first
    async fn list_tags(&self, image: &str) -> Vec<TagInfo>;
}

/// Source of release notes pages
#[async_trait]
pub trait ReleaseNotesSource: Send + Sync {
    /// Fetch the page body at `url`
    async fn fetch(&self, url: &str) -> Result<String, RegistryError>;
}
