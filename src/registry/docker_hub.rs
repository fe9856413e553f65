//! Docker Hub tag listing adapter
//!
//! Fetches image tags from the Docker Hub v2 API.
//! API endpoint: https://hub.docker.com/v2/repositories/{image}/tags
//!
//! Pages are requested newest first and followed through the `next` link
//! until it is absent, the page limit is reached, or a request fails.

use crate::error::RegistryError;
use crate::registry::{HttpClient, TagInfo, TagSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, warn};

/// Docker Hub repositories API base URL
pub const DOCKER_HUB_URL: &str = "https://hub.docker.com/v2/repositories";

/// Docker Hub tag listing adapter
pub struct DockerHubAdapter {
    client: HttpClient,
    base_url: String,
    max_pages: usize,
    page_size: usize,
}

/// One page of the tag listing response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagPage {
    /// Tags on this page
    #[serde(default)]
    results: Vec<TagEntry>,
    /// URL of the next page
    #[serde(default)]
    next: Option<String>,
}

/// A single tag entry
#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    #[serde(default)]
    last_updated: Option<String>,
}

impl From<TagEntry> for TagInfo {
    fn from(entry: TagEntry) -> Self {
        let last_updated = entry
            .last_updated
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());
        TagInfo {
            name: entry.name,
            last_updated,
        }
    }
}

impl DockerHubAdapter {
    /// Create a new Docker Hub adapter
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        max_pages: usize,
        page_size: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_pages,
            page_size,
        }
    }

    /// Build the URL of the first page for an image
    fn build_url(&self, image: &str) -> String {
        format!(
            "{}/{}/tags?page_size={}&ordering=last_updated",
            self.base_url.trim_end_matches('/'),
            image,
            self.page_size
        )
    }
}

/// Follow `next` links starting at `first_url`, collecting at most `max_pages` pages
///
/// A failed page ends the walk; tags from earlier pages are kept.
pub(crate) async fn collect_pages<F, Fut>(
    image: &str,
    first_url: String,
    max_pages: usize,
    mut fetch_page: F,
) -> Vec<TagInfo>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<TagPage, RegistryError>>,
{
    let mut tags = Vec::new();
    let mut url = first_url;

    for page in 1..=max_pages {
        let response = match fetch_page(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(image, page, gathered = tags.len(), error = %e, "tag listing truncated");
                break;
            }
        };

        debug!(image, page, count = response.results.len(), "fetched tag page");
        tags.extend(response.results.into_iter().map(TagInfo::from));

        match response.next {
            Some(next) if !next.is_empty() => url = next,
            _ => break,
        }
    }

    tags
}

#[async_trait]
impl TagSource for DockerHubAdapter {
    fn registry_name(&self) -> &'static str {
        "Docker Hub"
    }

    async fn list_tags(&self, image: &str) -> Vec<TagInfo> {
        let registry = self.registry_name();
        let first_url = self.build_url(image);
        collect_pages(image, first_url, self.max_pages, |url| async move {
            self.client.get_json::<TagPage>(&url, image, registry).await
        })
        .await
    }
}
