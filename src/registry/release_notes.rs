//! Release notes page fetcher

use crate::error::RegistryError;
use crate::registry::{HttpClient, ReleaseNotesSource};
use async_trait::async_trait;

/// Fetches release notes pages over HTTP
pub struct HttpReleaseNotes {
    client: HttpClient,
}

impl HttpReleaseNotes {
    /// Create a new release notes fetcher
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReleaseNotesSource for HttpReleaseNotes {
    async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
        self.client.get_text(url, url, "release notes").await
    }
}
