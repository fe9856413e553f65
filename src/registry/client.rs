//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("imgpin/", env!("CARGO_PKG_VERSION"));

/// Browser-compatible User-Agent for wiki pages that reject unknown agents
pub const BROWSER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; imgpin/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context
    pub async fn get_with_context(
        &self,
        url: &str,
        resource: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(url, attempt, delay_ms = delay, "retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::rate_limit_exceeded(registry));
                        continue;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(RegistryError::not_found(resource, registry));
                    }

                    if !status.is_success() {
                        return Err(RegistryError::network_error(
                            resource,
                            registry,
                            format!("HTTP {}", status),
                        ));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        RegistryError::timeout(resource, registry)
                    } else {
                        RegistryError::network_error(resource, registry, e.to_string())
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::network_error(resource, registry, "unknown error")
        }))
    }

    /// Perform a GET request and parse the JSON response
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        resource: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get_with_context(url, resource, registry).await?;
        response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(
                resource,
                registry,
                format!("failed to parse JSON: {}", e),
            )
        })
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(
        &self,
        url: &str,
        resource: &str,
        registry: &str,
    ) -> Result<String, RegistryError> {
        let response = self.get_with_context(url, resource, registry).await?;
        response.text().await.map_err(|e| {
            RegistryError::invalid_response(
                resource,
                registry,
                format!("failed to read response body: {}", e),
            )
        })
    }
}
