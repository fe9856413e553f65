//! Configuration loading
//!
//! Settings come from an optional `imgpin.toml`. Every key falls back to a
//! built-in default, and the product list defaults to the Atlassian images.

use crate::domain::{Product, VERSION_PLACEHOLDER};
use crate::error::ConfigError;
use crate::pin::DEFAULT_PIN_FILE;
use crate::registry::{DEFAULT_MAX_RETRIES, DOCKER_HUB_URL};
use crate::select::{DEFAULT_LTS_MARKERS, DEFAULT_PROBE_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the root directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "imgpin.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the tag listing API
    pub registry_url: String,
    /// Maximum number of tag pages fetched per image
    pub max_pages: usize,
    /// Tags requested per page
    pub page_size: usize,
    /// Maximum number of branches probed for LTS status
    pub lts_probe_limit: usize,
    /// Phrases marking a release notes page as LTS
    pub lts_markers: Vec<String>,
    /// Pin file name inside each product directory
    pub pin_file: String,
    pub tag_timeout_secs: u64,
    pub release_notes_timeout_secs: u64,
    /// Retries after a timeout, connection error or rate limit
    pub max_retries: u32,
    pub products: Vec<Product>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DOCKER_HUB_URL.to_string(),
            max_pages: 5,
            page_size: 100,
            lts_probe_limit: DEFAULT_PROBE_LIMIT,
            lts_markers: DEFAULT_LTS_MARKERS.iter().map(|m| m.to_string()).collect(),
            pin_file: DEFAULT_PIN_FILE.to_string(),
            tag_timeout_secs: 30,
            release_notes_timeout_secs: 15,
            max_retries: DEFAULT_MAX_RETRIES,
            products: default_products(),
        }
    }
}

/// Built-in product list
pub fn default_products() -> Vec<Product> {
    vec![
        Product::lts(
            "jira",
            "atlassian/jira-software",
            "https://confluence.atlassian.com/display/JIRASOFTWARE/JIRA+Software+{version}.x+release+notes",
        ),
        Product::lts(
            "confluence",
            "atlassian/confluence",
            "https://confluence.atlassian.com/display/DOC/Confluence+{version}+Release+Notes",
        ),
        Product::lts(
            "bitbucket",
            "atlassian/bitbucket",
            "https://confluence.atlassian.com/display/BitbucketServer/Bitbucket+Data+Center+{version}+release+notes",
        ),
        Product::lts(
            "bamboo",
            "atlassian/bamboo",
            "https://confluence.atlassian.com/display/BAMBOORELEASES/Bamboo+{version}+release+notes",
        ),
        Product::latest("crowd", "atlassian/crowd"),
    ]
}

impl Config {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Otherwise `<root>/imgpin.toml` is used
    /// when present, else the built-in defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Check settings and products for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("max_pages", self.max_pages),
            ("page_size", self.page_size),
            ("lts_probe_limit", self.lts_probe_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(key, "must be at least 1"));
            }
        }

        for (key, value) in [
            ("tag_timeout_secs", self.tag_timeout_secs),
            ("release_notes_timeout_secs", self.release_notes_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(key, "must be at least 1"));
            }
        }

        if self.lts_markers.is_empty() {
            return Err(ConfigError::invalid_value(
                "lts_markers",
                "must list at least one phrase",
            ));
        }
        // A blank marker matches every page
        if self.lts_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                "lts_markers",
                "phrases must not be blank",
            ));
        }

        if self.pin_file.trim().is_empty() {
            return Err(ConfigError::invalid_value("pin_file", "must not be empty"));
        }

        if self.products.is_empty() {
            return Err(ConfigError::NoProducts);
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if !is_path_segment(&product.name) {
                return Err(ConfigError::invalid_value(
                    "products",
                    format!("'{}' is not a valid directory name", product.name),
                ));
            }

            if !seen.insert(product.name.as_str()) {
                return Err(ConfigError::DuplicateProduct {
                    name: product.name.clone(),
                });
            }

            if product.lts {
                match &product.release_notes {
                    None => {
                        return Err(ConfigError::MissingReleaseNotes {
                            product: product.name.clone(),
                        })
                    }
                    Some(template) if !template.contains(VERSION_PLACEHOLDER) => {
                        return Err(ConfigError::InvalidReleaseNotes {
                            product: product.name.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Products to check: all of them, or exactly the named one
    pub fn select_products(&self, name: Option<&str>) -> Result<Vec<Product>, ConfigError> {
        let Some(name) = name else {
            return Ok(self.products.clone());
        };

        match self.products.iter().find(|p| p.name == name) {
            Some(product) => Ok(vec![product.clone()]),
            None => Err(ConfigError::UnknownProduct {
                name: name.to_string(),
                available: self.product_names().join(", "),
            }),
        }
    }

    /// Names of all configured products, in order
    pub fn product_names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn tag_timeout(&self) -> Duration {
        Duration::from_secs(self.tag_timeout_secs)
    }

    pub fn release_notes_timeout(&self) -> Duration {
        Duration::from_secs(self.release_notes_timeout_secs)
    }

    /// Path of the config file `discover` would look for
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }
}

/// True when `name` can be joined under the root as a single directory
fn is_path_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
