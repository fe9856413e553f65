//! Application error types using thiserror
//!
//! Error hierarchy:
//! - PinError: Issues reading, archiving or rewriting a pin file
//! - RegistryError: Issues with registry and release-notes communication
//! - ConfigError: Issues with the configuration file or CLI selection

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Pin file related errors
    #[error(transparent)]
    Pin(#[from] PinError),

    /// Registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to pin file operations
#[derive(Error, Debug)]
pub enum PinError {
    /// Pin file not found
    #[error("pin file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read pin file
    #[error("failed to read pin file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write pin file
    #[error("failed to write pin file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to archive the pin file into a branch directory
    #[error("failed to archive {path} to {target}: {source}")]
    ArchiveError {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pinned tag does not occur in the file
    #[error("version '{version}' not found in {path}")]
    VersionNotFound { path: PathBuf, version: String },
}

/// Errors related to registry and release-notes communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Resource not found (404)
    #[error("'{resource}' not found on {registry}")]
    NotFound { resource: String, registry: String },

    /// Network request failed
    #[error("failed to fetch '{resource}' from {registry}: {message}")]
    NetworkError {
        resource: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response body
    #[error("invalid response from {registry} for '{resource}': {message}")]
    InvalidResponse {
        resource: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{resource}' from {registry}")]
    Timeout { resource: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Product selected on the command line is not configured
    #[error("unknown product '{name}' (available: {available})")]
    UnknownProduct { name: String, available: String },

    /// LTS-tracked product without a release notes template
    #[error("product '{product}' tracks LTS but has no release_notes template")]
    MissingReleaseNotes { product: String },

    /// Release notes template without a `{{version}}` placeholder
    #[error("release_notes template for '{product}' must contain '{{version}}'")]
    InvalidReleaseNotes { product: String },

    /// The same product name appears twice
    #[error("product '{name}' is configured more than once")]
    DuplicateProduct { name: String },

    /// No products configured
    #[error("no products configured")]
    NoProducts,

    /// A numeric setting is out of range
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl PinError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        PinError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PinError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PinError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ArchiveError
    pub fn archive_error(
        path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        PinError::ArchiveError {
            path: path.into(),
            target: target.into(),
            source,
        }
    }

    /// Creates a new VersionNotFound error
    pub fn version_not_found(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        PinError::VersionNotFound {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(resource: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NotFound {
            resource: resource.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        resource: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            resource: resource.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        resource: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            resource: resource.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(resource: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            resource: resource.into(),
            registry: registry.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
