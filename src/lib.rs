//! imgpin - Container image version checker library
//!
//! This library provides the core functionality for keeping locally pinned
//! container image versions current:
//! - Tag listing from Docker Hub style registries
//! - LTS branch discovery through release notes pages
//! - Pin file reading, archival and rewriting

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod pin;
pub mod progress;
pub mod registry;
pub mod select;
