//! Core domain models for imgpin
//!
//! This module contains the fundamental types used throughout the application:
//! - Version and branch types parsed from image tags
//! - Product definitions
//! - Per-product check results
//! - Apply results and the run summary

mod check_result;
mod product;
mod summary;
mod version;

pub use check_result::{CheckOutcome, CheckResult, LtsProbe, UpdateKind};
pub use product::{Product, VERSION_PLACEHOLDER};
pub use summary::{ApplyResult, RunSummary};
pub use version::{is_clean_tag, Branch, TaggedVersion, Version};
