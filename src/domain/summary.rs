//! Run summary types
//!
//! Provides structures for tracking check and apply results across a run.

use super::CheckResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of applying one update to its pin file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Product name
    pub product: String,
    /// Tag before the update
    pub from: String,
    /// Tag after the update
    pub to: String,
    /// Where the old pin file was archived, if the branch changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_to: Option<PathBuf>,
    /// Whether the pin file was rewritten
    pub rewritten: bool,
    /// Error that stopped the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyResult {
    /// Creates an empty result for a pending update
    pub fn new(product: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            from: from.into(),
            to: to.into(),
            archived_to: None,
            rewritten: false,
            error: None,
        }
    }

    /// Marks the update as failed
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns true if the pin file now holds the new version
    pub fn succeeded(&self) -> bool {
        self.rewritten && self.error.is_none()
    }
}

/// Overall summary of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Check results in product order
    pub results: Vec<CheckResult>,
    /// Apply results in product order (empty unless updates were requested)
    pub applied: Vec<ApplyResult>,
    /// Whether updates were requested
    pub update_requested: bool,
}

impl RunSummary {
    /// Creates a new RunSummary
    pub fn new(update_requested: bool) -> Self {
        Self {
            results: Vec::new(),
            applied: Vec::new(),
            update_requested,
        }
    }

    /// Adds a check result
    pub fn add_result(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Returns all results that need an update
    pub fn pending(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.needs_update())
    }

    /// Returns the number of pending updates
    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    /// Returns the number of pending updates that cross a branch
    pub fn branch_change_count(&self) -> usize {
        self.pending().filter(|r| r.major_minor_change()).count()
    }

    /// Returns the number of updates applied successfully
    pub fn applied_count(&self) -> usize {
        self.applied.iter().filter(|a| a.succeeded()).count()
    }

    /// Returns the number of attempted updates that failed
    pub fn failed_count(&self) -> usize {
        self.applied.iter().filter(|a| !a.succeeded()).count()
    }

    /// Returns true if the run leaves nothing pending and nothing failed
    ///
    /// Without `--update`, any pending update counts as unsuccessful.
    pub fn is_success(&self) -> bool {
        let pending = self.pending_count();
        if pending == 0 {
            return true;
        }
        self.update_requested && self.applied_count() == pending && self.failed_count() == 0
    }
}
