//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of check and apply results
//! - Summary counts for scripting

use crate::domain::{ApplyResult, CheckOutcome, CheckResult, LtsProbe, RunSummary, UpdateKind};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Probes and pin paths are only included in verbose mode
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full run
#[derive(Serialize)]
struct JsonOutput<'a> {
    update_requested: bool,
    summary: JsonSummary,
    products: Vec<JsonProduct<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    applied: &'a [ApplyResult],
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    checked: usize,
    pending: usize,
    branch_changes: usize,
    applied: usize,
    failed: usize,
    success: bool,
}

/// JSON representation of one product
#[derive(Serialize)]
struct JsonProduct<'a> {
    name: &'a str,
    image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin_file: Option<String>,
    /// Short outcome code
    status: &'static str,
    /// Human-readable outcome
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_released_at: Option<DateTime<Utc>>,
    needs_update: bool,
    branch_change: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    probes: &'a [LtsProbe],
}

fn status_code(result: &CheckResult) -> &'static str {
    match result.outcome {
        CheckOutcome::UpToDate => "up_to_date",
        CheckOutcome::Update(UpdateKind::Patch) => "patch_update",
        CheckOutcome::Update(UpdateKind::Branch) => "branch_update",
        CheckOutcome::PinMissing => "pin_missing",
        CheckOutcome::PinNotDetected => "pin_not_detected",
        CheckOutcome::PinUnreadable(_) => "pin_unreadable",
        CheckOutcome::NoVersions => "no_versions",
        CheckOutcome::NoLtsBranch => "no_lts_branch",
    }
}

impl JsonFormatter {
    fn summary_to_json(summary: &RunSummary) -> JsonSummary {
        JsonSummary {
            checked: summary.results.len(),
            pending: summary.pending_count(),
            branch_changes: summary.branch_change_count(),
            applied: summary.applied_count(),
            failed: summary.failed_count(),
            success: summary.is_success(),
        }
    }

    fn result_to_json<'a>(&self, result: &'a CheckResult) -> JsonProduct<'a> {
        let verbose = self.verbosity == Verbosity::Verbose;
        JsonProduct {
            name: &result.product,
            image: &result.image,
            pin_file: verbose.then(|| result.pin_path.display().to_string()),
            status: status_code(result),
            message: result.outcome.to_string(),
            current: result.current.as_ref().map(|v| v.tag.as_str()),
            latest: result.latest.as_ref().map(|v| v.tag.as_str()),
            latest_released_at: result.latest.as_ref().and_then(|v| v.released_at),
            needs_update: result.needs_update(),
            branch_change: result.major_minor_change(),
            probes: if verbose { &result.probes[..] } else { &[] },
        }
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            update_requested: summary.update_requested,
            summary: Self::summary_to_json(summary),
            products: summary
                .results
                .iter()
                .map(|r| self.result_to_json(r))
                .collect(),
            applied: &summary.applied,
        };
        Self::write_json(&output, writer)
    }

    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_json(&Self::summary_to_json(summary), writer)
    }

    fn format_result(&self, result: &CheckResult, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_json(&self.result_to_json(result), writer)
    }
}
