//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One block per product with pinned and selected versions
//! - LTS probe verdicts in verbose mode
//! - A summary of pending updates and, after `--update`, of applied ones

use crate::domain::{
    ApplyResult, CheckOutcome, CheckResult, RunSummary, TaggedVersion, UpdateKind,
};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Tag followed by its registry timestamp, if known
    fn version_display(&self, version: &TaggedVersion) -> String {
        let date = version
            .released_at
            .map(|d| format!(" ({})", d.format("%Y/%m/%d %H:%M")))
            .unwrap_or_default();

        if self.color {
            format!("{}{}", version.tag.bright_white().bold(), date.dimmed())
        } else {
            format!("{}{}", version.tag, date)
        }
    }

    fn kind_label(&self, kind: UpdateKind) -> String {
        let label = format!("[{}]", kind);
        if !self.color {
            return label;
        }
        match kind {
            UpdateKind::Branch => label.yellow().bold().to_string(),
            UpdateKind::Patch => label.green().to_string(),
        }
    }

    fn warning(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "!".yellow().bold(), message.yellow())
        } else {
            format!("! {}", message)
        }
    }

    /// Write the LTS probes made for a product
    fn format_probes(&self, result: &CheckResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if result.probes.is_empty() {
            return Ok(());
        }

        writeln!(writer, "  LTS probes:")?;
        for probe in &result.probes {
            let verdict = match (probe.is_lts, self.color) {
                (true, true) => "LTS".green().to_string(),
                (false, true) => "not LTS".dimmed().to_string(),
                (true, false) => "LTS".to_string(),
                (false, false) => "not LTS".to_string(),
            };
            writeln!(writer, "    {} {}", probe.branch, verdict)?;
        }
        Ok(())
    }

    /// Write the pending updates listed in the summary
    fn format_pending(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        for result in summary.pending() {
            let (Some(current), Some(latest)) = (&result.current, &result.latest) else {
                continue;
            };
            let kind = if result.major_minor_change() {
                UpdateKind::Branch
            } else {
                UpdateKind::Patch
            };
            let arrow = if self.color {
                "→".dimmed().to_string()
            } else {
                "->".to_string()
            };

            writeln!(
                writer,
                "  {} {} {} {} {}",
                result.product,
                current.tag,
                arrow,
                latest.tag,
                self.kind_label(kind)
            )?;

            if let (true, Some(from), Some(to)) = (
                result.major_minor_change(),
                result.current_branch(),
                result.latest_branch(),
            ) {
                writeln!(writer, "    archive {}/, update to {}", from, to)?;
            }
        }
        Ok(())
    }

    /// Write one line per attempted update
    fn format_applied(&self, applied: &ApplyResult, writer: &mut dyn Write) -> std::io::Result<()> {
        match &applied.error {
            None => {
                let mark = if self.color {
                    "✓".green().to_string()
                } else {
                    "ok".to_string()
                };
                write!(
                    writer,
                    "  {} {}: {} -> {}",
                    mark, applied.product, applied.from, applied.to
                )?;
                if let Some(ref path) = applied.archived_to {
                    write!(writer, " (archived to {})", path.display())?;
                }
                writeln!(writer)
            }
            Some(error) => {
                let mark = if self.color {
                    "✗".red().to_string()
                } else {
                    "failed".to_string()
                };
                writeln!(writer, "  {} {}: {}", mark, applied.product, error)
            }
        }
    }

    /// One-line status used in quiet mode
    fn status_line(&self, summary: &RunSummary) -> String {
        if summary.update_requested && !summary.applied.is_empty() {
            return format!(
                "Applied {}/{} update(s)",
                summary.applied_count(),
                summary.applied.len()
            );
        }

        match summary.pending_count() {
            0 => "All products are up to date".to_string(),
            n => format!("{} update(s) available", n),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for result in &summary.results {
                self.format_result(result, writer)?;
            }
        }

        self.format_summary(summary, writer)
    }

    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return writeln!(writer, "{}", self.status_line(summary));
        }

        if self.color {
            writeln!(writer, "{}:", "Summary".bold())?;
        } else {
            writeln!(writer, "Summary:")?;
        }

        let pending = summary.pending_count();
        if pending == 0 {
            if self.color {
                writeln!(writer, "  {}", "All products are up to date".green())?;
            } else {
                writeln!(writer, "  All products are up to date")?;
            }
        } else {
            let branch = summary.branch_change_count();
            writeln!(
                writer,
                "  {} update(s) available ({} branch, {} patch)",
                pending,
                branch,
                pending - branch
            )?;
            self.format_pending(summary, writer)?;
        }

        let unchecked = summary
            .results
            .iter()
            .filter(|r| r.outcome.is_unchecked())
            .count();
        if unchecked > 0 {
            writeln!(writer, "  {} product(s) not checked", unchecked)?;
        }

        if !summary.applied.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Applied:")?;
            for applied in &summary.applied {
                self.format_applied(applied, writer)?;
            }
            writeln!(
                writer,
                "  Applied {}/{} update(s)",
                summary.applied_count(),
                summary.applied.len()
            )?;
        } else if pending > 0 && !summary.update_requested {
            writeln!(writer)?;
            writeln!(writer, "Run with --update to apply these updates.")?;
        }

        Ok(())
    }

    fn format_result(&self, result: &CheckResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let header = format!("{} ({})", result.product, result.image);
        if self.color {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }

        if self.verbosity == Verbosity::Verbose {
            writeln!(writer, "  Pin file: {}", result.pin_path.display())?;
        }

        let Some(ref current) = result.current else {
            writeln!(writer, "  {}", self.warning(&result.outcome.to_string()))?;
            return writeln!(writer);
        };
        writeln!(
            writer,
            "  Current: {} (branch {})",
            current.tag,
            current.branch()
        )?;

        if self.verbosity == Verbosity::Verbose {
            self.format_probes(result, writer)?;
        }

        if let Some(ref latest) = result.latest {
            let label = if result.probes.is_empty() {
                "Latest"
            } else {
                "Latest LTS"
            };
            writeln!(
                writer,
                "  {}: {} (branch {})",
                label,
                self.version_display(latest),
                latest.branch()
            )?;
        }

        match &result.outcome {
            CheckOutcome::UpToDate => {
                if self.color {
                    writeln!(writer, "  {}", "Up to date".green())?;
                } else {
                    writeln!(writer, "  Up to date")?;
                }
            }
            CheckOutcome::Update(kind) => {
                if let Some(ref latest) = result.latest {
                    writeln!(
                        writer,
                        "  {} {} -> {}",
                        self.kind_label(*kind),
                        current.tag,
                        latest.tag
                    )?;
                }
            }
            other => writeln!(writer, "  {}", self.warning(&other.to_string()))?,
        }

        writeln!(writer)
    }
}
