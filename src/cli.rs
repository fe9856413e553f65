//! CLI argument parsing module for imgpin

use clap::Parser;
use std::path::PathBuf;

/// Container image version checker with LTS branch discovery
#[derive(Parser, Debug, Clone)]
#[command(
    name = "imgpin",
    version,
    about = "Check pinned container image versions and follow LTS branches"
)]
pub struct CliArgs {
    /// Apply updates: archive the old pin on a branch change, then rewrite it
    #[arg(short, long)]
    pub update: bool,

    /// Check only this product
    #[arg(short, long, value_name = "NAME")]
    pub product: Option<String>,

    /// Directory holding one subdirectory per product
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/imgpin.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show LTS probes and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CliArgs {
    /// Whether the run only reports and never touches pin files
    pub fn is_check_only(&self) -> bool {
        !self.update
    }
}
