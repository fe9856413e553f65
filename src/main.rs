//! imgpin - Container image version checker CLI tool
//!
//! Reads the version pinned in each product's Dockerfile, finds the newest
//! release (or the newest LTS release) on the registry and optionally
//! rewrites the pin, archiving the old one when the branch changes.

use anyhow::Context;
use clap::Parser;
use imgpin::cli::CliArgs;
use imgpin::config::Config;
use imgpin::logging;
use imgpin::orchestrator::Orchestrator;
use imgpin::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

/// Exit code for configuration and usage errors
const EXIT_CONFIG_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = Config::discover(&args.root, args.config.as_deref())?;
    let products = config.select_products(args.product.as_deref())?;

    // Print run info in verbose mode
    if args.verbose && !args.json {
        eprintln!("imgpin v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Root: {}", args.root.display());
        eprintln!("Registry: {}", config.registry_url);
        if args.is_check_only() {
            eprintln!("Mode: check only");
        }
    }

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);

    let mut orchestrator = Orchestrator::new(&args.root, config)
        .context("failed to set up HTTP clients")?
        .with_progress(output_config.show_progress());
    let summary = orchestrator.run(&products, args.update).await;

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
