//!
//! This module implements the CLI interface for command-summary: command
//! parsing, argument validation and the async entrypoint used by `main()` and
//! by integration tests.
//!
//! All report logic (store, tree, sections, aggregation) lives in the
//! [`command-summary-core`] crate; this module is strictly CLI glue.
//!
//! ## Commands
//! - `record upload|build-info|security|scan`: called after each pipeline step to leave its output behind.
//! - `generate`: the finalize trigger that writes the combined markdown report.
//! - `reset`: clears all recorded state before a new logical run.
//!
//! With the summary output directory unset, `record` and `reset` do nothing and
//! succeed; `generate` fails.
//!
//! [`command-summary-core`]: ../../command-summary-core/
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use command_summary_core::aggregator::{Aggregator, SectionStatus};
use command_summary_core::config::OUTPUT_DIR_ENV;
use command_summary_core::recorder;
use command_summary_core::scan::ScanKind;
use std::path::PathBuf;

use crate::load_config::{load_platform_settings, load_summary_config, require_summary_config};
use crate::platform::client_for;

/// CLI for command-summary: accumulate command results into one job summary.
#[derive(Parser)]
#[clap(
    name = "command-summary",
    version,
    about = "Record pipeline command results and render them as one combined markdown summary"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the output of a finished command
    Record {
        #[clap(subcommand)]
        target: RecordCommand,
    },
    /// Generate the combined markdown summary from everything recorded so far
    Generate {
        /// Platform base URL used in links (defaults to JFROG_CLI_PLATFORM_URL)
        #[clap(long)]
        url: Option<String>,
        /// Platform major version; queried from the platform when omitted
        #[clap(long)]
        major_version: Option<u32>,
    },
    /// Remove all recorded summary data
    Reset,
}

#[derive(Subcommand)]
pub enum RecordCommand {
    /// Append upload result fragment files to the result store
    Upload {
        /// Fragment files of the form {"results": [...]}
        #[clap(required = true)]
        fragments: Vec<PathBuf>,
    },
    /// Record a published build-info
    BuildInfo {
        /// Build-info JSON file
        file: PathBuf,
    },
    /// Record the outcome of a security command
    Security {
        /// Security result JSON file
        file: PathBuf,
    },
    /// Index a scan outcome for the build-info section
    Scan {
        /// Scan kind: docker, build or binaries
        #[clap(long)]
        kind: ScanKind,
        /// Name the scanned entity is published under (build name, image or module id)
        #[clap(long)]
        name: String,
        /// Scan result JSON file
        file: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Record { target } => record(target),
        Commands::Generate { url, major_version } => generate(url, major_version).await,
        Commands::Reset => {
            let Some(config) = load_summary_config() else {
                tracing::info!(command = "reset", "Summary disabled, nothing to reset");
                return Ok(());
            };
            recorder::reset(&config).context("failed to reset the command summary")?;
            println!("Command summary data cleared.");
            Ok(())
        }
    }
}

fn record(target: RecordCommand) -> Result<()> {
    let Some(config) = load_summary_config() else {
        tracing::info!(
            command = "record",
            var = OUTPUT_DIR_ENV,
            "Summary output directory not set, skipping"
        );
        return Ok(());
    };

    match target {
        RecordCommand::Upload { fragments } => {
            let appended = recorder::record_upload(&config, &fragments)
                .context("failed while appending upload results")?;
            println!("Recorded {appended} upload result(s).");
        }
        RecordCommand::BuildInfo { file } => {
            recorder::record_build_info(&config, &file)
                .with_context(|| format!("failed to record build-info from {}", file.display()))?;
            println!("Recorded build-info.");
        }
        RecordCommand::Security { file } => {
            recorder::record_security(&config, &file).with_context(|| {
                format!("failed to record security results from {}", file.display())
            })?;
            println!("Recorded security results.");
        }
        RecordCommand::Scan { kind, name, file } => {
            recorder::record_scan(&config, kind, &name, &file)
                .with_context(|| format!("failed to index {kind} result for {name}"))?;
            println!("Indexed {kind} result for {name}.");
        }
    }
    Ok(())
}

async fn generate(url: Option<String>, major_version: Option<u32>) -> Result<()> {
    let config = require_summary_config()?;
    let settings = load_platform_settings(url, major_version)?;
    let aggregator = Aggregator::new(config, client_for(settings));

    tracing::info!(command = "generate", "Generating command summary");
    let report = aggregator
        .finalize()
        .await
        .context("failed to generate the command summary")?;

    for outcome in &report.sections {
        if let SectionStatus::Failed(reason) = &outcome.status {
            eprintln!("[WARN] {} section skipped: {reason}", outcome.section);
        }
    }
    match &report.report_path {
        Some(path) => println!("Command summary written to {}", path.display()),
        None => println!("No command summary content to write."),
    }
    Ok(())
}
