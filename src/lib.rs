//! dedupr - duplicate file finder and purger.
//!
//! Finds groups of byte-identical files under one or more roots using size
//! bucketing followed by content comparison (streaming digests or
//! byte-by-byte), and can optionally purge all but one copy of each group
//! under a configurable keeper policy.

pub mod actions;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod signal;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;

/// Keep only the paths that exist, warning about the rest.
///
/// Path validation runs here, outside the engine; the engine itself
/// tolerates missing roots silently.
fn validate_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut valid = Vec::new();
    for path in paths {
        if path.exists() {
            valid.push(path.clone());
        } else {
            eprintln!("Warning: Path does not exist: {}", path.display());
        }
    }
    valid
}

/// Application driver: validate paths, scan, report, optionally purge.
///
/// # Errors
///
/// Returns an error for interrupted scans (mapped to exit code 130 by the
/// binary) and for I/O failures on the output destination. "No duplicates
/// found" and nonexistent individual roots are not errors.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let roots = validate_paths(&cli.paths);
    if roots.is_empty() {
        eprintln!("Error: No valid paths provided");
        return Ok(ExitCode::NoValidPaths);
    }

    let config = cli.scan_config();
    let handler = signal::install_handler()?;
    let sink: Arc<dyn DiagnosticsSink> = Arc::new(LogSink);

    log::info!("Scanning {} path(s) for duplicates...", roots.len());
    let finder = DuplicateFinder::new(config)
        .with_diagnostics(Arc::clone(&sink))
        .with_shutdown_flag(handler.get_flag());
    let (groups, summary) = finder.scan(&roots)?;

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?),
        None => Box::new(io::stdout()),
    };

    output::text::write_report(&mut out, &groups, &summary, cli.keeper_policy)
        .context("Failed to write report")?;

    if cli.purge {
        let report = actions::purge::purge(&groups, cli.dry_run, cli.keeper_policy, sink.as_ref());
        output::text::write_purge_report(&mut out, &report, cli.dry_run)
            .context("Failed to write purge report")?;
    }

    out.flush().context("Failed to flush output")?;
    if let Some(path) = &cli.output {
        println!("Results saved to: {}", path.display());
    }

    Ok(ExitCode::Success)
}
