//! `license-matchr` identifies the license of every dependency by matching its
//! license file against a bundled corpus of canonical license texts.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]) and resolve the index location.
//! 3. Auto-detect ecosystems ([`detector::detect_ecosystems`]).
//! 4. List dependencies with each ecosystem's tooling ([`lister`]).
//! 5. Open the license index, building it from the corpus on first run ([`index`]).
//! 6. Classify all dependencies concurrently ([`dispatch`]).
//! 7. Render the requested report ([`report`]).

mod cli;
mod config;
mod corpus;
mod detector;
mod dispatch;
mod error;
mod index;
mod license;
mod lister;
mod models;
mod probe;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::{load_config, resolve_index_dir, FailurePolicy};
use detector::detect_ecosystems;
use dispatch::{classify_all, DispatchOptions};
use index::LicenseIndex;
use lister::DependencyLister;
use models::Ecosystem;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;
    let index_dir = resolve_index_dir(cli.index.as_deref(), &config)?;

    let opts = DispatchOptions {
        jobs: cli.jobs.unwrap_or(config.classify.jobs).max(1),
        on_error: if cli.keep_going {
            FailurePolicy::Continue
        } else {
            config.classify.on_error
        },
    };

    let report_format = if cli.json {
        ReportFormat::Json
    } else {
        cli.report
    };
    let show_progress = !cli.quiet && report_format == ReportFormat::Terminal;

    // Detect ecosystems (always automatic; --exclude-lang opts out)
    let excluded: Vec<Ecosystem> = cli.exclude_lang.iter().map(Into::into).collect();

    let ecosystems: Vec<Ecosystem> = detect_ecosystems(&path)
        .into_iter()
        .filter(|e| !excluded.contains(e))
        .collect();

    if ecosystems.is_empty() {
        eprintln!(
            "No supported project manifests found in {}",
            path.display()
        );
        std::process::exit(1);
    }

    let mut all_deps = Vec::new();

    for ecosystem in &ecosystems {
        let deps = match ecosystem {
            Ecosystem::Go => lister::go::GoLister::new().list(&path)?,
            Ecosystem::Rust => lister::rust::CargoLister::new().list(&path)?,
        };

        if show_progress {
            eprintln!(
                "  {} {} {} dependencies",
                "→".cyan(),
                ecosystem,
                deps.len()
            );
        }

        all_deps.extend(deps);
    }

    let readers = u32::try_from(opts.jobs).unwrap_or(u32::MAX);
    let index = Arc::new(
        LicenseIndex::open_or_build(&index_dir, readers)
            .with_context(|| format!("license index unavailable at {}", index_dir.display()))?,
    );

    let pb = if show_progress {
        let pb = ProgressBar::new(all_deps.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    debug!(
        index = %index.dir().display(),
        jobs = opts.jobs,
        dependencies = all_deps.len(),
        "classifying"
    );
    classify_all(Arc::clone(&index), &mut all_deps, opts, pb.as_ref()).await?;
    drop(index);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&all_deps, &path, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&all_deps)?);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output for this crate.
fn init_tracing(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("license_matchr=debug")
    } else {
        EnvFilter::new("license_matchr=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
