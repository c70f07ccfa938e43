//! sbom-triage: CycloneDX vulnerability triage snapshot pipeline.
//!
//! Walks an input directory of per-dataset CycloneDX documents, runs the
//! normalization pipeline, and writes the snapshot JSON.

use anyhow::{Context, Result};
use clap::Parser;
use sbom_triage::{
    diff_snapshots, pipeline::exit_codes, run_from_source, FsDocumentSource, PipelineConfig,
    Snapshot,
};
use std::io::Write as _;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-triage")]
#[command(version)]
#[command(about = "Normalize CycloneDX scanner output into a triage snapshot", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Snapshot produced
    1  Snapshot produced with skipped inputs (data quality)
    2  Error occurred

EXAMPLES:
    # One folder per dataset under scans/
    sbom-triage scans/ -o snapshot.json

    # Show what changed since the previous run
    sbom-triage scans/ -o snapshot.json --compare previous.json")]
struct Cli {
    /// Input root; each top-level folder is one dataset.
    input: PathBuf,

    /// Write the snapshot to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the snapshot JSON.
    #[arg(long)]
    pretty: bool,

    /// Previous snapshot file to diff the new one against.
    #[arg(long, value_name = "SNAPSHOT")]
    compare: Option<PathBuf>,

    /// Maximum number of top-CVE entries.
    #[arg(long, default_value_t = 10)]
    top_cves: usize,

    /// Suppress informational logging.
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = PipelineConfig::default().with_top_cve_limit(cli.top_cves);
    let source = FsDocumentSource::new(&cli.input);
    let outcome = match run_from_source(&source, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(exit_codes::ERROR);
        }
    };

    for diagnostic in &outcome.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome.snapshot)?
    } else {
        serde_json::to_string(&outcome.snapshot)?
    };
    match &cli.output {
        Some(path) => std::fs::write(path, &json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    if let Some(previous_path) = &cli.compare {
        let previous_raw = std::fs::read_to_string(previous_path)
            .with_context(|| format!("reading previous snapshot {}", previous_path.display()))?;
        let previous: Snapshot = serde_json::from_str(&previous_raw)
            .with_context(|| format!("decoding previous snapshot {}", previous_path.display()))?;
        let delta = diff_snapshots(&previous, &outcome.snapshot);
        if delta.has_changes() {
            tracing::info!(
                new = delta.new_findings.len(),
                resolved = delta.resolved_findings.len(),
                "changes since previous snapshot"
            );
            for key in &delta.new_findings {
                tracing::info!("new: {key}");
            }
            for key in &delta.resolved_findings {
                tracing::info!("resolved: {key}");
            }
        } else {
            tracing::info!("no changes since previous snapshot");
        }
    }

    if outcome.diagnostics.is_empty() {
        Ok(())
    } else {
        std::process::exit(exit_codes::DATA_QUALITY);
    }
}
