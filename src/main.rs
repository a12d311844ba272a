mod args;
mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use conflux_core::loading::{load_source_roads, load_target_segments};
use conflux_core::output::{results_to_geojson, write_csv};
use conflux_core::{ConflationResult, TargetSegment, conflate};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::{FileConfig, OutputFormat};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    config.apply(&args);

    init_tracing(config.log_level.as_deref())?;

    let sources_path = config
        .input
        .sources
        .as_deref()
        .context("no source roads given, pass --sources or set input.sources")?;
    let targets_path = config
        .input
        .targets
        .as_deref()
        .context("no target network given, pass --targets or set input.targets")?;

    let sources = load_source_roads(sources_path, &config.source_filter())
        .with_context(|| format!("failed to load source roads from '{}'", sources_path.display()))?;
    let targets = load_target_segments(targets_path, &config.target_fields).with_context(|| {
        format!(
            "failed to load target network from '{}'",
            targets_path.display()
        )
    })?;

    let output = conflate(&sources, &targets, &config.conflation).context("conflation failed")?;
    output.stats.log_summary();

    write_results(&config, &output.results, &targets)
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn write_results(
    config: &FileConfig,
    results: &[ConflationResult],
    targets: &[TargetSegment],
) -> Result<()> {
    let format = config.output_format();
    let writer: Box<dyn Write> = match &config.output.path {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output file '{}'", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        OutputFormat::Csv => write_csv(writer, results, targets)?,
        OutputFormat::Geojson => {
            let collection = results_to_geojson(results, targets)?;
            let mut writer = writer;
            serde_json::to_writer(&mut writer, &collection)?;
            writer.flush()?;
        }
    }

    match &config.output.path {
        Some(path) => info!("Wrote {} results to {}", results.len(), path.display()),
        None => info!("Wrote {} results to stdout", results.len()),
    }
    Ok(())
}
