use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use conflux_core::ConflationConfig;
use conflux_core::loading::{SourceFilter, TargetFields};
use serde::Deserialize;

use crate::args::Args;

/// Contents of the TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub log_level: Option<String>,
    pub input: InputConfig,
    pub target_fields: TargetFields,
    pub conflation: ConflationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub sources: Option<PathBuf>,
    pub targets: Option<PathBuf>,
    /// `[west, south, east, north]`
    pub bbox: Option<[f64; 4]>,
    pub exclude_classes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Geojson,
}

impl OutputFormat {
    /// `.csv` means CSV, anything else GeoJSON
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            OutputFormat::Csv
        } else {
            OutputFormat::Geojson
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Command line flags win over file values
    pub fn apply(&mut self, args: &Args) {
        if args.log_level.is_some() {
            self.log_level.clone_from(&args.log_level);
        }
        if args.sources.is_some() {
            self.input.sources.clone_from(&args.sources);
        }
        if args.targets.is_some() {
            self.input.targets.clone_from(&args.targets);
        }
        if args.output.is_some() {
            self.output.path.clone_from(&args.output);
        }

        let conflation = &mut self.conflation;
        if let Some(step) = args.sample_step {
            conflation.sample_step = step;
        }
        if let Some(radius) = args.search_radius {
            conflation.search_radius = radius;
        }
        if let Some(tolerance) = args.bearing_tolerance {
            conflation.bearing_tolerance = tolerance;
        }
        if let Some(percentage) = args.min_match_percentage {
            conflation.min_match_percentage = percentage;
        }
        if let Some(frame) = args.frame {
            conflation.frame = frame.into();
        }
        if let Some(index) = args.index {
            conflation.index = index.into();
        }
        if args.speed_unit.is_some() {
            conflation.speed_unit = args.speed_unit;
        }
        if args.metric_crs.is_some() {
            conflation.metric_crs.clone_from(&args.metric_crs);
        }
    }

    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter {
            bbox: self.input.bbox,
            exclude_classes: self.input.exclude_classes.clone(),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_else(|| {
            self.output
                .path
                .as_deref()
                .map_or(OutputFormat::Csv, OutputFormat::from_path)
        })
    }
}
