use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use conflux_core::{CoordinateFrame, IndexKind, SpeedUnit};

/// Conflate posted speed limits from a road centerline network onto a
/// directional model network
#[derive(Debug, Parser)]
#[command(name = "conflux", version, about)]
pub struct Args {
    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source roads (GeoJSON)
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Target network (GeoJSON, or CSV with a WKT geometry column)
    #[arg(long)]
    pub targets: Option<PathBuf>,

    /// Output file, `.csv` for CSV and GeoJSON otherwise. CSV goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Distance between samples along source roads, metres
    #[arg(long)]
    pub sample_step: Option<f64>,

    /// Maximum sample to target distance, metres
    #[arg(long)]
    pub search_radius: Option<f64>,

    /// Maximum bearing difference, degrees
    #[arg(long)]
    pub bearing_tolerance: Option<f64>,

    /// Minimum share of a source road's matches a target needs, percent
    #[arg(long)]
    pub min_match_percentage: Option<f64>,

    #[arg(long, value_enum)]
    pub frame: Option<FrameArg>,

    #[arg(long, value_enum)]
    pub index: Option<IndexArg>,

    /// Convert every extracted speed to this unit (mph, km/h)
    #[arg(long)]
    pub speed_unit: Option<SpeedUnit>,

    /// Metric CRS for geographic input, e.g. `EPSG:32618`. Needs the `proj` feature
    #[arg(long)]
    pub metric_crs: Option<String>,

    /// Log filter, e.g. `info` or `conflux_core=debug`. Takes precedence over `RUST_LOG`
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrameArg {
    Geographic,
    Projected,
}

impl From<FrameArg> for CoordinateFrame {
    fn from(frame: FrameArg) -> Self {
        match frame {
            FrameArg::Geographic => CoordinateFrame::Geographic,
            FrameArg::Projected => CoordinateFrame::Projected,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IndexArg {
    Rtree,
    BruteForce,
}

impl From<IndexArg> for IndexKind {
    fn from(index: IndexArg) -> Self {
        match index {
            IndexArg::Rtree => IndexKind::Rtree,
            IndexArg::BruteForce => IndexKind::BruteForce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "conflux",
            "--sources",
            "roads.geojson",
            "--targets",
            "network.csv",
            "--frame",
            "projected",
            "--index",
            "brute-force",
            "--speed-unit",
            "km/h",
            "--search-radius",
            "12.5",
            "--metric-crs",
            "EPSG:32618",
        ])
        .unwrap();
        assert_eq!(args.sources, Some(PathBuf::from("roads.geojson")));
        assert!(matches!(args.frame, Some(FrameArg::Projected)));
        assert!(matches!(args.index, Some(IndexArg::BruteForce)));
        assert_eq!(args.speed_unit, Some(SpeedUnit::Kmh));
        assert_eq!(args.search_radius, Some(12.5));
        assert_eq!(args.metric_crs.as_deref(), Some("EPSG:32618"));
    }
}
