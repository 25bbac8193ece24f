use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Isoreach - nearest-facility accessibility surfaces over a regular grid
#[derive(Parser, Debug)]
#[command(name = "isoreach")]
#[command(about = "Nearest-facility accessibility surfaces over a regular grid", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Job configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Straight-line distance surface to the nearest facility
    Distance(DistanceArgs),

    /// Travel-time band surface from per-facility isochrones
    Time(TimeArgs),

    /// Summarize an input layer file
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct DistanceArgs {
    /// Study-area boundary (GeoJSON, one polygon feature)
    pub region: PathBuf,

    /// Facilities: a CSV (name, address, x, y) or GeoJSON point layer
    #[arg(long)]
    pub facilities: PathBuf,

    /// Obstacle polygons to remove from every cell (GeoJSON)
    #[arg(long)]
    pub obstacles: Option<PathBuf>,

    #[command(flatten)]
    pub grid: GridFlags,

    /// Explicit class edges in the reporting unit, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "classes")]
    pub bins: Option<Vec<f64>>,

    /// Number of natural-breaks classes
    #[arg(long)]
    pub classes: Option<usize>,

    /// Write the per-cell table as GeoJSON to this path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TimeArgs {
    /// Study-area boundary (GeoJSON, one polygon feature)
    pub region: PathBuf,

    /// Per-facility isochrone rings (GeoJSON with group_index and
    /// minutes/value properties)
    #[arg(long)]
    pub isochrones: PathBuf,

    /// Obstacle polygons to remove from every cell (GeoJSON)
    #[arg(long)]
    pub obstacles: Option<PathBuf>,

    #[command(flatten)]
    pub grid: GridFlags,

    /// Write the per-cell table as GeoJSON to this path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Grid flags shared by both modes
#[derive(Parser, Debug)]
pub struct GridFlags {
    /// EPSG code every layer must share (projected CRS)
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Cell side length in CRS units
    #[arg(long)]
    pub cell_side: Option<f64>,

    /// Bounding rectangle snapping unit in CRS units
    #[arg(long)]
    pub rounding_unit: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Input file to summarize (GeoJSON or facility CSV)
    pub path: PathBuf,
}
