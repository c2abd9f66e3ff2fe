use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Slice GPX tracks at given intervals or near provided points.
#[derive(Debug, Parser)]
#[command(name = "track-slicer", version, about)]
#[command(group(
    ArgGroup::new("slice_mode")
        .required(true)
        .args(["distance", "external", "waypoints"])
))]
pub struct Cli {
    /// GPX file to be sliced; read from stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file to be written; printed to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Slice the track(s) every METERS meters starting from the beginning.
    #[arg(short, long, value_name = "METERS")]
    pub distance: Option<f64>,

    /// Slice the track(s) at the points nearest to the waypoints in this file.
    #[arg(short, long, value_name = "EXT_WPTS_FILE")]
    pub external: Option<PathBuf>,

    /// Slice the track(s) at the points nearest to the input's own waypoints.
    #[arg(short, long)]
    pub waypoints: bool,

    /// Measure distances horizontally, ignoring elevation.
    #[arg(long)]
    pub two_d: bool,

    /// Do not store sliced tracks in the output.
    #[arg(long)]
    pub no_tracks: bool,

    /// Do not store cut points in the output.
    #[arg(long)]
    pub no_waypoints: bool,

    /// Analyze each output track for climbing and descending runs.
    #[arg(long)]
    pub gradients: bool,

    /// Minimum run length in meters for a gradient note.
    #[arg(long, value_name = "METERS", requires = "gradients")]
    pub min_climb_length: Option<f64>,

    /// Minimum average grade in percent for a gradient note.
    #[arg(long, value_name = "PERCENT", requires = "gradients")]
    pub min_grade: Option<f64>,

    /// Don't print diagnostic messages.
    #[arg(short, long)]
    pub quiet: bool,
}
