//! Command-line shell around the track slicing engine: reads a GPX document,
//! runs the selected slicer, prints diagnostics to stderr and writes the
//! sliced document back out.

mod cli;

use clap::Parser;
use cli::Cli;
use gpx::Gpx;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use track_slice_lib::{DistanceMode, Result, analyze_gradients, slice_at_interval, slice_at_points};

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<()> {
    let source = read_gpx(args.input.as_deref())?;
    let mode = if args.two_d {
        DistanceMode::TwoD
    } else {
        DistanceMode::ThreeD
    };

    let mut result = if let Some(interval) = args.distance {
        slice_at_interval(&source, interval, mode)?
    } else if let Some(path) = &args.external {
        let reference = read_gpx(Some(path))?;
        slice_at_points(&source, Some(&reference))?
    } else {
        slice_at_points(&source, None)?
    };

    let total_points: usize = result
        .tracks
        .iter()
        .flat_map(|t| &t.segments)
        .map(|s| s.points.len())
        .sum();
    info!(
        "GPX result has {} tracks with {} points in total and {} waypoints",
        result.tracks.len(),
        total_points,
        result.waypoints.len()
    );

    if args.gradients {
        write_gradient_notes(&result, args, mode)?;
    }

    if args.no_waypoints {
        result.waypoints.clear();
        info!("no waypoints will be saved in the output");
    }
    if args.no_tracks {
        result.tracks.clear();
        info!("no tracks will be saved in the output");
    }

    write_gpx(&result, args.output.as_deref())
}

fn read_gpx(path: Option<&Path>) -> Result<Gpx> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(gpx::read(BufReader::new(file))?)
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(gpx::read(buffer.as_bytes())?)
        }
    }
}

fn write_gpx(result: &Gpx, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            gpx::write(result, &mut writer)?;
            writer.flush()?;
            info!("saved data to {}", path.display());
        }
        None => {
            info!("your GPX data will be printed to stdout");
            let stdout = std::io::stdout();
            gpx::write(result, stdout.lock())?;
        }
    }
    Ok(())
}

/// Run the gradient analyzer over every output track and write a
/// `<track-name>_notes.txt` file next to the output for each track that
/// produced notes.
fn write_gradient_notes(result: &Gpx, args: &Cli, mode: DistanceMode) -> Result<()> {
    let notes_dir = args
        .output
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    for (index, track) in result.tracks.iter().enumerate() {
        let name = track
            .name
            .clone()
            .unwrap_or_else(|| format!("track{index}"));

        let mut gain = 0.0;
        let mut loss = 0.0;
        let mut notes = String::new();
        for segment in &track.segments {
            let report = analyze_gradients(segment, args.min_climb_length, args.min_grade, mode);
            gain += report.gain;
            loss += report.loss;
            if let Some(report_notes) = report.notes {
                if notes.is_empty() {
                    notes.push_str(&report_notes);
                } else if let Some((_, rest)) = report_notes.split_once('\n') {
                    // Keep a single header when a track has several segments.
                    notes.push_str(rest);
                }
            }
        }

        info!("{name}: {gain:.1} m gained, {loss:.1} m lost");
        if !notes.is_empty() {
            let path = notes_dir.join(format!("{name}_notes.txt"));
            std::fs::write(&path, notes)?;
            info!("saved gradient notes to {}", path.display());
        }
    }

    Ok(())
}
