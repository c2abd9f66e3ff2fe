//! Gradient analyzer: climbing and descending runs within a segment

use crate::geometry::{self, DistanceMode};
use gpx::{TrackSegment, Waypoint};
use std::fmt::Write;

const NOTES_HEADER: &str =
    "start_lat,start_lon,end_lat,end_lon,length_m,angle_deg,grade_pct,gain_m,loss_m";

/// Outcome of [`analyze_gradients`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientReport {
    /// Meters climbed. With both thresholds set this covers qualifying runs
    /// only; otherwise the whole segment.
    pub gain: f64,
    /// Meters descended, as a non-negative total. Same scope as `gain`.
    pub loss: f64,
    /// CSV report of qualifying runs, one line per run under a header line.
    /// `None` when thresholds are unset or no run qualified.
    pub notes: Option<String>,
}

/// Direction of a single elevation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Climbing,
    Descending,
}

/// Analyze one segment for sustained climbs and descents.
///
/// With both `min_length` (meters) and `min_grade_pct` set, the segment is
/// scanned for maximal strictly monotonic elevation runs; a run breaks when
/// the direction reverses, plateaus, or an elevation is missing, and the
/// turning point belongs to both adjacent runs. For each run the distance
/// between its endpoints (per `mode`) and the average elevation angle over
/// its steps are computed; percent grade is `tan(|avg angle|) * 100`. Runs
/// meeting both thresholds contribute their gain/loss to the totals and one
/// CSV note line; everything else is dropped from the totals as well, so the
/// thresholded totals deliberately cover qualifying runs only.
///
/// With either threshold unset, the report is a plain whole-segment
/// ascent/descent summation and carries no notes.
pub fn analyze_gradients(
    segment: &TrackSegment,
    min_length: Option<f64>,
    min_grade_pct: Option<f64>,
    mode: DistanceMode,
) -> GradientReport {
    let (Some(min_length), Some(min_grade_pct)) = (min_length, min_grade_pct) else {
        let elevations: Vec<_> = segment.points.iter().map(|p| p.elevation).collect();
        let (gain, loss) = geometry::ascent_descent(&elevations);
        return GradientReport {
            gain,
            loss,
            notes: None,
        };
    };

    let mut report = GradientReport::default();
    let mut notes = String::new();

    for (start, end) in monotonic_runs(&segment.points) {
        let run = &segment.points[start..=end];
        let Some(summary) = summarize_run(run, mode) else {
            continue;
        };
        if summary.length < min_length || summary.grade_pct < min_grade_pct {
            continue;
        }

        report.gain += summary.gain;
        report.loss += summary.loss;
        if notes.is_empty() {
            notes.push_str(NOTES_HEADER);
            notes.push('\n');
        }
        // Infallible for String.
        let _ = writeln!(
            notes,
            "{:.6},{:.6},{:.6},{:.6},{:.1},{:.2},{:.2},{:.1},{:.1}",
            run[0].point().y(),
            run[0].point().x(),
            run[run.len() - 1].point().y(),
            run[run.len() - 1].point().x(),
            summary.length,
            summary.angle.to_degrees(),
            summary.grade_pct,
            summary.gain,
            summary.loss,
        );
    }

    if !notes.is_empty() {
        report.notes = Some(notes);
    }
    report
}

/// Inclusive index ranges of the maximal strictly monotonic elevation runs.
///
/// A turning point ends one run and starts the next; a plateau or missing
/// elevation only breaks, so the following run starts fresh.
fn monotonic_runs(points: &[Waypoint]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = 0usize;
    let mut run_trend: Option<Trend> = None;

    for i in 1..points.len() {
        let step = step_trend(&points[i - 1], &points[i]);
        match (run_trend, step) {
            (trend, None) => {
                if trend.is_some() {
                    runs.push((run_start, i - 1));
                }
                run_trend = None;
            }
            (None, Some(trend)) => {
                run_start = i - 1;
                run_trend = Some(trend);
            }
            (Some(current), Some(trend)) if current == trend => {}
            (Some(_), Some(trend)) => {
                runs.push((run_start, i - 1));
                run_start = i - 1;
                run_trend = Some(trend);
            }
        }
    }
    if run_trend.is_some() {
        runs.push((run_start, points.len() - 1));
    }
    runs
}

fn step_trend(a: &Waypoint, b: &Waypoint) -> Option<Trend> {
    match (a.elevation, b.elevation) {
        (Some(ea), Some(eb)) if eb > ea => Some(Trend::Climbing),
        (Some(ea), Some(eb)) if eb < ea => Some(Trend::Descending),
        _ => None,
    }
}

struct RunSummary {
    length: f64,
    /// Average elevation angle over the run's steps, in radians.
    angle: f64,
    grade_pct: f64,
    gain: f64,
    loss: f64,
}

fn summarize_run(run: &[Waypoint], mode: DistanceMode) -> Option<RunSummary> {
    let (first, last) = (run.first()?, run.last()?);
    if run.len() < 2 {
        return None;
    }

    let length = mode.distance(first, last);
    let angle_sum: f64 = run
        .windows(2)
        .map(|pair| geometry::elevation_angle(&pair[0], &pair[1]))
        .sum();
    let angle = angle_sum / (run.len() - 1) as f64;
    let grade_pct = angle.abs().tan() * 100.0;

    let elevations: Vec<_> = run.iter().map(|p| p.elevation).collect();
    let (gain, loss) = geometry::ascent_descent(&elevations);

    Some(RunSummary {
        length,
        angle,
        grade_pct,
        gain,
        loss,
    })
}
