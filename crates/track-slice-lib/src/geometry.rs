//! Geodesic distance and elevation primitives shared by the slicers

use geo::{Distance, Haversine};
use gpx::Waypoint;

/// Selects how the distance between two track points is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    /// Horizontal great-circle distance only.
    TwoD,
    /// Great-circle distance combined with the elevation difference.
    /// Falls back to horizontal distance when either elevation is missing.
    #[default]
    ThreeD,
}

impl DistanceMode {
    /// Distance between two points in meters, per the selected mode.
    #[inline]
    pub(crate) fn distance(self, a: &Waypoint, b: &Waypoint) -> f64 {
        match self {
            DistanceMode::TwoD => distance_2d(a, b),
            DistanceMode::ThreeD => distance_3d(a, b),
        }
    }
}

/// Horizontal great-circle distance between two waypoints in meters.
#[inline]
pub(crate) fn distance_2d(a: &Waypoint, b: &Waypoint) -> f64 {
    Haversine.distance(a.point(), b.point())
}

/// Great-circle distance combined with the elevation difference, in meters.
///
/// Degrades to [`distance_2d`] when either point has no elevation.
#[inline]
pub(crate) fn distance_3d(a: &Waypoint, b: &Waypoint) -> f64 {
    let flat = distance_2d(a, b);
    match (a.elevation, b.elevation) {
        (Some(ea), Some(eb)) => flat.hypot(eb - ea),
        _ => flat,
    }
}

/// Angle of ascent from `a` to `b` in radians.
///
/// Zero when either elevation is missing or the points coincide horizontally.
#[inline]
pub(crate) fn elevation_angle(a: &Waypoint, b: &Waypoint) -> f64 {
    let flat = distance_2d(a, b);
    match (a.elevation, b.elevation) {
        (Some(ea), Some(eb)) if flat > 0.0 => ((eb - ea) / flat).atan(),
        _ => 0.0,
    }
}

/// Sum of positive and negative elevation deltas over a point sequence.
///
/// Returns `(gain, loss)`, both as non-negative meter totals. Deltas where
/// either side has no elevation contribute nothing.
pub(crate) fn ascent_descent(elevations: &[Option<f64>]) -> (f64, f64) {
    let mut gain = 0.0;
    let mut loss = 0.0;
    for pair in elevations.windows(2) {
        if let (Some(prev), Some(next)) = (pair[0], pair[1]) {
            let delta = next - prev;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
    }
    (gain, loss)
}
