//! Interval slicer: cut tracks every time the traveled distance passes a threshold

use crate::geometry::DistanceMode;
use crate::network::cut_waypoint;
use crate::{Result, SliceError};
use gpx::{Gpx, Track, TrackSegment};

/// Slice every track of `source` into pieces of roughly `interval_meters`
/// traveled distance, measured cumulatively from the start of each segment.
///
/// Points are walked in order, accumulating the distance to their predecessor
/// (per `mode`); once the accumulated distance strictly exceeds the interval,
/// the current point becomes a cut: it closes the running output track, seeds
/// the next one so the halves stay contiguous, and is recorded as a waypoint
/// of the output document. The comparison is strict, so a point landing
/// exactly on the threshold does not cut; with discrete points the cut always
/// overshoots a little, and precision depends on input point density.
///
/// Output tracks are named `track0`, `track1`, ... across the whole document.
/// The accumulator resets at every input segment boundary, and a single-point
/// segment passes through unchanged (its only point has no predecessor, so it
/// contributes zero distance).
///
/// Returns [`SliceError::InvalidInterval`] when `interval_meters` is not a
/// positive number.
pub fn slice_at_interval(source: &Gpx, interval_meters: f64, mode: DistanceMode) -> Result<Gpx> {
    if !(interval_meters > 0.0) {
        return Err(SliceError::InvalidInterval {
            interval: interval_meters,
        });
    }

    let mut out = crate::empty_output();
    let mut namer = TrackNamer::default();

    for track in &source.tracks {
        // Tracks without points would only burn a name.
        if track.segments.iter().all(|s| s.points.is_empty()) {
            continue;
        }
        let mut out_track = namer.next_track();

        for segment in &track.segments {
            let mut out_segment = TrackSegment::default();
            let mut distance_since_cut = 0.0;
            // The first point's predecessor is itself, contributing zero.
            let mut previous = segment.points.first();

            for point in &segment.points {
                if let Some(prev) = previous {
                    distance_since_cut += mode.distance(prev, point);
                }
                out_segment.points.push(point.clone());

                if distance_since_cut > interval_meters {
                    distance_since_cut = 0.0;
                    out.waypoints.push(cut_waypoint(point));

                    // Close the running segment and track, then reopen both
                    // with the cut point duplicated as the new first point.
                    out_track.segments.push(std::mem::take(&mut out_segment));
                    out.tracks
                        .push(std::mem::replace(&mut out_track, namer.next_track()));
                    out_segment.points.push(point.clone());
                }

                previous = Some(point);
            }

            if !out_segment.points.is_empty() {
                out_track.segments.push(out_segment);
            }
        }

        if !out_track.segments.is_empty() {
            out.tracks.push(out_track);
        }
    }

    tracing::debug!(
        "sliced {} input tracks into {} output tracks with {} cuts",
        source.tracks.len(),
        out.tracks.len(),
        out.waypoints.len()
    );
    Ok(out)
}

/// Hands out output tracks with sequential names, unique across one run.
#[derive(Default)]
struct TrackNamer {
    next: usize,
}

impl TrackNamer {
    fn next_track(&mut self) -> Track {
        let track = Track {
            name: Some(format!("track{}", self.next)),
            ..Track::default()
        };
        self.next += 1;
        track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;
    use geo::Point;
    use gpx::Waypoint;

    /// Mean earth radius used by the haversine distance.
    const EARTH_RADIUS_M: f64 = 6_371_008.8;

    /// Waypoint `meters` north of the equator along the prime meridian, so
    /// consecutive points have easily controlled great-circle distances.
    fn waypoint_north(meters: f64) -> Waypoint {
        let lat = (meters / EARTH_RADIUS_M).to_degrees();
        Waypoint::new(Point::new(0.0, lat))
    }

    fn gpx_with_points(offsets: &[f64]) -> Gpx {
        let mut gpx = Gpx::default();
        let mut track = Track::default();
        track.segments.push(TrackSegment {
            points: offsets.iter().map(|&m| waypoint_north(m)).collect(),
        });
        gpx.tracks.push(track);
        gpx
    }

    fn point_count(gpx: &Gpx) -> usize {
        gpx.tracks
            .iter()
            .flat_map(|t| &t.segments)
            .map(|s| s.points.len())
            .sum()
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let gpx = gpx_with_points(&[0.0, 50.0]);
        assert!(matches!(
            slice_at_interval(&gpx, 0.0, DistanceMode::TwoD),
            Err(SliceError::InvalidInterval { .. })
        ));
        assert!(matches!(
            slice_at_interval(&gpx, -100.0, DistanceMode::TwoD),
            Err(SliceError::InvalidInterval { .. })
        ));
        assert!(matches!(
            slice_at_interval(&gpx, f64::NAN, DistanceMode::TwoD),
            Err(SliceError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_cuts_at_first_point_past_interval() {
        // Cumulative distances 0, 50, 120, 210: the point at 120 is the first
        // one past 100, so it cuts there and nowhere else (the remaining 90
        // never pass the threshold again).
        let gpx = gpx_with_points(&[0.0, 50.0, 120.0, 210.0]);
        let out = slice_at_interval(&gpx, 100.0, DistanceMode::TwoD).unwrap();

        assert_eq!(out.tracks.len(), 2);
        assert_eq!(out.tracks[0].segments[0].points.len(), 3);
        assert_eq!(out.tracks[1].segments[0].points.len(), 2);
        assert_eq!(out.waypoints.len(), 1);

        // The cut point is duplicated across the boundary.
        let last = out.tracks[0].segments[0].points.last().unwrap();
        let first = out.tracks[1].segments[0].points.first().unwrap();
        assert_eq!(last.point(), first.point());
        assert_eq!(out.waypoints[0].point(), last.point());
    }

    #[test]
    fn test_point_count_conservation() {
        let offsets: Vec<f64> = (0..40).map(|i| i as f64 * 35.0).collect();
        let gpx = gpx_with_points(&offsets);
        let out = slice_at_interval(&gpx, 100.0, DistanceMode::TwoD).unwrap();

        // Each cut duplicates exactly one point.
        assert_eq!(point_count(&out), point_count(&gpx) + out.waypoints.len());
        assert!(!out.waypoints.is_empty());
    }

    #[test]
    fn test_every_slice_exceeds_interval_at_its_cut() {
        let offsets: Vec<f64> = (0..50).map(|i| i as f64 * 42.0).collect();
        let gpx = gpx_with_points(&offsets);
        let interval = 150.0;
        let out = slice_at_interval(&gpx, interval, DistanceMode::TwoD).unwrap();

        for (index, track) in out.tracks.iter().enumerate() {
            let points = &track.segments[0].points;
            let mut traveled = 0.0;
            for pair in points.windows(2) {
                traveled += geometry::distance_2d(&pair[0], &pair[1]);
            }
            if index + 1 < out.tracks.len() {
                // Every slice except the last ends strictly past the interval.
                assert!(traveled > interval, "slice {index} traveled {traveled}");
                // And no point before the last one had passed it yet.
                let mut early = 0.0;
                for pair in points[..points.len() - 1].windows(2) {
                    early += geometry::distance_2d(&pair[0], &pair[1]);
                }
                assert!(early <= interval, "slice {index} cut too late: {early}");
            }
        }
    }

    #[test]
    fn test_exact_threshold_does_not_cut() {
        let gpx = gpx_with_points(&[0.0, 80.0]);
        let exact = geometry::distance_2d(
            &gpx.tracks[0].segments[0].points[0],
            &gpx.tracks[0].segments[0].points[1],
        );

        // Strict comparison: landing exactly on the threshold is not a cut.
        let out = slice_at_interval(&gpx, exact, DistanceMode::TwoD).unwrap();
        assert_eq!(out.tracks.len(), 1);
        assert!(out.waypoints.is_empty());
    }

    #[test]
    fn test_single_point_segment_passes_through() {
        let gpx = gpx_with_points(&[0.0]);
        let out = slice_at_interval(&gpx, 10.0, DistanceMode::TwoD).unwrap();

        assert_eq!(out.tracks.len(), 1);
        assert_eq!(out.tracks[0].segments.len(), 1);
        assert_eq!(out.tracks[0].segments[0].points.len(), 1);
        assert!(out.waypoints.is_empty());
    }

    #[test]
    fn test_cut_on_last_point_emits_boundary_slice() {
        let gpx = gpx_with_points(&[0.0, 60.0, 120.0]);
        let out = slice_at_interval(&gpx, 100.0, DistanceMode::TwoD).unwrap();

        // The last point cuts, leaving a trailing one-point slice.
        assert_eq!(out.tracks.len(), 2);
        assert_eq!(out.tracks[0].segments[0].points.len(), 3);
        assert_eq!(out.tracks[1].segments[0].points.len(), 1);
        assert_eq!(out.waypoints.len(), 1);
    }

    #[test]
    fn test_accumulator_resets_per_input_segment() {
        let mut gpx = gpx_with_points(&[0.0, 90.0]);
        // Second segment travels another 90 m: with a shared accumulator this
        // would cut, with a per-segment one it must not.
        gpx.tracks[0].segments.push(TrackSegment {
            points: vec![waypoint_north(90.0), waypoint_north(180.0)],
        });

        let out = slice_at_interval(&gpx, 100.0, DistanceMode::TwoD).unwrap();
        assert_eq!(out.tracks.len(), 1);
        assert_eq!(out.tracks[0].segments.len(), 2);
        assert!(out.waypoints.is_empty());
    }

    #[test]
    fn test_track_names_unique_across_input_tracks() {
        let mut gpx = gpx_with_points(&[0.0, 50.0, 120.0]);
        let second = gpx.tracks[0].clone();
        gpx.tracks.push(second);

        let out = slice_at_interval(&gpx, 100.0, DistanceMode::TwoD).unwrap();
        assert_eq!(out.tracks.len(), 4);
        let names: Vec<_> = out.tracks.iter().filter_map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["track0", "track1", "track2", "track3"]);
    }

    #[test]
    fn test_3d_mode_cuts_earlier_on_steep_climbs() {
        let mut gpx = gpx_with_points(&[0.0, 60.0, 120.0, 180.0]);
        for (i, point) in gpx.tracks[0].segments[0].points.iter_mut().enumerate() {
            point.elevation = Some(i as f64 * 80.0);
        }

        let flat = slice_at_interval(&gpx, 190.0, DistanceMode::TwoD).unwrap();
        let steep = slice_at_interval(&gpx, 190.0, DistanceMode::ThreeD).unwrap();
        // Horizontally the track is only 180 m long, but each step is
        // 100 m in 3D, so only the 3D mode passes the threshold.
        assert!(flat.waypoints.is_empty());
        assert_eq!(steep.waypoints.len(), 1);
    }
}
