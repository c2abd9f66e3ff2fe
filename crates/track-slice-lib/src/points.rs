//! Point slicer: cut tracks at the network points nearest to reference waypoints

use crate::Result;
use crate::network::SliceNetwork;
use gpx::Gpx;

/// Slice the tracks of `source` at the track points nearest to a set of
/// reference waypoints.
///
/// The reference waypoints are taken from `reference` when given, otherwise
/// from `source` itself (self-slicing on its own waypoints). They are
/// processed in order against a working copy of the whole track network, so a
/// later reference point may resolve into a segment created by an earlier
/// cut. Each cut duplicates the nearest point across the segment boundary and
/// is recorded as a waypoint of the output, in cut order.
///
/// Original track boundaries are not preserved: every resulting segment
/// becomes its own single-segment output track, named `track0`, `track1`, ...
/// in traversal order.
///
/// Returns [`crate::SliceError::EmptyNetwork`] when a reference point is
/// searched against a network without any points.
pub fn slice_at_points(source: &Gpx, reference: Option<&Gpx>) -> Result<Gpx> {
    let reference_points = &reference.unwrap_or(source).waypoints;

    let mut network = SliceNetwork::from_tracks(source);
    tracing::debug!(
        "slicing a network of {} points at {} reference points",
        network.point_count(),
        reference_points.len()
    );
    let mut out = crate::empty_output();

    for point in reference_points {
        let cut = network.split_nearest(point)?;
        out.waypoints.push(cut);
    }

    out.tracks = network.into_tracks();
    Ok(out)
}
