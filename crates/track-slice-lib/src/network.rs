//! Working copy of a track network, split incrementally at chosen points
//!
//! Segments live in an arena of slots that are never removed or reordered; a
//! separate order list records the traversal order. Splits allocate a new slot
//! and only touch the order list, so earlier splits can never invalidate a
//! later nearest-point search: positions are re-derived on every search.

use crate::{Result, SliceError, geometry};
use gpx::{Gpx, Track, TrackSegment, Waypoint};

/// Mutable working copy of all segments of a track collection.
///
/// Original track boundaries are deliberately not retained: after slicing,
/// every segment becomes its own single-segment output track.
pub(crate) struct SliceNetwork {
    /// Segment point storage; slots are append-only.
    arena: Vec<Vec<Waypoint>>,
    /// Traversal order of the live slots.
    order: Vec<usize>,
}

impl SliceNetwork {
    /// Copy every segment of every track of `source`, in traversal order.
    pub(crate) fn from_tracks(source: &Gpx) -> Self {
        let mut network = SliceNetwork {
            arena: Vec::new(),
            order: Vec::new(),
        };
        for track in &source.tracks {
            for segment in &track.segments {
                network.order.push(network.arena.len());
                network.arena.push(segment.points.clone());
            }
        }
        network
    }

    /// Total number of points across all segments.
    pub(crate) fn point_count(&self) -> usize {
        self.arena.iter().map(Vec::len).sum()
    }

    /// Split the network at the point nearest to `reference` and return a
    /// waypoint marking the cut.
    ///
    /// The owning segment is divided right after the nearest point; the cut
    /// point is duplicated as the head of the new following segment so no
    /// distance gap opens between the two halves. The following segment may
    /// hold only the duplicated point when the cut lands on a segment's last
    /// point.
    pub(crate) fn split_nearest(&mut self, reference: &Waypoint) -> Result<Waypoint> {
        let (order_pos, point_index) = self.nearest_point(reference)?;
        let slot = self.order[order_pos];
        let cut = cut_waypoint(&self.arena[slot][point_index]);

        let mut tail = self.arena[slot].split_off(point_index + 1);
        tail.insert(0, cut.clone());
        self.order.insert(order_pos + 1, self.arena.len());
        self.arena.push(tail);

        Ok(cut)
    }

    /// Find the network point horizontally nearest to `reference`.
    ///
    /// Returns the position in traversal order plus the point index within
    /// that segment. Ties resolve to the first point in traversal order.
    fn nearest_point(&self, reference: &Waypoint) -> Result<(usize, usize)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (order_pos, &slot) in self.order.iter().enumerate() {
            for (point_index, point) in self.arena[slot].iter().enumerate() {
                let distance = geometry::distance_2d(reference, point);
                if best.is_none_or(|(_, _, d)| distance < d) {
                    best = Some((order_pos, point_index, distance));
                }
            }
        }
        best.map(|(order_pos, point_index, _)| (order_pos, point_index))
            .ok_or(SliceError::EmptyNetwork)
    }

    /// Consume the network, turning every segment into its own single-segment
    /// track named `track0`, `track1`, ... in traversal order.
    pub(crate) fn into_tracks(self) -> Vec<Track> {
        let mut arena = self.arena;
        self.order
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                let mut track = Track {
                    name: Some(format!("track{index}")),
                    ..Track::default()
                };
                track.segments.push(TrackSegment {
                    points: std::mem::take(&mut arena[slot]),
                });
                track
            })
            .collect()
    }
}

/// Copy of a track point reduced to what identifies a cut location:
/// position and elevation.
pub(crate) fn cut_waypoint(source: &Waypoint) -> Waypoint {
    let mut cut = Waypoint::new(source.point());
    cut.elevation = source.elevation;
    cut
}
