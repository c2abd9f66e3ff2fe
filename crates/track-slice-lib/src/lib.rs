//! Track Slice Library - Slicing Engine for GPX Track Collections
//!
//! This library splits recorded GPS tracks into smaller pieces for separate
//! analysis or display. Two independent slicers operate on a parsed
//! [`gpx::Gpx`] document and each build a new one:
//!
//! - **[`slice_at_interval`]**: cuts every track each time the traveled
//!   distance since the last cut passes a fixed threshold.
//! - **[`slice_at_points`]**: cuts every track at the points nearest to a set
//!   of reference waypoints (external, or the document's own).
//!
//! Both record each cut location as a waypoint of the output document, so the
//! cut points survive serialization alongside the sliced tracks.
//!
//! [`analyze_gradients`] is an extra diagnostic that scans one segment for
//! climbing and descending runs and reports elevation gain/loss plus optional
//! CSV notes.
//!
//! The source document is never mutated; operations that split segments work
//! on an internal copy and return a freshly built document.

mod geometry;
mod gradient;
mod interval;
mod network;
mod points;

pub use geometry::DistanceMode;
pub use gradient::{GradientReport, analyze_gradients};
pub use interval::slice_at_interval;
pub use points::slice_at_points;

use gpx::{Gpx, GpxVersion};

/// Error types for the slicing engine
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("slice interval must be positive, got {interval}")]
    InvalidInterval { interval: f64 },

    #[error("cannot search for a nearest point: the track network has no points")]
    EmptyNetwork,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SliceError>;

/// New output document, versioned so it can be serialized as GPX 1.1.
pub(crate) fn empty_output() -> Gpx {
    Gpx {
        version: GpxVersion::Gpx11,
        ..Gpx::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_is_serializable() {
        let out = empty_output();
        assert_eq!(out.version, GpxVersion::Gpx11);
        assert!(out.tracks.is_empty());
        assert!(out.waypoints.is_empty());

        let mut buffer = Vec::new();
        gpx::write(&out, &mut buffer).unwrap();
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = SliceError::InvalidInterval { interval: -5.0 };
        assert!(err.to_string().contains("-5"));

        let err = SliceError::EmptyNetwork;
        assert!(err.to_string().contains("no points"));
    }
}
