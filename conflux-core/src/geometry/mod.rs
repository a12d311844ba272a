//! Planar geometry helpers shared by every conflation stage.
//!
//! All functions here assume a metric frame. Geographic input must go through
//! [`MetricFrame`] first.

mod bearing;
#[cfg(feature = "proj")]
mod crs;
mod line;
mod projection;

pub use bearing::{
    Octant, angular_difference, bearing, bearings_agree, line_bearing, normalize_bearing,
};
#[cfg(feature = "proj")]
pub use crs::CrsTransform;
pub use line::{interpolate, line_length, point_line_distance, split};
pub use projection::{LocalProjection, MetricFrame};
