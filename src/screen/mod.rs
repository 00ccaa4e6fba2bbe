//! Screen management module
//!
//! Handles:
//! - Display region geometry in the shared desktop space
//! - Display topology tracking and point-to-display resolution
//! - Conversion from platform (Y-down) coordinates into the core's Y-up space

mod region;
mod topology;

pub use region::{DisplayRegion, Point, Rect, RegionEdge, RegionId};
pub use topology::{DisplayTopology, TopologyBuilder};

/// Convert a Y-down pixel row into the Y-up desktop space
///
/// `extent` is the height of the platform's reference frame (root window,
/// main display). Row 0 becomes `extent - 1` so that a display touching the
/// top of the frame still contains its first pixel row.
pub fn flip_point(extent: f64, x: f64, y: f64) -> Point {
    Point::new(x, extent - y - 1.0)
}

/// Convert a Y-down rectangle into the Y-up desktop space
pub fn flip_rect(extent: f64, x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, extent - (y + height), width, height)
}
