//! Display region geometry
//!
//! All coordinates live in one shared desktop space where larger Y is up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in desktop coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle anchored at its minimum corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: `min <= p < max` on both axes
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Zero-area, negative or non-finite rectangles
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width <= 0.0 || self.height <= 0.0
    }

    /// Coordinate of an edge on its own axis
    pub fn edge_coordinate(&self, edge: RegionEdge) -> f64 {
        match edge {
            RegionEdge::MinX => self.min_x(),
            RegionEdge::MaxX => self.max_x(),
            RegionEdge::MinY => self.min_y(),
            RegionEdge::MaxY => self.max_y(),
        }
    }

    /// Normalized position (0.0 to 1.0) of a point along an edge
    pub fn position_along(&self, edge: RegionEdge, point: Point) -> f64 {
        let ratio = match edge {
            RegionEdge::MinX | RegionEdge::MaxX => (point.y - self.min_y()) / self.height,
            RegionEdge::MinY | RegionEdge::MaxY => (point.x - self.min_x()) / self.width,
        };
        if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    /// Strip of `thickness` laid along the inside of an edge
    pub fn edge_strip(&self, edge: RegionEdge, thickness: f64) -> Rect {
        match edge {
            RegionEdge::MinX => Rect::new(self.min_x(), self.min_y(), thickness, self.height),
            RegionEdge::MaxX => {
                Rect::new(self.max_x() - thickness, self.min_y(), thickness, self.height)
            }
            RegionEdge::MinY => Rect::new(self.min_x(), self.min_y(), self.width, thickness),
            RegionEdge::MaxY => {
                Rect::new(self.min_x(), self.max_y() - thickness, self.width, thickness)
            }
        }
    }
}

/// Edges of a display rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionEdge {
    /// Left edge
    MinX,
    /// Right edge
    MaxX,
    /// Bottom edge (Y-up)
    MinY,
    /// Top edge (Y-up)
    MaxY,
}

impl RegionEdge {
    pub fn is_vertical(self) -> bool {
        matches!(self, RegionEdge::MinX | RegionEdge::MaxX)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegionEdge::MinX => "minX",
            RegionEdge::MaxX => "maxX",
            RegionEdge::MinY => "minY",
            RegionEdge::MaxY => "maxY",
        }
    }
}

impl fmt::Display for RegionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable platform identifier of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A connected display's extent in desktop coordinates
///
/// Regions are never edited in place; a topology change replaces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRegion {
    pub id: RegionId,
    /// Platform name of the output, may be empty
    pub label: String,
    pub frame: Rect,
    /// Whether the platform reports this as the main display
    pub primary: bool,
}

impl DisplayRegion {
    pub fn new(id: RegionId, label: impl Into<String>, frame: Rect) -> Self {
        Self {
            id,
            label: label.into(),
            frame,
            primary: false,
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn contains(&self, point: Point) -> bool {
        self.frame.contains(point)
    }

    pub fn center(&self) -> Point {
        self.frame.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_is_half_open() {
        let left = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let right = Rect::new(1920.0, 0.0, 1920.0, 1080.0);
        let seam = Point::new(1920.0, 500.0);

        assert!(!left.contains(seam));
        assert!(right.contains(seam));
        assert!(left.contains(Point::new(0.0, 0.0)));
        assert!(!left.contains(Point::new(100.0, 1080.0)));
    }

    #[test]
    fn test_degenerate_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 1080.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 1920.0, -1.0).is_degenerate());
        assert!(Rect::new(f64::NAN, 0.0, 1920.0, 1080.0).is_degenerate());
        assert!(!Rect::new(-1920.0, 0.0, 1920.0, 1080.0).is_degenerate());
    }

    #[test]
    fn test_position_along_edge() {
        let frame = Rect::new(1920.0, 0.0, 1920.0, 1080.0);

        let along = frame.position_along(RegionEdge::MinX, Point::new(1920.0, 540.0));
        assert!((along - 0.5).abs() < f64::EPSILON);

        let along = frame.position_along(RegionEdge::MaxY, Point::new(1920.0, 1080.0));
        assert_eq!(along, 0.0);

        // Points outside the edge span clamp
        let along = frame.position_along(RegionEdge::MinX, Point::new(1920.0, 5000.0));
        assert_eq!(along, 1.0);
    }

    #[test]
    fn test_edge_strips() {
        let frame = Rect::new(100.0, 200.0, 1000.0, 500.0);

        assert_eq!(
            frame.edge_strip(RegionEdge::MinX, 20.0),
            Rect::new(100.0, 200.0, 20.0, 500.0)
        );
        assert_eq!(
            frame.edge_strip(RegionEdge::MaxX, 20.0),
            Rect::new(1080.0, 200.0, 20.0, 500.0)
        );
        assert_eq!(
            frame.edge_strip(RegionEdge::MinY, 20.0),
            Rect::new(100.0, 200.0, 1000.0, 20.0)
        );
        assert_eq!(
            frame.edge_strip(RegionEdge::MaxY, 20.0),
            Rect::new(100.0, 680.0, 1000.0, 20.0)
        );
    }

    #[test]
    fn test_vertical_edges() {
        assert!(RegionEdge::MaxX.is_vertical());
        assert!(!RegionEdge::MinY.is_vertical());
    }
}
