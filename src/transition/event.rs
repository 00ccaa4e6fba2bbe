//! Transition event types

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

use crate::screen::{DisplayRegion, Point, RegionEdge};

/// One pointer poll
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub position: Point,
    pub at: Instant,
}

impl PointerSample {
    pub fn new(position: Point, at: Instant) -> Self {
        Self { position, at }
    }

    pub fn now(position: Point) -> Self {
        Self::new(position, Instant::now())
    }
}

/// Direction the pointer travelled between displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Unknown,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected crossing from one display to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    /// 1-based crossing number within the monitoring session
    pub sequence: u64,
    pub from_region: DisplayRegion,
    pub to_region: DisplayRegion,
    pub direction: Direction,
    /// Edge of `to_region` the pointer entered through
    pub crossing_edge: Option<RegionEdge>,
    /// Approximate point where the pointer crossed
    pub boundary_position: Point,
    /// Pointer position on the poll before the crossing, if any
    pub previous_position: Option<Point>,
    /// Raw pointer position on the poll that detected the crossing
    pub pointer_position: Point,
    /// Milliseconds between that poll and the previous one
    pub sample_gap_ms: Option<u64>,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} -> {} ({}, edge {}) at {}",
            self.sequence,
            self.from_region.id,
            self.to_region.id,
            self.direction,
            self.crossing_edge.map(RegionEdge::as_str).unwrap_or("none"),
            self.boundary_position
        )
    }
}
