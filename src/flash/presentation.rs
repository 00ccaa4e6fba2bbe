//! Presentation requests handed to the renderer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::screen::{Point, Rect, RegionEdge, RegionId};
use crate::settings::StyleConfig;
use crate::transition::Direction;

/// Unique per presentation; overlays are never shared between triggers
pub type PresentationId = Uuid;

/// Which presentations a transition produces
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FlashMode {
    /// Flash at the crossing point
    #[default]
    CursorOnly,
    /// Flash along the entered edge of the destination display
    EdgeOnly,
    /// Cursor flash, then the edge flash shortly after
    Both,
}

impl FlashMode {
    pub fn shows_cursor(self) -> bool {
        matches!(self, FlashMode::CursorOnly | FlashMode::Both)
    }

    pub fn shows_edge(self) -> bool {
        matches!(self, FlashMode::EdgeOnly | FlashMode::Both)
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlashMode::CursorOnly => "cursor-only",
            FlashMode::EdgeOnly => "edge-only",
            FlashMode::Both => "both",
        })
    }
}

/// Where a presentation is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Cursor,
    Edge,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Cursor => "cursor",
            Anchor::Edge => "edge",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationKind {
    /// Burst centred on the crossing point
    Cursor {
        anchor: Point,
        direction: Direction,
        show_arrow: bool,
        show_particles: bool,
    },
    /// Bar along the edge the pointer entered through
    Edge {
        display: RegionId,
        edge: RegionEdge,
        /// Where along the edge the crossing happened (0.0 to 1.0)
        along: f64,
    },
}

/// One overlay to draw, fade and dispose
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationRequest {
    pub id: PresentationId,
    pub kind: PresentationKind,
    /// Overlay bounds in desktop coordinates
    pub frame: Rect,
    pub style: StyleConfig,
    pub duration: Duration,
}

impl PresentationRequest {
    pub fn anchor(&self) -> Anchor {
        match self.kind {
            PresentationKind::Cursor { .. } => Anchor::Cursor,
            PresentationKind::Edge { .. } => Anchor::Edge,
        }
    }

    pub fn fade(&self, frame_interval: Duration) -> FadeSchedule {
        FadeSchedule::new(self.duration, frame_interval)
    }
}

/// Completion report for one presentation
#[derive(Debug, Clone)]
pub struct PresentationOutcome {
    pub id: PresentationId,
    pub anchor: Anchor,
    pub result: Result<(), String>,
}

/// Linear fade from full opacity to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeSchedule {
    duration: Duration,
    frame_interval: Duration,
}

impl FadeSchedule {
    pub fn new(duration: Duration, frame_interval: Duration) -> Self {
        Self {
            duration,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Opacity at `elapsed` since the overlay appeared
    pub fn opacity_at(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (1.0 - progress).clamp(0.0, 1.0)
    }

    /// Frames before the final zero-opacity frame
    pub fn frame_count(&self) -> u64 {
        let step = self.frame_interval.as_nanos();
        let count = (self.duration.as_nanos() + step - 1) / step;
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Frame offsets with their opacity, ending with zero opacity at `duration`
    pub fn frames(&self) -> impl Iterator<Item = (Duration, f32)> {
        let schedule = *self;

        std::iter::successors(Some(Duration::ZERO), move |at| {
            at.checked_add(schedule.frame_interval)
        })
        .take_while(move |at| *at < schedule.duration)
        .map(move |at| (at, schedule.opacity_at(at)))
        .chain(std::iter::once((self.duration, 0.0)))
    }
}
