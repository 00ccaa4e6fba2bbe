//! macOS desktop backend
//!
//! Uses Quartz Display Services for the display set and a fresh `CGEvent`
//! for the pointer location. Quartz global coordinates are Y-down from the
//! top-left of the main display, so both are flipped against its height.

use core_graphics::display::CGDisplay;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use super::traits::{DisplaySource, PlatformError, PlatformResult, PointerSource};
use crate::screen::{self, DisplayRegion, Point, RegionId};

/// Quartz desktop
#[derive(Debug, Default)]
pub struct QuartzDesktop;

impl QuartzDesktop {
    pub fn new() -> Self {
        Self
    }

    fn extent() -> f64 {
        CGDisplay::main().bounds().size.height
    }
}

impl PointerSource for QuartzDesktop {
    fn pointer_position(&mut self) -> PlatformResult<Point> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| PlatformError::Platform("CGEventSource unavailable".to_string()))?;
        let event = CGEvent::new(source).map_err(|_| PlatformError::NoPointer)?;
        let location = event.location();

        Ok(screen::flip_point(Self::extent(), location.x, location.y))
    }
}

impl DisplaySource for QuartzDesktop {
    fn displays(&mut self) -> PlatformResult<Vec<DisplayRegion>> {
        let ids = CGDisplay::active_displays()
            .map_err(|e| PlatformError::Platform(format!("CGGetActiveDisplayList failed: {}", e)))?;
        let main_id = CGDisplay::main().id;
        let extent = Self::extent();

        Ok(ids
            .into_iter()
            .map(|id| {
                let bounds = CGDisplay::new(id).bounds();
                let frame = screen::flip_rect(
                    extent,
                    bounds.origin.x,
                    bounds.origin.y,
                    bounds.size.width,
                    bounds.size.height,
                );
                let label = if id == main_id {
                    "built-in".to_string()
                } else {
                    format!("display-{}", id)
                };
                DisplayRegion::new(RegionId(u64::from(id)), label, frame)
                    .with_primary(id == main_id)
            })
            .collect())
    }
}
