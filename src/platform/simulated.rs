//! In-process desktop driven through channels
//!
//! The pointer and the display set are plain `watch` values that a
//! `SimulatorHandle` updates; the monitor sees them on its next tick.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

use super::traits::{DisplaySource, PlatformError, PlatformResult, PointerSource};
use crate::screen::{DisplayRegion, Point};

/// Desktop side of a simulation
pub struct SimulatedDesktop {
    pointer_rx: watch::Receiver<Point>,
    displays_rx: watch::Receiver<Vec<DisplayRegion>>,
}

/// Control side of a simulation
#[derive(Clone)]
pub struct SimulatorHandle {
    pointer_tx: watch::Sender<Point>,
    displays_tx: watch::Sender<Vec<DisplayRegion>>,
}

/// Create a simulated desktop with the pointer at `start`
pub fn simulated(displays: Vec<DisplayRegion>, start: Point) -> (SimulatedDesktop, SimulatorHandle) {
    let (pointer_tx, pointer_rx) = watch::channel(start);
    let (displays_tx, displays_rx) = watch::channel(displays);

    (
        SimulatedDesktop {
            pointer_rx,
            displays_rx,
        },
        SimulatorHandle {
            pointer_tx,
            displays_tx,
        },
    )
}

impl PointerSource for SimulatedDesktop {
    fn pointer_position(&mut self) -> PlatformResult<Point> {
        Ok(*self.pointer_rx.borrow())
    }
}

impl DisplaySource for SimulatedDesktop {
    fn displays(&mut self) -> PlatformResult<Vec<DisplayRegion>> {
        Ok(self.displays_rx.borrow().clone())
    }
}

impl SimulatorHandle {
    pub fn move_to(&self, position: Point) {
        self.pointer_tx.send_replace(position);
    }

    /// Replace the display set (hot-plug)
    pub fn set_displays(&self, displays: Vec<DisplayRegion>) {
        self.displays_tx.send_replace(displays);
    }

    pub fn position(&self) -> Point {
        *self.pointer_tx.borrow()
    }

    /// Move through `path`, holding each point for `step`
    pub async fn play(&self, path: &[Point], step: Duration) {
        for point in path {
            self.move_to(*point);
            time::sleep(step).await;
        }
    }
}

/// Parse a pointer path written as `x,y x,y ...`
pub fn parse_points(input: &str) -> PlatformResult<Vec<Point>> {
    input
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| PlatformError::InvalidPath(format!("expected x,y, got '{}'", pair)))?;
            let parse = |v: &str| {
                v.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| PlatformError::InvalidPath(format!("bad coordinate '{}'", v)))
            };
            Ok(Point::new(parse(x)?, parse(y)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::TopologyBuilder;

    #[test]
    fn test_handle_drives_desktop() {
        let regions = TopologyBuilder::new()
            .display("A", 0.0, 0.0, 1920.0, 1080.0)
            .build_regions();
        let (mut desktop, handle) = simulated(regions.clone(), Point::new(1.0, 2.0));

        assert_eq!(desktop.pointer_position().unwrap(), Point::new(1.0, 2.0));
        handle.move_to(Point::new(50.0, 60.0));
        assert_eq!(desktop.pointer_position().unwrap(), Point::new(50.0, 60.0));
        assert_eq!(handle.position(), Point::new(50.0, 60.0));

        assert_eq!(desktop.displays().unwrap().len(), 1);
        handle.set_displays(Vec::new());
        assert!(desktop.displays().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_ends_on_last_point() {
        let (mut desktop, handle) = simulated(Vec::new(), Point::new(0.0, 0.0));
        let path = [Point::new(1.0, 1.0), Point::new(2.0, 2.0)];

        handle.play(&path, Duration::from_millis(20)).await;
        assert_eq!(desktop.pointer_position().unwrap(), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points("1900,500  1950,500\n10.5,-3").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(1900.0, 500.0),
                Point::new(1950.0, 500.0),
                Point::new(10.5, -3.0)
            ]
        );
        assert!(parse_points("").unwrap().is_empty());
        assert!(parse_points("1900;500").is_err());
        assert!(parse_points("a,1").is_err());
        assert!(parse_points("NaN,1").is_err());
    }
}
