//! Transition classification
//!
//! Works out which way the pointer moved between two displays, which edge of
//! the destination it entered through, and roughly where it crossed. All
//! functions are total over well-formed rectangles.

use crate::screen::{DisplayRegion, Point, RegionEdge};

use super::event::Direction;

/// Dominant axis of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of classifying one crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub direction: Direction,
    pub crossing_edge: Option<RegionEdge>,
    pub boundary_position: Point,
}

/// Pick the axis with the larger centre displacement. Equal displacement
/// resolves to horizontal; identical centres have no axis at all.
pub fn dominant_axis(from: &DisplayRegion, to: &DisplayRegion) -> Option<Axis> {
    let (from_center, to_center) = (from.center(), to.center());
    let delta_x = (to_center.x - from_center.x).abs();
    let delta_y = (to_center.y - from_center.y).abs();

    if delta_x == 0.0 && delta_y == 0.0 {
        None
    } else if delta_x >= delta_y {
        Some(Axis::Horizontal)
    } else {
        Some(Axis::Vertical)
    }
}

/// Direction of travel from `from` to `to` (larger Y is up)
pub fn direction(from: &DisplayRegion, to: &DisplayRegion) -> Direction {
    let (from_center, to_center) = (from.center(), to.center());
    match dominant_axis(from, to) {
        Some(Axis::Horizontal) if to_center.x < from_center.x => Direction::Left,
        Some(Axis::Horizontal) => Direction::Right,
        Some(Axis::Vertical) if to_center.y < from_center.y => Direction::Down,
        Some(Axis::Vertical) => Direction::Up,
        None => Direction::Unknown,
    }
}

/// Edge of the destination the pointer enters through
pub fn crossing_edge(direction: Direction) -> Option<RegionEdge> {
    match direction {
        Direction::Left => Some(RegionEdge::MaxX),
        Direction::Right => Some(RegionEdge::MinX),
        Direction::Down => Some(RegionEdge::MaxY),
        Direction::Up => Some(RegionEdge::MinY),
        Direction::Unknown => None,
    }
}

/// Approximate crossing point
///
/// The dominant-axis coordinate snaps to the seam between the two regions;
/// the other coordinate is carried from the current pointer position.
pub fn boundary_position(
    from: &DisplayRegion,
    to: &DisplayRegion,
    direction: Direction,
    current: Point,
) -> Point {
    let (from, to) = (&from.frame, &to.frame);
    match direction {
        Direction::Left => Point::new(to.max_x().max(from.min_x()), current.y),
        Direction::Right => Point::new(from.max_x().min(to.min_x()), current.y),
        Direction::Down => Point::new(current.x, to.max_y().max(from.min_y())),
        Direction::Up => Point::new(current.x, from.max_y().min(to.min_y())),
        Direction::Unknown => current,
    }
}

/// Classify a crossing from `from` to `to` observed at `current`
pub fn classify(from: &DisplayRegion, to: &DisplayRegion, current: Point) -> Classification {
    let direction = direction(from, to);
    Classification {
        direction,
        crossing_edge: crossing_edge(direction),
        boundary_position: boundary_position(from, to, direction, current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Rect, RegionId};

    fn region(id: u64, x: f64, y: f64, width: f64, height: f64) -> DisplayRegion {
        DisplayRegion::new(RegionId(id), format!("r{}", id), Rect::new(x, y, width, height))
    }

    #[test]
    fn test_side_by_side_right() {
        let a = region(1, 0.0, 0.0, 1920.0, 1080.0);
        let b = region(2, 1920.0, 0.0, 1920.0, 1080.0);

        let result = classify(&a, &b, Point::new(1950.0, 500.0));
        assert_eq!(result.direction, Direction::Right);
        assert_eq!(result.crossing_edge, Some(RegionEdge::MinX));
        assert_eq!(result.boundary_position, Point::new(1920.0, 500.0));
    }

    #[test]
    fn test_side_by_side_left() {
        let a = region(1, 0.0, 0.0, 1920.0, 1080.0);
        let b = region(2, 1920.0, 0.0, 1920.0, 1080.0);

        let result = classify(&b, &a, Point::new(1900.0, 300.0));
        assert_eq!(result.direction, Direction::Left);
        assert_eq!(result.crossing_edge, Some(RegionEdge::MaxX));
        assert_eq!(result.boundary_position, Point::new(1920.0, 300.0));
    }

    #[test]
    fn test_stacked_up_and_down() {
        let lower = region(1, 0.0, 0.0, 1920.0, 1080.0);
        let upper = region(2, 0.0, 1080.0, 1920.0, 1080.0);

        let up = classify(&lower, &upper, Point::new(640.0, 1100.0));
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.crossing_edge, Some(RegionEdge::MinY));
        assert_eq!(up.boundary_position, Point::new(640.0, 1080.0));

        let down = classify(&upper, &lower, Point::new(700.0, 1070.0));
        assert_eq!(down.direction, Direction::Down);
        assert_eq!(down.crossing_edge, Some(RegionEdge::MaxY));
        assert_eq!(down.boundary_position, Point::new(700.0, 1080.0));
    }

    #[test]
    fn test_right_for_many_widths() {
        // Equal centre Y, A left of B
        for (width_a, width_b) in [(800.0, 1920.0), (2560.0, 1280.0), (1024.0, 1024.0)] {
            let a = region(1, -width_a, 0.0, width_a, 1080.0);
            let b = region(2, 0.0, 0.0, width_b, 1080.0);
            let result = classify(&a, &b, Point::new(5.0, 200.0));
            assert_eq!(result.direction, Direction::Right);
            assert_eq!(result.crossing_edge, Some(RegionEdge::MinX));
        }
    }

    #[test]
    fn test_up_for_many_heights() {
        // Equal centre X, B above A
        for (height_a, height_b) in [(1080.0, 1440.0), (1600.0, 900.0)] {
            let a = region(1, 0.0, 0.0, 1920.0, height_a);
            let b = region(2, 0.0, height_a, 1920.0, height_b);
            let result = classify(&a, &b, Point::new(50.0, height_a + 1.0));
            assert_eq!(result.direction, Direction::Up);
            assert_eq!(result.crossing_edge, Some(RegionEdge::MinY));
        }
    }

    #[test]
    fn test_equal_displacement_is_horizontal() {
        // Diagonal neighbours with identical centre deltas on both axes
        let a = region(1, 0.0, 0.0, 1000.0, 1000.0);
        let b = region(2, 1000.0, 1000.0, 1000.0, 1000.0);

        assert_eq!(dominant_axis(&a, &b), Some(Axis::Horizontal));
        assert_eq!(direction(&a, &b), Direction::Right);
        assert_eq!(direction(&b, &a), Direction::Left);
    }

    #[test]
    fn test_identical_centres_are_unknown() {
        let a = region(1, 0.0, 0.0, 1000.0, 1000.0);
        let b = region(2, 250.0, 250.0, 500.0, 500.0);
        let current = Point::new(300.0, 400.0);

        let result = classify(&a, &b, current);
        assert_eq!(result.direction, Direction::Unknown);
        assert_eq!(result.crossing_edge, None);
        assert_eq!(result.boundary_position, current);
    }

    #[test]
    fn test_boundary_lies_on_crossing_edge() {
        let center = region(0, 0.0, 0.0, 1920.0, 1080.0);
        let neighbours = [
            region(1, 1920.0, 100.0, 2560.0, 1440.0),
            region(2, -1280.0, 0.0, 1280.0, 1024.0),
            region(3, 200.0, 1080.0, 1600.0, 900.0),
            region(4, -300.0, -1200.0, 2400.0, 1200.0),
        ];

        for neighbour in &neighbours {
            for (from, to) in [(&center, neighbour), (neighbour, &center)] {
                let result = classify(from, to, Point::new(17.0, 23.0));
                let edge = result.crossing_edge.expect("adjacent regions have an edge");
                let on_axis = if edge.is_vertical() {
                    result.boundary_position.x
                } else {
                    result.boundary_position.y
                };
                assert_eq!(on_axis, to.frame.edge_coordinate(edge));
            }
        }
    }

    #[test]
    fn test_non_dominant_axis_is_carried() {
        let a = region(1, 0.0, 0.0, 1920.0, 1080.0);
        let b = region(2, 1920.0, -200.0, 1920.0, 1080.0);

        let result = classify(&a, &b, Point::new(1925.0, -42.5));
        assert_eq!(result.boundary_position.y, -42.5);
    }
}
