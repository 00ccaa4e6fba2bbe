//! Display topology management
//!
//! Tracks the set of connected displays and resolves which one contains a point.

use super::region::{DisplayRegion, Point, Rect, RegionId};

/// The currently connected displays, in platform enumeration order
#[derive(Debug, Clone, Default)]
pub struct DisplayTopology {
    regions: Vec<DisplayRegion>,
}

impl DisplayTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology from a platform region list
    pub fn from_regions(regions: Vec<DisplayRegion>) -> Self {
        let mut topology = Self::new();
        topology.replace(regions);
        topology
    }

    /// Replace the whole region set
    ///
    /// Degenerate regions are logged and left out until the platform reports
    /// them correctly. Returns whether the effective set changed.
    pub fn replace(&mut self, regions: Vec<DisplayRegion>) -> bool {
        let regions: Vec<DisplayRegion> = regions
            .into_iter()
            .filter(|region| {
                if region.frame.is_degenerate() {
                    tracing::warn!(
                        "Ignoring degenerate display {} '{}': {:?}",
                        region.id,
                        region.label,
                        region.frame
                    );
                    false
                } else {
                    true
                }
            })
            .collect();

        if regions == self.regions {
            return false;
        }

        self.regions = regions;
        true
    }

    /// All known regions
    pub fn regions(&self) -> &[DisplayRegion] {
        &self.regions
    }

    /// Find the region containing `point`
    ///
    /// Overlapping rectangles resolve to the first one in enumeration order.
    /// Returns `None` when the point is outside every region, which happens
    /// briefly while displays are being reconfigured.
    pub fn locate(&self, point: Point) -> Option<&DisplayRegion> {
        self.regions.iter().find(|region| region.contains(point))
    }

    /// Human-readable name shown to the user
    pub fn display_name(&self, region: &DisplayRegion) -> String {
        if region.primary {
            return "Main Display".to_string();
        }
        match self.regions.iter().position(|r| r.id == region.id) {
            Some(index) => format!("Display {}", index + 1),
            None => "External Display".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Builder for assembling display layouts
///
/// Displays placed with the relative helpers sit flush against their anchor,
/// sharing the anchor's minimum coordinate on the other axis.
pub struct TopologyBuilder {
    regions: Vec<DisplayRegion>,
    next_id: u64,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a display at an absolute position
    pub fn display(mut self, label: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions
            .push(DisplayRegion::new(id, label, Rect::new(x, y, width, height)));
        self
    }

    /// Mark a display as the main one
    pub fn primary(mut self, label: &str) -> Self {
        for region in &mut self.regions {
            region.primary = region.label == label;
        }
        self
    }

    /// Place a new display to the right of `anchor`
    pub fn right_of(self, anchor: &str, label: &str, width: f64, height: f64) -> Self {
        self.place(anchor, label, width, height, |frame| (frame.max_x(), frame.min_y()))
    }

    /// Place a new display to the left of `anchor`
    pub fn left_of(self, anchor: &str, label: &str, width: f64, height: f64) -> Self {
        self.place(anchor, label, width, height, |frame| {
            (frame.min_x() - width, frame.min_y())
        })
    }

    /// Place a new display above `anchor`
    pub fn above(self, anchor: &str, label: &str, width: f64, height: f64) -> Self {
        self.place(anchor, label, width, height, |frame| (frame.min_x(), frame.max_y()))
    }

    /// Place a new display below `anchor`
    pub fn below(self, anchor: &str, label: &str, width: f64, height: f64) -> Self {
        self.place(anchor, label, width, height, |frame| {
            (frame.min_x(), frame.min_y() - height)
        })
    }

    fn place(
        self,
        anchor: &str,
        label: &str,
        width: f64,
        height: f64,
        origin: impl FnOnce(&Rect) -> (f64, f64),
    ) -> Self {
        let anchor_frame = self
            .regions
            .iter()
            .find(|region| region.label == anchor)
            .map(|region| region.frame);

        match anchor_frame {
            Some(frame) => {
                let (x, y) = origin(&frame);
                self.display(label, x, y, width, height)
            }
            None => {
                tracing::warn!("Cannot place '{}': no display labelled '{}'", label, anchor);
                self
            }
        }
    }

    pub fn build_regions(self) -> Vec<DisplayRegion> {
        let mut regions = self.regions;
        if !regions.is_empty() && !regions.iter().any(|region| region.primary) {
            regions[0].primary = true;
        }
        regions
    }

    pub fn build(self) -> DisplayTopology {
        DisplayTopology::from_regions(self.build_regions())
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
