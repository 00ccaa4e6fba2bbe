//! Transition module - Detects pointer crossings between displays
//!
//! Provides:
//! - Pointer sampling and display membership tracking
//! - Classification of each crossing (direction, entry edge, crossing point)
//! - The polling monitor that drives flashes

pub mod classifier;
mod event;
mod monitor;

pub use classifier::{classify, Axis, Classification};
pub use event::{Direction, PointerSample, TransitionEvent};
pub use monitor::{
    MonitorError, MonitorEvent, MonitorOptions, MonitorResult, MonitorState, TransitionMonitor,
    TransitionTracker, FLASH_COOLDOWN, UNKNOWN_DISPLAY,
};

