//! screenflash - Multi-monitor pointer transition flashes
//!
//! Watches the global pointer, notices when it moves from one display to
//! another, and shows a short-lived flash where it crossed so the pointer is
//! easy to find on a large desktop.
//!
//! # Architecture
//!
//! - `screen`: display geometry in a Y-up desktop space
//! - `platform`: pointer and display queries per OS, plus a simulator
//! - `transition`: crossing detection, classification and the polling monitor
//! - `flash`: overlay planning and scheduling behind a `Renderer`
//! - `settings`: the persisted, live flash style
//! - `config`: runtime configuration

pub mod config;
pub mod flash;
pub mod platform;
pub mod screen;
pub mod settings;
pub mod transition;

pub use flash::{FlashCoordinator, FlashMode, Renderer};
pub use settings::{Settings, StyleConfig};
pub use transition::{TransitionEvent, TransitionMonitor};
