//! Platform trait definitions
//!
//! Defines the common interface that platform-specific backends must provide.

use thiserror::Error;

use crate::screen::{DisplayRegion, Point};

/// Errors that can occur while querying the desktop
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Display server unavailable: {0}")]
    Unavailable(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Not supported on this platform")]
    NotSupported,

    #[error("Pointer position unavailable")]
    NoPointer,

    #[error("Invalid pointer path: {0}")]
    InvalidPath(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Reads the global pointer position
///
/// Positions are in the Y-up desktop space shared with `DisplaySource`.
pub trait PointerSource: Send {
    fn pointer_position(&mut self) -> PlatformResult<Point>;
}

/// Enumerates the connected displays
pub trait DisplaySource: Send {
    /// Current display set, in the platform's enumeration order
    fn displays(&mut self) -> PlatformResult<Vec<DisplayRegion>>;
}

/// A desktop the monitor can watch
pub trait Desktop: PointerSource + DisplaySource {}

impl<T: PointerSource + DisplaySource> Desktop for T {}
