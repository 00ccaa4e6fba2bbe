//! Platform module - Pointer and display queries
//!
//! This module provides:
//! - The `PointerSource` / `DisplaySource` seam the monitor polls through
//! - A native backend per OS, converting into the Y-up desktop space
//! - A simulated desktop for tests and the `simulate` command

mod traits;

pub mod simulated;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

pub use simulated::{SimulatedDesktop, SimulatorHandle};
pub use traits::*;

#[cfg(target_os = "macos")]
pub use macos::QuartzDesktop;

#[cfg(target_os = "linux")]
pub use linux::X11Desktop;

#[cfg(target_os = "windows")]
pub use windows::Win32Desktop;

/// Open the desktop backend for the current platform
pub fn native() -> PlatformResult<Box<dyn Desktop>> {
    #[cfg(target_os = "macos")]
    return Ok(Box::new(QuartzDesktop::new()));

    #[cfg(target_os = "linux")]
    return Ok(Box::new(X11Desktop::connect()?));

    #[cfg(target_os = "windows")]
    return Ok(Box::new(Win32Desktop::new()));

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return Err(PlatformError::NotSupported);
}

/// Get the current platform name
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "macos")]
    return "macOS";

    #[cfg(target_os = "linux")]
    return "Linux";

    #[cfg(target_os = "windows")]
    return "Windows";

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return "Unknown";
}
