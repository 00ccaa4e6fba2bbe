//! Windows desktop backend
//!
//! Enumerates monitors with `EnumDisplayMonitors` and reads the pointer with
//! `GetCursorPos`. Virtual-screen coordinates are Y-down with the primary
//! monitor at the origin; they are flipped against the primary's height.

use std::mem;

use windows::Win32::Foundation::{BOOL, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
};
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

use super::traits::{DisplaySource, PlatformError, PlatformResult, PointerSource};
use crate::screen::{self, DisplayRegion, Point, RegionId};

const MONITORINFOF_PRIMARY: u32 = 1;

struct RawMonitor {
    handle: isize,
    device_name: String,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    primary: bool,
}

/// Win32 desktop
#[derive(Debug, Default)]
pub struct Win32Desktop {
    /// Height of the primary monitor, refreshed with every display query
    extent: Option<f64>,
}

impl Win32Desktop {
    pub fn new() -> Self {
        Self::default()
    }

    fn enumerate() -> PlatformResult<Vec<RawMonitor>> {
        unsafe extern "system" fn enum_callback(
            hmonitor: HMONITOR,
            _hdc: HDC,
            _rect: *mut RECT,
            lparam: LPARAM,
        ) -> BOOL {
            let monitors = &mut *(lparam.0 as *mut Vec<RawMonitor>);

            let mut info = MONITORINFOEXW::default();
            info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;

            if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
                let rc = info.monitorInfo.rcMonitor;
                let len = info
                    .szDevice
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(info.szDevice.len());

                monitors.push(RawMonitor {
                    handle: hmonitor.0,
                    device_name: String::from_utf16_lossy(&info.szDevice[..len]),
                    left: rc.left,
                    top: rc.top,
                    width: rc.right - rc.left,
                    height: rc.bottom - rc.top,
                    primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
                });
            }

            BOOL::from(true)
        }

        let mut monitors: Vec<RawMonitor> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(enum_callback),
                LPARAM(&mut monitors as *mut Vec<RawMonitor> as isize),
            )
        };

        if !ok.as_bool() {
            return Err(PlatformError::Platform(
                "EnumDisplayMonitors failed".to_string(),
            ));
        }
        Ok(monitors)
    }

    fn extent(&mut self) -> PlatformResult<f64> {
        if let Some(extent) = self.extent {
            return Ok(extent);
        }
        self.displays()?;
        self.extent.ok_or(PlatformError::NoPointer)
    }
}

impl PointerSource for Win32Desktop {
    fn pointer_position(&mut self) -> PlatformResult<Point> {
        let extent = self.extent()?;
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.map_err(|_| PlatformError::NoPointer)?;

        Ok(screen::flip_point(
            extent,
            f64::from(point.x),
            f64::from(point.y),
        ))
    }
}

impl DisplaySource for Win32Desktop {
    fn displays(&mut self) -> PlatformResult<Vec<DisplayRegion>> {
        let monitors = Self::enumerate()?;
        let extent = monitors
            .iter()
            .find(|m| m.primary)
            .or_else(|| monitors.first())
            .map(|m| f64::from(m.height))
            .ok_or_else(|| PlatformError::Platform("no monitors attached".to_string()))?;
        self.extent = Some(extent);

        Ok(monitors
            .into_iter()
            .map(|m| {
                let frame = screen::flip_rect(
                    extent,
                    f64::from(m.left),
                    f64::from(m.top),
                    f64::from(m.width),
                    f64::from(m.height),
                );
                DisplayRegion::new(RegionId(m.handle as u64), m.device_name, frame)
                    .with_primary(m.primary)
            })
            .collect())
    }
}
