//! Linux desktop backend
//!
//! Uses X11: RandR monitors for the display set and `QueryPointer` on the
//! root window for the pointer. Works under XWayland for pointers over X
//! clients only.

use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{ConnectionExt as _, Window};
use x11rb::rust_connection::RustConnection;

use super::traits::{DisplaySource, PlatformError, PlatformResult, PointerSource};
use crate::screen::{self, DisplayRegion, Point, RegionId};

/// X11 desktop
pub struct X11Desktop {
    conn: RustConnection,
    root: Window,
    root_width: u16,
    root_height: u16,
}

impl X11Desktop {
    /// Connect to the display named by `$DISPLAY`
    pub fn connect() -> PlatformResult<Self> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| PlatformError::Unavailable(e.to_string()))?;

        let (root, root_width, root_height) = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|s| (s.root, s.width_in_pixels, s.height_in_pixels))
            .ok_or_else(|| PlatformError::Unavailable(format!("no X screen {}", screen_num)))?;

        tracing::debug!(
            "Connected to X11 screen {} ({}x{})",
            screen_num,
            root_width,
            root_height
        );

        Ok(Self {
            conn,
            root,
            root_width,
            root_height,
        })
    }

    fn extent(&self) -> f64 {
        f64::from(self.root_height)
    }

    fn monitor_name(&self, atom: u32) -> Option<String> {
        let reply = self.conn.get_atom_name(atom).ok()?.reply().ok()?;
        String::from_utf8(reply.name).ok()
    }

    /// The whole root window as one display, for servers without RandR 1.5
    fn root_display(&self) -> DisplayRegion {
        let frame = screen::flip_rect(
            self.extent(),
            0.0,
            0.0,
            f64::from(self.root_width),
            f64::from(self.root_height),
        );
        DisplayRegion::new(RegionId(u64::from(self.root)), "screen", frame).with_primary(true)
    }
}

impl PointerSource for X11Desktop {
    fn pointer_position(&mut self) -> PlatformResult<Point> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .map_err(|e| PlatformError::Platform(e.to_string()))?
            .reply()
            .map_err(|e| PlatformError::Platform(e.to_string()))?;

        if !reply.same_screen {
            return Err(PlatformError::NoPointer);
        }

        Ok(screen::flip_point(
            self.extent(),
            f64::from(reply.root_x),
            f64::from(reply.root_y),
        ))
    }
}

impl DisplaySource for X11Desktop {
    fn displays(&mut self) -> PlatformResult<Vec<DisplayRegion>> {
        let monitors = match self
            .conn
            .randr_get_monitors(self.root, true)
            .map_err(|e| e.to_string())
            .and_then(|cookie| cookie.reply().map_err(|e| e.to_string()))
        {
            Ok(reply) => reply.monitors,
            Err(e) => {
                tracing::debug!("RandR monitors unavailable ({}), using root window", e);
                return Ok(vec![self.root_display()]);
            }
        };

        if monitors.is_empty() {
            return Ok(vec![self.root_display()]);
        }

        let extent = self.extent();
        Ok(monitors
            .iter()
            .map(|monitor| {
                let label = self
                    .monitor_name(monitor.name)
                    .unwrap_or_else(|| format!("monitor-{}", monitor.name));
                let frame = screen::flip_rect(
                    extent,
                    f64::from(monitor.x),
                    f64::from(monitor.y),
                    f64::from(monitor.width),
                    f64::from(monitor.height),
                );
                DisplayRegion::new(RegionId(u64::from(monitor.name)), label, frame)
                    .with_primary(monitor.primary)
            })
            .collect())
    }
}
