//! Renderer seam
//!
//! Drawing gradients, particles and arrows happens outside this crate. A
//! renderer receives one request per overlay and resolves once that overlay
//! has faded out and been disposed.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant};

use super::presentation::{PresentationKind, PresentationRequest};

/// Renderer errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Overlay unavailable: {0}")]
    Unavailable(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Draws one presentation at a time per call
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Show, fade and dispose the overlay described by `request`
    async fn present(&self, request: &PresentationRequest) -> RenderResult<()>;
}

/// Renderer that walks the fade timeline and reports it through `tracing`
#[derive(Debug, Clone)]
pub struct LogRenderer {
    frame_interval: Duration,
}

impl LogRenderer {
    pub fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

#[async_trait]
impl Renderer for LogRenderer {
    async fn present(&self, request: &PresentationRequest) -> RenderResult<()> {
        match &request.kind {
            PresentationKind::Cursor {
                anchor,
                direction,
                show_arrow,
                show_particles,
            } => tracing::info!(
                "Flash {} at {} ({}, {}, arrow: {}, particles: {}, {:.2}s)",
                request.id,
                anchor,
                direction,
                request.style.style.display_name(),
                show_arrow,
                show_particles,
                request.duration.as_secs_f64()
            ),
            PresentationKind::Edge {
                display: region,
                edge,
                along,
            } => tracing::info!(
                "Edge flash {} on display {} {} at {:.0}% ({}px, {:.2}s)",
                request.id,
                region,
                edge,
                along * 100.0,
                request.style.edge_thickness,
                request.duration.as_secs_f64()
            ),
        }

        let fade = request.fade(self.frame_interval);
        tracing::trace!("Flash {} fades over {} frame(s)", request.id, fade.frame_count());

        let start = Instant::now();
        for (at, opacity) in fade.frames() {
            time::sleep_until(start + at).await;
            tracing::trace!("Flash {} opacity {:.2}", request.id, opacity);
        }

        tracing::debug!("Flash {} disposed", request.id);
        Ok(())
    }
}
