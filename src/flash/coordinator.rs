//! Flash coordinator
//!
//! Turns a transition into one or two self-expiring overlay presentations.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

use super::presentation::{
    FlashMode, PresentationId, PresentationKind, PresentationOutcome, PresentationRequest,
};
use super::renderer::Renderer;
use crate::screen::Rect;
use crate::settings::StyleConfig;
use crate::transition::TransitionEvent;

/// Delay between the cursor flash and the edge flash in `Both` mode
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(50);

/// Side of the square cursor overlay
pub const DEFAULT_CURSOR_SIZE: f64 = 200.0;

/// Coordinator parameters
#[derive(Debug, Clone)]
pub struct FlashOptions {
    pub stagger: Duration,
    pub cursor_size: f64,
}

impl Default for FlashOptions {
    fn default() -> Self {
        Self {
            stagger: DEFAULT_STAGGER,
            cursor_size: DEFAULT_CURSOR_SIZE,
        }
    }
}

/// Schedules presentations for transitions
///
/// Presentations are fire-and-forget: each one runs as its own task with its
/// own request ID, and nothing is coalesced between triggers.
#[derive(Clone)]
pub struct FlashCoordinator {
    renderer: Arc<dyn Renderer>,
    options: FlashOptions,
    completion_tx: Option<mpsc::UnboundedSender<PresentationOutcome>>,
}

impl FlashCoordinator {
    pub fn new(renderer: Arc<dyn Renderer>, options: FlashOptions) -> Self {
        Self {
            renderer,
            options,
            completion_tx: None,
        }
    }

    /// Report every finished or failed presentation on the returned channel
    pub fn with_completions(mut self) -> (Self, mpsc::UnboundedReceiver<PresentationOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.completion_tx = Some(tx);
        (self, rx)
    }

    /// Work out the presentations for a transition, each with its start delay
    pub fn plan(
        &self,
        event: &TransitionEvent,
        style: StyleConfig,
        mode: FlashMode,
    ) -> Vec<(Duration, PresentationRequest)> {
        let mut plan = Vec::with_capacity(2);
        let duration = style.duration();

        if mode.shows_cursor() {
            let anchor = event.boundary_position;
            let size = self.options.cursor_size;
            plan.push((
                Duration::ZERO,
                PresentationRequest {
                    id: PresentationId::new_v4(),
                    kind: PresentationKind::Cursor {
                        anchor,
                        direction: event.direction,
                        show_arrow: style.show_direction_arrow,
                        show_particles: style.show_particles,
                    },
                    frame: Rect::centered(anchor, size, size),
                    style,
                    duration,
                },
            ));
        }

        if mode.shows_edge() {
            match event.crossing_edge {
                Some(edge) => {
                    let display = &event.to_region;
                    let delay = if mode.shows_cursor() {
                        self.options.stagger
                    } else {
                        Duration::ZERO
                    };
                    plan.push((
                        delay,
                        PresentationRequest {
                            id: PresentationId::new_v4(),
                            kind: PresentationKind::Edge {
                                display: display.id,
                                edge,
                                along: display
                                    .frame
                                    .position_along(edge, event.boundary_position),
                            },
                            frame: display.frame.edge_strip(edge, style.edge_thickness),
                            style,
                            duration,
                        },
                    ));
                }
                None => tracing::debug!("No crossing edge for {}, skipping edge flash", event),
            }
        }

        plan
    }

    /// Schedule the presentations for a transition
    ///
    /// Returns immediately; the presentations run on their own tasks.
    pub fn trigger(
        &self,
        event: TransitionEvent,
        style: StyleConfig,
        mode: FlashMode,
    ) -> Vec<PresentationId> {
        self.plan(&event, style, mode)
            .into_iter()
            .map(|(delay, request)| {
                let id = request.id;
                self.spawn(delay, request);
                id
            })
            .collect()
    }

    fn spawn(&self, delay: Duration, request: PresentationRequest) {
        let renderer = self.renderer.clone();
        let completion_tx = self.completion_tx.clone();

        tokio::spawn(async move {
            if !delay.is_zero() {
                time::sleep(delay).await;
            }

            let result = renderer.present(&request).await.map_err(|e| {
                tracing::warn!("{} flash {} failed: {}", request.anchor(), request.id, e);
                e.to_string()
            });

            if let Some(tx) = completion_tx {
                let _ = tx.send(PresentationOutcome {
                    id: request.id,
                    anchor: request.anchor(),
                    result,
                });
            }
        });
    }
}
