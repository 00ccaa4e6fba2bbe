//! Flash module - Visual feedback for display transitions
//!
//! The coordinator decides which overlays a transition produces and where
//! they go; a `Renderer` draws them. Each overlay gets its own request and
//! task, so overlapping flashes never share state.

mod coordinator;
mod presentation;
mod renderer;

pub use coordinator::{FlashCoordinator, FlashOptions, DEFAULT_CURSOR_SIZE, DEFAULT_STAGGER};
pub use presentation::{
    Anchor, FadeSchedule, FlashMode, PresentationId, PresentationKind, PresentationOutcome,
    PresentationRequest,
};
pub use renderer::{LogRenderer, RenderError, RenderResult, Renderer};
