//! Pointer drag state machine for panning the photo.
//!
//! ```text
//!            PointerDown (inside)
//!   Idle ─────────────────────────▶ Dragging { last }
//!    ▲                                  │  PointerMove: pan += current - last
//!    └──────── PointerUp / cancel ──────┘
//! ```
//!
//! Mouse and touch both map onto these three events. Every event carries the
//! surface's bounding box at the time it fired, so local coordinates follow
//! the surface even if the page scrolls or the surface resizes mid-drag.

use serde::{Deserialize, Serialize};

use crate::geometry::PanOffset;

/// A point in client (viewport) or surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The surface's on-screen bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a client position to surface-local coordinates.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }

    /// Whether a local position lies on the surface (edges inclusive).
    pub fn contains_local(&self, local: Point) -> bool {
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.width && local.y <= self.height
    }
}

/// A pointer position together with the surface bounds it was measured
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client: Point,
    pub bounds: SurfaceBounds,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64, bounds: SurfaceBounds) -> Self {
        Self {
            client: Point::new(client_x, client_y),
            bounds,
        }
    }

    pub fn local(&self) -> Point {
        self.bounds.to_local(self.client)
    }

    /// Whether every coordinate of the position and bounds is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.client.x,
            self.client.y,
            self.bounds.left,
            self.bounds.top,
            self.bounds.width,
            self.bounds.height,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last: Point,
    },
}

/// What the front-end should do after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragResponse {
    /// The pan offset changed; draw again.
    pub rerender: bool,
    /// Suppress the browser's default handling (scroll, text selection).
    pub prevent_default: bool,
}

impl DragResponse {
    const IGNORED: DragResponse = DragResponse {
        rerender: false,
        prevent_default: false,
    };
}

/// Turns pointer events into pan offset changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag if the pointer went down on the surface.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> DragResponse {
        if !event.is_finite() {
            return DragResponse::IGNORED;
        }
        let local = event.local();
        if !event.bounds.contains_local(local) {
            return DragResponse::IGNORED;
        }

        self.state = DragState::Dragging { last: local };
        DragResponse {
            rerender: false,
            prevent_default: true,
        }
    }

    /// Move the pan by the distance travelled since the last event.
    pub fn pointer_move(&mut self, event: &PointerEvent, pan: &mut PanOffset) -> DragResponse {
        let DragState::Dragging { last } = self.state else {
            return DragResponse::IGNORED;
        };
        if !event.is_finite() {
            return DragResponse::IGNORED;
        }

        let current = event.local();
        pan.translate(current.x - last.x, current.y - last.y);
        self.state = DragState::Dragging { last: current };

        DragResponse {
            rerender: true,
            prevent_default: true,
        }
    }

    /// End the drag, wherever the pointer is.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
