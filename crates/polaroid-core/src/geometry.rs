//! Fit, scale and pan math for placing the photo inside the frame.
//!
//! All functions here are pure. The content area is a fixed
//! `CANVAS_SIZE × CANVAS_SIZE` square whose top-left corner sits at
//! `(border_width, border_width)` on the composed surface.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the composed surface
//! - x grows right, y grows down
//! - Rectangles are half-open: a pixel belongs to a rectangle when its
//!   center lies inside it

use serde::{Deserialize, Serialize};

/// Side length of the square content area, in pixels.
pub const CANVAS_SIZE: u32 = 500;

/// Cumulative displacement of the photo within the content area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PanOffset {
    pub const ORIGIN: PanOffset = PanOffset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Add a delta to the offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.dx += dx;
        self.dy += dy;
    }

    pub fn is_origin(&self) -> bool {
        *self == Self::ORIGIN
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the point lies inside (left/top inclusive, right/bottom exclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }
}

/// Compute the drawn size of an image fitted into a square of side `area`.
///
/// The longer image edge maps to `area * scale` and the aspect ratio is
/// preserved. Landscape images (aspect > 1) are constrained by width; portrait
/// and square images by height.
pub fn fit_draw_size(image_width: u32, image_height: u32, area: f64, scale: f64) -> (f64, f64) {
    let aspect = image_width as f64 / image_height as f64;

    if aspect > 1.0 {
        (area * scale, (area / aspect) * scale)
    } else {
        ((area * aspect) * scale, area * scale)
    }
}

/// Compute where the photo is drawn on the composed surface.
///
/// The fitted image is centered in the content area, which is offset by
/// `border_width`, then shifted by the pan offset.
pub fn place_image(
    image_width: u32,
    image_height: u32,
    border_width: u32,
    scale: f64,
    pan: PanOffset,
) -> Rect {
    let area = CANVAS_SIZE as f64;
    let (draw_width, draw_height) = fit_draw_size(image_width, image_height, area, scale);
    let border = border_width as f64;

    Rect::new(
        border + (area - draw_width) / 2.0 + pan.dx,
        border + (area - draw_height) / 2.0 + pan.dy,
        draw_width,
        draw_height,
    )
}

/// The square content area the photo is clipped to.
pub fn content_rect(border_width: u32) -> Rect {
    let border = border_width as f64;
    let area = CANVAS_SIZE as f64;
    Rect::new(border, border, area, area)
}

/// Size of the composed surface for the given borders.
pub fn surface_size(border_width: u32, bottom_border: u32) -> (u32, u32) {
    (
        CANVAS_SIZE + 2 * border_width,
        CANVAS_SIZE + border_width + bottom_border,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
