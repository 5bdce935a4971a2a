//! A minimal raster canvas with a scoped clip region.
//!
//! The canvas wraps an [`RgbaImage`] and an optional clip rectangle. Every
//! drawing operation writes only pixels whose centers lie inside the clip.
//!
//! Clipping is acquired with [`Canvas::clip_to`], which returns a
//! [`ClipGuard`]. The guard dereferences to the canvas and restores the
//! previous clip when dropped, so the clip never outlives the scope that
//! set it.

use std::ops::{Deref, DerefMut};

use image::{Rgba, RgbaImage};

use crate::geometry::Rect;
use crate::sample::{blend_over, sample_bilinear, Color, EdgeMode};

/// Half-open range of pixel indices `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelSpan {
    /// Pixels whose centers fall inside `rect`, limited to `width × height`.
    pub fn covering(rect: &Rect, width: u32, height: u32) -> Self {
        let lo = |v: f64, max: u32| (v - 0.5).ceil().clamp(0.0, max as f64) as u32;

        let x0 = lo(rect.x, width);
        let y0 = lo(rect.y, height);
        let x1 = lo(rect.right(), width).max(x0);
        let y1 = lo(rect.bottom(), height).max(y0);
        Self { x0, y0, x1, y1 }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// RGBA drawing surface with a clip region.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    clip: Option<Rect>,
}

impl Canvas {
    /// Create a canvas filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The active clip rectangle, if any.
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Restrict drawing to `rect` until the returned guard is dropped.
    ///
    /// Nested clips intersect, like a 2D canvas `clip()` call. A clip that
    /// does not overlap the current one leaves nothing drawable.
    pub fn clip_to(&mut self, rect: Rect) -> ClipGuard<'_> {
        let saved = self.clip;
        let next = match saved {
            Some(current) => current
                .intersect(&rect)
                .unwrap_or(Rect::new(rect.x, rect.y, 0.0, 0.0)),
            None => rect,
        };
        self.clip = Some(next);
        ClipGuard {
            canvas: self,
            saved,
        }
    }

    /// The drawable part of `rect`: inside the canvas and the clip.
    fn drawable_span(&self, rect: &Rect) -> PixelSpan {
        let bounded = match self.clip {
            Some(clip) => clip.intersect(rect),
            None => Some(*rect),
        };

        match bounded {
            Some(r) => PixelSpan::covering(&r, self.width(), self.height()),
            None => PixelSpan {
                x0: 0,
                y0: 0,
                x1: 0,
                y1: 0,
            },
        }
    }

    /// Fill a rectangle with a solid color, replacing what was there.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let span = self.drawable_span(&rect);
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// Fill the whole canvas (subject to the clip).
    pub fn fill(&mut self, color: Rgba<u8>) {
        let full = Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64);
        self.fill_rect(full, color);
    }

    /// Draw `source` stretched into `dest` with bilinear resampling.
    ///
    /// Only pixels whose centers lie inside both `dest` and the clip are
    /// written.
    pub fn draw_image(&mut self, source: &RgbaImage, dest: Rect) {
        if source.width() == 0 || source.height() == 0 || dest.width <= 0.0 || dest.height <= 0.0
        {
            return;
        }

        let span = self.drawable_span(&dest);
        if span.is_empty() {
            return;
        }

        let sx = source.width() as f64 / dest.width;
        let sy = source.height() as f64 / dest.height;

        for y in span.y0..span.y1 {
            let v = (y as f64 + 0.5 - dest.y) * sy - 0.5;
            for x in span.x0..span.x1 {
                let u = (x as f64 + 0.5 - dest.x) * sx - 0.5;
                let color = sample_bilinear(source, u, v, EdgeMode::Clamp);
                blend_over(self.image.get_pixel_mut(x, y), color, 1.0);
            }
        }
    }

    /// Blend one pixel with partial coverage, respecting the clip.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub(crate) fn blend_pixel(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        if let Some(clip) = self.clip {
            if !clip.contains(x as f64 + 0.5, y as f64 + 0.5) {
                return;
            }
        }
        blend_over(self.image.get_pixel_mut(x as u32, y as u32), color, coverage);
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Scope guard for a clip region set by [`Canvas::clip_to`].
///
/// Dropping the guard restores the clip that was active before.
pub struct ClipGuard<'a> {
    canvas: &'a mut Canvas,
    saved: Option<Rect>,
}

impl Deref for ClipGuard<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for ClipGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for ClipGuard<'_> {
    fn drop(&mut self) {
        self.canvas.clip = self.saved;
    }
}
