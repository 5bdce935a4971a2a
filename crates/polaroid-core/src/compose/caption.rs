//! Caption fonts and text rasterization.
//!
//! The core never touches the file system, so font data is handed in by the
//! front-end and kept in a [`FontBook`]. The caption font is a CSS
//! family list such as `'Inter', system-ui, sans-serif`; the first registered
//! family in the list wins, and the first registered font is the fallback.

use std::fmt;

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use thiserror::Error;

use super::canvas::Canvas;

/// Caption fill color (#333333).
pub const CAPTION_COLOR: [f64; 4] = [51.0, 51.0, 51.0, 255.0];

/// Errors raised while registering fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// The bytes are not a TrueType/OpenType font.
    #[error("Invalid font data for family {0:?}")]
    InvalidFont(String),
}

/// Registered caption fonts, keyed by lowercase family name.
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: Vec<(String, FontArc)>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.families()).finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font data under a family name.
    ///
    /// Registering the same family again replaces the earlier font.
    pub fn register(&mut self, family: &str, data: Vec<u8>) -> Result<(), FontError> {
        let font =
            FontArc::try_from_vec(data).map_err(|_| FontError::InvalidFont(family.to_string()))?;
        let key = normalize_family(family);

        match self.fonts.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = font,
            None => self.fonts.push((key, font)),
        }
        Ok(())
    }

    /// Pick the font for a CSS family list.
    pub fn resolve(&self, families: &str) -> Option<&FontArc> {
        families
            .split(',')
            .map(normalize_family)
            .find_map(|wanted| {
                self.fonts
                    .iter()
                    .find(|(name, _)| *name == wanted)
                    .map(|(_, font)| font)
            })
            .or_else(|| self.fonts.first().map(|(_, font)| font))
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_lowercase()
}

/// Lay out one line of text starting at x = 0.
///
/// Returns glyph ids with their x positions, and the total advance width.
fn layout_line(font: &FontArc, text: &str, size_px: f32) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(size_px);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut last: Option<GlyphId> = None;

    for ch in text.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push((id, cursor_x));
        cursor_x += scaled.h_advance(id);
        last = Some(id);
    }

    (glyphs, cursor_x)
}

/// Draw a single line of text centered on `(center_x, middle_y)`.
///
/// Horizontal alignment is centered; vertically the line's ascent/descent box
/// is centered on `middle_y`.
pub(crate) fn draw_caption(
    canvas: &mut Canvas,
    font: &FontArc,
    text: &str,
    size_px: f32,
    center_x: f64,
    middle_y: f64,
) {
    let scaled = font.as_scaled(size_px);
    let (glyphs, width) = layout_line(font, text, size_px);

    let origin_x = center_x as f32 - width / 2.0;
    let baseline = middle_y as f32 + (scaled.ascent() + scaled.descent()) / 2.0;

    for (id, x) in glyphs {
        let glyph = id.with_scale_and_position(size_px, point(origin_x + x, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|px, py, coverage| {
                canvas.blend_pixel(
                    left + px as i64,
                    top + py as i64,
                    CAPTION_COLOR,
                    coverage as f64,
                );
            });
        }
    }
}

/// Load a sans-serif TrueType font installed on the test machine.
#[cfg(test)]
pub(crate) fn system_font_bytes() -> Option<Vec<u8>> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    CANDIDATES.iter().find_map(|path| std::fs::read(path).ok())
}
