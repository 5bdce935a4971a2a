//! Bilinear sampling and source-over blending on RGBA buffers.
//!
//! Both the compositor (scaling the photo into the frame) and the export
//! transform (rotating the composed surface) resample with inverse mapping:
//! for each destination pixel we compute a fractional source position and
//! interpolate the four nearest source pixels.
//!
//! Interpolation happens on premultiplied values so that transparent
//! neighbours do not darken the result.

use image::{Rgba, RgbaImage};

/// What to read for sample positions outside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeMode {
    /// Repeat the nearest edge pixel.
    Clamp,
    /// Treat everything outside the image as fully transparent.
    Transparent,
}

/// An RGBA color with channels in 0.0..=255.0 (straight alpha).
pub(crate) type Color = [f64; 4];

/// Fetch a premultiplied pixel, honouring the edge mode.
#[inline]
fn premultiplied(image: &RgbaImage, x: i64, y: i64, edge: EdgeMode) -> [f64; 4] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    let (px, py) = match edge {
        EdgeMode::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        EdgeMode::Transparent => {
            if x < 0 || x >= w || y < 0 || y >= h {
                return [0.0; 4];
            }
            (x, y)
        }
    };

    let p = image.get_pixel(px as u32, py as u32).0;
    let a = p[3] as f64 / 255.0;
    [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, p[3] as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` are in pixel-index space: `(0.0, 0.0)` is the center of the
/// top-left pixel.
pub(crate) fn sample_bilinear(image: &RgbaImage, x: f64, y: f64, edge: EdgeMode) -> Color {
    if image.width() == 0 || image.height() == 0 {
        return [0.0; 4];
    }

    let x0 = x.floor();
    let y0 = y.floor();

    // Fractional distances
    let fx = x - x0;
    let fy = y - y0;

    let (x0, y0) = (x0 as i64, y0 as i64);
    let p00 = premultiplied(image, x0, y0, edge);
    let p10 = premultiplied(image, x0 + 1, y0, edge);
    let p01 = premultiplied(image, x0, y0 + 1, edge);
    let p11 = premultiplied(image, x0 + 1, y0 + 1, edge);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    // Back to straight alpha
    let alpha = acc[3];
    if alpha <= f64::EPSILON {
        return [0.0; 4];
    }
    let unpremul = 255.0 / alpha;
    [acc[0] * unpremul, acc[1] * unpremul, acc[2] * unpremul, alpha]
}

/// Composite `src` over `dst` (straight alpha, source-over).
///
/// `coverage` scales the source alpha; use it for antialiased glyph edges.
#[inline]
pub(crate) fn blend_over(dst: &mut Rgba<u8>, src: Color, coverage: f64) {
    let sa = (src[3] / 255.0 * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }

    let d = dst.0;
    let da = d[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] * sa + d[i] as f64 * da * (1.0 - sa)) / out_a;
        out[i] = c.clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;

    *dst = Rgba(out);
}
