//! Rotation of the composed surface onto a larger transparent layer.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel we compute where it came from in
//! the source and sample there. With the output center at `(cx, cy)` and a
//! clockwise rotation by θ (y axis pointing down):
//!
//! ```text
//! src_x =  (dst_x - cx) * cos θ + (dst_y - cy) * sin θ + src_cx
//! src_y = -(dst_x - cx) * sin θ + (dst_y - cy) * cos θ + src_cy
//! ```
//!
//! Everything outside the source is transparent, so the rotated edges come
//! out antialiased against the padding.

use image::{Rgba, RgbaImage};

use crate::sample::{sample_bilinear, EdgeMode};

/// `(sin θ, cos θ)` with quarter turns snapped to exact values.
fn sin_cos(angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    if angle_degrees % 90.0 == 0.0 {
        (sin.round(), cos.round())
    } else {
        (sin, cos)
    }
}

/// Draw `source` rotated clockwise by `angle_degrees` about the center of a
/// new `out_width × out_height` transparent layer.
pub(crate) fn rotate_onto_layer(
    source: &RgbaImage,
    angle_degrees: f64,
    out_width: u32,
    out_height: u32,
) -> RgbaImage {
    let mut layer = RgbaImage::new(out_width, out_height);

    let (sin, cos) = sin_cos(angle_degrees);
    let (src_cx, src_cy) = (source.width() as f64 / 2.0, source.height() as f64 / 2.0);
    let (dst_cx, dst_cy) = (out_width as f64 / 2.0, out_height as f64 / 2.0);

    for (x, y, pixel) in layer.enumerate_pixels_mut() {
        // Work with pixel centers, then shift back to pixel-index space
        let dx = x as f64 + 0.5 - dst_cx;
        let dy = y as f64 + 0.5 - dst_cy;

        let src_x = dx * cos + dy * sin + src_cx - 0.5;
        let src_y = -dx * sin + dy * cos + src_cy - 0.5;

        let c = sample_bilinear(source, src_x, src_y, EdgeMode::Transparent);
        if c[3] > 0.0 {
            *pixel = Rgba([
                c[0].round() as u8,
                c[1].round() as u8,
                c[2].round() as u8,
                c[3].round() as u8,
            ]);
        }
    }

    layer
}
