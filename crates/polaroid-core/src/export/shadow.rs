//! Soft drop shadow behind a rotated layer.

use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Build the shadow mask for `layer`.
///
/// The mask is the layer's alpha scaled by `opacity`, moved down by `blur`
/// pixels and softened with a Gaussian of σ = blur / 2. Pixels shifted past
/// the bottom edge are dropped.
pub(crate) fn shadow_mask(layer: &RgbaImage, blur: u32, opacity: f32) -> GrayImage {
    let (width, height) = layer.dimensions();
    let opacity = opacity.clamp(0.0, 1.0);

    let mask = GrayImage::from_fn(width, height, |x, y| match y.checked_sub(blur) {
        Some(src_y) => {
            let alpha = layer.get_pixel(x, src_y).0[3] as f32 * opacity;
            Luma([alpha.round() as u8])
        }
        None => Luma([0]),
    });

    // imageproc panics on sigma <= 0
    let sigma = blur as f32 / 2.0;
    if sigma > 0.0 {
        imageproc::filter::gaussian_blur_f32(&mask, sigma)
    } else {
        mask
    }
}

/// Put a black shadow with the given mask under `layer`.
///
/// The layer is composited source-over on top, so its own pixels are
/// unchanged wherever it is opaque.
pub(crate) fn apply_shadow(layer: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = RgbaImage::from_fn(layer.width(), layer.height(), |x, y| {
        Rgba([0, 0, 0, mask.get_pixel(x, y).0[0]])
    });

    for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
        let p = src.0;
        crate::sample::blend_over(
            dst,
            [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64],
            1.0,
        );
    }

    out
}
