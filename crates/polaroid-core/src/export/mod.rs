//! The export transform: rotation, drop shadow and padding.
//!
//! The composed surface is drawn rotated about the center of a larger,
//! fully transparent canvas. The canvas is the rotated bounding box plus
//! [`EXPORT_PADDING`] on every side, which leaves room for the shadow.
//!
//! # Examples
//!
//! ```ignore
//! use polaroid_core::export::export_image;
//!
//! let exported = export_image(&surface, 5, 20, 0.3);
//! let file = exported.encode(1_700_000_000_000)?;
//! assert_eq!(file.file_name, "polaroid-1700000000000.png");
//! ```

mod bounds;
mod rotate;
mod shadow;

pub use bounds::compute_rotated_bounds;

use image::RgbaImage;

use crate::compose::ComposedSurface;
use crate::encode::{encode_png_image, EncodeError};

/// Transparent margin added around the rotated surface on every side.
pub const EXPORT_PADDING: u32 = 100;

/// A rotated, shadowed and padded composite, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    image: RgbaImage,
}

impl ExportedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode to PNG and name the file after `epoch_millis`.
    pub fn encode(&self, epoch_millis: u64) -> Result<ExportedFile, EncodeError> {
        Ok(ExportedFile {
            file_name: export_filename(epoch_millis),
            bytes: encode_png_image(&self.image)?,
        })
    }
}

/// An encoded export and the name to save it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Download name for an export taken at `epoch_millis`.
pub fn export_filename(epoch_millis: u64) -> String {
    format!("polaroid-{epoch_millis}.png")
}

/// Rotate `surface` clockwise by `rotation_degrees`, put a drop shadow under
/// it and center the result on a padded transparent canvas.
///
/// The output is `(rotW + 2·EXPORT_PADDING) × (rotH + 2·EXPORT_PADDING)`,
/// where `rotW × rotH` is [`compute_rotated_bounds`] of the surface.
pub fn export_image(
    surface: &ComposedSurface,
    rotation_degrees: i32,
    shadow_blur: u32,
    shadow_opacity: f32,
) -> ExportedImage {
    let angle = rotation_degrees as f64;
    let (rot_w, rot_h) = compute_rotated_bounds(surface.width(), surface.height(), angle);
    let out_w = rot_w + 2 * EXPORT_PADDING;
    let out_h = rot_h + 2 * EXPORT_PADDING;

    let layer = rotate::rotate_onto_layer(surface.as_image(), angle, out_w, out_h);

    let image = if shadow_opacity > 0.0 {
        let mask = shadow::shadow_mask(&layer, shadow_blur, shadow_opacity);
        shadow::apply_shadow(&layer, &mask)
    } else {
        layer
    };

    ExportedImage { image }
}
