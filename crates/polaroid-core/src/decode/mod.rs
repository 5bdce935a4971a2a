//! Image decoding for uploaded photos.
//!
//! This module provides functionality for:
//! - Gating uploads on their declared media type
//! - Decoding common raster formats (PNG, JPEG, BMP, GIF, WebP)
//! - Applying EXIF orientation so photos appear upright
//!
//! Decoding is synchronous; the front-end is responsible for reading the
//! file asynchronously and handing over the bytes.
//!
//! # Examples
//!
//! ```ignore
//! use polaroid_core::decode::{decode_image, is_image_media_type};
//!
//! if is_image_media_type("image/jpeg") {
//!     let asset = decode_image(&bytes)?;
//!     println!("Decoded {}x{} image", asset.width(), asset.height());
//! }
//! ```

mod raster;
mod types;

pub use raster::{decode_image, is_image_media_type};
pub use types::{DecodeError, ImageAsset, Orientation};
