//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding RGBA images to PNG
//!
//! # Examples
//!
//! ```ignore
//! use polaroid_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, encode_png_image, EncodeError};
