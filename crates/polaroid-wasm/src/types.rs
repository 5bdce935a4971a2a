//! WASM-compatible wrapper types for rendered output.
//!
//! Pixel buffers and file bytes stay in WASM memory until JavaScript asks
//! for them; each accessor hands over a copy as a `Uint8Array`.

use polaroid_core::{ComposedSurface, ExportedFile};
use wasm_bindgen::prelude::*;

/// A rendered frame, ready to be put on a canvas.
#[wasm_bindgen]
pub struct JsComposedSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsComposedSurface {
    /// Get the surface width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the surface height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array, suitable for `new ImageData(...)`.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsComposedSurface {
    pub(crate) fn from_surface(surface: ComposedSurface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            pixels: surface.into_image().into_raw(),
        }
    }

    pub(crate) fn pixel_slice(&self) -> &[u8] {
        &self.pixels
    }
}

/// An encoded export and its download name.
#[wasm_bindgen]
pub struct JsExportedFile {
    file_name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsExportedFile {
    /// Suggested file name, `polaroid-<epoch-ms>.png`
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        "image/png".to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the PNG bytes as Uint8Array.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl JsExportedFile {
    pub(crate) fn from_file(file: ExportedFile) -> Self {
        Self {
            file_name: file.file_name,
            bytes: file.bytes,
        }
    }

    pub(crate) fn byte_slice(&self) -> &[u8] {
        &self.bytes
    }
}
