//! Polaroid WASM - WebAssembly bindings for the polaroid framer
//!
//! This crate exposes polaroid-core to JavaScript/TypeScript pages.
//!
//! # Module Structure
//!
//! - `session` - `JsSession`: load a photo, change parameters, drag, export
//! - `types` - WASM-compatible wrappers for rendered surfaces and exports
//! - `dom` - Canvas drawing, pointer event handlers and download helper
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession, download_export } from '@polaroid/wasm';
//!
//! await init();
//!
//! const session = new JsSession();
//! session.register_font('Inter', new Uint8Array(await (await fetch(fontUrl)).arrayBuffer()));
//! if (session.load_image(file.type, new Uint8Array(await file.arrayBuffer()))) {
//!   session.draw(canvas);
//! }
//! canvas.addEventListener('pointerdown', (e) => session.handle_pointer_down(e, canvas));
//! canvas.addEventListener('pointermove', (e) => {
//!   if (session.handle_pointer_move(e, canvas)) session.draw(canvas);
//! });
//! window.addEventListener('pointerup', () => session.pointer_up());
//! window.addEventListener('pointercancel', () => session.pointer_up());
//!
//! const file = session.export();
//! if (file) download_export(file);
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod session;
mod types;

// Re-export public types
pub use dom::{download_export, draw_surface};
pub use session::JsSession;
pub use types::{JsComposedSurface, JsExportedFile};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check whether a picked file's media type will be accepted by
/// `JsSession::load_image`.
#[wasm_bindgen]
pub fn is_image_media_type(media_type: &str) -> bool {
    polaroid_core::is_image_media_type(media_type)
}
