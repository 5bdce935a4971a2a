//! Browser glue: canvas drawing, pointer events and file download.
//!
//! Everything here needs a DOM (`wasm32-unknown-unknown` in a browser). The
//! numeric methods on [`JsSession`] cover the same ground for hosts that
//! want to wire events themselves.

use polaroid_core::SurfaceBounds;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    BlobPropertyBag, CanvasRenderingContext2d, Element, HtmlAnchorElement, HtmlCanvasElement,
    ImageData, PointerEvent,
};

use crate::session::JsSession;
use crate::types::{JsComposedSurface, JsExportedFile};

/// Read an element's on-screen box. Called per event, never cached.
fn bounds_of(surface: &Element) -> SurfaceBounds {
    let rect = surface.get_bounding_client_rect();
    SurfaceBounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

#[wasm_bindgen]
impl JsSession {
    /// `pointerdown` handler for the surface canvas.
    ///
    /// Calls `preventDefault()` when a drag starts.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent, surface: &Element) -> bool {
        let b = bounds_of(surface);
        let consumed = self.pointer_down_at(
            event.client_x() as f64,
            event.client_y() as f64,
            b.left,
            b.top,
            b.width,
            b.height,
        );
        if consumed {
            event.prevent_default();
        }
        consumed
    }

    /// `pointermove` handler. Returns `true` when the frame should be drawn
    /// again.
    pub fn handle_pointer_move(&mut self, event: &PointerEvent, surface: &Element) -> bool {
        let b = bounds_of(surface);
        let moved = self.pointer_move_at(
            event.client_x() as f64,
            event.client_y() as f64,
            b.left,
            b.top,
            b.width,
            b.height,
        );
        if moved {
            event.prevent_default();
        }
        moved
    }

    /// Render and paint onto `canvas`, resizing it to the surface.
    ///
    /// Returns `false` if no photo is loaded yet.
    pub fn draw(&self, canvas: &HtmlCanvasElement) -> Result<bool, JsValue> {
        match self.render() {
            Some(surface) => {
                draw_surface(&surface, canvas)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Paint a rendered surface onto a canvas, resizing the canvas to fit.
#[wasm_bindgen]
pub fn draw_surface(
    surface: &JsComposedSurface,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    canvas.set_width(surface.width());
    canvas.set_height(surface.height());

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(surface.pixel_slice()),
        surface.width(),
        surface.height(),
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)
}

/// Save an export through a temporary `<a download>` link.
#[wasm_bindgen]
pub fn download_export(file: &JsExportedFile) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(file.byte_slice()));

    let opts = BlobPropertyBag::new();
    opts.set_type(&file.mime_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(&file.file_name());

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has started; cleanup failures are not worth reporting
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);

    Ok(())
}
