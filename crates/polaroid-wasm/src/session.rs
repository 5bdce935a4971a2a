//! Editing session bindings.
//!
//! `JsSession` wraps the core [`Session`] and flattens its commands into
//! plain methods. Methods that change visible state return `true` when the
//! page should draw again.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsSession();
//! if (session.load_image(file.type, new Uint8Array(await file.arrayBuffer()))) {
//!   redraw(session.render());
//! }
//! if (session.update_parameter('borderWidth', input.value)) {
//!   redraw(session.render());
//! }
//! ```

use polaroid_core::drag::PointerEvent;
use polaroid_core::{Command, Effect, FrameParameters, ParameterUpdate, Session, SurfaceBounds};
use wasm_bindgen::prelude::*;

use crate::types::{JsComposedSurface, JsExportedFile};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One framing session: the loaded photo, its parameters and drag state.
#[wasm_bindgen]
pub struct JsSession {
    inner: Session,
}

impl Default for JsSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Session::new(),
        }
    }

    /// Register a caption font under a CSS family name.
    ///
    /// The first registered font is the fallback for families that are not
    /// registered.
    pub fn register_font(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner.fonts_mut().register(family, bytes).map_err(to_js)
    }

    /// Load a picked file.
    ///
    /// Returns `false` without touching the current photo when the media type
    /// is not an image. Throws if the bytes cannot be decoded; the previous
    /// photo stays loaded.
    pub fn load_image(&mut self, media_type: &str, bytes: Vec<u8>) -> Result<bool, JsValue> {
        let effect = self
            .inner
            .apply(Command::UploadImage {
                media_type: media_type.to_string(),
                bytes,
            })
            .map_err(to_js)?;
        Ok(effect.needs_render())
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// Apply one control change, e.g. `("shadowOpacity", "0.45")`.
    pub fn update_parameter(&mut self, field: &str, value: &str) -> Result<bool, JsValue> {
        let update = ParameterUpdate::parse(field, value).map_err(to_js)?;
        let effect = self
            .inner
            .apply(Command::UpdateParameter(update))
            .map_err(to_js)?;
        Ok(effect.needs_render())
    }

    /// All parameters as a plain object with camelCase keys.
    pub fn parameters(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.params()).map_err(to_js)
    }

    /// Replace all parameters from a (possibly partial) object. Missing keys
    /// take their default values.
    pub fn set_parameters(&mut self, value: JsValue) -> Result<bool, JsValue> {
        let params: FrameParameters = serde_wasm_bindgen::from_value(value).map_err(to_js)?;
        Ok(self.inner.set_params(params))
    }

    #[wasm_bindgen(getter)]
    pub fn frame_color(&self) -> String {
        self.inner.params().frame_color.to_hex()
    }

    #[wasm_bindgen(getter)]
    pub fn border_width(&self) -> u32 {
        self.inner.params().border_width
    }

    #[wasm_bindgen(getter)]
    pub fn bottom_border(&self) -> u32 {
        self.inner.params().bottom_border
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.inner.params().rotation_degrees
    }

    #[wasm_bindgen(getter)]
    pub fn shadow_blur(&self) -> u32 {
        self.inner.params().shadow_blur
    }

    #[wasm_bindgen(getter)]
    pub fn shadow_opacity(&self) -> f32 {
        self.inner.params().shadow_opacity
    }

    #[wasm_bindgen(getter)]
    pub fn image_scale(&self) -> f64 {
        self.inner.params().image_scale
    }

    #[wasm_bindgen(getter)]
    pub fn caption(&self) -> String {
        self.inner.params().caption.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.pan().dx
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.pan().dy
    }

    /// Pointer pressed at a client position over a surface with the given
    /// bounding box. Returns `true` if a drag started and the default action
    /// should be suppressed.
    pub fn pointer_down_at(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> bool {
        let event = PointerEvent::new(
            client_x,
            client_y,
            SurfaceBounds::new(left, top, width, height),
        );
        self.apply_infallible(Command::PointerDown(event)).prevents_default()
    }

    /// Pointer moved. Returns `true` if the pan changed; the default action
    /// should then be suppressed as well.
    pub fn pointer_move_at(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> bool {
        let event = PointerEvent::new(
            client_x,
            client_y,
            SurfaceBounds::new(left, top, width, height),
        );
        self.apply_infallible(Command::PointerMove(event)).needs_render()
    }

    /// Pointer released or cancelled.
    pub fn pointer_up(&mut self) {
        self.apply_infallible(Command::PointerUp);
    }

    /// Restore defaults and re-center the photo.
    pub fn reset(&mut self) -> bool {
        self.apply_infallible(Command::Reset).needs_render()
    }

    /// Render the current frame, or `undefined` before a photo is loaded.
    pub fn render(&self) -> Option<JsComposedSurface> {
        self.inner.render().map(JsComposedSurface::from_surface)
    }

    /// Export the rotated, shadowed PNG. `epoch_millis` names the file and
    /// defaults to `Date.now()`.
    pub fn export(&mut self, epoch_millis: Option<f64>) -> Result<Option<JsExportedFile>, JsValue> {
        let epoch_millis = epoch_millis.unwrap_or_else(js_sys::Date::now).max(0.0) as u64;
        match self
            .inner
            .apply(Command::Export { epoch_millis })
            .map_err(to_js)?
        {
            Effect::Exported(file) => Ok(Some(JsExportedFile::from_file(file))),
            _ => Ok(None),
        }
    }
}

impl JsSession {
    /// Apply a command that cannot fail.
    fn apply_infallible(&mut self, command: Command) -> Effect {
        self.inner.apply(command).unwrap_or(Effect::None)
    }
}
