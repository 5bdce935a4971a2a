//! Editing session: the loaded photo, its parameters and the drag state.
//!
//! Front-ends translate user input into [`Command`]s and act on the returned
//! [`Effect`]: draw again, consume the pointer event, or save a file.
//!
//! # Examples
//!
//! ```ignore
//! use polaroid_core::session::{Command, Effect, Session};
//!
//! let mut session = Session::new();
//! session.apply(Command::UploadImage { media_type: "image/png".into(), bytes })?;
//! if let Effect::Exported(file) = session.apply(Command::Export { epoch_millis: now })? {
//!     std::fs::write(&file.file_name, &file.bytes)?;
//! }
//! ```

use thiserror::Error;

use crate::compose::{self, ComposedSurface, FontBook};
use crate::decode::{decode_image, is_image_media_type, DecodeError, ImageAsset};
use crate::drag::{DragController, PointerEvent};
use crate::encode::EncodeError;
use crate::export::{export_image, ExportedFile, ExportedImage};
use crate::geometry::PanOffset;
use crate::params::{FrameParameters, ParamError, ParameterUpdate};

/// Errors returned by [`Session::apply`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A file was picked. `media_type` is the type the browser or file
    /// extension reported.
    UploadImage { media_type: String, bytes: Vec<u8> },
    UpdateParameter(ParameterUpdate),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    /// Pointer released or cancelled.
    PointerUp,
    Reset,
    Export { epoch_millis: u64 },
}

/// What the front-end should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// A pointer event started a drag; suppress the default action.
    Consumed,
    /// Visible state changed; render again.
    Render,
    /// Save this file.
    Exported(ExportedFile),
}

impl Effect {
    /// Whether a pointer event should have its default action suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Effect::Consumed | Effect::Render)
    }

    pub fn needs_render(&self) -> bool {
        matches!(self, Effect::Render)
    }
}

/// One editing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    asset: Option<ImageAsset>,
    params: FrameParameters,
    pan: PanOffset,
    drag: DragController,
    fonts: FontBook,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with caption fonts already registered.
    pub fn with_fonts(fonts: FontBook) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn asset(&self) -> Option<&ImageAsset> {
        self.asset.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.asset.is_some()
    }

    pub fn params(&self) -> &FrameParameters {
        &self.params
    }

    /// Replace all parameters at once. Values are clamped first.
    ///
    /// Returns `true` if an image is loaded and something changed.
    pub fn set_params(&mut self, params: FrameParameters) -> bool {
        let params = params.sanitized();
        let changed = params != self.params;
        self.params = params;
        changed && self.has_image()
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Apply a command and report what the front-end should do next.
    pub fn apply(&mut self, command: Command) -> Result<Effect, SessionError> {
        match command {
            Command::UploadImage { media_type, bytes } => self.upload(&media_type, &bytes),
            Command::UpdateParameter(update) => {
                let changed = self.params.apply_update(update)?;
                Ok(self.render_if(changed))
            }
            Command::PointerDown(event) => {
                if !self.has_image() {
                    return Ok(Effect::None);
                }
                let response = self.drag.pointer_down(&event);
                Ok(if response.prevent_default {
                    Effect::Consumed
                } else {
                    Effect::None
                })
            }
            Command::PointerMove(event) => {
                let response = self.drag.pointer_move(&event, &mut self.pan);
                Ok(self.render_if(response.rerender))
            }
            Command::PointerUp => {
                self.drag.pointer_up();
                Ok(Effect::None)
            }
            Command::Reset => {
                self.reset();
                Ok(self.render_if(true))
            }
            Command::Export { epoch_millis } => match self.export_image() {
                Some(image) => {
                    let file = image.encode(epoch_millis)?;
                    tracing::info!(
                        file_name = %file.file_name,
                        width = image.width(),
                        height = image.height(),
                        bytes = file.bytes.len(),
                        "exported"
                    );
                    Ok(Effect::Exported(file))
                }
                None => {
                    tracing::debug!("export ignored, no image loaded");
                    Ok(Effect::None)
                }
            },
        }
    }

    /// Render the current state; `None` until an image is loaded.
    pub fn render(&self) -> Option<ComposedSurface> {
        let asset = self.asset.as_ref()?;
        Some(compose::render(asset, &self.params, self.pan, &self.fonts))
    }

    /// Build the rotated, shadowed export without encoding it.
    pub fn export_image(&self) -> Option<ExportedImage> {
        let surface = self.render()?;
        Some(export_image(
            &surface,
            self.params.rotation_degrees,
            self.params.shadow_blur,
            self.params.shadow_opacity,
        ))
    }

    /// Restore default parameters and re-center the photo. The photo itself
    /// stays loaded.
    pub fn reset(&mut self) {
        self.params = FrameParameters::default();
        self.pan = PanOffset::ORIGIN;
        self.drag.reset();
    }

    fn upload(&mut self, media_type: &str, bytes: &[u8]) -> Result<Effect, SessionError> {
        if !is_image_media_type(media_type) {
            tracing::debug!(media_type, "ignoring upload, not an image");
            return Ok(Effect::None);
        }

        let asset = decode_image(bytes)?;
        tracing::info!(
            media_type,
            width = asset.width(),
            height = asset.height(),
            "image loaded"
        );

        self.asset = Some(asset);
        self.pan = PanOffset::ORIGIN;
        self.drag.reset();
        Ok(Effect::Render)
    }

    fn render_if(&self, changed: bool) -> Effect {
        if changed && self.has_image() {
            Effect::Render
        } else {
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::SurfaceBounds;
    use crate::encode::encode_png_image;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png_image(&RgbaImage::from_pixel(width, height, Rgba([40, 80, 120, 255]))).unwrap()
    }

    fn upload(session: &mut Session, width: u32, height: u32) -> Result<Effect, SessionError> {
        session.apply(Command::UploadImage {
            media_type: "image/png".into(),
            bytes: png(width, height),
        })
    }

    fn bounds() -> SurfaceBounds {
        SurfaceBounds::new(0.0, 0.0, 540.0, 580.0)
    }

    #[test]
    fn test_no_image_renders_nothing() {
        let session = Session::new();
        assert!(session.render().is_none());
        assert!(session.export_image().is_none());
    }

    #[test]
    fn test_upload_replaces_asset_and_requests_render() {
        let mut session = Session::new();
        assert_eq!(upload(&mut session, 30, 20).unwrap(), Effect::Render);
        assert_eq!(session.asset().map(|a| (a.width(), a.height())), Some((30, 20)));

        let surface = session.render().unwrap();
        assert_eq!((surface.width(), surface.height()), (540, 580));
    }

    #[test]
    fn test_non_image_upload_is_ignored() {
        let mut session = Session::new();
        upload(&mut session, 10, 10).unwrap();

        let effect = session
            .apply(Command::UploadImage {
                media_type: "text/plain".into(),
                bytes: b"hello".to_vec(),
            })
            .unwrap();

        assert_eq!(effect, Effect::None);
        assert_eq!(session.asset().map(|a| a.width()), Some(10));
    }

    #[test]
    fn test_decode_failure_keeps_previous_image() {
        let mut session = Session::new();
        upload(&mut session, 12, 8).unwrap();

        let result = session.apply(Command::UploadImage {
            media_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0x00, 0x01],
        });

        assert!(matches!(result, Err(SessionError::Decode(_))));
        assert_eq!(session.asset().map(|a| (a.width(), a.height())), Some((12, 8)));
    }

    #[test]
    fn test_upload_resets_pan() {
        let mut session = Session::new();
        upload(&mut session, 10, 10).unwrap();

        session
            .apply(Command::PointerDown(PointerEvent::new(100.0, 100.0, bounds())))
            .unwrap();
        session
            .apply(Command::PointerMove(PointerEvent::new(150.0, 90.0, bounds())))
            .unwrap();
        assert_eq!(session.pan(), PanOffset::new(50.0, -10.0));

        upload(&mut session, 10, 10).unwrap();
        assert!(session.pan().is_origin());
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_parameter_update_effects() {
        let mut session = Session::new();
        let update = || Command::UpdateParameter(ParameterUpdate::BorderWidth(40.0));

        // No image: state changes but nothing to draw
        assert_eq!(session.apply(update()).unwrap(), Effect::None);
        assert_eq!(session.params().border_width, 40);

        upload(&mut session, 10, 10).unwrap();
        let again = Command::UpdateParameter(ParameterUpdate::BorderWidth(40.0));
        assert_eq!(session.apply(again).unwrap(), Effect::None);

        let changed = Command::UpdateParameter(ParameterUpdate::BorderWidth(41.0));
        assert_eq!(session.apply(changed).unwrap(), Effect::Render);
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let mut session = Session::new();
        let result = session.apply(Command::UpdateParameter(ParameterUpdate::FrameColor(
            "teal".into(),
        )));
        assert!(matches!(result, Err(SessionError::Param(_))));
        assert_eq!(session.params().frame_color.to_hex(), "#ffffff");
    }

    #[test]
    fn test_pointer_without_image_is_ignored() {
        let mut session = Session::new();
        let effect = session
            .apply(Command::PointerDown(PointerEvent::new(10.0, 10.0, bounds())))
            .unwrap();
        assert_eq!(effect, Effect::None);
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_drag_effects() {
        let mut session = Session::new();
        upload(&mut session, 10, 10).unwrap();

        let down = session
            .apply(Command::PointerDown(PointerEvent::new(10.0, 10.0, bounds())))
            .unwrap();
        assert_eq!(down, Effect::Consumed);
        assert!(down.prevents_default());

        let moved = session
            .apply(Command::PointerMove(PointerEvent::new(20.0, 30.0, bounds())))
            .unwrap();
        assert_eq!(moved, Effect::Render);

        assert_eq!(session.apply(Command::PointerUp).unwrap(), Effect::None);
        let idle = session
            .apply(Command::PointerMove(PointerEvent::new(90.0, 90.0, bounds())))
            .unwrap();
        assert_eq!(idle, Effect::None);
        assert!(!idle.prevents_default());
        assert_eq!(session.pan(), PanOffset::new(10.0, 20.0));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = Session::new();
        upload(&mut session, 10, 10).unwrap();
        session
            .apply(Command::UpdateParameter(ParameterUpdate::Rotation(12.0)))
            .unwrap();
        session
            .apply(Command::UpdateParameter(ParameterUpdate::Caption("hi".into())))
            .unwrap();

        assert_eq!(session.apply(Command::Reset).unwrap(), Effect::Render);
        let once = (session.params().clone(), session.pan());
        session.apply(Command::Reset).unwrap();
        let twice = (session.params().clone(), session.pan());

        assert_eq!(once, twice);
        assert!(session.params().is_default());
        assert!(session.has_image());

        let first = session.render().unwrap();
        session.apply(Command::Reset).unwrap();
        let second = session.render().unwrap();
        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn test_non_finite_drag_keeps_surface_opaque() {
        let mut session = Session::new();
        upload(&mut session, 10, 10).unwrap();

        session
            .apply(Command::PointerDown(PointerEvent::new(100.0, 100.0, bounds())))
            .unwrap();
        let effect = session
            .apply(Command::PointerMove(PointerEvent::new(f64::NAN, 100.0, bounds())))
            .unwrap();

        assert_eq!(effect, Effect::None);
        assert!(session.pan().is_origin());
        let surface = session.render().unwrap();
        assert!(surface.as_image().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_reset_without_image() {
        let mut session = Session::new();
        assert_eq!(session.apply(Command::Reset).unwrap(), Effect::None);
    }

    #[test]
    fn test_export_without_image() {
        let mut session = Session::new();
        let effect = session.apply(Command::Export { epoch_millis: 1 }).unwrap();
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_export_produces_png() {
        let mut session = Session::new();
        upload(&mut session, 16, 9).unwrap();
        session
            .apply(Command::UpdateParameter(ParameterUpdate::Rotation(90.0)))
            .unwrap();

        let Effect::Exported(file) = session.apply(Command::Export { epoch_millis: 42 }).unwrap()
        else {
            panic!("expected an export");
        };
        assert_eq!(file.file_name, "polaroid-42.png");

        let decoded = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (780, 740));
    }

    #[test]
    fn test_set_params_sanitizes() {
        let mut session = Session::new();
        let params = FrameParameters {
            border_width: 10_000,
            image_scale: f64::NAN,
            ..Default::default()
        };
        assert!(!session.set_params(params));
        assert_eq!(session.params().border_width, 500);
        assert!((session.params().image_scale - 1.0).abs() < f64::EPSILON);
    }
}
