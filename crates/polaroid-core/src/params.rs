//! Frame parameters and the ingestion boundary that sanitizes them.
//!
//! [`FrameParameters`] is a plain value snapshot handed to the compositor and
//! export transform on every call. Values coming from the UI (slider strings,
//! a JSON parameter file) enter through [`ParameterUpdate`] or
//! [`FrameParameters::sanitized`], which clamp everything into ranges the
//! rendering code can assume without further checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted side border, in pixels.
pub const MAX_BORDER_WIDTH: u32 = 500;
/// Largest accepted bottom (caption) band, in pixels.
pub const MAX_BOTTOM_BORDER: u32 = 1000;
/// Rotation is clamped to one full turn either way.
pub const MAX_ROTATION_DEGREES: i32 = 360;
/// Largest accepted shadow blur radius, in pixels.
pub const MAX_SHADOW_BLUR: u32 = 200;
/// Smallest accepted image scale factor.
pub const MIN_IMAGE_SCALE: f64 = 0.01;
/// Largest accepted image scale factor.
pub const MAX_IMAGE_SCALE: f64 = 10.0;
/// Smallest accepted caption size, in pixels.
pub const MIN_CAPTION_SIZE: u32 = 1;
/// Largest accepted caption size, in pixels.
pub const MAX_CAPTION_SIZE: u32 = 512;

/// Font stack used when the caption font is reset.
pub const DEFAULT_CAPTION_FONT: &str = "'Inter', system-ui, sans-serif";

/// Errors raised while ingesting parameter values.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    /// The color is not a `#rgb` or `#rrggbb` hex string.
    #[error("Invalid color: {0:?} (expected #rrggbb)")]
    InvalidColor(String),

    /// No parameter has this name.
    #[error("Unknown parameter: {0}")]
    UnknownField(String),

    /// A numeric parameter received text that is not a number.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex color (`#rrggbb` or `#rgb`, leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ParamError> {
        let invalid = || ParamError::InvalidColor(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Fully opaque RGBA pixel of this color.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Everything the compositor and export transform need besides the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameParameters {
    /// Frame (border) color
    pub frame_color: Rgb,
    /// Left, right and top border in pixels
    pub border_width: u32,
    /// Bottom band in pixels; holds the caption
    pub bottom_border: u32,
    /// Export rotation; positive is clockwise
    pub rotation_degrees: i32,
    /// Drop shadow blur radius in pixels
    pub shadow_blur: u32,
    /// Drop shadow opacity (0.0 to 1.0)
    pub shadow_opacity: f32,
    /// Image scale relative to the fitted size
    pub image_scale: f64,
    /// Caption text; whitespace-only captions are not drawn
    pub caption: String,
    /// Caption font size in pixels
    pub caption_size_px: u32,
    /// CSS-style font family list
    pub caption_font: String,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            frame_color: Rgb::WHITE,
            border_width: 20,
            bottom_border: 60,
            rotation_degrees: 0,
            shadow_blur: 20,
            shadow_opacity: 0.3,
            image_scale: 1.0,
            caption: String::new(),
            caption_size_px: 16,
            caption_font: DEFAULT_CAPTION_FONT.to_string(),
        }
    }
}

impl FrameParameters {
    /// Create parameters with the reset defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Clamp every field into its accepted range.
    ///
    /// Non-finite floats fall back to the default value for that field.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.border_width = self.border_width.min(MAX_BORDER_WIDTH);
        self.bottom_border = self.bottom_border.min(MAX_BOTTOM_BORDER);
        self.rotation_degrees = self
            .rotation_degrees
            .clamp(-MAX_ROTATION_DEGREES, MAX_ROTATION_DEGREES);
        self.shadow_blur = self.shadow_blur.min(MAX_SHADOW_BLUR);
        self.shadow_opacity = if self.shadow_opacity.is_finite() {
            self.shadow_opacity.clamp(0.0, 1.0)
        } else {
            defaults.shadow_opacity
        };
        self.image_scale = if self.image_scale.is_finite() {
            self.image_scale.clamp(MIN_IMAGE_SCALE, MAX_IMAGE_SCALE)
        } else {
            defaults.image_scale
        };
        self.caption_size_px = self.caption_size_px.clamp(MIN_CAPTION_SIZE, MAX_CAPTION_SIZE);
        self
    }

    /// Apply a single field update, clamping its value.
    ///
    /// Returns `true` if the stored value changed. Non-finite numbers are
    /// ignored and leave the field as it was.
    pub fn apply_update(&mut self, update: ParameterUpdate) -> Result<bool, ParamError> {
        let before = self.clone();

        match update {
            ParameterUpdate::FrameColor(hex) => self.frame_color = Rgb::from_hex(&hex)?,
            ParameterUpdate::BorderWidth(v) => {
                if let Some(px) = clamp_px(v, 0, MAX_BORDER_WIDTH) {
                    self.border_width = px;
                }
            }
            ParameterUpdate::BottomBorder(v) => {
                if let Some(px) = clamp_px(v, 0, MAX_BOTTOM_BORDER) {
                    self.bottom_border = px;
                }
            }
            ParameterUpdate::Rotation(v) => {
                if v.is_finite() {
                    let max = MAX_ROTATION_DEGREES as f64;
                    self.rotation_degrees = v.round().clamp(-max, max) as i32;
                }
            }
            ParameterUpdate::ShadowBlur(v) => {
                if let Some(px) = clamp_px(v, 0, MAX_SHADOW_BLUR) {
                    self.shadow_blur = px;
                }
            }
            ParameterUpdate::ShadowOpacity(v) => {
                if v.is_finite() {
                    self.shadow_opacity = v.clamp(0.0, 1.0) as f32;
                }
            }
            ParameterUpdate::ImageScale(v) => {
                if v.is_finite() {
                    self.image_scale = v.clamp(MIN_IMAGE_SCALE, MAX_IMAGE_SCALE);
                }
            }
            ParameterUpdate::Caption(text) => self.caption = text,
            ParameterUpdate::CaptionSize(v) => {
                if let Some(px) = clamp_px(v, MIN_CAPTION_SIZE, MAX_CAPTION_SIZE) {
                    self.caption_size_px = px;
                }
            }
            ParameterUpdate::CaptionFont(font) => self.caption_font = font,
        }

        Ok(*self != before)
    }

    /// True when the caption has visible text.
    pub fn has_caption(&self) -> bool {
        !self.caption.trim().is_empty()
    }
}

/// Round and clamp a pixel value; `None` for NaN and infinities.
fn clamp_px(value: f64, min: u32, max: u32) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(min as f64, max as f64) as u32)
}

/// A single-field parameter change, as produced by one UI control.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterUpdate {
    FrameColor(String),
    BorderWidth(f64),
    BottomBorder(f64),
    Rotation(f64),
    ShadowBlur(f64),
    ShadowOpacity(f64),
    ImageScale(f64),
    Caption(String),
    CaptionSize(f64),
    CaptionFont(String),
}

impl ParameterUpdate {
    /// Build an update from a control name and its raw string value.
    ///
    /// Control names are the camelCase field names (`borderWidth`,
    /// `shadowOpacity`, ...), matching the serialized form of
    /// [`FrameParameters`]. `captionSizePx` and `rotationDegrees` are accepted
    /// alongside the shorter `captionSize` and `rotation`.
    pub fn parse(field: &str, value: &str) -> Result<Self, ParamError> {
        let number = |name: &'static str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| ParamError::InvalidNumber {
                    field: name,
                    value: value.to_string(),
                })
        };

        Ok(match field {
            "frameColor" => Self::FrameColor(value.to_string()),
            "borderWidth" => Self::BorderWidth(number("borderWidth")?),
            "bottomBorder" => Self::BottomBorder(number("bottomBorder")?),
            "rotation" | "rotationDegrees" => Self::Rotation(number("rotation")?),
            "shadowBlur" => Self::ShadowBlur(number("shadowBlur")?),
            "shadowOpacity" => Self::ShadowOpacity(number("shadowOpacity")?),
            "imageScale" => Self::ImageScale(number("imageScale")?),
            "caption" => Self::Caption(value.to_string()),
            "captionSize" | "captionSizePx" => Self::CaptionSize(number("captionSize")?),
            "captionFont" => Self::CaptionFont(value.to_string()),
            other => return Err(ParamError::UnknownField(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reset_values() {
        let p = FrameParameters::new();
        assert_eq!(p.frame_color, Rgb::WHITE);
        assert_eq!(p.border_width, 20);
        assert_eq!(p.bottom_border, 60);
        assert_eq!(p.rotation_degrees, 0);
        assert_eq!(p.shadow_blur, 20);
        assert!((p.shadow_opacity - 0.3).abs() < f32::EPSILON);
        assert!((p.image_scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(p.caption, "");
        assert_eq!(p.caption_size_px, 16);
        assert_eq!(p.caption_font, DEFAULT_CAPTION_FONT);
        assert!(p.is_default());
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#ffffff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("#1A2b3c").unwrap(), Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(Rgb::from_hex("333").unwrap(), Rgb::new(0x33, 0x33, 0x33));
    }

    #[test]
    fn test_rgb_from_hex_rejects_garbage() {
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_rgb_hex_display() {
        assert_eq!(Rgb::new(0, 128, 255).to_string(), "#0080ff");
    }

    #[test]
    fn test_update_reports_change() {
        let mut p = FrameParameters::new();
        assert!(p.apply_update(ParameterUpdate::BorderWidth(30.0)).unwrap());
        assert_eq!(p.border_width, 30);
        assert!(!p.apply_update(ParameterUpdate::BorderWidth(30.0)).unwrap());
    }

    #[test]
    fn test_update_clamps_negative_and_oversized() {
        let mut p = FrameParameters::new();
        p.apply_update(ParameterUpdate::BorderWidth(-5.0)).unwrap();
        assert_eq!(p.border_width, 0);

        p.apply_update(ParameterUpdate::BottomBorder(1e9)).unwrap();
        assert_eq!(p.bottom_border, MAX_BOTTOM_BORDER);

        p.apply_update(ParameterUpdate::ShadowOpacity(1.7)).unwrap();
        assert!((p.shadow_opacity - 1.0).abs() < f32::EPSILON);

        p.apply_update(ParameterUpdate::ImageScale(0.0)).unwrap();
        assert!((p.image_scale - MIN_IMAGE_SCALE).abs() < f64::EPSILON);

        p.apply_update(ParameterUpdate::ImageScale(-3.0)).unwrap();
        assert!(p.image_scale > 0.0);

        p.apply_update(ParameterUpdate::CaptionSize(0.0)).unwrap();
        assert_eq!(p.caption_size_px, MIN_CAPTION_SIZE);

        p.apply_update(ParameterUpdate::Rotation(-720.0)).unwrap();
        assert_eq!(p.rotation_degrees, -MAX_ROTATION_DEGREES);
    }

    #[test]
    fn test_update_ignores_non_finite() {
        let mut p = FrameParameters::new();
        assert!(!p.apply_update(ParameterUpdate::ImageScale(f64::NAN)).unwrap());
        assert!(!p.apply_update(ParameterUpdate::BorderWidth(f64::INFINITY)).unwrap());
        assert!(p.is_default());
    }

    #[test]
    fn test_bad_color_leaves_value() {
        let mut p = FrameParameters::new();
        let err = p
            .apply_update(ParameterUpdate::FrameColor("red".into()))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidColor(_)));
        assert_eq!(p.frame_color, Rgb::WHITE);
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            ParameterUpdate::parse("borderWidth", "35").unwrap(),
            ParameterUpdate::BorderWidth(35.0)
        );
        assert_eq!(
            ParameterUpdate::parse("shadowOpacity", " 0.5 ").unwrap(),
            ParameterUpdate::ShadowOpacity(0.5)
        );
        assert_eq!(
            ParameterUpdate::parse("caption", "  hi ").unwrap(),
            ParameterUpdate::Caption("  hi ".into())
        );
        assert!(matches!(
            ParameterUpdate::parse("imageScale", "big"),
            Err(ParamError::InvalidNumber { .. })
        ));
        assert!(matches!(
            ParameterUpdate::parse("sepia", "1"),
            Err(ParamError::UnknownField(_))
        ));
    }

    #[test]
    fn test_sanitized_clamps_snapshot() {
        let p = FrameParameters {
            border_width: 9000,
            shadow_opacity: f32::NAN,
            image_scale: -1.0,
            caption_size_px: 0,
            rotation_degrees: 1000,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(p.border_width, MAX_BORDER_WIDTH);
        assert!((p.shadow_opacity - 0.3).abs() < f32::EPSILON);
        assert!((p.image_scale - MIN_IMAGE_SCALE).abs() < f64::EPSILON);
        assert_eq!(p.caption_size_px, MIN_CAPTION_SIZE);
        assert_eq!(p.rotation_degrees, MAX_ROTATION_DEGREES);
    }

    #[test]
    fn test_has_caption() {
        let mut p = FrameParameters::new();
        assert!(!p.has_caption());
        p.caption = " \t\n".into();
        assert!(!p.has_caption());
        p.caption = " summer ".into();
        assert!(p.has_caption());
    }

    #[test]
    fn test_json_round_trip_uses_hex_color() {
        let mut p = FrameParameters::new();
        p.frame_color = Rgb::new(0x12, 0x34, 0x56);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"frameColor\":\"#123456\""));

        let back: FrameParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let p: FrameParameters =
            serde_json::from_str(r##"{"borderWidth": 40, "caption": "Lisbon"}"##).unwrap();
        assert_eq!(p.border_width, 40);
        assert_eq!(p.caption, "Lisbon");
        assert_eq!(p.bottom_border, 60);
    }
}
