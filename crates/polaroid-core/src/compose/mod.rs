//! The compositor: frame, clipped photo and caption on one surface.
//!
//! # Render Order
//!
//! 1. Fill the whole surface with the frame color
//! 2. Clip to the square content area and draw the fitted, panned photo
//! 3. Release the clip and draw the caption in the bottom band
//!
//! A render is a pure function of its inputs. Nothing is cached between
//! calls; every call allocates and fills a fresh surface.

mod canvas;
mod caption;

pub use canvas::{Canvas, ClipGuard};
pub use caption::{FontBook, FontError, CAPTION_COLOR};

#[cfg(test)]
pub(crate) use caption::system_font_bytes;

use image::RgbaImage;

use crate::decode::ImageAsset;
use crate::geometry::{content_rect, place_image, surface_size, PanOffset, Rect, CANVAS_SIZE};
use crate::params::FrameParameters;

/// The unrotated, unshadowed result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSurface {
    image: RgbaImage,
}

impl ComposedSurface {
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

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
}

/// Render the framed photo.
///
/// The surface is `(CANVAS_SIZE + 2·border) × (CANVAS_SIZE + border + bottom)`.
/// Parameters are expected to be sanitized already (see
/// [`FrameParameters::sanitized`]). Captions are drawn with the font that
/// `fonts` resolves for `params.caption_font`; with an empty font book the
/// caption is skipped.
pub fn render(
    asset: &ImageAsset,
    params: &FrameParameters,
    pan: PanOffset,
    fonts: &FontBook,
) -> ComposedSurface {
    let (width, height) = surface_size(params.border_width, params.bottom_border);
    let mut canvas = Canvas::new(width, height);

    canvas.fill(params.frame_color.to_rgba());

    let dest = place_image(
        asset.width(),
        asset.height(),
        params.border_width,
        params.image_scale,
        pan,
    );
    draw_photo(&mut canvas, asset, dest, content_rect(params.border_width));

    if params.has_caption() {
        match fonts.resolve(&params.caption_font) {
            Some(font) => {
                let middle_y = (CANVAS_SIZE + params.border_width) as f64
                    + params.bottom_border as f64 / 2.0;
                caption::draw_caption(
                    &mut canvas,
                    font,
                    &params.caption,
                    params.caption_size_px as f32,
                    width as f64 / 2.0,
                    middle_y,
                );
            }
            None => tracing::warn!(
                font = %params.caption_font,
                "no caption font registered, skipping caption"
            ),
        }
    }

    ComposedSurface {
        image: canvas.into_image(),
    }
}

/// Draw the photo clipped to the content area.
///
/// The clip guard is dropped on return, so nothing drawn afterwards is
/// clipped.
fn draw_photo(canvas: &mut Canvas, asset: &ImageAsset, dest: Rect, content: Rect) {
    let mut clipped = canvas.clip_to(content);
    clipped.draw_image(asset.as_image(), dest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;
    use image::Rgba;

    const PHOTO: Rgba<u8> = Rgba([10, 200, 30, 255]);

    fn asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset::from_rgba(RgbaImage::from_pixel(width, height, PHOTO)).unwrap()
    }

    fn gradient_asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 90, 255])
        }))
        .unwrap()
    }

    fn fonts() -> Option<FontBook> {
        let bytes = system_font_bytes()?;
        let mut book = FontBook::new();
        book.register("sans-serif", bytes).ok()?;
        Some(book)
    }

    /// Whether a pixel lies inside the content area.
    fn in_content(x: u32, y: u32, border: u32) -> bool {
        x >= border && x < border + CANVAS_SIZE && y >= border && y < border + CANVAS_SIZE
    }

    #[test]
    fn test_surface_dimensions() {
        let params = FrameParameters::default();
        let surface = render(&asset(10, 10), &params, PanOffset::ORIGIN, &FontBook::new());
        assert_eq!(surface.width(), 540);
        assert_eq!(surface.height(), 580);
        assert_eq!(surface.pixels().len(), 540 * 580 * 4);
    }

    #[test]
    fn test_frame_and_photo_regions() {
        let mut params = FrameParameters::default();
        params.frame_color = Rgb::new(250, 0, 0);
        let surface = render(&asset(40, 40), &params, PanOffset::ORIGIN, &FontBook::new());
        let img = surface.as_image();

        // Border, bottom band and content area
        assert_eq!(*img.get_pixel(5, 5), Rgba([250, 0, 0, 255]));
        assert_eq!(*img.get_pixel(270, 560), Rgba([250, 0, 0, 255]));
        assert_eq!(*img.get_pixel(20, 20), PHOTO);
        assert_eq!(*img.get_pixel(519, 519), PHOTO);
        assert_eq!(*img.get_pixel(520, 519), Rgba([250, 0, 0, 255]));
    }

    #[test]
    fn test_landscape_leaves_frame_color_bands() {
        let params = FrameParameters::default();
        let surface = render(&asset(200, 100), &params, PanOffset::ORIGIN, &FontBook::new());
        let img = surface.as_image();

        // 500x250 photo centered vertically: rows 145..395
        assert_eq!(*img.get_pixel(270, 100), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(270, 150), PHOTO);
        assert_eq!(*img.get_pixel(270, 400), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut params = FrameParameters::default();
        params.image_scale = 1.37;
        params.caption = "Idempotent".into();
        let fonts = fonts().unwrap_or_default();
        let photo = gradient_asset(123, 77);
        let pan = PanOffset::new(13.25, -40.5);

        let a = render(&photo, &params, pan, &fonts);
        let b = render(&photo, &params, pan, &fonts);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_pan_out_of_frame_leaves_empty_content() {
        let params = FrameParameters::default();
        let surface = render(
            &asset(50, 50),
            &params,
            PanOffset::new(10_000.0, 10_000.0),
            &FontBook::new(),
        );
        assert!(surface
            .as_image()
            .pixels()
            .all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_oversized_photo_is_clipped() {
        let mut params = FrameParameters::default();
        params.image_scale = 3.0;
        let surface = render(&asset(30, 30), &params, PanOffset::ORIGIN, &FontBook::new());
        for (x, y, p) in surface.as_image().enumerate_pixels() {
            if in_content(x, y, 20) {
                assert_eq!(*p, PHOTO);
            } else {
                assert_eq!(*p, Rgba([255, 255, 255, 255]), "leak at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_zero_borders() {
        let mut params = FrameParameters::default();
        params.border_width = 0;
        params.bottom_border = 0;
        let surface = render(&asset(8, 8), &params, PanOffset::ORIGIN, &FontBook::new());
        assert_eq!((surface.width(), surface.height()), (500, 500));
        assert!(surface.as_image().pixels().all(|p| *p == PHOTO));
    }

    #[test]
    fn test_translucent_photo_blends_over_frame() {
        let photo =
            ImageAsset::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]))).unwrap();
        let params = FrameParameters::default();
        let surface = render(&photo, &params, PanOffset::ORIGIN, &FontBook::new());
        assert_eq!(*surface.as_image().get_pixel(270, 270), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_whitespace_caption_matches_empty() {
        let fonts = fonts().unwrap_or_default();
        let photo = gradient_asset(64, 48);

        let mut empty = FrameParameters::default();
        empty.caption = String::new();
        let mut blank = FrameParameters::default();
        blank.caption = "  \t ".into();

        let a = render(&photo, &empty, PanOffset::ORIGIN, &fonts);
        let b = render(&photo, &blank, PanOffset::ORIGIN, &fonts);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_caption_drawn_in_bottom_band_only() {
        let Some(fonts) = fonts() else {
            return;
        };
        let photo = asset(50, 50);
        let plain = render(&photo, &FrameParameters::default(), PanOffset::ORIGIN, &fonts);

        let mut params = FrameParameters::default();
        params.caption = "Summer 1999".into();
        params.caption_size_px = 20;
        let captioned = render(&photo, &params, PanOffset::ORIGIN, &fonts);

        let mut changed = 0;
        for (x, y, p) in captioned.as_image().enumerate_pixels() {
            if p != plain.as_image().get_pixel(x, y) {
                changed += 1;
                assert!(y >= 520, "caption ink above the bottom band at ({x}, {y})");
                // Ink is a blend of #333333 over white
                assert!(p.0[0] == p.0[1] && p.0[1] == p.0[2]);
                assert!(p.0[0] >= 51);
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_caption_without_fonts_is_skipped() {
        let photo = asset(50, 50);
        let mut params = FrameParameters::default();
        params.caption = "No fonts".into();
        let a = render(&photo, &params, PanOffset::ORIGIN, &FontBook::new());
        let b = render(&photo, &FrameParameters::default(), PanOffset::ORIGIN, &FontBook::new());
        assert_eq!(a.pixels(), b.pixels());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
