//! Polaroid Core - framing and export engine
//!
//! This crate lays a photo into a polaroid-style frame: a square content
//! area with a colored border, a taller bottom band with an optional
//! caption, and a pannable, scalable photo clipped to the square. Exports
//! are rotated, shadowed and padded onto a transparent PNG.
//!
//! Everything here is synchronous and free of I/O. Front-ends (the WASM
//! bindings and the CLI) read files, supply the clock and register caption
//! fonts.

pub mod compose;
pub mod decode;
pub mod drag;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod params;
pub mod session;

mod sample;

pub use compose::{render, ComposedSurface, FontBook};
pub use decode::{decode_image, is_image_media_type, DecodeError, ImageAsset};
pub use drag::{DragController, PointerEvent, SurfaceBounds};
pub use encode::{encode_png, EncodeError};
pub use export::{
    compute_rotated_bounds, export_filename, export_image, ExportedFile, ExportedImage,
    EXPORT_PADDING,
};
pub use geometry::{PanOffset, Rect, CANVAS_SIZE};
pub use params::{FrameParameters, ParamError, ParameterUpdate, Rgb};
pub use session::{Command, Effect, Session, SessionError};
