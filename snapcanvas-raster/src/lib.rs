//! Canvas 2D style raster surface built on tiny-skia and cosmic-text.
//!
//! [`RasterContext`] keeps a Canvas-like drawing state stack and paints
//! `kurbo` paths into a premultiplied RGBA pixmap.

mod context;
mod drawing_state;
mod error;
mod font;
mod font_config;
mod gradient;
mod image;
mod path;
mod shadow;
mod style;
mod text;

pub use context::RasterContext;
pub use error::{RasterError, RasterResult};
pub use font::{parse_font, ParsedFont};
pub use font_config::{CustomFont, FontConfig, GenericFamilyMap};
pub use gradient::{CanvasGradient, GradientKind};
pub use image::{premultiply_rgba, CanvasImageRef};
pub use shadow::Shadow;
pub use style::{FillStyle, TextAlign, TextBaseline};
pub use text::TextMetrics;

pub use kurbo;
pub use tiny_skia::Color;
