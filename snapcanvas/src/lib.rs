//! Snapshot a captured UI layout onto a raster canvas.
//!
//! Layout nodes come from an [`ElementProvider`] as [`NodeRecord`]s. Each is
//! wrapped in an [`Element`], which resolves the box model once, and painted
//! by a [`Canvas`] onto a [`DrawingSurface`]. [`render_snapshot`] wires the
//! pieces together with the tiny-skia backed `snapcanvas_raster` surface.

pub mod background;
pub mod boundary;
pub mod canvas;
pub mod config;
pub mod css;
pub mod element;
pub mod error;
pub mod gradient;
pub mod image_loader;
pub mod node;
pub mod render;
pub mod surface;
pub mod text;

pub use canvas::Canvas;
pub use config::{Platform, RenderConfig, TextCalibration, TextDirectionStrategy};
pub use css::Rgba;
pub use element::{BoxRect, BoxSizing, Element};
pub use error::{SnapError, SnapResult};
pub use image_loader::{FileImageLoader, ImageLoader, LoadedImage};
pub use node::{ComputedStyle, Dataset, Edge, NodeRecord};
pub use render::{paint_node, paint_tree, render_snapshot, ElementProvider, Scope, Snapshot};
pub use surface::{DrawingSurface, Paint, TextAlign};
