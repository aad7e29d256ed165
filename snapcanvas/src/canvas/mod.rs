//! The drawing pipeline.
//!
//! A [`Canvas`] owns one surface for one render pass. Each node goes
//! through the same fixed sequence of stages:
//!
//! `set_element` → `set_transform` → `draw_box_shadow` →
//! `draw_background_color` → `draw_background_image` → content
//! (`draw_image` | `draw_video` | `draw_text` | `draw_nested_canvas`) →
//! `draw_border` → `reset_transform` → `restore_context`.

mod background;
mod border;
mod content;
mod text;

pub use content::{fit_image, ImageMode};

use crate::config::RenderConfig;
use crate::element::{BoxSizing, Element};
use crate::error::{SnapError, SnapResult};
use crate::surface::DrawingSurface;
use base64::Engine;
use kurbo::{Affine, Rect, Vec2};
use snapcanvas_raster::RasterContext;

/// Determinants smaller than this are treated as zero.
const SINGULAR_EPSILON: f64 = 1e-12;

#[derive(Debug)]
pub struct Canvas<S: DrawingSurface = RasterContext> {
    surface: S,
    config: RenderConfig,
    /// Device scale and container offset.
    base_transform: Affine,
    /// Container size in layout pixels.
    logical_size: (f64, f64),
    element: Option<Element>,
    depth: usize,
}

impl<S: DrawingSurface> Canvas<S> {
    /// Bind a surface to the container's coordinate space: layout pixels
    /// with the container's top-left corner at the origin, scaled to the
    /// device.
    pub fn new(mut surface: S, container: &Element, config: RenderConfig) -> Self {
        let rect = container.box_rect(BoxSizing::Border);
        let base_transform = Affine::scale(config.device_scale())
            * Affine::translate(Vec2::new(-rect.left, -rect.top));
        surface.set_transform(base_transform);
        Self {
            surface,
            config,
            base_transform,
            logical_size: (rect.width, rect.height),
            element: None,
            depth: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The element being painted, in untransformed coordinates.
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Open save points; zero between nodes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current element and the surface, borrowed apart.
    fn parts(&mut self) -> Option<(&Element, &mut S)> {
        let Self {
            element, surface, ..
        } = self;
        Some((element.as_ref()?, surface))
    }

    /// Start painting `element`: push a save point and apply its opacity
    /// and filter.
    pub fn set_element(&mut self, element: Element) {
        log::debug!("painting node {:?}", element.record().id);
        self.surface.save();
        self.depth += 1;
        self.surface.set_global_alpha(element.opacity());
        let filter = element.style().filter.trim();
        if self.config.filter
            && !filter.is_empty()
            && filter != "none"
            && !self.surface.set_filter(filter)
        {
            log::debug!("filter {filter:?} not supported by surface");
        }
        self.element = Some(element);
    }

    /// Apply the element's `transform` matrix.
    ///
    /// The element is moved back to its untransformed box so the following
    /// stages draw in local coordinates, and the surface takes the matrix
    /// around the box center instead.
    pub fn set_transform(&mut self) -> SnapResult<()> {
        let Some(element) = self.element.as_ref() else {
            return Ok(());
        };
        let value = element.style().transform.trim();
        let Some([a, b, c, d, e, f]) = parse_matrix(value) else {
            if !value.is_empty() && value != "none" {
                log::debug!("ignoring unsupported transform {value:?}");
            }
            return Ok(());
        };
        let det = a * d - b * c;
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(SnapError::NonInvertibleTransform(value.to_string()));
        }

        let bbox = element.box_rect(BoxSizing::Border);
        let translation = Vec2::new(e, f);
        let center = bbox.center() - translation;
        let style = element.style();
        let size = |v: &Option<String>, fallback: f64| {
            v.as_deref()
                .and_then(crate::css::parse_number_prefix)
                .filter(|v| *v >= 0.0)
                .unwrap_or(fallback)
        };
        let width = size(&style.width, bbox.width);
        let height = size(&style.height, bbox.height);
        let local = Rect::from_center_size(center, (width, height));

        let matrix = Affine::new([a, b, c, d, e, f]);
        self.surface.transform(
            Affine::translate(center.to_vec2()) * matrix * Affine::translate(-center.to_vec2()),
        );
        self.element = Some(element.untransformed(local));
        Ok(())
    }

    /// Return the surface to the base device transform.
    pub fn reset_transform(&mut self) {
        self.surface.set_transform(self.base_transform);
    }

    /// Pop the save point pushed by [`set_element`](Self::set_element).
    pub fn restore_context(&mut self) {
        if self.depth > 0 {
            self.surface.restore();
            self.depth -= 1;
        }
        self.element = None;
    }

    /// PNG of the surface. `original` keeps the device resolution,
    /// otherwise the image is resampled to the container size times the
    /// user scale.
    pub fn to_png(&self, original: bool) -> SnapResult<Vec<u8>> {
        if original {
            return self.surface.encode_png(None);
        }
        let scale = if self.config.scale.is_finite() && self.config.scale > 0.0 {
            self.config.scale
        } else {
            1.0
        };
        let width = ((self.logical_size.0 * scale).round() as u32).max(1);
        let height = ((self.logical_size.1 * scale).round() as u32).max(1);
        self.surface.encode_png(Some((width, height)))
    }

    pub fn to_data_url(&self) -> SnapResult<String> {
        let png = self.to_png(true)?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Straight-alpha RGBA8 pixels of the surface.
    pub fn image_data(&self) -> Vec<u8> {
        self.surface.image_data()
    }
}

/// Run `draw` between a save and its matching restore.
fn scoped<S: DrawingSurface, R>(surface: &mut S, draw: impl FnOnce(&mut S) -> R) -> R {
    surface.save();
    let result = draw(surface);
    surface.restore();
    result
}

/// Components of a `matrix(a, b, c, d, e, f)` value.
fn parse_matrix(value: &str) -> Option<[f64; 6]> {
    let inner = value.strip_prefix("matrix(")?.strip_suffix(')')?;
    let mut out = [0.0f64; 6];
    let mut parts = inner.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() || out.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("matrix(1, 0, 0, 1, 10, 20)", Some([1.0, 0.0, 0.0, 1.0, 10.0, 20.0]))]
    #[case("matrix(0.5,0,0,0.5,0,0)", Some([0.5, 0.0, 0.0, 0.5, 0.0, 0.0]))]
    #[case("matrix(1, 0, 0, 1, 10)", None)]
    #[case("matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1)", None)]
    #[case("matrix(1, 0, 0, 1, inf, 0)", None)]
    #[case("none", None)]
    fn test_parse_matrix(#[case] value: &str, #[case] expected: Option<[f64; 6]>) {
        assert_eq!(parse_matrix(value), expected);
    }
}
