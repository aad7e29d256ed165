//! Box shadow, background color and background image stages.

use super::{scoped, Canvas};
use crate::background::{layer_position, layer_values, tile_rects, LayerSize, Repeat};
use crate::boundary::element_path;
use crate::css::{self, get_cyclic};
use crate::element::BoxSizing;
use crate::error::SnapResult;
use crate::gradient::{self, GradientKind, GradientPaint};
use crate::image_loader::ImageLoader;
use crate::surface::{DrawingSurface, Paint};
use kurbo::{Affine, Point, Rect, Shape};

/// `background-clip` of layer `index`, border box when unset.
fn layer_clip(clips: &[&str], index: usize) -> BoxSizing {
    get_cyclic(clips, index)
        .and_then(|v| BoxSizing::parse(v))
        .unwrap_or_default()
}

impl<S: DrawingSurface> Canvas<S> {
    /// Cast the element's box shadow.
    ///
    /// A shadow needs an opaque shape to fall from, so the boundary is
    /// filled with the background color at full alpha. The shadow is
    /// cleared right after.
    pub fn draw_box_shadow(&mut self) {
        let scale = self.config.device_scale();
        let Some((element, surface)) = self.parts() else {
            return;
        };
        let shadow = *element.box_shadow();
        let Some(color) = shadow.color.filter(|_| shadow.is_visible()) else {
            return;
        };
        surface.set_shadow(
            color,
            shadow.blur * scale,
            shadow.offset_x * scale,
            shadow.offset_y * scale,
        );
        surface.fill(
            &element_path(element, BoxSizing::Border),
            &Paint::Solid(element.background_color().opaque()),
        );
        surface.clear_shadow();
    }

    /// Fill the background color, then every gradient layer from the
    /// bottom up.
    pub fn draw_background_color(&mut self) {
        let Some((element, surface)) = self.parts() else {
            return;
        };
        let style = element.style();
        let clips = layer_values(&style.background_clip);
        let images = layer_values(&style.background_image);

        // The color sits under the bottom-most layer and takes its clip.
        let color_clip = layer_clip(&clips, images.len().saturating_sub(1));
        let color = element.background_color();
        if !color.is_transparent() {
            surface.fill(&element_path(element, color_clip), &Paint::Solid(color));
        }

        let area = element.box_rect(BoxSizing::Padding);
        for (index, term) in images.iter().enumerate().rev() {
            if GradientKind::of(term).is_none() {
                continue;
            }
            let Some(paint) = gradient::resolve(term, &area) else {
                log::debug!("skipping gradient layer {term:?}");
                continue;
            };
            let clip = element_path(element, layer_clip(&clips, index));
            scoped(surface, |surface| {
                surface.clip(&clip);
                fill_gradient(surface, &paint, clip.bounding_box());
            });
        }
    }

    /// Draw the `url(...)` layers of `background-image`, bottom layer
    /// first, tiled per `background-repeat`.
    pub async fn draw_background_image(&mut self, loader: &dyn ImageLoader) -> SnapResult<()> {
        let Some((element, surface)) = self.parts() else {
            return Ok(());
        };
        let style = element.style();
        let images = layer_values(&style.background_image);
        if !images.iter().any(|term| css::url_argument(term).is_some()) {
            return Ok(());
        }
        let clips = layer_values(&style.background_clip);
        let sizes = layer_values(&style.background_size);
        let positions = layer_values(&style.background_position);
        let repeats = layer_values(&style.background_repeat);
        let area = element.box_rect(BoxSizing::Padding);

        for (index, term) in images.iter().enumerate().rev() {
            let Some(src) = css::url_argument(term) else {
                continue;
            };
            let image = loader.load(src).await?;
            let intrinsic = (image.width as f64, image.height as f64);
            let size = LayerSize::parse(get_cyclic(&sizes, index).copied().unwrap_or("auto"))
                .resolve(intrinsic, (area.width, area.height));
            if size.0 <= 0.0 || size.1 <= 0.0 {
                continue;
            }
            let offset = layer_position(
                get_cyclic(&positions, index).copied().unwrap_or("0% 0%"),
                (area.width, area.height),
                size,
            );
            let repeat = Repeat::parse(get_cyclic(&repeats, index).copied().unwrap_or("repeat"));
            let sizing = layer_clip(&clips, index);
            let clip = element_path(element, sizing);
            let tiles = tile_rects(
                (area.left + offset.0, area.top + offset.1),
                size,
                element.box_rect(sizing).to_rect(),
                repeat,
            );
            log::debug!("background {src:?}: {} tile(s)", tiles.len());

            let source = Rect::new(0.0, 0.0, intrinsic.0, intrinsic.1);
            scoped(surface, |surface| {
                surface.clip(&clip);
                tiles
                    .iter()
                    .try_for_each(|tile| surface.draw_image(&image, source, *tile))
            })?;
        }
        Ok(())
    }
}

/// Fill `bounds` (already clipped) with a resolved gradient.
///
/// Radial gradients are circles on the surface; elliptical ones scale the
/// surface around the fill and map the center and bounds into the scaled
/// space.
fn fill_gradient<S: DrawingSurface>(surface: &mut S, paint: &GradientPaint, bounds: Rect) {
    match paint {
        GradientPaint::Linear { start, end, stops } => {
            surface.fill(
                &bounds.to_path(0.1),
                &Paint::Linear {
                    start: *start,
                    end: *end,
                    stops: stops.clone(),
                },
            );
        }
        GradientPaint::Radial {
            center,
            radius,
            scale: (sx, sy),
            stops,
        } => {
            if *sx <= 0.0 || *sy <= 0.0 {
                return;
            }
            surface.transform(Affine::scale_non_uniform(*sx, *sy));
            let scaled = Rect::new(bounds.x0 / sx, bounds.y0 / sy, bounds.x1 / sx, bounds.y1 / sy);
            surface.fill(
                &scaled.to_path(0.1),
                &Paint::Radial {
                    center: Point::new(center.x / sx, center.y / sy),
                    radius: *radius,
                    stops: stops.clone(),
                },
            );
        }
    }
}
