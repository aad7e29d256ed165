//! The drawing surface the pipeline paints on.
//!
//! [`DrawingSurface`] is the small immediate-mode 2D API the canvas needs.
//! It is implemented for [`RasterContext`]; tests use a recording surface.

use crate::css::Rgba;
use crate::error::SnapResult;
use crate::gradient::ColorStop;
use crate::image_loader::LoadedImage;
use kurbo::{Affine, BezPath, Point, Rect};
use snapcanvas_raster::{CanvasGradient, CanvasImageRef, Color, RasterContext, TextBaseline};

/// Paint for fills, strokes and text.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Point,
        radius: f64,
        stops: Vec<ColorStop>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Immediate-mode 2D drawing API.
///
/// Coordinates go through the current transform. Shadow offsets and blur
/// are in surface pixels. Text is positioned by the top of its em box.
pub trait DrawingSurface {
    fn save(&mut self);
    fn restore(&mut self);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);
    /// Concatenate `transform` onto the current one.
    fn transform(&mut self, transform: Affine);

    fn set_global_alpha(&mut self, alpha: f64);

    /// Apply a CSS `filter`. Returns whether the surface supports it.
    fn set_filter(&mut self, _filter: &str) -> bool {
        false
    }

    fn set_shadow(&mut self, color: Rgba, blur: f64, offset_x: f64, offset_y: f64);
    fn clear_shadow(&mut self);

    fn fill(&mut self, path: &BezPath, paint: &Paint);
    fn stroke(&mut self, path: &BezPath, paint: &Paint, width: f64);
    /// Intersect the clip region with `path`.
    fn clip(&mut self, path: &BezPath);
    /// Dash pattern for strokes; empty for solid lines.
    fn set_line_dash(&mut self, segments: &[f64], offset: f64);

    /// Select a font from a CSS font shorthand.
    fn set_font(&mut self, font: &str) -> SnapResult<()>;
    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, paint: &Paint);

    /// Draw the `src` region of `image` into `dst`.
    fn draw_image(&mut self, image: &LoadedImage, src: Rect, dst: Rect) -> SnapResult<()>;

    /// Pixels as straight-alpha RGBA8, row major.
    fn image_data(&self) -> Vec<u8>;
    /// PNG at the surface size, or resampled to `size`.
    fn encode_png(&self, size: Option<(u32, u32)>) -> SnapResult<Vec<u8>>;
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, (c.a.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn to_gradient(paint: &Paint) -> Option<CanvasGradient> {
    let (mut gradient, stops) = match paint {
        Paint::Solid(_) => return None,
        Paint::Linear { start, end, stops } => (
            CanvasGradient::linear(start.x as f32, start.y as f32, end.x as f32, end.y as f32),
            stops,
        ),
        Paint::Radial {
            center,
            radius,
            stops,
        } => (
            CanvasGradient::radial(center.x as f32, center.y as f32, *radius as f32),
            stops,
        ),
    };
    for stop in stops {
        gradient.add_color_stop(stop.offset as f32, to_color(stop.color));
    }
    Some(gradient)
}

fn use_fill(ctx: &mut RasterContext, paint: &Paint) {
    match paint {
        Paint::Solid(color) => ctx.set_fill_color(to_color(*color)),
        _ => {
            if let Some(gradient) = to_gradient(paint) {
                ctx.set_fill_gradient(gradient);
            }
        }
    }
}

impl DrawingSurface for RasterContext {
    fn save(&mut self) {
        RasterContext::save(self);
    }

    fn restore(&mut self) {
        RasterContext::restore(self);
    }

    fn set_transform(&mut self, transform: Affine) {
        RasterContext::set_transform(self, transform);
    }

    fn transform(&mut self, transform: Affine) {
        RasterContext::transform(self, transform);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        RasterContext::set_global_alpha(self, alpha as f32);
    }

    fn set_shadow(&mut self, color: Rgba, blur: f64, offset_x: f64, offset_y: f64) {
        RasterContext::set_shadow(
            self,
            snapcanvas_raster::Shadow {
                color: to_color(color),
                blur: blur as f32,
                offset_x: offset_x as f32,
                offset_y: offset_y as f32,
            },
        );
    }

    fn clear_shadow(&mut self) {
        RasterContext::clear_shadow(self);
    }

    fn fill(&mut self, path: &BezPath, paint: &Paint) {
        use_fill(self, paint);
        self.fill_path(path);
    }

    fn stroke(&mut self, path: &BezPath, paint: &Paint, width: f64) {
        match paint {
            Paint::Solid(color) => self.set_stroke_color(to_color(*color)),
            _ => {
                if let Some(gradient) = to_gradient(paint) {
                    self.set_stroke_gradient(gradient);
                }
            }
        }
        self.set_line_width(width as f32);
        self.stroke_path(path);
    }

    fn clip(&mut self, path: &BezPath) {
        self.clip_path(path);
    }

    fn set_line_dash(&mut self, segments: &[f64], offset: f64) {
        RasterContext::set_line_dash(self, segments.iter().map(|s| *s as f32).collect());
        self.set_line_dash_offset(offset as f32);
    }

    fn set_font(&mut self, font: &str) -> SnapResult<()> {
        Ok(RasterContext::set_font(self, font)?)
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        RasterContext::measure_text(self, text).width as f64
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, paint: &Paint) {
        use_fill(self, paint);
        self.set_text_align(match align {
            TextAlign::Left => snapcanvas_raster::TextAlign::Left,
            TextAlign::Center => snapcanvas_raster::TextAlign::Center,
            TextAlign::Right => snapcanvas_raster::TextAlign::Right,
        });
        self.set_text_baseline(TextBaseline::Top);
        RasterContext::fill_text(self, text, x as f32, y as f32);
    }

    fn draw_image(&mut self, image: &LoadedImage, src: Rect, dst: Rect) -> SnapResult<()> {
        let image = CanvasImageRef::new(&image.rgba, image.width, image.height)?;
        RasterContext::draw_image(self, image, src, dst);
        Ok(())
    }

    fn image_data(&self) -> Vec<u8> {
        self.get_image_data()
    }

    fn encode_png(&self, size: Option<(u32, u32)>) -> SnapResult<Vec<u8>> {
        Ok(match size {
            Some((width, height)) => self.to_png_resized(width, height)?,
            None => self.to_png()?,
        })
    }
}
