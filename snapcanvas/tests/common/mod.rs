//! Test helpers shared by the pipeline tests.

#![allow(dead_code)]

use futures_util::future::BoxFuture;
use kurbo::{Affine, BezPath, Rect, Shape};
use snapcanvas::{
    DrawingSurface, ImageLoader, LoadedImage, Paint, Rgba, SnapError, SnapResult, TextAlign,
};

/// Fixed advance of every character measured by [`RecordingSurface`].
pub const CHAR_WIDTH: f64 = 10.0;

/// One call made on a [`RecordingSurface`]. Paths are reduced to their
/// bounding boxes in user space.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Save,
    Restore,
    SetTransform(Affine),
    Transform(Affine),
    GlobalAlpha(f64),
    Filter(String),
    Shadow {
        color: Rgba,
        blur: f64,
        offset_x: f64,
        offset_y: f64,
    },
    ClearShadow,
    Fill {
        bounds: Rect,
        paint: Paint,
    },
    Stroke {
        bounds: Rect,
        paint: Paint,
        width: f64,
    },
    Clip(Rect),
    LineDash(Vec<f64>, f64),
    Font(String),
    Text {
        text: String,
        x: f64,
        y: f64,
        align: TextAlign,
    },
    Image {
        src: Rect,
        dst: Rect,
    },
}

/// A surface that records calls instead of drawing. Text is measured at
/// [`CHAR_WIDTH`] per character.
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Open save points.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn solid_fills(&self) -> Vec<Rgba> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill {
                    paint: Paint::Solid(color),
                    ..
                } => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(Rect, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Image { src, dst } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.transform);
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
        self.ops.push(Op::Restore);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ops.push(Op::SetTransform(transform));
    }

    fn transform(&mut self, transform: Affine) {
        self.transform *= transform;
        self.ops.push(Op::Transform(transform));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(Op::GlobalAlpha(alpha));
    }

    fn set_filter(&mut self, filter: &str) -> bool {
        self.ops.push(Op::Filter(filter.to_string()));
        true
    }

    fn set_shadow(&mut self, color: Rgba, blur: f64, offset_x: f64, offset_y: f64) {
        self.ops.push(Op::Shadow {
            color,
            blur,
            offset_x,
            offset_y,
        });
    }

    fn clear_shadow(&mut self) {
        self.ops.push(Op::ClearShadow);
    }

    fn fill(&mut self, path: &BezPath, paint: &Paint) {
        self.ops.push(Op::Fill {
            bounds: path.bounding_box(),
            paint: paint.clone(),
        });
    }

    fn stroke(&mut self, path: &BezPath, paint: &Paint, width: f64) {
        self.ops.push(Op::Stroke {
            bounds: path.bounding_box(),
            paint: paint.clone(),
            width,
        });
    }

    fn clip(&mut self, path: &BezPath) {
        self.ops.push(Op::Clip(path.bounding_box()));
    }

    fn set_line_dash(&mut self, segments: &[f64], offset: f64) {
        self.ops.push(Op::LineDash(segments.to_vec(), offset));
    }

    fn set_font(&mut self, font: &str) -> SnapResult<()> {
        self.ops.push(Op::Font(font.to_string()));
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * CHAR_WIDTH
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, _paint: &Paint) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            align,
        });
    }

    fn draw_image(&mut self, _image: &LoadedImage, src: Rect, dst: Rect) -> SnapResult<()> {
        self.ops.push(Op::Image { src, dst });
        Ok(())
    }

    fn image_data(&self) -> Vec<u8> {
        vec![0; self.width as usize * self.height as usize * 4]
    }

    fn encode_png(&self, _size: Option<(u32, u32)>) -> SnapResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Serves one solid image for every source except those starting with
/// `missing`.
pub struct SolidImageLoader {
    pub width: u32,
    pub height: u32,
}

impl ImageLoader for SolidImageLoader {
    fn load<'a>(&'a self, src: &'a str) -> BoxFuture<'a, SnapResult<LoadedImage>> {
        Box::pin(async move {
            if src.starts_with("missing") {
                return Err(SnapError::ImageLoad {
                    src: src.to_string(),
                    reason: "not found".to_string(),
                });
            }
            let pixels = [0u8, 0, 255, 255].repeat((self.width * self.height) as usize);
            LoadedImage::from_rgba(self.width, self.height, pixels)
        })
    }
}
