//! Image, video and nested canvas content.

use super::{scoped, Canvas};
use crate::boundary::element_path;
use crate::css::Rgba;
use crate::element::{BoxRect, BoxSizing};
use crate::error::SnapResult;
use crate::image_loader::{ImageLoader, LoadedImage};
use crate::surface::{DrawingSurface, Paint};
use kurbo::{BezPath, Point, Rect, Vec2};

const PLAY_GLYPH_COLOR: Rgba = Rgba::rgba(255, 255, 255, 0.8);

/// How an image fills its content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    /// Letterbox: the whole image is visible.
    AspectFit,
    /// Crop: the box is covered.
    AspectFill,
    /// Stretch to the box.
    #[default]
    ScaleToFill,
}

impl ImageMode {
    /// Mode of an `<image>` node. Unknown modes stretch.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode.map(str::trim) {
            Some("aspectFit") => ImageMode::AspectFit,
            Some("aspectFill") => ImageMode::AspectFill,
            _ => ImageMode::ScaleToFill,
        }
    }

    /// Mode of a video poster from its `object-fit`.
    pub fn from_object_fit(object_fit: Option<&str>) -> Self {
        match object_fit.map(str::trim) {
            Some("contain") => ImageMode::AspectFit,
            Some("cover") => ImageMode::AspectFill,
            _ => ImageMode::ScaleToFill,
        }
    }
}

/// Source and destination rectangles for an `image` sized `(width,
/// height)` drawn into `content`.
pub fn fit_image(mode: ImageMode, image: (f64, f64), content: &BoxRect) -> (Rect, Rect) {
    let (iw, ih) = image;
    let source = Rect::new(0.0, 0.0, iw, ih);
    let target = content.to_rect();
    let (cw, ch) = (content.width, content.height);
    if iw <= 0.0 || ih <= 0.0 || cw <= 0.0 || ch <= 0.0 {
        return (source, target);
    }
    let image_ratio = iw / ih;
    let box_ratio = cw / ch;
    match mode {
        ImageMode::ScaleToFill => (source, target),
        ImageMode::AspectFit => {
            let dst = if image_ratio >= box_ratio {
                let h = ih * cw / iw;
                let y = content.top + (ch - h) / 2.0;
                Rect::new(content.left, y, content.right, y + h)
            } else {
                let w = iw * ch / ih;
                let x = content.left + (cw - w) / 2.0;
                Rect::new(x, content.top, x + w, content.bottom)
            };
            (source, dst)
        }
        ImageMode::AspectFill => {
            let src = if image_ratio <= box_ratio {
                let h = iw * ch / cw;
                let y = (ih - h) / 2.0;
                Rect::new(0.0, y, iw, y + h)
            } else {
                let w = ih * cw / ch;
                let x = (iw - w) / 2.0;
                Rect::new(x, 0.0, x + w, ih)
            };
            (src, target)
        }
    }
}

/// A rightward triangle centered on `center` with rounded corners.
fn play_glyph(center: Point, side: f64) -> BezPath {
    let height = side * 3f64.sqrt() / 2.0;
    let corners = [
        center + Vec2::new(-height / 3.0, -side / 2.0),
        center + Vec2::new(height * 2.0 / 3.0, 0.0),
        center + Vec2::new(-height / 3.0, side / 2.0),
    ];
    let round = side * 0.15;
    let toward = |from: Point, to: Point| {
        let d = to - from;
        let len = d.hypot();
        if len <= 0.0 {
            from
        } else {
            from + d * (round.min(len / 2.0) / len)
        }
    };
    let mut path = BezPath::new();
    for i in 0..3 {
        let prev = corners[(i + 2) % 3];
        let corner = corners[i];
        let next = corners[(i + 1) % 3];
        let entry = toward(corner, prev);
        if i == 0 {
            path.move_to(entry);
        } else {
            path.line_to(entry);
        }
        path.quad_to(corner, toward(corner, next));
    }
    path.close_path();
    path
}

impl<S: DrawingSurface> Canvas<S> {
    /// Draw the element's `src` image into its content box.
    pub async fn draw_image(&mut self, loader: &dyn ImageLoader) -> SnapResult<()> {
        let Some((element, _)) = self.parts() else {
            return Ok(());
        };
        let record = element.record();
        let Some(src) = record.src.clone().filter(|s| !s.is_empty()) else {
            return Ok(());
        };
        let mode = ImageMode::from_mode(record.mode.as_deref());
        let image = loader.load(&src).await?;
        self.blit_content(&image, mode)
    }

    /// Draw a video frame placeholder: a black content box, the poster if
    /// any, and a play glyph.
    ///
    /// A poster that fails to load does not stop the glyph from being
    /// drawn; the failure is reported afterwards.
    pub async fn draw_video(&mut self, loader: &dyn ImageLoader) -> SnapResult<()> {
        let Some((element, surface)) = self.parts() else {
            return Ok(());
        };
        let content = element.box_rect(BoxSizing::Content);
        let record = element.record();
        let mode = ImageMode::from_object_fit(record.object_fit.as_deref());
        let poster = record.poster.clone().filter(|s| !s.is_empty());
        surface.fill(
            &element_path(element, BoxSizing::Content),
            &Paint::Solid(Rgba::BLACK),
        );

        let mut outcome = Ok(());
        if let Some(poster) = poster {
            outcome = match loader.load(&poster).await {
                Ok(image) => self.blit_content(&image, mode),
                Err(err) => Err(err),
            };
        }

        let side = content.width.min(content.height) / 4.0;
        if side > 0.0 {
            self.surface.fill(
                &play_glyph(content.center(), side),
                &Paint::Solid(PLAY_GLYPH_COLOR),
            );
        }
        outcome
    }

    /// Draw a nested canvas, exported as an image at `src`, into the
    /// content box.
    pub async fn draw_nested_canvas(
        &mut self,
        src: &str,
        loader: &dyn ImageLoader,
    ) -> SnapResult<()> {
        if self.element.is_none() {
            return Ok(());
        }
        let image = loader.load(src).await?;
        self.blit_content(&image, ImageMode::ScaleToFill)
    }

    /// Draw `image` into the content box, clipped to the content boundary.
    fn blit_content(&mut self, image: &LoadedImage, mode: ImageMode) -> SnapResult<()> {
        let Some((element, surface)) = self.parts() else {
            return Ok(());
        };
        let content = element.box_rect(BoxSizing::Content);
        let clip = element_path(element, BoxSizing::Content);
        let (src, dst) = fit_image(mode, (image.width as f64, image.height as f64), &content);
        scoped(surface, |surface| {
            surface.clip(&clip);
            surface.draw_image(image, src, dst)
        })
    }
}
