//! Image blits, pixel readback and PNG export for RasterContext.

use super::RasterContext;
use crate::error::{RasterError, RasterResult};
use crate::image::CanvasImageRef;
use tiny_skia::{FilterQuality, Pattern, Pixmap, PixmapPaint, SpreadMode, Transform};

impl RasterContext {
    /// Draw the `src` region of an image into the `dst` rectangle.
    ///
    /// The source rectangle is clamped to the image bounds; empty source or
    /// destination rectangles draw nothing.
    pub fn draw_image(&mut self, image: CanvasImageRef<'_>, src: kurbo::Rect, dst: kurbo::Rect) {
        log::debug!(target: "canvas", "drawImage {:?} -> {:?}", src, dst);
        let Some(pixmap) = tiny_skia::PixmapRef::from_bytes(image.data, image.width, image.height)
        else {
            return;
        };
        let src = src.intersect(kurbo::Rect::new(
            0.0,
            0.0,
            image.width as f64,
            image.height as f64,
        ));
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0
        {
            return;
        }
        let Some(rect) = tiny_skia::Rect::from_xywh(
            dst.x0 as f32,
            dst.y0 as f32,
            dst.width() as f32,
            dst.height() as f32,
        ) else {
            return;
        };

        // Map the source region onto the destination rectangle
        let sx = (dst.width() / src.width()) as f32;
        let sy = (dst.height() / src.height()) as f32;
        let pattern_transform = Transform::from_translate(dst.x0 as f32, dst.y0 as f32)
            .pre_scale(sx, sy)
            .pre_translate(-src.x0 as f32, -src.y0 as f32);

        let paint = tiny_skia::Paint {
            shader: Pattern::new(
                pixmap,
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                self.state.global_alpha,
                pattern_transform,
            ),
            anti_alias: true,
            ..Default::default()
        };
        self.pixmap.fill_rect(
            rect,
            &paint,
            self.state.transform,
            self.state.clip_mask.as_ref(),
        );
    }

    /// Draw another context's pixels into the `dst` rectangle.
    pub fn draw_context(&mut self, source: &RasterContext, dst: kurbo::Rect) {
        let image = CanvasImageRef {
            data: source.pixmap.data(),
            width: source.width,
            height: source.height,
        };
        let src = kurbo::Rect::new(0.0, 0.0, source.width as f64, source.height as f64);
        self.draw_image(image, src, dst);
    }

    /// Read back the whole surface as straight-alpha RGBA8.
    pub fn get_image_data(&self) -> Vec<u8> {
        unpremultiplied(&self.pixmap)
    }

    /// Export the surface as PNG at its own size.
    pub fn to_png(&self) -> RasterResult<Vec<u8>> {
        encode_png(&self.pixmap)
    }

    /// Export the surface as PNG resampled to `width` x `height`.
    pub fn to_png_resized(&self, width: u32, height: u32) -> RasterResult<Vec<u8>> {
        if width == self.width && height == self.height {
            return self.to_png();
        }
        let mut resized =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        let transform = Transform::from_scale(
            width as f32 / self.width as f32,
            height as f32 / self.height as f32,
        );
        resized.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, transform, None);
        encode_png(&resized)
    }
}

fn unpremultiplied(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    data
}

fn encode_png(pixmap: &Pixmap) -> RasterResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&unpremultiplied(pixmap))?;
    }
    Ok(buf)
}
