//! Transform operations for RasterContext.

use super::RasterContext;
use crate::path::{from_skia_transform, to_skia_transform};
use kurbo::Affine;

impl RasterContext {
    /// Translate the user space.
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    /// Scale the user space.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.state.transform = self.state.transform.pre_scale(x, y);
    }

    /// Multiply the current transform by `affine`.
    pub fn transform(&mut self, affine: Affine) {
        log::debug!(target: "canvas", "transform {:?}", affine.as_coeffs());
        self.state.transform = self.state.transform.pre_concat(to_skia_transform(affine));
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, affine: Affine) {
        log::debug!(target: "canvas", "setTransform {:?}", affine.as_coeffs());
        self.state.transform = to_skia_transform(affine);
    }

    /// Get the current transform.
    pub fn get_transform(&self) -> Affine {
        from_skia_transform(self.state.transform)
    }
}
