//! Gradient paint sources.

use tiny_skia::Color;

/// Geometry of a gradient in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// Radial gradient centred at (cx, cy) growing to `radius`.
    Radial { cx: f32, cy: f32, radius: f32 },
}

/// A gradient with color stops.
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    pub kind: GradientKind,
    /// Stops as (offset, color), kept in offset order.
    pub stops: Vec<(f32, Color)>,
}

impl CanvasGradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            kind: GradientKind::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub fn radial(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            kind: GradientKind::Radial { cx, cy, radius },
            stops: Vec::new(),
        }
    }

    /// Add a color stop. Offsets outside `[0, 1]` are ignored.
    ///
    /// Stops with equal offsets keep insertion order, which produces a hard
    /// transition between them.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return;
        }
        let idx = self.stops.partition_point(|(o, _)| *o <= offset);
        self.stops.insert(idx, (offset, color));
    }

    /// Build a tiny-skia shader for this gradient.
    ///
    /// Returns `None` when there are no stops or the geometry is degenerate,
    /// in which case nothing should be painted.
    pub(crate) fn to_shader(
        &self,
        global_alpha: f32,
        transform: tiny_skia::Transform,
    ) -> Option<tiny_skia::Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }
        let stops: Vec<tiny_skia::GradientStop> = self
            .stops
            .iter()
            .map(|(offset, color)| {
                let mut c = *color;
                c.apply_opacity(global_alpha);
                tiny_skia::GradientStop::new(*offset, c)
            })
            .collect();

        // tiny-skia needs at least two stops
        let stops = if stops.len() == 1 {
            let (_, mut c) = self.stops[0];
            c.apply_opacity(global_alpha);
            vec![
                tiny_skia::GradientStop::new(0.0, c),
                tiny_skia::GradientStop::new(1.0, c),
            ]
        } else {
            stops
        };

        match self.kind {
            GradientKind::Linear { x0, y0, x1, y1 } => tiny_skia::LinearGradient::new(
                tiny_skia::Point::from_xy(x0, y0),
                tiny_skia::Point::from_xy(x1, y1),
                stops,
                tiny_skia::SpreadMode::Pad,
                transform,
            ),
            GradientKind::Radial { cx, cy, radius } => {
                if radius <= 0.0 {
                    return None;
                }
                let center = tiny_skia::Point::from_xy(cx, cy);
                tiny_skia::RadialGradient::new(
                    center,
                    center,
                    radius,
                    stops,
                    tiny_skia::SpreadMode::Pad,
                    transform,
                )
            }
        }
    }
}
