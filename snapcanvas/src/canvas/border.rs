//! Border stage.

use super::{scoped, Canvas};
use crate::boundary::{element_path, inset_path, side_path};
use crate::element::{BorderSide, BorderStyle, BoxSizing, Element};
use crate::surface::{DrawingSurface, Paint};

/// Stroke `side` along the border-box outline.
///
/// The outline is stroked at twice the border width under a clip to the
/// border box, leaving a band of exactly the border width inside it.
fn stroke_side<S: DrawingSurface>(surface: &mut S, element: &Element, side: &BorderSide) {
    let Some(color) = side.color else {
        return;
    };
    let paint = Paint::Solid(color);
    let w = side.width;
    let outline = element_path(element, BoxSizing::Border);
    match side.style {
        BorderStyle::None => {}
        BorderStyle::Solid => surface.stroke(&outline, &paint, w * 2.0),
        BorderStyle::Dashed => {
            surface.set_line_dash(&[w * 2.0, w], -w * 2.0);
            surface.stroke(&outline, &paint, w * 2.0);
        }
        BorderStyle::Dotted => {
            surface.set_line_dash(&[w, w], 0.0);
            surface.stroke(&outline, &paint, w * 2.0);
        }
        BorderStyle::Double => {
            let band = w / 3.0;
            surface.stroke(&outline, &paint, band * 2.0);
            surface.stroke(&inset_path(element, w - band / 2.0), &paint, band);
        }
    }
}

impl<S: DrawingSurface> Canvas<S> {
    /// Draw the border inside the border box.
    ///
    /// Four identical sides are one stroke of the outline. Otherwise each
    /// visible side is stroked on its own, clipped to the trapezoid between
    /// the border and padding edges so neighbours do not bleed into it.
    pub fn draw_border(&mut self) {
        let Some((element, surface)) = self.parts() else {
            return;
        };
        let border = *element.border();
        let outline = element_path(element, BoxSizing::Border);

        if let Some(side) = border.uniform() {
            if side.is_visible() {
                scoped(surface, |surface| {
                    surface.clip(&outline);
                    stroke_side(surface, element, side);
                });
            }
            return;
        }

        for (which, side) in border.sides() {
            if !side.is_visible() {
                continue;
            }
            scoped(surface, |surface| {
                surface.clip(&outline);
                surface.clip(&side_path(element, which));
                stroke_side(surface, element, side);
            });
        }
    }
}
