//! Outline paths for clipping, filling and stroking element boxes.

use crate::element::{BorderRadius, BoxRect, BoxSizing, Element, Side};
use kurbo::{Arc, BezPath, Point, Vec2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Flattening tolerance for corner arcs, in layout pixels.
const ARC_TOLERANCE: f64 = 0.05;

/// Outline of `rect` with elliptical corners, clockwise from the top-left.
///
/// Square corners are plain line joins, so a box without radii yields the
/// same elements as [`kurbo::Rect::to_path`].
pub fn rounded_rect_path(rect: &BoxRect, radius: &BorderRadius) -> BezPath {
    let BoxRect {
        left,
        top,
        right,
        bottom,
        ..
    } = *rect;
    let mut path = BezPath::new();

    if radius.left_top > 0.0 && radius.top_left > 0.0 {
        path.move_to((left, top + radius.top_left));
        corner(
            &mut path,
            (left + radius.left_top, top + radius.top_left),
            (radius.left_top, radius.top_left),
            PI,
        );
    } else {
        path.move_to((left, top));
    }

    if radius.right_top > 0.0 && radius.top_right > 0.0 {
        path.line_to((right - radius.right_top, top));
        corner(
            &mut path,
            (right - radius.right_top, top + radius.top_right),
            (radius.right_top, radius.top_right),
            -FRAC_PI_2,
        );
    } else {
        path.line_to((right, top));
    }

    if radius.right_bottom > 0.0 && radius.bottom_right > 0.0 {
        path.line_to((right, bottom - radius.bottom_right));
        corner(
            &mut path,
            (right - radius.right_bottom, bottom - radius.bottom_right),
            (radius.right_bottom, radius.bottom_right),
            0.0,
        );
    } else {
        path.line_to((right, bottom));
    }

    if radius.left_bottom > 0.0 && radius.bottom_left > 0.0 {
        path.line_to((left + radius.left_bottom, bottom));
        corner(
            &mut path,
            (left + radius.left_bottom, bottom - radius.bottom_left),
            (radius.left_bottom, radius.bottom_left),
            FRAC_PI_2,
        );
    } else {
        path.line_to((left, bottom));
    }

    path.close_path();
    path
}

/// Quarter ellipse, clockwise on screen, starting at `start_angle`.
fn corner(path: &mut BezPath, center: (f64, f64), radii: (f64, f64), start_angle: f64) {
    let arc = Arc::new(
        Point::new(center.0, center.1),
        Vec2::new(radii.0, radii.1),
        start_angle,
        FRAC_PI_2,
        0.0,
    );
    path.extend(arc.append_iter(ARC_TOLERANCE));
}

/// Rounded outline of one of the element's boxes.
pub fn element_path(element: &Element, sizing: BoxSizing) -> BezPath {
    rounded_rect_path(&element.box_rect(sizing), element.radius(sizing))
}

/// The border-box outline moved inwards by `amount` on every side.
pub fn inset_path(element: &Element, amount: f64) -> BezPath {
    let rect = element
        .box_rect(BoxSizing::Border)
        .inset(amount, amount, amount, amount);
    let radius = element
        .border_radius()
        .inset(amount, amount, amount, amount);
    rounded_rect_path(&rect, &radius)
}

/// Trapezoid between the outer and inner edge of one border side.
pub fn side_path(element: &Element, side: Side) -> BezPath {
    let [otl, otr, obr, obl] = element.vertices(BoxSizing::Border);
    let [itl, itr, ibr, ibl] = element.vertices(BoxSizing::Padding);
    let quad = match side {
        Side::Top => [otl, otr, itr, itl],
        Side::Right => [otr, obr, ibr, itr],
        Side::Bottom => [obr, obl, ibl, ibr],
        Side::Left => [obl, otl, itl, ibl],
    };
    let mut path = BezPath::new();
    path.move_to(quad[0]);
    for p in &quad[1..] {
        path.line_to(*p);
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ComputedStyle, NodeRecord};
    use kurbo::{PathEl, Shape};

    fn element(style: ComputedStyle) -> Element {
        Element::new(NodeRecord {
            style,
            ..NodeRecord::with_rect(5.0, 10.0, 120.0, 80.0)
        })
    }

    fn assert_same_path(a: &BezPath, b: &BezPath) {
        let (a, b) = (a.elements(), b.elements());
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            match (x, y) {
                (PathEl::MoveTo(p), PathEl::MoveTo(q)) | (PathEl::LineTo(p), PathEl::LineTo(q)) => {
                    assert!(p.distance(*q) < 1e-9, "{p:?} vs {q:?}")
                }
                (PathEl::ClosePath, PathEl::ClosePath) => {}
                _ => panic!("element mismatch: {x:?} vs {y:?}"),
            }
        }
    }

    #[test]
    fn test_square_corners_match_rect() {
        let el = element(ComputedStyle::default());
        let rect = el.box_rect(BoxSizing::Border).to_rect();
        assert_same_path(&element_path(&el, BoxSizing::Border), &rect.to_path(0.1));
    }

    #[test]
    fn test_rounded_outline_stays_in_box() {
        let el = element(ComputedStyle {
            border_top_left_radius: "20px".into(),
            border_top_right_radius: "10px 30px".into(),
            border_bottom_right_radius: "50%".into(),
            ..ComputedStyle::default()
        });
        let path = element_path(&el, BoxSizing::Border);
        let bbox = path.bounding_box();
        let outer = el.box_rect(BoxSizing::Border).to_rect();
        assert!((bbox.x0 - outer.x0).abs() < 1e-6);
        assert!((bbox.y1 - outer.y1).abs() < 1e-6);
        assert!(bbox.x1 <= outer.x1 + 1e-6);
        // The rounded corner is cut away, the center is not
        assert!(!path.contains(Point::new(outer.x0 + 1.0, outer.y0 + 1.0)));
        assert!(path.contains(outer.center()));
        let area = path.area().abs();
        assert!(area < outer.area() && area > outer.area() * 0.5);
    }

    #[test]
    fn test_full_radius_is_an_ellipse() {
        let el = element(ComputedStyle {
            border_top_left_radius: "50%".into(),
            border_top_right_radius: "50%".into(),
            border_bottom_right_radius: "50%".into(),
            border_bottom_left_radius: "50%".into(),
            ..ComputedStyle::default()
        });
        let area = element_path(&el, BoxSizing::Border).area().abs();
        let expected = PI * 60.0 * 40.0;
        assert!((area - expected).abs() / expected < 1e-3, "{area} vs {expected}");
    }

    #[test]
    fn test_side_paths_tile_the_border() {
        let el = element(ComputedStyle {
            border: Some("4px solid rgb(0, 0, 0)".into()),
            ..ComputedStyle::default()
        });
        let total: f64 = [Side::Top, Side::Right, Side::Bottom, Side::Left]
            .into_iter()
            .map(|side| side_path(&el, side).area().abs())
            .sum();
        let outer = el.box_rect(BoxSizing::Border);
        let inner = el.box_rect(BoxSizing::Padding);
        let ring = outer.width * outer.height - inner.width * inner.height;
        assert!((total - ring).abs() < 1e-9);
        assert!(side_path(&el, Side::Top).contains(Point::new(60.0, 12.0)));
        assert!(!side_path(&el, Side::Top).contains(Point::new(7.0, 40.0)));
    }

    #[test]
    fn test_inset_path() {
        let el = element(ComputedStyle::default());
        let bbox = inset_path(&el, 3.0).bounding_box();
        assert_eq!(bbox, kurbo::Rect::new(8.0, 13.0, 122.0, 87.0));
    }
}
