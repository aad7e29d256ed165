//! Conversions between kurbo geometry and tiny-skia types.

use kurbo::{Affine, BezPath, PathEl};
use tiny_skia::{PathBuilder, Transform};

/// Convert a kurbo path to a tiny-skia path.
///
/// Returns `None` for empty or degenerate paths.
pub(crate) fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Convert a kurbo affine to a tiny-skia transform.
pub(crate) fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(
        a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
    )
}

/// Convert a tiny-skia transform to a kurbo affine.
pub(crate) fn from_skia_transform(ts: Transform) -> Affine {
    Affine::new([
        ts.sx as f64,
        ts.ky as f64,
        ts.kx as f64,
        ts.sy as f64,
        ts.tx as f64,
        ts.ty as f64,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn test_affine_round_trip() {
        let affine = Affine::new([2.0, 0.5, -0.5, 3.0, 10.0, 20.0]);
        let back = from_skia_transform(to_skia_transform(affine));
        for (a, b) in affine.as_coeffs().iter().zip(back.as_coeffs().iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rect_path_bounds() {
        let path = kurbo::Rect::new(1.0, 2.0, 11.0, 7.0).to_path(0.1);
        let skia = to_skia_path(&path).unwrap();
        let bounds = skia.bounds();
        assert_eq!(bounds.left(), 1.0);
        assert_eq!(bounds.top(), 2.0);
        assert_eq!(bounds.right(), 11.0);
        assert_eq!(bounds.bottom(), 7.0);
    }

    #[test]
    fn test_empty_path_is_none() {
        assert!(to_skia_path(&BezPath::new()).is_none());
    }
}
