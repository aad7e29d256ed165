//! Pipeline tests against a recording surface.

mod common;

use common::{Op, RecordingSurface, SolidImageLoader, CHAR_WIDTH};
use kurbo::{Affine, Rect};
use rstest::rstest;
use serde_json::json;
use snapcanvas::{
    paint_tree, Canvas, Element, ElementProvider, FileImageLoader, Paint, RenderConfig, Rgba,
    SnapError, Snapshot,
};

fn snapshot(value: serde_json::Value) -> Snapshot {
    serde_json::from_value(value).unwrap()
}

fn canvas_for(snapshot: &Snapshot, config: RenderConfig) -> Canvas<RecordingSurface> {
    let container = Element::new(snapshot.container().unwrap());
    Canvas::new(RecordingSurface::new(300, 150), &container, config)
}

async fn paint(snapshot: &Snapshot) -> RecordingSurface {
    let mut canvas = canvas_for(snapshot, RenderConfig::default());
    let loader = SolidImageLoader {
        width: 10,
        height: 10,
    };
    paint_tree(&mut canvas, snapshot, &loader).await.unwrap();
    assert_eq!(canvas.depth(), 0);
    canvas.into_surface()
}

fn node(id: &str, color: &str) -> serde_json::Value {
    json!({
        "id": id, "left": 0, "top": 0, "width": 10, "height": 10,
        "style": {"background-color": color}
    })
}

#[tokio::test]
async fn test_paint_order_follows_document_order_into_components() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [
            node("a", "rgb(1, 0, 0)"),
            {"id": "card", "left": 0, "top": 0, "width": 10, "height": 10,
             "style": {"background-color": "rgb(9, 9, 9)"},
             "dataset": {"component": true}},
            node("c", "rgb(3, 0, 0)"),
        ],
        "components": {
            "card": [node("b1", "rgb(2, 1, 0)"), node("b2", "rgb(2, 2, 0)")]
        }
    }));
    let surface = paint(&snapshot).await;
    assert_eq!(
        surface.solid_fills(),
        vec![
            Rgba::rgb(1, 0, 0),
            Rgba::rgb(2, 1, 0),
            Rgba::rgb(2, 2, 0),
            Rgba::rgb(3, 0, 0),
        ]
    );
}

#[tokio::test]
async fn test_repeated_component_is_painted_once() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "loop", "dataset": {"component": true}}],
        "components": {
            "loop": [node("inner", "rgb(5, 5, 5)"), {"id": "loop", "dataset": {"component": "true"}}]
        }
    }));
    let surface = paint(&snapshot).await;
    assert_eq!(surface.solid_fills(), vec![Rgba::rgb(5, 5, 5)]);
}

#[tokio::test]
async fn test_save_and_restore_are_balanced() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150,
                      "style": {"background-color": "white"}},
        "nodes": [
            {"id": "img", "left": 10, "top": 10, "width": 50, "height": 50, "src": "a.png",
             "style": {"border": "2px dashed red", "border-top-left-radius": "8px",
                       "box-shadow": "rgba(0, 0, 0, 0.5) 2px 2px 4px 0px",
                       "background-color": "blue"}},
            {"id": "txt", "left": 10, "top": 70, "width": 100, "height": 20,
             "dataset": {"text": "hello world"},
             "style": {"text-decoration-line": "underline", "text-shadow": "red 1px 1px 2px"}},
        ]
    }));
    let surface = paint(&snapshot).await;
    let saves = surface.count(|op| matches!(op, Op::Save));
    let restores = surface.count(|op| matches!(op, Op::Restore));
    assert_eq!(saves, restores);
    assert_eq!(surface.depth(), 0);
}

#[tokio::test]
async fn test_box_shadow_fills_opaque_background_then_clears() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "card", "left": 10, "top": 10, "width": 50, "height": 50,
                   "style": {"background-color": "rgba(0, 0, 255, 0.5)",
                             "box-shadow": "rgb(0, 0, 0) 3px 4px 5px 0px"}}]
    }));
    let mut canvas = canvas_for(
        &snapshot,
        RenderConfig {
            device_pixel_ratio: 2.0,
            ..RenderConfig::default()
        },
    );
    paint_tree(&mut canvas, &snapshot, &FileImageLoader::default())
        .await
        .unwrap();
    let ops = &canvas.surface().ops;
    let shadow = ops
        .iter()
        .position(|op| matches!(op, Op::Shadow { .. }))
        .unwrap();
    assert_eq!(
        ops[shadow],
        Op::Shadow {
            color: Rgba::BLACK,
            blur: 10.0,
            offset_x: 6.0,
            offset_y: 8.0,
        }
    );
    assert_eq!(
        ops[shadow + 1],
        Op::Fill {
            bounds: Rect::new(10.0, 10.0, 60.0, 60.0),
            paint: Paint::Solid(Rgba::rgb(0, 0, 255)),
        }
    );
    assert_eq!(ops[shadow + 2], Op::ClearShadow);
}

#[tokio::test]
async fn test_ellipsis_truncates_single_line() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "title", "left": 0, "top": 0, "width": 200, "height": 40,
                   "dataset": {"text": "ABCDEFGHIJKLMNOPQRSTUVWXYZ"},
                   "style": {"font-size": "16px", "line-height": "40px",
                             "text-overflow": "ellipsis"}}]
    }));
    let surface = paint(&snapshot).await;
    let texts = surface.texts();
    assert_eq!(texts, vec!["ABCDEFGHIJKLMNOPQ..."]);
    assert!(texts[0].ends_with("..."));
    assert!(texts[0].chars().count() as f64 * CHAR_WIDTH <= 200.0);
}

fn text_ops(surface: &RecordingSurface) -> Vec<(String, f64, f64)> {
    surface
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Text { text, x, y, .. } => Some((text.clone(), *x, *y)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_ellipsis_with_default_line_height() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "title", "left": 0, "top": 0, "width": 100, "height": 40,
                   "dataset": {"text": "ABCDEFGHIJKLMNOPQRSTUVWXYZ"},
                   "style": {"font-size": "16px", "text-overflow": "ellipsis"}}]
    }));
    let surface = paint(&snapshot).await;
    let lines = text_ops(&surface);
    // 16px * 1.35 = 21.6px lines; two fit in 40px and share it evenly.
    let texts: Vec<&str> = lines.iter().map(|(t, _, _)| t.as_str()).collect();
    assert_eq!(texts, vec!["ABCDEFGHIJ", "KLMNOPQ..."]);
    assert!(texts[1].chars().count() as f64 * CHAR_WIDTH <= 100.0);
    assert!((lines[1].2 - lines[0].2 - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_hard_break_on_last_line_drops_following_text() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "note", "left": 0, "top": 0, "width": 100, "height": 20,
                   "dataset": {"text": "ab\ncd"},
                   "style": {"font-size": "20px", "line-height": "20px"}}]
    }));
    let surface = paint(&snapshot).await;
    assert_eq!(surface.texts(), vec!["ab"]);
}

#[rstest]
#[case(json!({"text": "Hi", "icon": "0x41"}), "Hi")]
#[case(json!({"icon": "0x41"}), "A")]
#[case(json!({"icon": 66}), "B")]
#[tokio::test]
async fn test_text_takes_precedence_over_icon(
    #[case] dataset: serde_json::Value,
    #[case] expected: &str,
) {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "label", "left": 0, "top": 0, "width": 100, "height": 20,
                   "dataset": dataset}]
    }));
    let surface = paint(&snapshot).await;
    assert_eq!(surface.texts(), vec![expected]);
}

#[tokio::test]
async fn test_rtl_right_aligned_indent() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "para", "left": 10, "top": 0, "width": 100, "height": 40,
                   "dataset": {"text": "aaaa bbbb cccc"},
                   "style": {"font-size": "20px", "line-height": "20px",
                             "direction": "rtl", "text-align": "right",
                             "text-indent": "20px"}}]
    }));
    let surface = paint(&snapshot).await;
    let xs: Vec<f64> = text_ops(&surface).iter().map(|(_, x, _)| *x).collect();
    assert_eq!(xs, vec![90.0, 110.0]);
}

#[tokio::test]
async fn test_sub_pixel_tiles_are_capped() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "noise", "left": 0, "top": 0, "width": 100, "height": 100,
                   "style": {"background-image": "url(\"tile.png\")",
                             "background-size": "0.05px 0.05px",
                             "background-repeat": "repeat"}}]
    }));
    let surface = paint(&snapshot).await;
    let tiles = surface.images();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].1, Rect::new(0.0, 0.0, 0.05, 0.05));
}

#[tokio::test]
async fn test_text_wraps_and_aligns() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "body", "left": 20, "top": 10, "width": 100, "height": 40,
                   "dataset": {"text": "hello world again"},
                   "style": {"font-size": "20px", "line-height": "20px",
                             "text-align": "center"}}]
    }));
    let surface = paint(&snapshot).await;
    let lines: Vec<(String, f64, f64)> = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Text { text, x, y, .. } => Some((text.clone(), *x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0, "hello ");
    assert_eq!(lines[1].0, "world again");
    // Center of the content box, baseline nudged by 8% of the font size.
    assert_eq!(lines[0].1, 70.0);
    assert!((lines[0].2 - 11.6).abs() < 1e-9);
    assert!((lines[1].2 - 31.6).abs() < 1e-9);
}

#[tokio::test]
async fn test_tiled_background_covers_box() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "tiles", "left": 0, "top": 0, "width": 100, "height": 100,
                   "style": {"background-image": "url(\"tile.png\")",
                             "background-repeat": "repeat"}}]
    }));
    let surface = paint(&snapshot).await;
    let tiles = surface.images();
    assert_eq!(tiles.len(), 100);
    let mut covered = 0.0;
    for (src, dst) in &tiles {
        assert_eq!(*src, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(dst.width(), 10.0);
        assert!(dst.x0 >= 0.0 && dst.y0 >= 0.0 && dst.x1 <= 100.0 && dst.y1 <= 100.0);
        covered += dst.area();
    }
    assert_eq!(covered, 100.0 * 100.0);
}

#[tokio::test]
async fn test_missing_image_still_paints_border() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "img", "left": 0, "top": 0, "width": 40, "height": 40,
                   "src": "missing.png", "style": {"border": "1px solid black"}}]
    }));
    let surface = paint(&snapshot).await;
    assert!(surface.images().is_empty());
    assert_eq!(surface.count(|op| matches!(op, Op::Stroke { .. })), 1);
}

#[tokio::test]
async fn test_video_draws_black_poster_and_glyph() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "clip", "left": 0, "top": 0, "width": 160, "height": 90,
                   "src": "clip.mp4", "objectFit": "contain", "poster": "poster.png"}]
    }));
    let surface = paint(&snapshot).await;
    let fills = surface.solid_fills();
    assert_eq!(fills[0], Rgba::BLACK);
    assert_eq!(*fills.last().unwrap(), Rgba::rgba(255, 255, 255, 0.8));
    let images = surface.images();
    assert_eq!(images.len(), 1);
    // A square poster letterboxed into a 160x90 box.
    assert_eq!(images[0].1, Rect::new(35.0, 0.0, 125.0, 90.0));
}

#[tokio::test]
async fn test_transform_draws_untransformed_box_around_center() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "zoomed", "left": 0, "top": 0, "width": 200, "height": 200,
                   "style": {"transform": "matrix(2, 0, 0, 2, 0, 0)",
                             "width": "100px", "height": "100px",
                             "background-color": "red"}}]
    }));
    let surface = paint(&snapshot).await;
    let transform = surface
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Transform(t) => Some(*t),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        transform,
        Affine::new([2.0, 0.0, 0.0, 2.0, -100.0, -100.0])
    );
    let fill = surface
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Fill { bounds, .. } => Some(*bounds),
            _ => None,
        })
        .unwrap();
    assert_eq!(fill, Rect::new(50.0, 50.0, 150.0, 150.0));
}

#[tokio::test]
async fn test_singular_transform_aborts_with_balanced_stack() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 0, "top": 0, "width": 300, "height": 150},
        "nodes": [{"id": "flat", "left": 0, "top": 0, "width": 10, "height": 10,
                   "style": {"transform": "matrix(1, 2, 2, 4, 0, 0)"}}]
    }));
    let mut canvas = canvas_for(&snapshot, RenderConfig::default());
    let err = paint_tree(&mut canvas, &snapshot, &FileImageLoader::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SnapError::NonInvertibleTransform(_)));
    assert_eq!(canvas.depth(), 0);
    assert_eq!(canvas.surface().depth(), 0);
}

#[tokio::test]
async fn test_opacity_and_device_scale() {
    let snapshot = snapshot(json!({
        "container": {"id": "root", "left": 50, "top": 20, "width": 300, "height": 150},
        "nodes": [{"id": "faded", "left": 60, "top": 30, "width": 10, "height": 10,
                   "style": {"opacity": "0.25"}}]
    }));
    let mut canvas = canvas_for(
        &snapshot,
        RenderConfig {
            scale: 2.0,
            device_pixel_ratio: 1.5,
            ..RenderConfig::default()
        },
    );
    paint_tree(&mut canvas, &snapshot, &FileImageLoader::default())
        .await
        .unwrap();
    let ops = &canvas.surface().ops;
    assert_eq!(
        ops[0],
        Op::SetTransform(Affine::new([3.0, 0.0, 0.0, 3.0, -150.0, -60.0]))
    );
    assert!(ops.contains(&Op::GlobalAlpha(0.25)));
}
