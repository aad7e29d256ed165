//! Background layer sizing, positioning and repeat tiling.
//!
//! Everything here is plain geometry over the layer's positioning area and
//! clip box; the canvas turns the resulting tile rectangles into blits.

use crate::css::{self, LengthPercent};
use kurbo::Rect;

/// `background-size` of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerSize {
    Contain,
    Cover,
    /// Width and height; `None` is `auto`.
    Explicit(Option<LengthPercent>, Option<LengthPercent>),
}

impl LayerSize {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s {
            "contain" => return LayerSize::Contain,
            "cover" => return LayerSize::Cover,
            _ => {}
        }
        let mut parts = s.split_whitespace();
        let w = parts.next().and_then(LengthPercent::parse);
        let h = parts.next().and_then(LengthPercent::parse);
        LayerSize::Explicit(w, h)
    }

    /// Tile size for an image of `intrinsic` size in an `area` sized box.
    pub fn resolve(&self, intrinsic: (f64, f64), area: (f64, f64)) -> (f64, f64) {
        let (iw, ih) = intrinsic;
        let (aw, ah) = area;
        if iw <= 0.0 || ih <= 0.0 {
            return (0.0, 0.0);
        }
        match *self {
            LayerSize::Contain => {
                let s = (aw / iw).min(ah / ih);
                (iw * s, ih * s)
            }
            LayerSize::Cover => {
                let s = (aw / iw).max(ah / ih);
                (iw * s, ih * s)
            }
            LayerSize::Explicit(None, None) => (iw, ih),
            LayerSize::Explicit(Some(w), None) => {
                let w = w.resolve(aw);
                (w, ih * w / iw)
            }
            LayerSize::Explicit(None, Some(h)) => {
                let h = h.resolve(ah);
                (iw * h / ih, h)
            }
            LayerSize::Explicit(Some(w), Some(h)) => (w.resolve(aw), h.resolve(ah)),
        }
    }
}

/// Tile origin offset within the positioning area.
///
/// Percentages place the same point of the tile and the area on top of
/// each other, so they resolve against `area - tile`.
pub fn layer_position(position: &str, area: (f64, f64), tile: (f64, f64)) -> (f64, f64) {
    let keyword = |t: &str| match t {
        "left" | "top" => Some(LengthPercent::Percent(0.0)),
        "center" => Some(LengthPercent::Percent(50.0)),
        "right" | "bottom" => Some(LengthPercent::Percent(100.0)),
        _ => LengthPercent::parse(t),
    };
    let tokens: Vec<&str> = position.split_whitespace().collect();
    let zero = LengthPercent::Percent(0.0);
    let half = LengthPercent::Percent(50.0);
    let (x, y) = match *tokens.as_slice() {
        [] => (zero, zero),
        [t] if matches!(t, "top" | "bottom") => (half, keyword(t).unwrap_or(half)),
        [t] => (keyword(t).unwrap_or(zero), half),
        [a, b, ..] if matches!(a, "top" | "bottom") || matches!(b, "left" | "right") => {
            (keyword(b).unwrap_or(zero), keyword(a).unwrap_or(zero))
        }
        [a, b, ..] => (keyword(a).unwrap_or(zero), keyword(b).unwrap_or(zero)),
    };
    (
        x.resolve(area.0 - tile.0),
        y.resolve(area.1 - tile.1),
    )
}

/// Which axes a layer repeats along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub x: bool,
    pub y: bool,
}

impl Repeat {
    /// Parse `background-repeat`. `space` and `round` repeat like `repeat`.
    pub fn parse(s: &str) -> Self {
        let axis = |t: &str| !matches!(t, "no-repeat");
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match *tokens.as_slice() {
            ["repeat-x"] => Repeat { x: true, y: false },
            ["repeat-y"] => Repeat { x: false, y: true },
            [t] => Repeat {
                x: axis(t),
                y: axis(t),
            },
            [a, b, ..] => Repeat {
                x: axis(a),
                y: axis(b),
            },
            [] => Repeat { x: true, y: true },
        }
    }
}

/// Upper bound on tile placements drawn for one layer.
pub const MAX_TILES: usize = 65_536;

/// Step range `[low, high]` of tiles along one axis that intersect
/// `[clip_start, clip_end)`. Step 0 is always included; without repeat it is
/// the only one.
fn steps(origin: f64, size: f64, clip_start: f64, clip_end: f64, repeat: bool) -> (i64, i64) {
    if !repeat || size <= 0.0 {
        return (0, 0);
    }
    let low = ((clip_start - origin) / size).floor().min(0.0);
    let high = (((clip_end - origin) / size).ceil() - 1.0).max(0.0);
    (low as i64, high as i64)
}

/// Rectangles of every tile placement that can touch `clip`.
///
/// The first tile sits at `origin`; repeating axes step outwards in both
/// directions until a tile passes the clip edge. A layer needing more than
/// [`MAX_TILES`] placements is drawn once at `origin` instead.
pub fn tile_rects(origin: (f64, f64), tile: (f64, f64), clip: Rect, repeat: Repeat) -> Vec<Rect> {
    let (w, h) = tile;
    if !(w > 0.0 && h > 0.0) {
        return Vec::new();
    }
    let (x_low, x_high) = steps(origin.0, w, clip.x0, clip.x1, repeat.x);
    let (y_low, y_high) = steps(origin.1, h, clip.y0, clip.y1, repeat.y);
    let count = (x_high as f64 - x_low as f64 + 1.0) * (y_high as f64 - y_low as f64 + 1.0);
    if count > MAX_TILES as f64 {
        log::warn!("background tile {w}x{h} needs {count} placements; drawing it once");
        return vec![Rect::new(origin.0, origin.1, origin.0 + w, origin.1 + h)];
    }
    let mut rects = Vec::with_capacity(count as usize);
    for j in y_low..=y_high {
        for i in x_low..=x_high {
            let x = origin.0 + i as f64 * w;
            let y = origin.1 + j as f64 * h;
            rects.push(Rect::new(x, y, x + w, y + h));
        }
    }
    rects
}

/// Per-layer values of a comma separated background property.
pub fn layer_values(value: &str) -> Vec<&str> {
    css::split_top_level(value, ',')
}
