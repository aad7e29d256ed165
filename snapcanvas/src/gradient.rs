//! CSS gradient reconstruction.
//!
//! A `background-image` gradient term is turned into a [`GradientPaint`]
//! that a surface can fill with: ray endpoints for linear gradients, a
//! circle plus an anisotropic scale for radial ones. Malformed terms and
//! conic gradients resolve to `None`.

use crate::css::{self, LengthPercent, Rgba};
use crate::element::BoxRect;
use kurbo::Point;

/// Ratio between side and corner distance used for elliptical corner
/// sizes. An approximation of the browser's ellipse construction.
pub const SIDE_TO_CORNER_RATIO: f64 = 1.4141;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

impl GradientKind {
    /// Kind of a single `background-image` layer, `None` for non gradients.
    pub fn of(term: &str) -> Option<Self> {
        let term = term.trim_start();
        if term.starts_with("linear-gradient(") {
            Some(GradientKind::Linear)
        } else if term.starts_with("radial-gradient(") {
            Some(GradientKind::Radial)
        } else if term.starts_with("conic-gradient(") {
            Some(GradientKind::Conic)
        } else {
            None
        }
    }
}

/// A color at a normalized offset along the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientPaint {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<ColorStop>,
    },
    /// A circular gradient. Elliptical shapes are drawn by scaling the
    /// surface by `scale` around the fill; `center` is in unscaled space.
    Radial {
        center: Point,
        radius: f64,
        scale: (f64, f64),
        stops: Vec<ColorStop>,
    },
}

impl GradientPaint {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            GradientPaint::Linear { stops, .. } | GradientPaint::Radial { stops, .. } => stops,
        }
    }
}

/// Resolve one gradient term against its positioning area.
pub fn resolve(term: &str, area: &BoxRect) -> Option<GradientPaint> {
    match GradientKind::of(term)? {
        GradientKind::Linear => linear(arguments(term)?, area),
        GradientKind::Radial => radial(arguments(term)?, area),
        GradientKind::Conic => {
            log::debug!("conic gradients are not supported, skipping");
            None
        }
    }
}

fn arguments(term: &str) -> Option<Vec<&str>> {
    let open = term.find('(')?;
    let inner = term.trim_end().get(open + 1..)?.strip_suffix(')')?;
    Some(css::split_top_level(inner, ','))
}

/// A declared stop with its positions in px along the gradient line.
#[derive(Debug, Clone, PartialEq)]
struct RawStop {
    color: Rgba,
    positions: Vec<f64>,
}

/// Parse the stop arguments. Interpolation hints are dropped.
fn parse_stops<'a>(
    args: impl IntoIterator<Item = &'a str>,
    to_px: impl Fn(LengthPercent) -> f64,
) -> Option<Vec<RawStop>> {
    let mut stops = Vec::new();
    for arg in args {
        let mut color = Vec::new();
        let mut positions = Vec::new();
        for token in css::split_tokens(arg) {
            match LengthPercent::parse(token) {
                Some(lp) => positions.push(to_px(lp)),
                None => color.push(token),
            }
        }
        if color.is_empty() {
            continue;
        }
        positions.truncate(2);
        stops.push(RawStop {
            color: Rgba::parse(&color.join(" "))?,
            positions,
        });
    }
    (!stops.is_empty()).then_some(stops)
}

/// Fill in missing positions: the ends default to `0` and `length`, later
/// stops never sit before earlier ones, and unpositioned interior stops are
/// spread evenly between their positioned neighbours.
fn place_stops(stops: &mut [RawStop], length: f64) {
    let count = stops.len();
    if let Some(first) = stops.first_mut() {
        if first.positions.is_empty() {
            first.positions.push(0.0);
        }
    }
    if count > 1 {
        if let Some(last) = stops.last_mut() {
            if last.positions.is_empty() {
                last.positions.push(length);
            }
        }
    }

    let mut max = f64::NEG_INFINITY;
    for stop in stops.iter_mut() {
        for pos in stop.positions.iter_mut() {
            *pos = pos.max(max);
            max = *pos;
        }
    }

    let mut index = 1;
    while index < count {
        if !stops[index].positions.is_empty() {
            index += 1;
            continue;
        }
        let prev = stops[index - 1].positions.last().copied().unwrap_or(0.0);
        let run_end = (index..count)
            .find(|&i| !stops[i].positions.is_empty())
            .unwrap_or(count);
        let next = stops
            .get(run_end)
            .and_then(|s| s.positions.first().copied())
            .unwrap_or(length);
        let gaps = (run_end - index + 1) as f64;
        for (n, stop) in stops[index..run_end].iter_mut().enumerate() {
            stop.positions
                .push(prev + (next - prev) * (n + 1) as f64 / gaps);
        }
        index = run_end;
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Normalize positions to offsets over `real_length`, shifted by `prefix`.
/// The first offset outside `[0, 1]` ends the list.
fn normalize(stops: &[RawStop], prefix: f64, real_length: f64) -> Vec<ColorStop> {
    let mut out = Vec::new();
    for stop in stops {
        for pos in &stop.positions {
            let offset = round4((prefix + pos) / real_length);
            if !(0.0..=1.0).contains(&offset) {
                return out;
            }
            out.push(ColorStop {
                offset,
                color: stop.color,
            });
        }
    }
    out
}

// --- Linear ---

/// Parse an angle token to degrees, `None` if it is not an angle.
fn parse_angle(token: &str) -> Option<f64> {
    let (value, full_turn) = if let Some(v) = token.strip_suffix("deg") {
        (v, 360.0)
    } else if let Some(v) = token.strip_suffix("grad") {
        (v, 400.0)
    } else if let Some(v) = token.strip_suffix("rad") {
        (v, std::f64::consts::TAU)
    } else if let Some(v) = token.strip_suffix("turn") {
        (v, 1.0)
    } else {
        return None;
    };
    let value: f64 = value.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some((value % full_turn) * 360.0 / full_turn)
}

/// Gradient direction in degrees within `(-180, 180]`, clockwise from
/// "to top". `None` when `arg` is not a direction.
fn linear_direction(arg: &str, area: &BoxRect) -> Option<f64> {
    let arg = arg.trim();
    let angle = if let Some(sides) = arg.strip_prefix("to ") {
        let sides: Vec<&str> = sides.split_whitespace().collect();
        let has = |s: &str| sides.contains(&s);
        match sides.as_slice() {
            ["top"] => 0.0,
            ["right"] => 90.0,
            ["bottom"] => 180.0,
            ["left"] => -90.0,
            [_, _] if (has("top") || has("bottom")) && (has("left") || has("right")) => {
                let corner = (area.width / area.height).atan().to_degrees();
                let sign = if has("left") { -1.0 } else { 1.0 };
                let lean = if has("top") { -1.0 } else { 1.0 };
                sign * (90.0 + lean * corner)
            }
            _ => return None,
        }
    } else {
        parse_angle(arg)?
    };
    Some(if angle > 180.0 {
        angle - 360.0
    } else if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    })
}

fn linear(args: Vec<&str>, area: &BoxRect) -> Option<GradientPaint> {
    if !(area.width > 0.0 && area.height > 0.0) {
        return None;
    }
    let (angle, stop_args) = match args.first().and_then(|a| linear_direction(a, area)) {
        Some(angle) => (angle, &args[1..]),
        None => (180.0, &args[..]),
    };

    let diagonal = area.width.hypot(area.height);
    let clockwise = angle >= 0.0;
    let obtuse = angle.abs() > 90.0;
    let diff_horizon = 90.0
        - if obtuse {
            180.0 - angle.abs()
        } else {
            angle.abs()
        };
    let diff_diagonal = angle.abs()
        - if obtuse {
            90.0 + (area.height / area.width).atan().to_degrees()
        } else {
            (area.width / area.height).atan().to_degrees()
        };
    let length = diff_diagonal.to_radians().cos() * diagonal;
    let corner_offset = diff_diagonal.to_radians().sin() * diagonal / 2.0;
    let dx = diff_horizon.to_radians().sin() * corner_offset;
    let dy = diff_horizon.to_radians().cos() * corner_offset;
    let turn = if clockwise { 1.0 } else { -1.0 };
    let lean = if obtuse { 1.0 } else { -1.0 };

    let mut stops = parse_stops(stop_args.iter().copied(), |lp| lp.resolve(length))?;
    place_stops(&mut stops, length);
    let first = stops.first()?.positions.first().copied().unwrap_or(0.0);
    let last = stops.last()?.positions.last().copied().unwrap_or(length);
    let prefix = (-first).max(0.0);
    let affix = (last - length).max(0.0);
    let real_length = length + prefix + affix;
    if !(real_length > 0.0) {
        return None;
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let start = Point::new(
        if clockwise { area.left } else { area.right } + lean * turn * dx - sin * prefix,
        if obtuse { area.top } else { area.bottom } - dy + cos * prefix,
    );
    let end = Point::new(
        if clockwise { area.right } else { area.left } - lean * turn * dx + sin * affix,
        if obtuse { area.bottom } else { area.top } + dy - cos * affix,
    );
    Some(GradientPaint::Linear {
        start,
        end,
        stops: normalize(&stops, prefix, real_length),
    })
}

// --- Radial ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    ClosestSide,
    FarthestSide,
    ClosestCorner,
    FarthestCorner,
}

impl Extent {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "closest-side" => Extent::ClosestSide,
            "farthest-side" => Extent::FarthestSide,
            "closest-corner" => Extent::ClosestCorner,
            "farthest-corner" => Extent::FarthestCorner,
            _ => return None,
        })
    }
}

/// Split a radial descriptor into shape and position tokens. `None` when
/// the argument is a color stop rather than a descriptor.
fn radial_descriptor(arg: &str) -> Option<(Vec<&str>, Vec<&str>)> {
    let tokens = css::split_tokens(arg);
    let is_keyword = |t: &str| {
        matches!(
            t,
            "circle" | "ellipse" | "at" | "left" | "right" | "top" | "bottom" | "center"
        ) || Extent::parse(t).is_some()
    };
    if tokens.is_empty()
        || !tokens
            .iter()
            .all(|t| is_keyword(t) || LengthPercent::parse(t).is_some())
    {
        return None;
    }
    match tokens.iter().position(|t| *t == "at") {
        Some(at) => Some((tokens[..at].to_vec(), tokens[at + 1..].to_vec())),
        None => Some((tokens, Vec::new())),
    }
}

/// Center offset within the area from `at <position>` tokens.
fn radial_center(tokens: &[&str], area: &BoxRect) -> (f64, f64) {
    let keyword = |t: &str| match t {
        "left" | "top" => Some(LengthPercent::Percent(0.0)),
        "right" | "bottom" => Some(LengthPercent::Percent(100.0)),
        "center" => Some(LengthPercent::Percent(50.0)),
        _ => LengthPercent::parse(t),
    };
    let vertical = |t: &str| matches!(t, "top" | "bottom");
    let horizontal = |t: &str| matches!(t, "left" | "right");
    let half = LengthPercent::Percent(50.0);
    let (x, y) = match *tokens {
        [] => (half, half),
        [only] if vertical(only) => (half, keyword(only).unwrap_or(half)),
        [only] => (keyword(only).unwrap_or(half), half),
        [a, b, ..] if vertical(a) || horizontal(b) => {
            (keyword(b).unwrap_or(half), keyword(a).unwrap_or(half))
        }
        [a, b, ..] => (keyword(a).unwrap_or(half), keyword(b).unwrap_or(half)),
    };
    (x.resolve(area.width), y.resolve(area.height))
}

fn radial(args: Vec<&str>, area: &BoxRect) -> Option<GradientPaint> {
    let (shape_tokens, position_tokens, stop_args) =
        match args.first().and_then(|a| radial_descriptor(a)) {
            Some((shape, position)) => (shape, position, &args[1..]),
            None => (Vec::new(), Vec::new(), &args[..]),
        };

    let mut circle = false;
    let mut extent = Extent::FarthestCorner;
    let mut explicit = Vec::new();
    for token in shape_tokens {
        match token {
            "circle" => circle = true,
            "ellipse" => circle = false,
            t => match Extent::parse(t) {
                Some(e) => extent = e,
                None => explicit.extend(LengthPercent::parse(t)),
            },
        }
    }
    if explicit.len() == 1 {
        circle = true;
    }

    let (cx, cy) = radial_center(&position_tokens, area);
    let (near_x, far_x) = {
        let (a, b) = (cx.abs(), (area.width - cx).abs());
        (a.min(b), a.max(b))
    };
    let (near_y, far_y) = {
        let (a, b) = (cy.abs(), (area.height - cy).abs());
        (a.min(b), a.max(b))
    };

    let (rx, ry) = match explicit.as_slice() {
        [r] => {
            let r = r.resolve(area.width);
            (r, r)
        }
        [x, y, ..] => (x.resolve(area.width), y.resolve(area.height)),
        [] => match (extent, circle) {
            (Extent::ClosestSide, false) => (near_x, near_y),
            (Extent::FarthestSide, false) => (far_x, far_y),
            (Extent::ClosestCorner, false) => (
                near_x * SIDE_TO_CORNER_RATIO,
                near_y * SIDE_TO_CORNER_RATIO,
            ),
            (Extent::FarthestCorner, false) => {
                (far_x * SIDE_TO_CORNER_RATIO, far_y * SIDE_TO_CORNER_RATIO)
            }
            (Extent::ClosestSide, true) => {
                let r = near_x.min(near_y);
                (r, r)
            }
            (Extent::FarthestSide, true) => {
                let r = far_x.max(far_y);
                (r, r)
            }
            (Extent::ClosestCorner, true) => {
                let r = near_x.hypot(near_y);
                (r, r)
            }
            (Extent::FarthestCorner, true) => {
                let r = far_x.hypot(far_y);
                (r, r)
            }
        },
    };
    let radius = rx.min(ry);
    if !(radius > 0.0 && rx.is_finite() && ry.is_finite()) {
        return None;
    }

    // Stops are laid out along the horizontal ray, then mapped into the
    // circle of `radius`.
    let to_circle = radius / rx;
    let mut stops = parse_stops(stop_args.iter().copied(), |lp| match lp {
        LengthPercent::Px(v) => v * to_circle,
        LengthPercent::Percent(p) => radius * p / 100.0,
    })?;
    place_stops(&mut stops, radius);
    for stop in stops.iter_mut() {
        for pos in stop.positions.iter_mut() {
            *pos = pos.max(0.0);
        }
    }
    let last = stops.last()?.positions.last().copied().unwrap_or(radius);
    let real_radius = radius.max(last);

    Some(GradientPaint::Radial {
        center: Point::new(area.left + cx, area.top + cy),
        radius: real_radius,
        scale: (rx / radius, ry / radius),
        stops: normalize(&stops, 0.0, real_radius),
    })
}
