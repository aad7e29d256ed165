//! Box-model geometry of one layout node.
//!
//! [`Element::new`] resolves everything once: the three boxes, borders,
//! corner radii and shadow parameters. Accessors only read the result, so an
//! element can be measured and painted any number of times.

use crate::css::{self, LengthPercent, Rgba};
use crate::node::{ComputedStyle, Dataset, Edge, NodeRecord};
use kurbo::Point;

/// Which box of the CSS box model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoxSizing {
    #[default]
    Border,
    Padding,
    Content,
}

impl BoxSizing {
    /// Parse a `background-clip` style value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "border-box" | "border" => Some(BoxSizing::Border),
            "padding-box" | "padding" => Some(BoxSizing::Padding),
            "content-box" | "content" => Some(BoxSizing::Content),
            _ => None,
        }
    }
}

/// An axis-aligned box in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxRect {
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Shrink by per-side amounts, never past the center.
    pub(crate) fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let left_edge = self.left + left.max(0.0);
        let right_edge = (self.right - right.max(0.0)).max(left_edge);
        let top_edge = self.top + top.max(0.0);
        let bottom_edge = (self.bottom - bottom.max(0.0)).max(top_edge);
        Self::from_edges(
            left_edge.min(right_edge),
            top_edge.min(bottom_edge),
            right_edge,
            bottom_edge,
        )
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// Inclusive containment.
    pub fn contains(&self, other: &BoxRect) -> bool {
        const EPS: f64 = 1e-9;
        other.left >= self.left - EPS
            && other.top >= self.top - EPS
            && other.right <= self.right + EPS
            && other.bottom <= self.bottom + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "none" | "hidden" => BorderStyle::None,
            "solid" | "groove" | "ridge" | "inset" | "outset" => BorderStyle::Solid,
            "dashed" => BorderStyle::Dashed,
            "dotted" => BorderStyle::Dotted,
            "double" => BorderStyle::Double,
            _ => return None,
        })
    }
}

/// Resolved border of one side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderSide {
    pub width: f64,
    pub style: BorderStyle,
    pub color: Option<Rgba>,
}

impl BorderSide {
    /// Parse a `"<width> <style> <color>"` shorthand.
    ///
    /// Tokens may come in any order. A missing or `none` style gives a zero
    /// width border.
    pub fn parse(shorthand: &str) -> Self {
        let mut width = None;
        let mut style = None;
        let mut color = Vec::new();
        for token in css::split_tokens(shorthand) {
            if width.is_none() && token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
                width = css::parse_number_prefix(token);
            } else if let Some(s) = style.is_none().then(|| BorderStyle::parse(token)).flatten() {
                style = Some(s);
            } else {
                color.push(token);
            }
        }
        let style = style.unwrap_or_default();
        let width = match style {
            BorderStyle::None => 0.0,
            _ => width.unwrap_or(0.0).max(0.0),
        };
        Self {
            width,
            style,
            color: Rgba::parse(&color.join(" ")),
        }
    }

    /// Whether painting this side changes any pixel.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0
            && self.style != BorderStyle::None
            && self.color.is_some_and(|c| !c.is_transparent())
    }
}

/// Borders of the four sides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Border {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

impl Border {
    fn resolve(style: &ComputedStyle) -> Self {
        let side = |own: &Option<String>| {
            own.as_deref()
                .or(style.border.as_deref())
                .map(BorderSide::parse)
                .unwrap_or_default()
        };
        Self {
            top: side(&style.border_top),
            right: side(&style.border_right),
            bottom: side(&style.border_bottom),
            left: side(&style.border_left),
        }
    }

    /// The shared side when all four are identical.
    pub fn uniform(&self) -> Option<&BorderSide> {
        (self.top == self.right && self.top == self.bottom && self.top == self.left)
            .then_some(&self.top)
    }

    pub fn sides(&self) -> [(Side, &BorderSide); 4] {
        [
            (Side::Top, &self.top),
            (Side::Right, &self.right),
            (Side::Bottom, &self.bottom),
            (Side::Left, &self.left),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// The eight corner radii.
///
/// `left_top` is the horizontal radius of the top-left corner and
/// `top_left` its vertical radius; the other six follow the same pattern.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderRadius {
    pub left_top: f64,
    pub top_left: f64,
    pub right_top: f64,
    pub top_right: f64,
    pub right_bottom: f64,
    pub bottom_right: f64,
    pub left_bottom: f64,
    pub bottom_left: f64,
}

impl BorderRadius {
    /// Resolve the four corner properties against a box and clamp them so
    /// that radii sharing an edge never exceed its length.
    pub fn resolve(style: &ComputedStyle, width: f64, height: f64) -> Self {
        let corner = |value: &str| {
            let mut parts = css::split_tokens(value).into_iter();
            let h = parts.next().and_then(LengthPercent::parse);
            let v = parts.next().and_then(LengthPercent::parse).or(h);
            (
                h.map_or(0.0, |h| h.resolve(width)).max(0.0),
                v.map_or(0.0, |v| v.resolve(height)).max(0.0),
            )
        };
        let (left_top, top_left) = corner(&style.border_top_left_radius);
        let (right_top, top_right) = corner(&style.border_top_right_radius);
        let (right_bottom, bottom_right) = corner(&style.border_bottom_right_radius);
        let (left_bottom, bottom_left) = corner(&style.border_bottom_left_radius);
        Self {
            left_top,
            top_left,
            right_top,
            top_right,
            right_bottom,
            bottom_right,
            left_bottom,
            bottom_left,
        }
        .clamped(width, height)
    }

    fn clamped(self, width: f64, height: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let pairs = [
            (self.left_top + self.right_top, width),
            (self.left_bottom + self.right_bottom, width),
            (self.top_left + self.bottom_left, height),
            (self.top_right + self.bottom_right, height),
        ];
        if pairs.iter().all(|(sum, edge)| sum <= edge) {
            return self;
        }
        let scale = pairs
            .iter()
            .filter(|(sum, _)| *sum > 0.0)
            .map(|(sum, edge)| edge / sum)
            .fold(1.0_f64, f64::min);
        self.scaled(scale)
    }

    fn scaled(self, s: f64) -> Self {
        Self {
            left_top: self.left_top * s,
            top_left: self.top_left * s,
            right_top: self.right_top * s,
            top_right: self.top_right * s,
            right_bottom: self.right_bottom * s,
            bottom_right: self.bottom_right * s,
            left_bottom: self.left_bottom * s,
            bottom_left: self.bottom_left * s,
        }
    }

    /// Radii of a box inset by the given per-side amounts.
    pub(crate) fn inset(self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let shrink = |r: f64, by: f64| (r - by).max(0.0);
        Self {
            left_top: shrink(self.left_top, left),
            top_left: shrink(self.top_left, top),
            right_top: shrink(self.right_top, right),
            top_right: shrink(self.top_right, top),
            right_bottom: shrink(self.right_bottom, right),
            bottom_right: shrink(self.bottom_right, bottom),
            left_bottom: shrink(self.left_bottom, left),
            bottom_left: shrink(self.bottom_left, bottom),
        }
    }

    pub fn is_zero(&self) -> bool {
        [
            self.left_top,
            self.top_left,
            self.right_top,
            self.top_right,
            self.right_bottom,
            self.bottom_right,
            self.left_bottom,
            self.bottom_left,
        ]
        .iter()
        .all(|r| *r <= 0.0)
    }
}

/// Parameters of a box or text shadow. `color: None` means no shadow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shadow {
    pub color: Option<Rgba>,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
}

impl Shadow {
    pub const NONE: Shadow = Shadow {
        color: None,
        offset_x: 0.0,
        offset_y: 0.0,
        blur: 0.0,
    };

    /// Parse the first shadow of a `box-shadow` or `text-shadow` value.
    ///
    /// Lengths are read in order as offset x, offset y and blur; the
    /// remaining tokens form the color. Inset shadows are not painted.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "none" {
            return Self::NONE;
        }
        let first = css::split_top_level(value, ',')
            .into_iter()
            .next()
            .unwrap_or_default();
        let mut lengths = Vec::new();
        let mut color = Vec::new();
        for token in css::split_tokens(first) {
            if token == "inset" {
                return Self::NONE;
            }
            match LengthPercent::parse(token) {
                Some(LengthPercent::Px(v)) => lengths.push(v),
                _ => color.push(token),
            }
        }
        if lengths.len() < 2 {
            return Self::NONE;
        }
        Self {
            color: Rgba::parse(&color.join(" ")),
            offset_x: lengths[0],
            offset_y: lengths[1],
            blur: lengths.get(2).copied().unwrap_or(0.0).max(0.0),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.color.is_some_and(|c| !c.is_transparent())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Geometry {
    border_box: BoxRect,
    padding_box: BoxRect,
    content_box: BoxRect,
    border: Border,
    radius: BorderRadius,
    padding_radius: BorderRadius,
    content_radius: BorderRadius,
    background_color: Rgba,
    box_shadow: Shadow,
    text_shadow: Shadow,
}

impl Geometry {
    fn resolve(record: &NodeRecord) -> Self {
        let style = &record.style;
        let (left, top, right, bottom) = record.edges();
        let border_box = BoxRect::from_edges(left, top, right, bottom);
        let border = Border::resolve(style);
        let padding_box = border_box.inset(
            border.top.width,
            border.right.width,
            border.bottom.width,
            border.left.width,
        );
        let pad = |v: &str| css::px(v).max(0.0);
        let (pt, pr, pb, pl) = (
            pad(&style.padding_top),
            pad(&style.padding_right),
            pad(&style.padding_bottom),
            pad(&style.padding_left),
        );
        let content_box = padding_box.inset(pt, pr, pb, pl);

        let radius = BorderRadius::resolve(style, border_box.width, border_box.height);
        let padding_radius = radius.inset(
            border.top.width,
            border.right.width,
            border.bottom.width,
            border.left.width,
        );
        let content_radius = padding_radius.inset(pt, pr, pb, pl);

        Self {
            border_box,
            padding_box,
            content_box,
            border,
            radius,
            padding_radius,
            content_radius,
            background_color: Rgba::parse(&style.background_color).unwrap_or(Rgba::TRANSPARENT),
            box_shadow: Shadow::parse(&style.box_shadow),
            text_shadow: Shadow::parse(&style.text_shadow),
        }
    }
}

/// A layout node with its resolved box model.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    record: NodeRecord,
    geometry: Geometry,
}

impl Element {
    pub fn new(record: NodeRecord) -> Self {
        let geometry = Geometry::resolve(&record);
        Self { record, geometry }
    }

    /// The same node moved to `rect` (border box), as it sits before its
    /// `transform` is applied.
    pub fn untransformed(&self, rect: kurbo::Rect) -> Self {
        let mut record = self.record.clone();
        record.left = Edge::Px(rect.x0);
        record.top = Edge::Px(rect.y0);
        record.right = Edge::Px(rect.x1);
        record.bottom = Edge::Px(rect.y1);
        record.width = rect.width();
        record.height = rect.height();
        Self::new(record)
    }

    pub fn record(&self) -> &NodeRecord {
        &self.record
    }

    pub fn style(&self) -> &ComputedStyle {
        &self.record.style
    }

    pub fn dataset(&self) -> &Dataset {
        &self.record.dataset
    }

    pub fn box_rect(&self, sizing: BoxSizing) -> BoxRect {
        match sizing {
            BoxSizing::Border => self.geometry.border_box,
            BoxSizing::Padding => self.geometry.padding_box,
            BoxSizing::Content => self.geometry.content_box,
        }
    }

    pub fn vertices(&self, sizing: BoxSizing) -> [Point; 4] {
        self.box_rect(sizing).vertices()
    }

    pub fn border(&self) -> &Border {
        &self.geometry.border
    }

    /// Corner radii of the border box.
    pub fn border_radius(&self) -> &BorderRadius {
        &self.geometry.radius
    }

    /// Corner radii of any box; inner boxes follow the border curve.
    pub fn radius(&self, sizing: BoxSizing) -> &BorderRadius {
        match sizing {
            BoxSizing::Border => &self.geometry.radius,
            BoxSizing::Padding => &self.geometry.padding_radius,
            BoxSizing::Content => &self.geometry.content_radius,
        }
    }

    /// Background color, transparent when unparseable.
    pub fn background_color(&self) -> Rgba {
        self.geometry.background_color
    }

    pub fn box_shadow(&self) -> &Shadow {
        &self.geometry.box_shadow
    }

    pub fn text_shadow(&self) -> &Shadow {
        &self.geometry.text_shadow
    }

    /// `opacity` in `[0, 1]`, 1 when unparseable.
    pub fn opacity(&self) -> f64 {
        self.record
            .style
            .opacity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or(1.0, |v| v.clamp(0.0, 1.0))
    }
}
