//! Raw layout records as captured from the host UI tree.
//!
//! A [`NodeRecord`] is deserialized from the element provider and never
//! modified afterwards. Derived geometry lives in
//! [`Element`](crate::element::Element).

use serde::{Deserialize, Deserializer, Serialize};

/// One box edge coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawEdge", into = "RawEdge")]
pub enum Edge {
    Px(f64),
    #[default]
    Auto,
}

impl Edge {
    pub fn px(self) -> Option<f64> {
        match self {
            Edge::Px(v) => Some(v),
            Edge::Auto => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawEdge {
    Num(f64),
    Str(String),
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        match raw {
            RawEdge::Num(v) if v.is_finite() => Edge::Px(v),
            RawEdge::Num(_) => Edge::Auto,
            RawEdge::Str(s) => match crate::css::parse_number_prefix(&s) {
                Some(v) if s.trim() != "auto" => Edge::Px(v),
                _ => Edge::Auto,
            },
        }
    }
}

impl From<Edge> for RawEdge {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Px(v) => RawEdge::Num(v),
            Edge::Auto => RawEdge::Str("auto".to_string()),
        }
    }
}

/// Computed style strings of one node.
///
/// Property names follow CSS. Missing properties take their initial
/// computed value, so a record with no style at all paints nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComputedStyle {
    pub background_color: String,
    pub background_image: String,
    pub background_position: String,
    pub background_size: String,
    pub background_repeat: String,
    pub background_clip: String,

    pub padding_top: String,
    pub padding_right: String,
    pub padding_bottom: String,
    pub padding_left: String,

    pub border: Option<String>,
    pub border_top: Option<String>,
    pub border_right: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: Option<String>,
    pub border_top_left_radius: String,
    pub border_top_right_radius: String,
    pub border_bottom_right_radius: String,
    pub border_bottom_left_radius: String,

    pub box_shadow: String,
    pub opacity: String,
    pub filter: String,
    pub transform: String,
    /// Layout width before `transform` is applied.
    pub width: Option<String>,
    /// Layout height before `transform` is applied.
    pub height: Option<String>,

    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_align: String,
    pub line_height: String,
    pub text_overflow: String,
    pub text_indent: String,
    pub direction: String,
    pub color: String,
    pub text_shadow: String,
    pub text_decoration_line: String,
    pub text_decoration_style: String,
    pub text_decoration_color: Option<String>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        fn s(v: &str) -> String {
            v.to_string()
        }
        Self {
            background_color: s("rgba(0, 0, 0, 0)"),
            background_image: s("none"),
            background_position: s("0% 0%"),
            background_size: s("auto"),
            background_repeat: s("repeat"),
            background_clip: s("border-box"),
            padding_top: s("0px"),
            padding_right: s("0px"),
            padding_bottom: s("0px"),
            padding_left: s("0px"),
            border: None,
            border_top: None,
            border_right: None,
            border_bottom: None,
            border_left: None,
            border_top_left_radius: s("0px"),
            border_top_right_radius: s("0px"),
            border_bottom_right_radius: s("0px"),
            border_bottom_left_radius: s("0px"),
            box_shadow: s("none"),
            opacity: s("1"),
            filter: s("none"),
            transform: s("none"),
            width: None,
            height: None,
            font_family: s("sans-serif"),
            font_size: s("16px"),
            font_weight: s("400"),
            font_style: s("normal"),
            text_align: s("left"),
            line_height: s("normal"),
            text_overflow: s("clip"),
            text_indent: s("0px"),
            direction: s("ltr"),
            color: s("rgb(0, 0, 0)"),
            text_shadow: s("none"),
            text_decoration_line: s("none"),
            text_decoration_style: s("solid"),
            text_decoration_color: None,
        }
    }
}

/// Free-form `data-*` payload of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub text: Option<String>,
    /// Icon font codepoint: decimal, `0x` or `U+` hex.
    #[serde(deserialize_with = "string_or_number")]
    pub icon: Option<String>,
    /// Marks the root of a nested component whose own nodes replace it.
    #[serde(deserialize_with = "truthy")]
    pub component: bool,
}

impl Dataset {
    /// The icon as a character.
    pub fn icon_char(&self) -> Option<char> {
        let icon = self.icon.as_deref()?.trim();
        let code = if let Some(hex) = icon
            .strip_prefix("0x")
            .or_else(|| icon.strip_prefix("0X"))
            .or_else(|| icon.strip_prefix("U+"))
            .or_else(|| icon.strip_prefix("u+"))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            icon.parse::<u32>().ok()?
        };
        char::from_u32(code)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) => !s.is_empty() && s != "false",
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(_) => true,
    })
}

/// One layout node. Geometry is the border box in layout pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub left: Edge,
    pub top: Edge,
    pub right: Edge,
    pub bottom: Edge,
    pub width: f64,
    pub height: f64,
    #[serde(alias = "computedStyle")]
    pub style: ComputedStyle,
    pub dataset: Dataset,
    /// Image or video source.
    pub src: Option<String>,
    /// Image mode: `aspectFit`, `aspectFill` or stretch.
    pub mode: Option<String>,
    /// Present on video nodes.
    pub object_fit: Option<String>,
    pub poster: Option<String>,
    pub canvas_id: Option<String>,
}

impl NodeRecord {
    /// A node with fixed geometry and default style.
    pub fn with_rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Edge::Px(left),
            top: Edge::Px(top),
            right: Edge::Px(left + width),
            bottom: Edge::Px(top + height),
            width,
            height,
            ..Self::default()
        }
    }

    /// Resolved `(left, top, right, bottom)`.
    ///
    /// An `auto` edge is derived from the opposite edge and the size. When
    /// both edges of an axis are `auto` the axis starts at 0.
    pub fn edges(&self) -> (f64, f64, f64, f64) {
        let width = finite(self.width);
        let height = finite(self.height);
        let (left, right) = resolve_axis(self.left, self.right, width);
        let (top, bottom) = resolve_axis(self.top, self.bottom, height);
        (left, top, right, bottom)
    }
}

fn resolve_axis(start: Edge, end: Edge, size: f64) -> (f64, f64) {
    match (start.px(), end.px()) {
        (Some(s), Some(e)) => (s, e),
        (Some(s), None) => (s, s + size),
        (None, Some(e)) => (e - size, e),
        (None, None) => (0.0, size),
    }
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_deserialize_record() {
        let record: NodeRecord = serde_json::from_str(
            r#"{
                "id": "title",
                "left": 10, "top": "20px", "right": 110, "bottom": "auto",
                "width": 100, "height": 30,
                "computedStyle": {
                    "background-color": "rgb(255, 0, 0)",
                    "border-top": "2px solid rgb(0, 0, 0)",
                    "font-size": "14px"
                },
                "dataset": {"text": "hello", "icon": 59000, "component": "true"},
                "objectFit": "cover",
                "canvasId": "chart"
            }"#,
        )
        .unwrap();
        assert_eq!(record.id, "title");
        assert_eq!(record.top, Edge::Px(20.0));
        assert_eq!(record.bottom, Edge::Auto);
        assert_eq!(record.style.background_color, "rgb(255, 0, 0)");
        assert_eq!(record.style.border_top.as_deref(), Some("2px solid rgb(0, 0, 0)"));
        assert_eq!(record.style.border, None);
        assert_eq!(record.style.font_size, "14px");
        assert_eq!(record.style.line_height, "normal");
        assert_eq!(record.dataset.text.as_deref(), Some("hello"));
        assert_eq!(record.dataset.icon.as_deref(), Some("59000"));
        assert!(record.dataset.component);
        assert_eq!(record.object_fit.as_deref(), Some("cover"));
        assert_eq!(record.canvas_id.as_deref(), Some("chart"));
        assert_eq!(record.edges(), (10.0, 20.0, 110.0, 50.0));
    }

    #[rstest]
    #[case(Edge::Px(5.0), Edge::Auto, (5.0, 25.0))]
    #[case(Edge::Auto, Edge::Px(30.0), (10.0, 30.0))]
    #[case(Edge::Auto, Edge::Auto, (0.0, 20.0))]
    #[case(Edge::Px(1.0), Edge::Px(2.0), (1.0, 2.0))]
    fn test_auto_edges(#[case] start: Edge, #[case] end: Edge, #[case] expected: (f64, f64)) {
        assert_eq!(resolve_axis(start, end, 20.0), expected);
    }

    #[rstest]
    #[case(Some("59000"), Some('\u{e678}'))]
    #[case(Some("0xe678"), Some('\u{e678}'))]
    #[case(Some("U+E678"), Some('\u{e678}'))]
    #[case(Some("glyph"), None)]
    #[case(None, None)]
    fn test_icon_char(#[case] icon: Option<&str>, #[case] expected: Option<char>) {
        let dataset = Dataset {
            icon: icon.map(str::to_string),
            ..Dataset::default()
        };
        assert_eq!(dataset.icon_char(), expected);
    }

    #[rstest]
    #[case(r#"{"component": false}"#, false)]
    #[case(r#"{"component": ""}"#, false)]
    #[case(r#"{"component": 1}"#, true)]
    #[case(r#"{}"#, false)]
    fn test_component_flag(#[case] json: &str, #[case] expected: bool) {
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.component, expected);
    }
}
