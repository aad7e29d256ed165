//! CSS font shorthand parsing.
//!
//! Accepts `[style] [variant] [weight] size[/line-height] family[, family]*`,
//! for example `italic 700 28px "PingFang SC", sans-serif`.

use crate::error::{RasterError, RasterResult};
use cosmic_text::{Style, Weight};

/// Parsed font specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    pub style: Style,
    pub weight: Weight,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

/// Parse a CSS font shorthand.
///
/// An empty string yields the default `10px sans-serif`.
pub fn parse_font(font_str: &str) -> RasterResult<ParsedFont> {
    let font_str = font_str.trim();
    let mut result = ParsedFont::default();
    if font_str.is_empty() {
        return Ok(result);
    }

    let mut rest = font_str;
    loop {
        let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..token_end];
        match token {
            "italic" => result.style = Style::Italic,
            "oblique" => result.style = Style::Oblique,
            "normal" | "small-caps" => {}
            "bold" => result.weight = Weight::BOLD,
            "bolder" => result.weight = Weight::EXTRA_BOLD,
            "lighter" => result.weight = Weight::LIGHT,
            _ => match parse_numeric_weight(token) {
                Some(weight) => result.weight = weight,
                None => break,
            },
        }
        rest = rest[token_end..].trim_start();
        if rest.is_empty() {
            return Err(RasterError::FontParseError(format!(
                "missing font size in {font_str:?}"
            )));
        }
    }

    let size_end = rest
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(rest.len());
    result.size_px = parse_font_size(&rest[..size_end])?;
    rest = rest[size_end..].trim_start();

    if let Some(after) = rest.strip_prefix('/') {
        let after = after.trim_start();
        let lh_end = after.find(char::is_whitespace).unwrap_or(after.len());
        rest = after[lh_end..].trim_start();
    }

    let families = parse_font_families(rest);
    if !families.is_empty() {
        result.families = families;
    }
    Ok(result)
}

/// Numeric weights are 1 to 1000 per CSS Fonts 4.
fn parse_numeric_weight(token: &str) -> Option<Weight> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let weight: u16 = token.parse().ok()?;
    (1..=1000).contains(&weight).then_some(Weight(weight))
}

fn parse_font_size(token: &str) -> RasterResult<f32> {
    let num_end = token
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(token.len());
    let (num, unit) = token.split_at(num_end);
    let size: f32 = num
        .parse()
        .map_err(|_| RasterError::FontParseError(format!("invalid font size: {token:?}")))?;
    let multiplier = match unit {
        "px" | "" => 1.0,
        "pt" => 4.0 / 3.0,
        "em" | "rem" => 16.0,
        "%" => 16.0 / 100.0,
        _ => {
            return Err(RasterError::FontParseError(format!(
                "unknown font size unit: {token:?}"
            )))
        }
    };
    Ok(size * multiplier)
}

fn parse_font_families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| {
            family
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
        .filter(|family| !family.is_empty())
        .collect()
}
