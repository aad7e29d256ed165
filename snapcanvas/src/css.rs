//! Parsing helpers for computed style strings.
//!
//! Computed values arrive already normalized by the host (`rgb(...)`
//! colors, `px` lengths), so these helpers stay small. Every parser fails
//! closed: unparseable input yields `None` or zero instead of an error.

use serde::{Deserialize, Serialize};

/// An sRGB color with 8-bit channels and a unit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any CSS color. `None` for `none`, empty or malformed input.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s == "none" {
            return None;
        }
        let color = csscolorparser::parse(s).ok()?;
        let [r, g, b, _] = color.to_rgba8();
        Some(Self {
            r,
            g,
            b,
            a: (color.a as f64).clamp(0.0, 1.0),
        })
    }

    /// Same color at full opacity.
    pub fn opaque(self) -> Self {
        Self { a: 1.0, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

/// A CSS `<length-percentage>` in px or percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthPercent {
    Px(f64),
    Percent(f64),
}

impl LengthPercent {
    /// Parse `12px`, `12`, `50%`. Other units are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(pct) = s.strip_suffix('%') {
            return parse_finite(pct).map(LengthPercent::Percent);
        }
        let num = s.strip_suffix("px").unwrap_or(s);
        parse_finite(num).map(LengthPercent::Px)
    }

    /// Resolve against the length that 100% refers to.
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            LengthPercent::Px(v) => v,
            LengthPercent::Percent(p) => basis * p / 100.0,
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading number of a string, like `parseFloat` (`"12.5px solid"` -> 12.5).
pub fn parse_number_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let bytes = s.as_bytes();
    while end < bytes.len() {
        let c = bytes[end];
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }
    // Trailing exponent marker without digits is not part of the number
    let mut num = &s[..end];
    while num.ends_with(['e', 'E', '+', '-']) {
        num = &num[..num.len() - 1];
    }
    if !seen_digit {
        return None;
    }
    parse_finite(num)
}

/// Pixel value of a computed length, 0 when unparseable.
pub fn px(s: &str) -> f64 {
    parse_number_prefix(s).unwrap_or(0.0)
}

/// Split on `sep` outside parentheses and quotes, trimming each part.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ if c == sep && depth == 0 => {
                    parts.push(s[start..i].trim());
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(s[start..].trim());
    parts
}

/// Split on whitespace outside parentheses, dropping empty parts.
pub fn split_tokens(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(st) = start.take() {
                    parts.push(&s[st..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(st) = start {
        parts.push(&s[st..]);
    }
    parts
}

/// Element `index` of a per-layer list, repeating the list cyclically as
/// CSS does for background layers. `None` only for an empty list.
pub fn get_cyclic<T>(list: &[T], index: usize) -> Option<&T> {
    if list.is_empty() {
        None
    } else {
        list.get(index % list.len())
    }
}

/// Argument text of `url(...)`, without quotes.
pub fn url_argument(term: &str) -> Option<&str> {
    let inner = term.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(inner);
    (!inner.is_empty()).then_some(inner)
}
