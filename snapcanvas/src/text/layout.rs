//! Greedy line breaking with ellipsis truncation.

use super::segment::{break_units, trailing_delimiter_len, Segment, SegmentKind};
use crate::config::TextDirectionStrategy;
use unicode_segmentation::UnicodeSegmentation;

pub const ELLIPSIS: &str = "...";

/// Inputs of one text block.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Width available to every line.
    pub max_width: f64,
    /// Height of the content box.
    pub content_height: f64,
    /// Natural line height from `line-height`.
    pub line_height: f64,
    /// `text-indent`, taken off the first line only.
    pub indent: f64,
    pub ellipsis: bool,
    pub rtl: bool,
    pub direction: TextDirectionStrategy,
    pub word_boundaries: bool,
}

/// Lines ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    /// Line height spread evenly over the content box.
    pub line_height: f64,
    pub max_lines: usize,
}

/// Number of lines the content box can show and the adjusted line height.
pub fn line_budget(content_height: f64, line_height: f64) -> (usize, f64) {
    if !(content_height > 0.0 && line_height > 0.0) {
        return (1, line_height.max(0.0));
    }
    let max_lines = ((content_height / line_height).ceil() as usize).max(1);
    (max_lines, content_height / max_lines as f64)
}

fn pop_grapheme(s: &mut String) {
    if let Some((idx, _)) = s.grapheme_indices(true).next_back() {
        s.truncate(idx);
    }
}

/// Shorten `line` until it fits `width` with an ellipsis appended.
fn with_ellipsis(mut line: String, width: f64, measure: &mut impl FnMut(&str) -> f64) -> String {
    while !line.is_empty() && measure(&format!("{line}{ELLIPSIS}")) > width {
        pop_grapheme(&mut line);
    }
    let mut dots = ELLIPSIS.to_string();
    while !dots.is_empty() && measure(&format!("{line}{dots}")) > width {
        dots.pop();
    }
    line + &dots
}

fn apply_direction(line: String, strategy: TextDirectionStrategy) -> String {
    match strategy {
        TextDirectionStrategy::None => line,
        TextDirectionStrategy::ReverseGraphemes => line.graphemes(true).rev().collect(),
        TextDirectionStrategy::RotateTrailingDelimiter => {
            let split = line.len() - trailing_delimiter_len(&line);
            if split == 0 || split == line.len() {
                line
            } else {
                format!("{}{}", &line[split..], &line[..split])
            }
        }
    }
}

/// Break `text` into at most as many lines as the content box shows.
///
/// Units are consumed greedily while the line still fits. A unit too wide
/// for an empty line is broken into graphemes; a single grapheme is placed
/// even if it overflows. When text is left after the last line it is
/// either cut with an ellipsis or, unless the line ended on a forced break,
/// its next unit is appended in full.
pub fn layout_text(
    text: &str,
    params: &LayoutParams,
    mut measure: impl FnMut(&str) -> f64,
) -> TextLayout {
    let (max_lines, line_height) = line_budget(params.content_height, params.line_height);
    let mut units: Vec<Segment> = break_units(text, params.word_boundaries);
    let mut lines = Vec::new();
    let mut idx = 0;
    let mut wrapped = false;

    for line_no in 0..max_lines {
        let width = params.max_width - if line_no == 0 { params.indent } else { 0.0 };
        let mut line = String::new();
        if wrapped {
            while units.get(idx).is_some_and(Segment::is_blank) {
                idx += 1;
            }
        }
        wrapped = false;
        let mut hard_break = false;

        while let Some(unit) = units.get(idx) {
            if unit.kind == SegmentKind::LineBreak {
                idx += 1;
                hard_break = true;
                break;
            }
            let candidate = format!("{line}{}", unit.text);
            if measure(&candidate) <= width {
                line = candidate;
                idx += 1;
                continue;
            }
            if line.is_empty() {
                let graphemes: Vec<Segment> = unit
                    .text
                    .graphemes(true)
                    .map(|g| Segment {
                        kind: unit.kind,
                        text: g.to_string(),
                    })
                    .collect();
                if graphemes.len() > 1 {
                    units.splice(idx..=idx, graphemes);
                    continue;
                }
                line = candidate;
                idx += 1;
            }
            wrapped = true;
            break;
        }

        let remaining = idx < units.len();
        if line_no + 1 == max_lines && remaining {
            if params.ellipsis {
                line = with_ellipsis(line, width, &mut measure);
            } else if let Some(next) = units
                .get(idx)
                .filter(|u| !hard_break && u.kind != SegmentKind::LineBreak)
            {
                line.push_str(&next.text);
            }
        }

        lines.push(if params.rtl {
            apply_direction(line, params.direction)
        } else {
            line
        });
        if !remaining {
            break;
        }
    }

    TextLayout {
        lines,
        line_height,
        max_lines,
    }
}
