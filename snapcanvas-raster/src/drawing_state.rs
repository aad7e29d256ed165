//! Drawing state for save/restore.

use crate::font::ParsedFont;
use crate::shadow::Shadow;
use crate::style::{FillStyle, TextAlign, TextBaseline};
use tiny_skia::{Mask, Transform};

/// Drawing state that can be saved and restored.
#[derive(Clone)]
pub(crate) struct DrawingState {
    pub fill_style: FillStyle,
    pub stroke_style: FillStyle,
    pub line_width: f32,
    pub line_dash: Vec<f32>,
    pub line_dash_offset: f32,
    pub font: ParsedFont,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub global_alpha: f32,
    pub transform: Transform,
    /// Intersection of every clip applied since the last matching save.
    pub clip_mask: Option<Mask>,
    pub shadow: Shadow,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            line_width: 1.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            font: ParsedFont::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            global_alpha: 1.0,
            transform: Transform::identity(),
            clip_mask: None,
            shadow: Shadow::default(),
        }
    }
}
