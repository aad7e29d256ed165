//! Break units for line layout.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    static ref BREAK_UNITS: Regex =
        Regex::new(r"\r\n|\n|\r|(?:[^\S\r\n]|\p{P}|\p{S})+|[^\s\p{P}\p{S}]+")
            .expect("break unit pattern is valid");
    static ref DELIMITER: Regex =
        Regex::new(r"^[\s\p{P}\p{S}]+$").expect("delimiter pattern is valid");
}

/// Median word length above which text is broken per grapheme.
const MAX_MEDIAN_WORD_LEN: usize = 13;
/// Minimum share of delimiters for word based breaking.
const MIN_DELIMITER_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Word,
    /// Spaces, punctuation and symbols.
    Delimiter,
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn classify(text: &str) -> Self {
        let kind = if matches!(text, "\n" | "\r\n" | "\r") {
            SegmentKind::LineBreak
        } else if DELIMITER.is_match(text) {
            SegmentKind::Delimiter
        } else {
            SegmentKind::Word
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == SegmentKind::Delimiter && self.text.chars().all(char::is_whitespace)
    }
}

/// Split into words and delimiter runs.
///
/// With `word_boundaries` the UAX #29 word boundaries are used, otherwise
/// a delimiter scan. Line breaks are always their own segment, and
/// adjacent delimiters merge into one.
pub fn segment_words(text: &str, word_boundaries: bool) -> Vec<Segment> {
    let pieces: Vec<&str> = if word_boundaries {
        text.split_word_bounds().collect()
    } else {
        BREAK_UNITS.find_iter(text).map(|m| m.as_str()).collect()
    };
    let mut segments: Vec<Segment> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let segment = Segment::classify(piece);
        match segments.last_mut() {
            Some(last)
                if last.kind == SegmentKind::Delimiter
                    && segment.kind == SegmentKind::Delimiter =>
            {
                last.text.push_str(&segment.text)
            }
            _ => segments.push(segment),
        }
    }
    segments
}

/// Split into extended grapheme clusters.
pub fn segment_graphemes(text: &str) -> Vec<Segment> {
    text.graphemes(true).map(Segment::classify).collect()
}

/// Whether word segments read like space separated prose: at least two
/// words, a short median word and enough delimiters between them.
pub fn prefers_words(segments: &[Segment]) -> bool {
    let mut lengths: Vec<usize> = segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Word)
        .map(|s| s.text.encode_utf16().count())
        .collect();
    if lengths.len() < 2 {
        return false;
    }
    lengths.sort_unstable();
    let mid = lengths.len() / 2;
    let median = if lengths.len() % 2 == 0 {
        (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
    } else {
        lengths[mid] as f64
    };
    let delimiters = segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Delimiter)
        .count();
    median <= MAX_MEDIAN_WORD_LEN as f64
        && delimiters as f64 / segments.len() as f64 > MIN_DELIMITER_RATIO
}

/// Break units for `text`: words when it reads like prose, graphemes
/// otherwise.
pub fn break_units(text: &str, word_boundaries: bool) -> Vec<Segment> {
    let words = segment_words(text, word_boundaries);
    if prefers_words(&words) {
        words
    } else {
        segment_graphemes(text)
    }
}

/// Length in bytes of the trailing delimiter run of `line`.
pub fn trailing_delimiter_len(line: &str) -> usize {
    line.grapheme_indices(true)
        .rev()
        .take_while(|(_, g)| DELIMITER.is_match(g))
        .map(|(_, g)| g.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_words_and_delimiters(#[case] word_boundaries: bool) {
        let segments = segment_words("Hello, big world!\nBye", word_boundaries);
        assert_eq!(
            texts(&segments),
            vec!["Hello", ", ", "big", " ", "world", "!", "\n", "Bye"]
        );
        assert_eq!(segments[1].kind, SegmentKind::Delimiter);
        assert_eq!(segments[6].kind, SegmentKind::LineBreak);
        assert_eq!(segments[7].kind, SegmentKind::Word);
    }

    #[test]
    fn test_crlf_is_one_line_break() {
        let segments = segment_words("a\r\nb", false);
        assert_eq!(texts(&segments), vec!["a", "\r\n", "b"]);
        assert_eq!(segments[1].kind, SegmentKind::LineBreak);
    }

    #[rstest]
    #[case("The quick brown fox jumps over the lazy dog", true)]
    #[case("ABCDEFGHIJKLMNOPQRSTUVWXYZ", false)]
    #[case("支持中文文本的逐字换行", false)]
    #[case("Pneumonoultramicroscopic silicovolcanoconiosis", false)]
    fn test_prefers_words(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(prefers_words(&segment_words(text, true)), expected);
    }

    #[test]
    fn test_grapheme_units() {
        let units = break_units("e\u{301}a👍🏽", true);
        assert_eq!(texts(&units), vec!["e\u{301}", "a", "👍🏽"]);
    }

    #[rstest]
    #[case("hello, ", 2)]
    #[case("hello", 0)]
    #[case("مرحبا!", 1)]
    fn test_trailing_delimiter(#[case] line: &str, #[case] expected: usize) {
        assert_eq!(trailing_delimiter_len(line), expected);
    }
}
