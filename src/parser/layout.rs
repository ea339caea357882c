//! Layout analysis: turning positioned text spans into text blocks.
//!
//! Spans come out of the content-stream interpreter already in page
//! coordinates (top-left origin). They are split by column first, so that a
//! line never straddles the gutter, then grouped into lines by baseline and
//! into blocks by spacing, font, and indentation changes.

use regex::Regex;

use crate::geometry::{Column, Rect};
use crate::model::TextBlock;

/// A run of text shown by one text-showing operator.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position of the baseline (top-left origin)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// Top edge (approximate ascender above the baseline).
    pub fn top(&self) -> f32 {
        self.y - self.font_size * 0.8
    }

    /// Bottom edge (approximate descender below the baseline).
    pub fn bottom(&self) -> f32 {
        self.y + self.font_size * 0.2
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Baseline Y position
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans: vec![],
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// Inserts spaces between spans based on their X coordinate gaps.
    /// No space is inserted between adjacent Chinese/Japanese characters.
    pub fn text(&self) -> String {
        if self.spans.is_empty() {
            return String::new();
        }

        if self.spans.len() == 1 {
            return self.spans[0].text.clone();
        }

        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - prev_span.right();

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * 0.5
            };

            // Insert a space when the gap exceeds 20% of an average character
            let space_threshold = avg_char_width * 0.2;

            let should_insert_space = gap > space_threshold && {
                let prev_is_cjk = prev_span
                    .text
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                let curr_is_cjk = span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                !(prev_is_cjk && curr_is_cjk)
            };

            let prev_ends_with_space =
                prev_span.text.ends_with(' ') || prev_span.text.ends_with('\u{00A0}');
            let curr_starts_with_space =
                span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }

    /// Bounding rectangle of the line.
    pub fn rect(&self) -> Rect {
        self.spans
            .iter()
            .map(|s| Rect::new(s.x, s.top(), s.right(), s.bottom()))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }
}

/// Groups spans into lines and lines into [`TextBlock`]s.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    /// Lines matching this pattern always start a new block
    block_start: Option<Regex>,
}

impl LayoutAnalyzer {
    /// Create a new layout analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a block break before every line matching `pattern`.
    pub fn with_block_start(mut self, pattern: Regex) -> Self {
        self.block_start = Some(pattern);
        self
    }

    /// Build text blocks for a two-column page.
    ///
    /// Blocks are returned left column first, each column top to bottom.
    pub fn build_blocks(&self, spans: Vec<TextSpan>, mid_x: f32) -> Vec<TextBlock> {
        let mut column_spans: [Vec<TextSpan>; 2] = [Vec::new(), Vec::new()];
        for span in spans {
            column_spans[Column::classify(span.x, mid_x).index()].push(span);
        }

        let mut blocks = Vec::new();
        for spans in column_spans {
            let lines = self.group_spans_into_lines(spans);
            blocks.extend(self.group_lines_into_blocks(lines));
        }

        log::debug!("Built {} text blocks", blocks.len());
        blocks
    }

    /// Y-based line grouping within one column.
    fn group_spans_into_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        if spans.is_empty() {
            return vec![];
        }

        // Top to bottom, then left to right
        spans.sort_by(|a, b| {
            let y_cmp = a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut lines: Vec<TextLine> = Vec::new();
        let mut current_line_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let y_tolerance = span.font_size * 0.3;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => {
                    current_line_spans.push(span);
                }
                _ => {
                    if !current_line_spans.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(
                            &mut current_line_spans,
                        )));
                    }
                    current_y = Some(span.y);
                    current_line_spans.push(span);
                }
            }
        }

        if !current_line_spans.is_empty() {
            lines.push(TextLine::from_spans(current_line_spans));
        }

        lines
    }

    /// Group lines into blocks based on spacing and forced block starts.
    fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        if lines.is_empty() {
            return vec![];
        }

        let avg_spacing = calculate_avg_line_spacing(&lines);
        let mut blocks = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.should_break_block(prev, &line, avg_spacing) {
                    blocks.push(make_block(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(make_block(current));
        }

        blocks
    }

    /// Determine if a new block should start.
    fn should_break_block(&self, prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
        if let Some(pattern) = &self.block_start {
            if pattern.is_match(&curr_line.text()) {
                return true;
            }
        }

        // Large spacing indicates a new paragraph
        let spacing = (curr_line.y - prev_line.y).abs();
        if spacing > avg_spacing * 1.5 {
            return true;
        }

        if (prev_line.font_size - curr_line.font_size).abs() > 1.0 {
            return true;
        }

        // Indentation change
        if (prev_line.x - curr_line.x).abs() > 20.0 {
            return true;
        }

        false
    }
}

fn make_block(lines: Vec<TextLine>) -> TextBlock {
    let rect = lines
        .iter()
        .map(TextLine::rect)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default();
    let text = lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n");
    TextBlock::new(rect, text)
}

/// Average baseline distance between consecutive lines.
fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }

    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].y - w[0].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
