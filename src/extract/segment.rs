//! Question segmentation.
//!
//! A column's blocks are read top to bottom. Every block matching the
//! question-number pattern opens a new question; the blocks that follow
//! belong to it until the next match. Blocks above the first question on a
//! column (headers, running titles) are dropped.

use crate::geometry::{Column, Rect};
use crate::model::{PageLayout, TextBlock};

use super::options::ExtractOptions;

/// A contiguous run of blocks forming one question.
#[derive(Debug, Clone)]
pub struct QuestionGroup<'a> {
    /// Column the question sits in
    pub column: Column,

    /// Blocks in reading order; the first one carries the question number
    pub blocks: Vec<&'a TextBlock>,

    /// Region captured when the question has a figure
    pub region: Rect,
}

impl QuestionGroup<'_> {
    /// Text of the block that opened the question.
    pub fn first_text(&self) -> &str {
        self.blocks.first().map(|b| b.text.as_str()).unwrap_or("")
    }
}

/// Segment every column of a page, left column first.
pub fn segment_page<'a>(page: &'a PageLayout, options: &ExtractOptions) -> Vec<QuestionGroup<'a>> {
    let columns = page.columns();
    Column::ALL
        .into_iter()
        .zip(columns)
        .flat_map(|(column, blocks)| segment_column(page, column, blocks, options))
        .collect()
}

/// Segment one column's blocks into questions.
pub fn segment_column<'a>(
    page: &PageLayout,
    column: Column,
    mut blocks: Vec<&'a TextBlock>,
    options: &ExtractOptions,
) -> Vec<QuestionGroup<'a>> {
    // Stable: blocks sharing a top keep their extraction order
    blocks.sort_by(|a, b| a.rect.y0.total_cmp(&b.rect.y0));

    let starts: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| options.question_pattern.is_match(&b.text))
        .map(|(i, _)| i)
        .collect();

    let (x0, x1) = column.span(page.width);
    let mut groups = Vec::with_capacity(starts.len());

    for (n, &start) in starts.iter().enumerate() {
        let next = starts.get(n + 1).copied();
        let end = next.unwrap_or(blocks.len());
        let members = blocks[start..end].to_vec();

        let (top, bottom) = capture_bounds(
            page.height,
            members[0].rect.y0,
            members[members.len() - 1].rect.y1,
            next.map(|i| blocks[i].rect.y0),
            options,
        );

        log::debug!(
            "Page {} column {}: question at y={:.1} spans {} blocks, region {:.1}..{:.1}",
            page.number,
            column.index(),
            members[0].rect.y0,
            members.len(),
            top,
            bottom
        );

        groups.push(QuestionGroup {
            column,
            blocks: members,
            region: Rect::new(x0, top, x1, bottom),
        });
    }

    groups
}

/// Vertical extent of a question's capture region.
///
/// A question followed by another one on the same column extends down to
/// just above the next question, so figures placed between text blocks are
/// included. The last question of a column gets a fixed allowance, stopping
/// short of the page footer.
pub fn capture_bounds(
    page_height: f32,
    first_top: f32,
    last_bottom: f32,
    next_top: Option<f32>,
    options: &ExtractOptions,
) -> (f32, f32) {
    let top = (first_top - options.top_padding).max(0.0);
    let bottom = match next_top {
        Some(next_top) => {
            let padded = (last_bottom + options.bottom_padding).min(page_height);
            padded.max(next_top - options.next_gap)
        }
        None => (page_height - options.footer_margin).min(last_bottom + options.trailing_allowance),
    };
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x0: f32, y0: f32, y1: f32, text: &str) -> TextBlock {
        TextBlock::new(Rect::new(x0, y0, x0 + 200.0, y1), text)
    }

    fn page(blocks: Vec<TextBlock>) -> PageLayout {
        let mut page = PageLayout::new(3, 600.0, 800.0);
        page.blocks = blocks;
        page
    }

    fn texts<'a>(group: &QuestionGroup<'a>) -> Vec<&'a str> {
        group.blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_groups_start_at_question_numbers() {
        let page = page(vec![
            block(40.0, 20.0, 30.0, "2023년 기출"),
            block(40.0, 100.0, 115.0, "문 1. 첫 문제"),
            block(40.0, 120.0, 135.0, "① 가 ② 나"),
            block(40.0, 200.0, 215.0, "2. 둘째 문제"),
            block(40.0, 220.0, 235.0, "① 다"),
        ]);
        let groups = segment_page(&page, &ExtractOptions::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), vec!["문 1. 첫 문제", "① 가 ② 나"]);
        assert_eq!(texts(&groups[1]), vec!["2. 둘째 문제", "① 다"]);
    }

    #[test]
    fn test_sorts_by_top_and_keeps_ties_in_order() {
        let page = page(vec![
            block(40.0, 300.0, 310.0, "5. later"),
            block(40.0, 100.0, 110.0, "4. earlier"),
            block(40.0, 120.0, 130.0, "tie a"),
            block(40.0, 120.0, 130.0, "tie b"),
        ]);
        let groups = segment_page(&page, &ExtractOptions::default());

        assert_eq!(texts(&groups[0]), vec!["4. earlier", "tie a", "tie b"]);
        assert_eq!(texts(&groups[1]), vec!["5. later"]);
    }

    #[test]
    fn test_columns_are_segmented_separately() {
        let page = page(vec![
            block(320.0, 50.0, 60.0, "10. right"),
            block(40.0, 400.0, 410.0, "9. left"),
        ]);
        let groups = segment_page(&page, &ExtractOptions::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].column, Column::Left);
        assert_eq!(groups[0].region.x0, 0.0);
        assert_eq!(groups[0].region.x1, 300.0);
        assert_eq!(groups[1].column, Column::Right);
        assert_eq!(groups[1].region.x0, 300.0);
        assert_eq!(groups[1].region.x1, 600.0);
    }

    #[test]
    fn test_no_question_numbers_yields_nothing() {
        let page = page(vec![block(40.0, 10.0, 20.0, "header only")]);
        assert!(segment_page(&page, &ExtractOptions::default()).is_empty());
    }

    #[test]
    fn test_region_extends_to_next_question() {
        let page = page(vec![
            block(40.0, 100.0, 120.0, "1. a"),
            block(40.0, 400.0, 420.0, "2. b"),
        ]);
        let groups = segment_page(&page, &ExtractOptions::default());

        assert_eq!(groups[0].region.y0, 95.0);
        assert_eq!(groups[0].region.y1, 395.0);
        // Last question: trailing allowance
        assert_eq!(groups[1].region.y1, 480.0);
    }

    #[test]
    fn test_capture_bounds_clamps_to_page() {
        let options = ExtractOptions::default();
        // Top never goes above the page
        assert_eq!(capture_bounds(800.0, 2.0, 50.0, None, &options).0, 0.0);
        // Last question near the bottom stops at the footer margin
        assert_eq!(capture_bounds(800.0, 700.0, 770.0, None, &options).1, 780.0);
        // Next question overlapping the padded bottom keeps the padded bottom
        assert_eq!(capture_bounds(800.0, 100.0, 200.0, Some(190.0), &options).1, 210.0);
    }
}
