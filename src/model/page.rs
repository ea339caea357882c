//! Page-level layout types.

use serde::{Deserialize, Serialize};

use crate::geometry::{Column, Rect};

/// A block of text with its bounding rectangle, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding rectangle (top-left origin)
    pub rect: Rect,
    /// Block text, lines joined with `\n`
    pub text: String,
}

impl TextBlock {
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }
}

/// Everything the question extractor needs to know about one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text blocks in content-stream order
    pub blocks: Vec<TextBlock>,

    /// Bounding rectangles of painted vector paths
    pub drawings: Vec<Rect>,

    /// Bounding rectangles of placed raster images
    pub images: Vec<Rect>,
}

impl PageLayout {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            ..Default::default()
        }
    }

    /// Horizontal midpoint separating the two columns.
    pub fn mid_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Split the page's blocks into its two columns, preserving extraction order.
    pub fn columns(&self) -> [Vec<&TextBlock>; 2] {
        let mid = self.mid_x();
        let mut columns: [Vec<&TextBlock>; 2] = [Vec::new(), Vec::new()];
        for block in &self.blocks {
            columns[Column::classify(block.rect.x0, mid).index()].push(block);
        }
        columns
    }

    /// Whether any drawing or embedded image intersects `region`.
    pub fn has_graphics_in(&self, region: &Rect) -> bool {
        self.drawings.iter().any(|d| region.intersects(d))
            || self.images.iter().any(|i| region.intersects(i))
    }

    /// Plain text of the page, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
