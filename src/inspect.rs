//! Per-page graphics diagnostics.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::model::PageLayout;
use crate::parser::PdfParser;

/// Keyword marking a page that refers to a figure.
pub const FIGURE_KEYWORD: &str = "그림";

/// Number of pages inspected when none are selected.
pub const DEFAULT_INSPECT_PAGES: u32 = 5;

/// Graphics found on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphicsReport {
    pub page: u32,
    /// Painted vector paths
    pub drawings: usize,
    /// Placed raster images
    pub images: usize,
    /// Whether the page text contains [`FIGURE_KEYWORD`]
    pub mentions_figure: bool,
}

impl GraphicsReport {
    pub fn from_layout(layout: &PageLayout) -> Self {
        Self {
            page: layout.number,
            drawings: layout.drawings.len(),
            images: layout.images.len(),
            mentions_figure: layout.plain_text().contains(FIGURE_KEYWORD),
        }
    }
}

impl fmt::Display for GraphicsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Page {} ---", self.page)?;
        writeln!(f, "Drawings: {}", self.drawings)?;
        write!(f, "Images: {}", self.images)?;
        if self.mentions_figure {
            write!(f, "\nText '{}' found on this page", FIGURE_KEYWORD)?;
        }
        Ok(())
    }
}

/// Report graphics for every page the parser selects.
pub fn inspect(parser: &PdfParser) -> Result<Vec<GraphicsReport>> {
    Ok(parser
        .parse()?
        .iter()
        .map(GraphicsReport::from_layout)
        .collect())
}
