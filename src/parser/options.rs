//! Parsing options and configuration.

use regex::Regex;

use crate::error::{Error, Result};

/// Lines matching this always start a new text block: a question number
/// (`문 1.`, `12.`) or a circled option marker. A decimal such as `123.45`
/// at the start of a wrapped line is not a question number.
pub const DEFAULT_BLOCK_START_PATTERN: &str = r"^\s*(?:(?:문)?\s*\d+\.(?:[^\d]|$)|[①②③④])";

/// Options for reading PDF pages into layouts.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to read)
    pub pages: PageSelection,

    /// Pattern for lines that must open a new text block
    pub block_start: Regex,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Replace the block-start pattern.
    pub fn with_block_start(mut self, pattern: &str) -> Result<Self> {
        self.block_start = Regex::new(pattern)
            .map_err(|e| Error::Other(format!("Invalid block start pattern: {}", e)))?;
        Ok(self)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
            block_start: Regex::new(DEFAULT_BLOCK_START_PATTERN).expect("valid block start pattern"),
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Log and skip pages that cannot be read
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(std::ops::RangeInclusive<u32>),
    /// Specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// The first `n` pages.
    pub fn first(n: u32) -> Self {
        PageSelection::Range(1..=n)
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let number = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (number(start)?, number(end)?),
                None => {
                    let p = number(part)?;
                    (p, p)
                }
            };
            if start > end {
                return Err(invalid());
            }
            pages.extend(start..=end);
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_pages(PageSelection::first(5));

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.pages.includes(5));
        assert!(!options.pages.includes(6));
    }

    #[test]
    fn test_default_block_start() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.block_start.is_match("문 3. 다음 중"));
        assert!(options.block_start.is_match("  12. Which"));
        assert!(options.block_start.is_match("③ 보기"));
        assert!(!options.block_start.is_match("설명 1. 참고"));
    }

    #[test]
    fn test_invalid_block_start() {
        assert!(ParseOptions::new().with_block_start("(").is_err());
    }

    #[test]
    fn test_page_selection_includes() {
        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(1..=10)
        );
        assert_eq!(
            PageSelection::parse("1,3,5-7,10,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7, 10])
        );
        assert!(matches!(
            PageSelection::parse("x-2"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(PageSelection::parse("9-2").is_err());
    }
}
