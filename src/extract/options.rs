//! Extraction options and configuration.

use regex::Regex;

use crate::error::{Error, Result};

/// Default question-number pattern: digits followed by a period, optionally
/// preceded by `문`, anchored at the start of the block.
pub const DEFAULT_QUESTION_PATTERN: &str = r"^\s*(?:문)?\s*\d+\.";

/// How a question's figure is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePolicy {
    /// Capture the whole question region when it intersects a drawing or image
    #[default]
    Graphics,
    /// Capture the vertical gap between stem and options when it is tall
    /// enough and the rendered PNG is not trivially small
    GapProbe,
}

impl std::str::FromStr for CapturePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "graphics" => Ok(CapturePolicy::Graphics),
            "gap-probe" | "gap_probe" | "gap" => Ok(CapturePolicy::GapProbe),
            _ => Err(Error::Other(format!("Unknown capture policy: {}", s))),
        }
    }
}

/// Options controlling question segmentation and figure capture.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Pattern identifying a question-number block
    pub question_pattern: Regex,

    /// Figure capture policy
    pub policy: CapturePolicy,

    /// Raster zoom factor for captured regions
    pub zoom: f32,

    /// Space kept above the first block of a question
    pub top_padding: f32,

    /// Space kept below the last block of a question
    pub bottom_padding: f32,

    /// Distance kept from the next question's top
    pub next_gap: f32,

    /// Extra space allowed below the last question of a column
    pub trailing_allowance: f32,

    /// Band at the bottom of the page never captured (footer)
    pub footer_margin: f32,

    /// Minimum stem/options gap probed by [`CapturePolicy::GapProbe`]
    pub min_gap_height: f32,

    /// Gap-probe PNGs smaller than this many bytes are discarded
    pub min_image_bytes: usize,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the question-number pattern.
    pub fn with_question_pattern(mut self, pattern: &str) -> Result<Self> {
        self.question_pattern = Regex::new(pattern)
            .map_err(|e| Error::Other(format!("Invalid question pattern: {}", e)))?;
        Ok(self)
    }

    /// Set the capture policy.
    pub fn with_policy(mut self, policy: CapturePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the raster zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the minimum gap height for the gap-probe policy.
    pub fn with_min_gap_height(mut self, height: f32) -> Self {
        self.min_gap_height = height;
        self
    }

    /// Set the minimum encoded image size for the gap-probe policy.
    pub fn with_min_image_bytes(mut self, bytes: usize) -> Self {
        self.min_image_bytes = bytes;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            question_pattern: Regex::new(DEFAULT_QUESTION_PATTERN)
                .expect("valid question pattern"),
            policy: CapturePolicy::Graphics,
            zoom: 2.0,
            top_padding: 5.0,
            bottom_padding: 10.0,
            next_gap: 5.0,
            trailing_allowance: 60.0,
            footer_margin: 20.0,
            min_gap_height: 10.0,
            min_image_bytes: 1500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.policy, CapturePolicy::Graphics);
        assert_eq!(options.zoom, 2.0);
        assert_eq!(options.min_image_bytes, 1500);
        assert!(options.question_pattern.is_match("문 1. 다음"));
        assert!(options.question_pattern.is_match(" 23. Which"));
        assert!(!options.question_pattern.is_match("① 보기"));
    }

    #[test]
    fn test_builder() {
        let options = ExtractOptions::new()
            .with_policy(CapturePolicy::GapProbe)
            .with_zoom(3.0)
            .with_min_gap_height(4.0)
            .with_min_image_bytes(0);
        assert_eq!(options.policy, CapturePolicy::GapProbe);
        assert_eq!(options.zoom, 3.0);
        assert_eq!(options.min_gap_height, 4.0);
        assert_eq!(options.min_image_bytes, 0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("graphics".parse::<CapturePolicy>().unwrap(), CapturePolicy::Graphics);
        assert_eq!("Gap-Probe".parse::<CapturePolicy>().unwrap(), CapturePolicy::GapProbe);
        assert!("ocr".parse::<CapturePolicy>().is_err());
    }

    #[test]
    fn test_invalid_question_pattern() {
        assert!(ExtractOptions::new().with_question_pattern("[").is_err());
    }
}
