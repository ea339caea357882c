//! Splitting a question's text into number, stem and options.

use regex::Regex;

use crate::model::TextBlock;

/// Circled-digit markers introducing the options.
pub const OPTION_MARKERS: [char; 4] = ['①', '②', '③', '④'];

/// Maximum number of options kept per question.
pub const MAX_OPTIONS: usize = 4;

/// The textual parts of one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionText {
    /// Number label as printed (`"문 1."`), empty when none was found
    pub num: String,
    /// Stem: text before the first option marker
    pub stem: String,
    /// Option texts, at most [`MAX_OPTIONS`]
    pub options: Vec<String>,
}

/// Whether `text` contains an option marker.
pub fn has_option_marker(text: &str) -> bool {
    text.contains(OPTION_MARKERS)
}

/// Split a question group's blocks into number label, stem and options.
pub fn split_question(blocks: &[&TextBlock], question_pattern: &Regex) -> QuestionText {
    let first = blocks.first().map(|b| b.text.trim()).unwrap_or("");
    let num = question_pattern
        .find(first)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let full_text = blocks
        .iter()
        .map(|b| b.text.trim())
        .collect::<Vec<_>>()
        .join("\n");

    let body = if num.is_empty() {
        full_text.trim().to_string()
    } else {
        full_text.replacen(&num, "", 1).trim().to_string()
    };

    let (stem, options) = split_options(&body);
    QuestionText { num, stem, options }
}

/// Split text on option markers into stem and options.
///
/// Without markers the whole text is the stem and there are no options.
pub fn split_options(text: &str) -> (String, Vec<String>) {
    let mut parts = text.split(OPTION_MARKERS);
    let stem = parts.next().unwrap_or("").trim().to_string();
    let options = parts
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_OPTIONS)
        .map(String::from)
        .collect();
    (stem, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DEFAULT_QUESTION_PATTERN;
    use crate::geometry::Rect;

    fn blocks(texts: &[&str]) -> Vec<TextBlock> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let y = i as f32 * 20.0;
                TextBlock::new(Rect::new(40.0, y, 250.0, y + 15.0), *t)
            })
            .collect()
    }

    fn split(texts: &[&str]) -> QuestionText {
        let owned = blocks(texts);
        let refs: Vec<&TextBlock> = owned.iter().collect();
        split_question(&refs, &Regex::new(DEFAULT_QUESTION_PATTERN).unwrap())
    }

    #[test]
    fn test_split_question_with_four_options() {
        let q = split(&["문 1. Stem text", "① A", "② B", "③ C", "④ D"]);
        assert_eq!(q.num, "문 1.");
        assert_eq!(q.stem, "Stem text");
        assert_eq!(q.options, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_no_markers_means_no_options() {
        let q = split(&["12. 다음을 설명하시오", "추가 설명"]);
        assert_eq!(q.num, "12.");
        assert_eq!(q.stem, "다음을 설명하시오\n추가 설명");
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_inline_options_and_empty_segments() {
        let q = split(&["3. 보기 중 옳은 것은? ① 가 ②② 나 ③ 다"]);
        assert_eq!(q.stem, "보기 중 옳은 것은?");
        assert_eq!(q.options, vec!["가", "나", "다"]);
    }

    #[test]
    fn test_only_first_number_occurrence_removed() {
        let q = split(&["4. 값이 4. 이상인 것", "① 4."]);
        assert_eq!(q.stem, "값이 4. 이상인 것");
        assert_eq!(q.options, vec!["4."]);
    }

    #[test]
    fn test_at_most_four_options() {
        let (_, options) = split_options("stem ① a ② b ③ c ④ d ① e");
        assert_eq!(options.len(), MAX_OPTIONS);
        assert_eq!(options[3], "d");
    }

    #[test]
    fn test_has_option_marker() {
        assert!(has_option_marker("text ③ option"));
        assert!(!has_option_marker("1. plain"));
    }
}
