//! The question record written to the quiz dataset.

use serde::{Deserialize, Serialize};

/// Answer value carried by every record.
///
/// No answer key is parsed from the exam paper, so this is a placeholder the
/// quiz front-end treats as "option 1", not a verified answer.
pub const PLACEHOLDER_ANSWER: u8 = 1;

/// Explanation attached to records that have a captured figure.
pub const EXPLANATION_WITH_IMAGE: &str = "이미지 참고";

/// Explanation attached to records without a figure.
pub const EXPLANATION_NONE: &str = "해설 없음";

/// One extracted exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique identifier, `p{page}_c{column}_{n}`
    pub id: String,

    /// Question number label as printed, e.g. `"문 1."`
    pub num: String,

    /// Question stem
    pub text: String,

    /// Up to four option strings
    pub options: Vec<String>,

    /// Relative path of the captured figure, if any
    pub image: Option<String>,

    /// Placeholder answer index (see [`PLACEHOLDER_ANSWER`])
    pub answer: u8,

    pub explanation: String,

    /// Subject tag, added by the metadata pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Difficulty tag, added by the metadata pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl QuestionRecord {
    /// Build a record with the placeholder answer and an explanation chosen
    /// from whether a figure is attached.
    pub fn new(
        id: impl Into<String>,
        num: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        image: Option<String>,
    ) -> Self {
        let explanation = if image.is_some() {
            EXPLANATION_WITH_IMAGE
        } else {
            EXPLANATION_NONE
        };
        Self {
            id: id.into(),
            num: num.into(),
            text: text.into(),
            options,
            image,
            answer: PLACEHOLDER_ANSWER,
            explanation: explanation.to_string(),
            subject: None,
            difficulty: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let record = QuestionRecord::new(
            "p1_c0_1",
            "문 1.",
            "Stem",
            vec!["A".to_string()],
            None,
        );
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["id"], "p1_c0_1");
        assert!(obj["image"].is_null());
        assert_eq!(obj["answer"], 1);
        assert_eq!(obj["explanation"], EXPLANATION_NONE);
        // Metadata fields only appear after tagging.
        assert!(!obj.contains_key("subject"));
        assert!(!obj.contains_key("difficulty"));

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "num", "text", "options", "image", "answer", "explanation"]
        );
    }

    #[test]
    fn test_explanation_follows_image() {
        let record = QuestionRecord::new(
            "p2_c1_7",
            "7.",
            "Stem",
            vec![],
            Some("images/q_2_1_7.png".to_string()),
        );
        assert!(record.has_image());
        assert_eq!(record.explanation, EXPLANATION_WITH_IMAGE);
    }
}
