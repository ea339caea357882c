//! Data model shared by the page reader, the extractor, and the writers.
//!
//! [`PageLayout`] is what the PDF reader produces for every page;
//! [`QuestionRecord`] is what ends up in the quiz dataset.

mod page;
mod question;

pub use page::{PageLayout, TextBlock};
pub use question::{
    QuestionRecord, EXPLANATION_NONE, EXPLANATION_WITH_IMAGE, PLACEHOLDER_ANSWER,
};
