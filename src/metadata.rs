//! Subject and difficulty tagging of an existing dataset.
//!
//! Works on the JSON values as written, so fields this crate does not know
//! about survive and key order is preserved. Tagging twice gives the same
//! result as tagging once.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::render::{read_records, write_outputs, OutputOptions};

/// Options for the tagging pass.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Last page of the first subject's section
    pub split_page: u32,

    /// Subject of pages up to and including `split_page`
    pub early_subject: String,

    /// Subject of pages after `split_page`
    pub late_subject: String,

    /// Subject given to records whose page cannot be determined
    pub fallback_subject: String,

    /// Difficulty given to records without one
    pub default_difficulty: String,
}

impl TagOptions {
    /// Create new tag options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the last page of the first subject.
    pub fn with_split_page(mut self, page: u32) -> Self {
        self.split_page = page;
        self
    }

    /// Subject for a given page.
    pub fn subject_for_page(&self, page: u32) -> &str {
        if page <= self.split_page {
            &self.early_subject
        } else {
            &self.late_subject
        }
    }
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            split_page: 25,
            early_subject: "지적측량".to_string(),
            late_subject: "지적전산학개론".to_string(),
            fallback_subject: "지적측량".to_string(),
            default_difficulty: "중".to_string(),
        }
    }
}

/// Outcome of a tagging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSummary {
    /// Records tagged from their page number
    pub tagged: usize,
    /// Records given fallback tags
    pub skipped: usize,
}

/// Page number encoded in an identifier such as `p12_c0_3`.
pub fn page_from_id(id: &str) -> Option<u32> {
    id.split('_').next()?.strip_prefix('p')?.parse().ok()
}

/// Tag every record in place.
pub fn tag_records(records: &mut [Value], options: &TagOptions) -> TagSummary {
    let mut summary = TagSummary::default();

    for record in records.iter_mut() {
        let Some(obj) = record.as_object_mut() else {
            log::warn!("Skipping metadata for non-object entry");
            summary.skipped += 1;
            continue;
        };

        if tag_record(obj, options) {
            summary.tagged += 1;
        } else {
            summary.skipped += 1;
        }
    }

    summary
}

/// Tag a single record; returns `false` when fallbacks were used.
pub fn tag_record(record: &mut Map<String, Value>, options: &TagOptions) -> bool {
    let page = record.get("id").and_then(Value::as_str).and_then(page_from_id);

    let tagged = match page {
        Some(page) => {
            record.insert(
                "subject".to_string(),
                Value::from(options.subject_for_page(page)),
            );
            true
        }
        None => {
            let id = record.get("id").map(Value::to_string);
            log::warn!(
                "Skipping metadata for {}: no page number in identifier",
                id.as_deref().unwrap_or("unknown")
            );
            record
                .entry("subject")
                .or_insert_with(|| Value::from(options.fallback_subject.as_str()));
            false
        }
    };

    record
        .entry("difficulty")
        .or_insert_with(|| Value::from(options.default_difficulty.as_str()));

    tagged
}

/// Tag the dataset in `output`'s directory and rewrite both files.
pub fn tag_output_dir(output: &OutputOptions, options: &TagOptions) -> Result<TagSummary> {
    let mut records = read_records(&output.json_path(), output)?;
    log::info!("Loaded {} questions", records.len());

    let summary = tag_records(&mut records, options);
    write_outputs(&records, output)?;

    log::info!(
        "Tagged {} questions ({} with fallback tags)",
        summary.tagged,
        summary.skipped
    );
    Ok(summary)
}
