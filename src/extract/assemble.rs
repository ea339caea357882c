//! Turning page layouts into question records.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::geometry::Column;
use crate::model::{PageLayout, QuestionRecord};

use super::choices::split_question;
use super::figure::{capture_region, locate_figure, Rasterizer};
use super::options::ExtractOptions;
use super::segment::{segment_page, QuestionGroup};

/// Pages between progress log lines.
const PROGRESS_INTERVAL: usize = 10;

/// Accumulates question records across the pages of one run.
///
/// Records come out in page, column, then in-column order. Identifiers are
/// unique for the whole run.
pub struct Extractor {
    options: ExtractOptions,
    image_dir: PathBuf,
    image_prefix: String,
    records: Vec<QuestionRecord>,
    issued_ids: HashSet<String>,
    pages_done: usize,
}

impl Extractor {
    /// Create an extractor writing figures into `image_dir`.
    ///
    /// `image_prefix` is the path recorded in each record before the file
    /// name (normally `"images"`).
    pub fn new(options: ExtractOptions, image_dir: impl Into<PathBuf>, image_prefix: impl Into<String>) -> Self {
        Self {
            options,
            image_dir: image_dir.into(),
            image_prefix: image_prefix.into(),
            records: Vec::new(),
            issued_ids: HashSet::new(),
            pages_done: 0,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Remove any previous image directory and create it empty.
    pub fn prepare_image_dir(&self) -> Result<()> {
        if self.image_dir.exists() {
            log::info!("Clearing image directory {}", self.image_dir.display());
            fs::remove_dir_all(&self.image_dir)?;
        }
        fs::create_dir_all(&self.image_dir)?;
        Ok(())
    }

    /// Extract every question on `page`, returning how many were added.
    pub fn process_page(&mut self, page: &PageLayout, rasterizer: &mut dyn Rasterizer) -> usize {
        let groups = segment_page(page, &self.options);
        let added = groups.len();

        for group in &groups {
            let record = self.build_record(page, group, rasterizer);
            self.records.push(record);
        }

        self.pages_done += 1;
        if self.pages_done % PROGRESS_INTERVAL == 0 {
            log::info!(
                "{} pages processed, {} questions so far",
                self.pages_done,
                self.records.len()
            );
        }
        added
    }

    /// Consume the extractor and return its records.
    pub fn finish(self) -> Vec<QuestionRecord> {
        log::info!("Extracted {} questions", self.records.len());
        self.records
    }

    fn build_record(
        &mut self,
        page: &PageLayout,
        group: &QuestionGroup<'_>,
        rasterizer: &mut dyn Rasterizer,
    ) -> QuestionRecord {
        let parts = split_question(&group.blocks, &self.options.question_pattern);
        let num = if parts.num.is_empty() {
            format!("Q{}", self.records.len() + 1)
        } else {
            parts.num
        };
        log::info!(
            "Question {} (page {}, column {})",
            num,
            page.number,
            group.column.index()
        );

        let key = self.issue_key(page.number, group.column, &num);
        let id = format!("p{}_c{}_{}", page.number, group.column.index(), key);
        let image = self.capture(page, group, &key, rasterizer);

        QuestionRecord::new(id, num, parts.stem, parts.options, image)
    }

    /// The per-question part of the identifier: the label's digits (or the
    /// question counter), suffixed `-2`, `-3`, ... on collision.
    fn issue_key(&mut self, page: u32, column: Column, num: &str) -> String {
        let digits: String = num.chars().filter(char::is_ascii_digit).collect();
        let base = if digits.is_empty() {
            self.records.len().to_string()
        } else {
            digits
        };

        let mut key = base.clone();
        let mut k = 2;
        while !self
            .issued_ids
            .insert(format!("p{}_c{}_{}", page, column.index(), key))
        {
            key = format!("{}-{}", base, k);
            k += 1;
        }
        if k > 2 {
            log::warn!(
                "Duplicate question {} on page {} column {}, using {}",
                num,
                page,
                column.index(),
                key
            );
        }
        key
    }

    fn capture(
        &self,
        page: &PageLayout,
        group: &QuestionGroup<'_>,
        key: &str,
        rasterizer: &mut dyn Rasterizer,
    ) -> Option<String> {
        let region = locate_figure(page, group, &self.options)?;
        let file_name = format!("q_{}_{}_{}.png", page.number, group.column.index(), key);
        let dest = self.image_dir.join(&file_name);

        match capture_region(rasterizer, page.number, &region, &self.options, &dest) {
            Ok(true) => {
                log::debug!("Captured {}", file_name);
                Some(format!("{}/{}", self.image_prefix, file_name))
            }
            Ok(false) => None,
            Err(e) => {
                log::warn!("Failed to capture {}: {}", file_name, e);
                None
            }
        }
    }
}
