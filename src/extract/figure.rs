//! Figure detection and capture.
//!
//! Decides which part of a question, if any, holds a figure, and writes that
//! region to a PNG through a [`Rasterizer`].

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::PageLayout;

use super::choices::has_option_marker;
use super::options::{CapturePolicy, ExtractOptions};
use super::segment::QuestionGroup;

/// Horizontal inset of gap-probe regions from the column edges.
const GAP_INSET_X: f32 = 5.0;

/// Gap-probe regions no taller than this are not rendered.
const MIN_GAP_REGION_HEIGHT: f32 = 5.0;

/// Renders page regions to encoded PNG bytes.
pub trait Rasterizer {
    /// Render `region` (page coordinates, top-left origin) of the 1-indexed
    /// `page` at `zoom` times its natural size.
    fn render_region(&mut self, page: u32, region: &Rect, zoom: f32) -> Result<Vec<u8>>;
}

/// Region of a question to capture as its figure, if any.
pub fn locate_figure(page: &PageLayout, group: &QuestionGroup<'_>, options: &ExtractOptions) -> Option<Rect> {
    match options.policy {
        CapturePolicy::Graphics => graphics_region(page, &group.region),
        CapturePolicy::GapProbe => gap_region(group, options.min_gap_height),
    }
}

/// The whole capture region, when it touches a drawing or an embedded image.
pub fn graphics_region(page: &PageLayout, region: &Rect) -> Option<Rect> {
    if region.is_empty() {
        log::debug!("Empty capture region on page {}", page.number);
        return None;
    }
    if page.has_graphics_in(region) {
        Some(*region)
    } else {
        None
    }
}

/// The vertical gap between the stem and the options, when taller than
/// `min_gap_height`.
///
/// Options start at the first block containing a circled-digit marker; every
/// block after it belongs to the options as well.
pub fn gap_region(group: &QuestionGroup<'_>, min_gap_height: f32) -> Option<Rect> {
    let split = group.blocks.iter().position(|b| has_option_marker(&b.text))?;
    let (stem, choices) = group.blocks.split_at(split);

    let stem_bottom = stem.iter().map(|b| b.rect.y1).reduce(f32::max)?;
    let options_top = choices.iter().map(|b| b.rect.y0).reduce(f32::min)?;

    let gap = options_top - stem_bottom;
    if gap <= min_gap_height {
        return None;
    }

    let rect = Rect::new(
        group.region.x0 + GAP_INSET_X,
        stem_bottom + 1.0,
        group.region.x1 - GAP_INSET_X,
        options_top - 1.0,
    );
    log::debug!("Gap of {:.1}pt between stem and options", gap);
    (rect.height() > MIN_GAP_REGION_HEIGHT).then_some(rect)
}

/// Render `region` and write it to `dest`.
///
/// Returns `Ok(false)` when the gap-probe size filter rejected the image.
pub fn capture_region(
    rasterizer: &mut dyn Rasterizer,
    page: u32,
    region: &Rect,
    options: &ExtractOptions,
    dest: &Path,
) -> Result<bool> {
    if region.is_empty() {
        return Err(Error::Raster(format!(
            "empty capture region on page {} ({:.1}x{:.1})",
            page,
            region.width(),
            region.height()
        )));
    }

    let png = rasterizer.render_region(page, region, options.zoom)?;

    if options.policy == CapturePolicy::GapProbe && png.len() < options.min_image_bytes {
        log::debug!(
            "Discarding {} ({} bytes, likely blank)",
            dest.display(),
            png.len()
        );
        return Ok(false);
    }

    fs::write(dest, &png)?;
    Ok(true)
}
