//! PDF document reader producing per-page layouts.

use std::path::Path;

use crate::detect::{pdf_version, sniff_pdf_version};
use crate::error::{Error, Result};
use crate::geometry::Matrix;
use crate::model::PageLayout;

use super::backend::{LopdfBackend, PdfBackend};
use super::content::ContentInterpreter;
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};

/// Reads an exam PDF page by page.
pub struct PdfParser {
    backend: Box<dyn PdfBackend>,
    options: ParseOptions,
    analyzer: LayoutAnalyzer,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let version = sniff_pdf_version(path)?;
        log::info!("Loading PDF {} (version {})", path.display(), version);

        let backend = LopdfBackend::load_file(path)?;
        if backend.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Ok(Self::with_backend(Box::new(backend), options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        pdf_version(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(Box::new(backend), options))
    }

    /// Use an arbitrary backend.
    pub fn with_backend(backend: Box<dyn PdfBackend>, options: ParseOptions) -> Self {
        let analyzer = LayoutAnalyzer::new().with_block_start(options.block_start.clone());
        Self {
            backend,
            options,
            analyzer,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Page numbers selected by the options, in document order.
    pub fn selected_pages(&self) -> Vec<u32> {
        self.backend
            .pages()
            .into_keys()
            .filter(|n| self.options.pages.includes(*n))
            .collect()
    }

    /// Read one page, honouring the error mode.
    ///
    /// In lenient mode an unreadable page is logged and `Ok(None)` returned.
    pub fn read_page(&self, page_num: u32) -> Result<Option<PageLayout>> {
        match self.page_layout(page_num) {
            Ok(layout) => Ok(Some(layout)),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page_num, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Read every selected page.
    pub fn parse(&self) -> Result<Vec<PageLayout>> {
        let mut layouts = Vec::new();
        for page_num in self.selected_pages() {
            if let Some(layout) = self.read_page(page_num)? {
                layouts.push(layout);
            }
        }
        Ok(layouts)
    }

    /// Build the layout of a single page.
    pub fn page_layout(&self, page_num: u32) -> Result<PageLayout> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let [llx, lly, urx, ury] = self.backend.page_box(page_id)?;
        let mut layout = PageLayout::new(page_num, urx - llx, ury - lly);

        // PDF user space (bottom-left origin) onto page coordinates (top-left origin)
        let page_matrix = Matrix::new(1.0, 0.0, 0.0, -1.0, -llx, ury);
        let content = ContentInterpreter::new(self.backend.as_ref(), page_id).run(page_matrix)?;

        layout.blocks = self.analyzer.build_blocks(content.spans, layout.mid_x());
        layout.drawings = content.drawings;
        layout.images = content.images;

        log::debug!(
            "Page {}: {} blocks, {} drawings, {} images",
            page_num,
            layout.blocks.len(),
            layout.drawings.len(),
            layout.images.len()
        );
        Ok(layout)
    }
}
