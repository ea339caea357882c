//! # exampdf
//!
//! Exam-question extraction from two-column PDF papers.
//!
//! Reads each page's text blocks, vector drawings and embedded images,
//! groups the blocks of each column into questions, splits the options off
//! at the circled-digit markers, captures figures as PNG, and writes the
//! result as a quiz dataset (`official_survey.json` and `questions.js`).
//!
//! ## Quick Start
//!
//! ```no_run
//! use exampdf::{extract_file, ExtractOptions, OutputOptions, ParseOptions};
//!
//! fn main() -> exampdf::Result<()> {
//!     let output = OutputOptions::new().with_output_dir("out");
//!     let records = extract_file(
//!         "past_exams.pdf",
//!         ParseOptions::default(),
//!         ExtractOptions::default(),
//!         &output,
//!         None,
//!     )?;
//!     println!("{} questions", records.len());
//!
//!     // Add subject and difficulty tags
//!     exampdf::tag_dataset(&output, &exampdf::TagOptions::default())?;
//!     Ok(())
//! }
//! ```

pub mod detect;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod inspect;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{pdf_version, sniff_pdf_version};
pub use error::{Error, Result};
pub use extract::{CapturePolicy, ExtractOptions, Extractor, Rasterizer};
pub use geometry::{Column, Rect};
pub use inspect::GraphicsReport;
pub use metadata::{TagOptions, TagSummary};
pub use model::{PageLayout, QuestionRecord, TextBlock};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use render::{OutputOptions, PdfiumRasterizer};

use std::path::Path;

/// Read the layouts of every selected page of a PDF file.
///
/// # Example
///
/// ```no_run
/// let pages = exampdf::read_layouts("past_exams.pdf").unwrap();
/// println!("Pages: {}", pages.len());
/// ```
pub fn read_layouts<P: AsRef<Path>>(path: P) -> Result<Vec<PageLayout>> {
    PdfParser::open(path)?.parse()
}

/// Extract questions from a parsed document and write the dataset.
///
/// The image directory is recreated before the first page is processed.
pub fn run_extraction(
    parser: &PdfParser,
    rasterizer: &mut dyn Rasterizer,
    options: ExtractOptions,
    output: &OutputOptions,
) -> Result<Vec<QuestionRecord>> {
    let mut extractor = Extractor::new(options, output.image_dir(), output.images_dir.clone());
    extractor.prepare_image_dir()?;

    for page_num in parser.selected_pages() {
        if let Some(layout) = parser.read_page(page_num)? {
            extractor.process_page(&layout, rasterizer);
        }
    }

    let records = extractor.finish();
    render::write_outputs(&records, output)?;
    Ok(records)
}

/// Extract questions from a PDF file, rendering figures with PDFium.
///
/// `pdfium_library` overrides where the PDFium shared library is looked up.
pub fn extract_file<P: AsRef<Path>>(
    path: P,
    parse_options: ParseOptions,
    options: ExtractOptions,
    output: &OutputOptions,
    pdfium_library: Option<&Path>,
) -> Result<Vec<QuestionRecord>> {
    let path = path.as_ref();
    let parser = PdfParser::open_with_options(path, parse_options)?;
    let pdfium = render::bind_pdfium(pdfium_library)?;
    let mut rasterizer = PdfiumRasterizer::open(&pdfium, path)?;
    run_extraction(&parser, &mut rasterizer, options, output)
}

/// Add subject and difficulty tags to the dataset in `output`'s directory.
pub fn tag_dataset(output: &OutputOptions, options: &TagOptions) -> Result<TagSummary> {
    metadata::tag_output_dir(output, options)
}

/// Report drawings, images and figure mentions for the selected pages.
pub fn inspect_file<P: AsRef<Path>>(path: P, pages: PageSelection) -> Result<Vec<GraphicsReport>> {
    let parser = PdfParser::open_with_options(path, ParseOptions::new().with_pages(pages))?;
    inspect::inspect(&parser)
}
