//! Question extraction: segmentation, option splitting, figure capture and
//! record assembly.

mod assemble;
mod choices;
mod figure;
mod options;
mod segment;

pub use assemble::Extractor;
pub use choices::{has_option_marker, split_options, split_question, QuestionText, MAX_OPTIONS, OPTION_MARKERS};
pub use figure::{capture_region, gap_region, graphics_region, locate_figure, Rasterizer};
pub use options::{CapturePolicy, ExtractOptions, DEFAULT_QUESTION_PATTERN};
pub use segment::{capture_bounds, segment_column, segment_page, QuestionGroup};
