//! Output: dataset files and figure rasterization.

mod json;
mod options;
mod raster;

pub use json::{parse_script, read_records, to_json, to_script, write_outputs};
pub use options::OutputOptions;
pub use raster::{bind_pdfium, encode_png, pixel_bounds, PdfiumRasterizer};
