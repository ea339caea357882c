//! Region rasterization with PDFium.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;

use crate::error::{Error, Result};
use crate::extract::Rasterizer;
use crate::geometry::Rect;

/// Bind the PDFium library.
///
/// `library` may name the shared library itself or the directory holding
/// it. Without it, the working directory and then the system library path
/// are tried.
pub fn bind_pdfium(library: Option<&Path>) -> Result<Pdfium> {
    let bindings = match library {
        Some(path) if path.is_dir() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
        }
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Error::Raster(format!("Failed to load PDFium: {}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// A rendered page kept while its questions are captured.
struct RenderedPage {
    number: u32,
    zoom: f32,
    /// Pixels per PDF point
    scale: f32,
    image: DynamicImage,
}

/// Renders question regions from a PDF document.
///
/// Each page is rendered once and cropped for every region requested on it.
pub struct PdfiumRasterizer<'a> {
    document: PdfDocument<'a>,
    current: Option<RenderedPage>,
}

impl<'a> PdfiumRasterizer<'a> {
    /// Open `path` with a bound PDFium instance.
    pub fn open<P: AsRef<Path>>(pdfium: &'a Pdfium, path: P) -> Result<Self> {
        let document = pdfium
            .load_pdf_from_file(path.as_ref(), None)
            .map_err(|e| Error::Raster(format!("PDFium could not open document: {}", e)))?;
        Ok(Self {
            document,
            current: None,
        })
    }

    fn render_page(&self, number: u32, zoom: f32) -> Result<RenderedPage> {
        let index = number
            .checked_sub(1)
            .and_then(|i| PdfPageIndex::try_from(i).ok())
            .ok_or(Error::PageOutOfRange(number, self.document.pages().len() as u32))?;
        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|_| Error::PageOutOfRange(number, self.document.pages().len() as u32))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(zoom);
        let image = page
            .render_with_config(&config)
            .map_err(|e| Error::Raster(format!("page {}: {}", number, e)))?
            .as_image();

        let width = page.width().value;
        let scale = if width > 0.0 {
            image.width() as f32 / width
        } else {
            zoom
        };
        log::debug!(
            "Rendered page {} at {}x ({}x{} px)",
            number,
            zoom,
            image.width(),
            image.height()
        );

        Ok(RenderedPage {
            number,
            zoom,
            scale,
            image,
        })
    }
}

impl Rasterizer for PdfiumRasterizer<'_> {
    fn render_region(&mut self, page: u32, region: &Rect, zoom: f32) -> Result<Vec<u8>> {
        let cached = self
            .current
            .as_ref()
            .is_some_and(|r| r.number == page && r.zoom == zoom);
        if !cached {
            self.current = Some(self.render_page(page, zoom)?);
        }
        let rendered = self
            .current
            .as_ref()
            .ok_or_else(|| Error::Raster(format!("page {} not rendered", page)))?;

        let (x, y, w, h) = pixel_bounds(
            region,
            rendered.scale,
            rendered.image.width(),
            rendered.image.height(),
        )
        .ok_or_else(|| Error::Raster(format!("region outside page {}", page)))?;

        encode_png(&rendered.image.crop_imm(x, y, w, h))
    }
}

/// Pixel rectangle `(x, y, width, height)` covering `region`, clipped to the
/// image. `None` when nothing of it is on the image.
pub fn pixel_bounds(region: &Rect, scale: f32, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
    let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);

    let x0 = clamp((region.x0 * scale).floor(), image_width);
    let y0 = clamp((region.y0 * scale).floor(), image_height);
    let x1 = clamp((region.x1 * scale).ceil(), image_width);
    let y1 = clamp((region.y1 * scale).ceil(), image_height);

    (x1 > x0 && y1 > y0).then(|| (x0, y0, x1 - x0, y1 - y0))
}

/// Encode an image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    image.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_bounds_scales_and_clips() {
        let region = Rect::new(10.0, 20.0, 110.5, 60.0);
        assert_eq!(pixel_bounds(&region, 2.0, 1000, 1000), Some((20, 40, 201, 80)));

        let overflowing = Rect::new(-5.0, 900.0, 700.0, 1200.0);
        assert_eq!(pixel_bounds(&overflowing, 1.0, 600, 1000), Some((0, 900, 600, 100)));

        let outside = Rect::new(0.0, 1200.0, 100.0, 1300.0);
        assert_eq!(pixel_bounds(&outside, 1.0, 600, 1000), None);
    }

    #[test]
    fn test_encode_png_signature() {
        let image = DynamicImage::new_rgb8(4, 3);
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
