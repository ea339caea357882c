//! Synthetic exam PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use exampdf::error::Result;
use exampdf::{Rasterizer, Rect};

/// A line of text placed with its baseline at PDF user-space `(x, y)`.
pub struct Line<'a> {
    pub x: i64,
    pub y: i64,
    pub text: &'a str,
}

pub fn line(x: i64, y: i64, text: &str) -> Line<'_> {
    Line { x, y, text }
}

/// Page content: text lines, filled rectangles `(x, y, w, h)` and image
/// placements `(x, y, w, h)`, all in PDF user space (bottom-left origin).
#[derive(Default)]
pub struct PageSpec<'a> {
    pub lines: Vec<Line<'a>>,
    pub rects: Vec<(i64, i64, i64, i64)>,
    pub images: Vec<(i64, i64, i64, i64)>,
}

fn page_operations(spec: &PageSpec<'_>) -> Vec<Operation> {
    let mut ops = Vec::new();
    for l in &spec.lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        ops.push(Operation::new("Td", vec![l.x.into(), l.y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(l.text)]));
        ops.push(Operation::new("ET", vec![]));
    }
    for &(x, y, w, h) in &spec.rects {
        ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        ops.push(Operation::new("f", vec![]));
    }
    for &(x, y, w, h) in &spec.images {
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
        ));
        ops.push(Operation::new("Do", vec!["Im1".into()]));
        ops.push(Operation::new("Q", vec![]));
    }
    ops
}

/// Build a 600x800 pt PDF with one page per spec.
pub fn build_pdf(pages: &[PageSpec<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8],
    ));

    let mut kids: Vec<Object> = Vec::new();
    for spec in pages {
        let content = Content {
            operations: page_operations(spec),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 600.into(), 800.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A two-page exam.
///
/// Page 1, left column: question 1 (with a drawn figure between stem and
/// options) and question 2; right column: question 3 next to an embedded
/// image. Page 2: question 4 without graphics.
pub fn sample_exam() -> Vec<u8> {
    build_pdf(&[
        PageSpec {
            lines: vec![
                line(50, 760, "Exam header"),
                line(50, 700, "1. Stem text"),
                line(50, 540, "① A ② B"),
                line(50, 500, "2. 다음 그림을 보고"),
                line(50, 480, "① C"),
                line(320, 700, "문 3. Right question"),
                line(320, 680, "① x ② y ③ z ④ w"),
            ],
            rects: vec![(100, 560, 80, 40)],
            images: vec![(350, 600, 100, 50)],
        },
        PageSpec {
            lines: vec![line(50, 700, "4. Last one"), line(50, 680, "① yes ② no")],
            ..Default::default()
        },
    ])
}

/// Rasterizer that records requests and returns a fixed payload.
#[derive(Default)]
pub struct FakeRasterizer {
    pub requests: Vec<(u32, Rect, f32)>,
}

impl Rasterizer for FakeRasterizer {
    fn render_region(&mut self, page: u32, region: &Rect, zoom: f32) -> Result<Vec<u8>> {
        self.requests.push((page, *region, zoom));
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }
}
