//! Content-stream interpretation.
//!
//! Walks a page's operators with a graphics-state stack and collects three
//! things in page coordinates (top-left origin): positioned text spans,
//! bounding boxes of painted vector paths, and bounding boxes of placed
//! images. Form XObjects are followed for graphics, not for text.

use unicode_normalization::UnicodeNormalization;

use super::backend::{decode_text_simple, ContentOp, ObjectRef, PageId, PdfBackend, PdfValue, XObject};
use super::layout::{is_spaceless_script_char, TextSpan};
use crate::error::Result;
use crate::geometry::{Matrix, Rect};

/// Maximum nesting of Form XObjects followed while collecting graphics.
const MAX_FORM_DEPTH: usize = 8;

/// TJ adjustments larger than this (in thousandths of an em) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Everything collected from one page's content.
#[derive(Debug, Default)]
pub struct PageContent {
    pub spans: Vec<TextSpan>,
    pub drawings: Vec<Rect>,
    pub images: Vec<Rect>,
}

/// Graphics state saved and restored by `q`/`Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl GraphicsState {
    fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

/// Interprets content streams for a single page.
pub struct ContentInterpreter<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    out: PageContent,
}

impl<'a, B: PdfBackend + ?Sized> ContentInterpreter<'a, B> {
    pub fn new(backend: &'a B, page: PageId) -> Self {
        Self {
            backend,
            page,
            out: PageContent::default(),
        }
    }

    /// Interpret the page's content stream.
    ///
    /// `page_matrix` maps PDF user space onto page coordinates.
    pub fn run(mut self, page_matrix: Matrix) -> Result<PageContent> {
        let data = self.backend.page_content(self.page)?;
        if !data.is_empty() {
            let ops = self.backend.decode_content(&data)?;
            self.interpret(&ops, page_matrix, None, 0);
        }
        Ok(self.out)
    }

    fn interpret(&mut self, ops: &[ContentOp], base: Matrix, form: Option<ObjectRef>, depth: usize) {
        // Text is only read from the page itself; forms carry their own fonts.
        let collect_text = form.is_none();

        let mut state = GraphicsState::new(base);
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut path: Vec<(f32, f32)> = Vec::new();
        let mut text_matrix = Matrix::IDENTITY;
        let mut line_matrix = Matrix::IDENTITY;
        let mut in_inline_image = false;

        for op in ops {
            match op.operator.as_str() {
                // Graphics state
                "q" => stack.push(state.clone()),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = op.matrix() {
                        state.ctm = m.then(&state.ctm);
                    }
                }

                // Path construction
                "m" | "l" => {
                    path.push(state.ctm.apply(op.number(0, 0.0), op.number(1, 0.0)));
                }
                "c" => {
                    for i in 0..3 {
                        path.push(state.ctm.apply(op.number(2 * i, 0.0), op.number(2 * i + 1, 0.0)));
                    }
                }
                "v" | "y" => {
                    for i in 0..2 {
                        path.push(state.ctm.apply(op.number(2 * i, 0.0), op.number(2 * i + 1, 0.0)));
                    }
                }
                "re" => {
                    let (x, y) = (op.number(0, 0.0), op.number(1, 0.0));
                    let (w, h) = (op.number(2, 0.0), op.number(3, 0.0));
                    for (px, py) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
                        path.push(state.ctm.apply(px, py));
                    }
                }

                // Path painting
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    if let Some(rect) = Rect::bounding(path.drain(..)) {
                        self.out.drawings.push(rect);
                    }
                }
                "n" => path.clear(),

                // External objects
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        self.place_xobject(name, &state.ctm, form, depth);
                    }
                }
                "BI" => {
                    in_inline_image = true;
                    self.push_unit_square(&state.ctm);
                }
                "EI" => {
                    if !in_inline_image {
                        self.push_unit_square(&state.ctm);
                    }
                    in_inline_image = false;
                }

                // Text state
                "BT" => {
                    text_matrix = Matrix::IDENTITY;
                    line_matrix = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let Some(PdfValue::Name(font)) = op.operands.first() {
                        state.font = font.clone();
                    }
                    state.font_size = op.number(1, state.font_size);
                }
                "TL" => state.leading = op.number(0, state.leading),
                "Td" | "TD" => {
                    let (tx, ty) = (op.number(0, 0.0), op.number(1, 0.0));
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    line_matrix = Matrix::translation(tx, ty).then(&line_matrix);
                    text_matrix = line_matrix;
                }
                "Tm" => {
                    if let Some(m) = op.matrix() {
                        line_matrix = m;
                        text_matrix = m;
                    }
                }
                "T*" => {
                    line_matrix = Matrix::translation(0.0, -state.leading).then(&line_matrix);
                    text_matrix = line_matrix;
                }

                // Text showing
                "Tj" | "'" | "\"" => {
                    if op.operator != "Tj" {
                        line_matrix = Matrix::translation(0.0, -state.leading).then(&line_matrix);
                        text_matrix = line_matrix;
                    }
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(idx) {
                        let text = self.decode(&state.font, bytes, collect_text);
                        self.show(text, &state, &mut text_matrix, collect_text);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        self.show_array(items, &state, &mut text_matrix, collect_text);
                    }
                }
                _ => {}
            }
        }
    }

    fn decode(&self, font: &[u8], bytes: &[u8], collect_text: bool) -> String {
        if collect_text {
            self.backend.decode_text(self.page, font, bytes)
        } else {
            decode_text_simple(bytes)
        }
    }

    /// Emit a span for `text` at the current text position and advance.
    fn show(&mut self, text: String, state: &GraphicsState, text_matrix: &mut Matrix, collect_text: bool) {
        let advance = text_advance(&text, state.font_size);
        if collect_text && !text.trim().is_empty() {
            let rendering = text_matrix.then(&state.ctm);
            let (x, y) = rendering.apply(0.0, 0.0);
            let font_size = state.font_size * rendering.vertical_scale();
            let width = advance * rendering.horizontal_scale();
            let text: String = text.nfc().collect();
            self.out.spans.push(TextSpan::new(text, x, y, width, font_size));
        }
        *text_matrix = Matrix::translation(advance, 0.0).then(text_matrix);
    }

    /// `TJ`: strings and kerning adjustments shown as one span.
    fn show_array(
        &mut self,
        items: &[PdfValue],
        state: &GraphicsState,
        text_matrix: &mut Matrix,
        collect_text: bool,
    ) {
        let start = *text_matrix;
        let mut combined = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self.decode(&state.font, bytes, collect_text);
                    advance += text_advance(&decoded, state.font_size);
                    combined.push_str(&decoded);
                }
                other => {
                    let Some(n) = other.as_number() else { continue };
                    // Negative values move the pen right
                    let adjustment = -n;
                    advance += adjustment / 1000.0 * state.font_size;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
            }
        }

        if collect_text && !combined.trim().is_empty() {
            let rendering = start.then(&state.ctm);
            let (x, y) = rendering.apply(0.0, 0.0);
            let font_size = state.font_size * rendering.vertical_scale();
            let width = advance.max(0.0) * rendering.horizontal_scale();
            let text: String = combined.nfc().collect();
            self.out.spans.push(TextSpan::new(text, x, y, width, font_size));
        }
        *text_matrix = Matrix::translation(advance, 0.0).then(&start);
    }

    fn place_xobject(&mut self, name: &[u8], ctm: &Matrix, form: Option<ObjectRef>, depth: usize) {
        match self.backend.xobject(self.page, form, name) {
            XObject::Image => self.push_unit_square(ctm),
            XObject::Form {
                id,
                matrix,
                content,
            } => {
                if depth >= MAX_FORM_DEPTH {
                    log::debug!("Form XObject nesting too deep, skipping");
                    return;
                }
                match self.backend.decode_content(&content) {
                    Ok(ops) => self.interpret(&ops, matrix.then(ctm), Some(id), depth + 1),
                    Err(e) => log::debug!("Skipping undecodable form XObject: {}", e),
                }
            }
            XObject::Unsupported => {}
        }
    }

    fn push_unit_square(&mut self, ctm: &Matrix) {
        let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        if let Some(rect) = Rect::bounding(corners.map(|(x, y)| ctm.apply(x, y))) {
            self.out.images.push(rect);
        }
    }
}

/// Estimated advance of `text` in text space units.
///
/// Glyph metrics are not consulted: wide scripts advance a full em, spaces a
/// quarter, everything else half an em.
fn text_advance(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_em_width).sum::<f32>() * font_size
}

fn glyph_em_width(c: char) -> f32 {
    let code = c as u32;
    if c == ' ' {
        0.25
    } else if is_spaceless_script_char(c)
        // Hangul syllables and jamo
        || (0xAC00..=0xD7A3).contains(&code)
        || (0x1100..=0x11FF).contains(&code)
        || (0x3130..=0x318F).contains(&code)
        // Enclosed alphanumerics (circled digits)
        || (0x2460..=0x24FF).contains(&code)
        // Fullwidth forms
        || (0xFF00..=0xFFEF).contains(&code)
    {
        1.0
    } else {
        0.5
    }
}
