//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the handful of PDF operations the
//! page reader needs, isolating the concrete PDF library (lopdf) from the
//! content-stream interpretation.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, Stream};

use crate::error::{Error, Result};
use crate::geometry::Matrix;

/// Object identifier: (object number, generation number).
pub type ObjectRef = (u32, u16);

/// Page identifier.
pub type PageId = ObjectRef;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if this operand is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Numeric operand at `idx`, or `default` when missing or not a number.
    pub fn number(&self, idx: usize, default: f32) -> f32 {
        self.operands
            .get(idx)
            .and_then(PdfValue::as_number)
            .unwrap_or(default)
    }

    /// All six operands as a matrix (`cm`, `Tm`).
    pub fn matrix(&self) -> Option<Matrix> {
        if self.operands.len() < 6 {
            return None;
        }
        Some(Matrix::new(
            self.number(0, 1.0),
            self.number(1, 0.0),
            self.number(2, 0.0),
            self.number(3, 1.0),
            self.number(4, 0.0),
            self.number(5, 0.0),
        ))
    }
}

/// An external object referenced by a `Do` operator.
#[derive(Debug, Clone)]
pub enum XObject {
    /// A raster image, painted into the unit square of the current CTM.
    Image,
    /// A form: a nested content stream with its own matrix.
    Form {
        id: ObjectRef,
        matrix: Matrix,
        content: Vec<u8>,
    },
    /// Anything else (PostScript XObjects, broken references).
    Unsupported,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, page geometry, content stream
/// decoding, text decoding, and XObject lookup without exposing any
/// concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), 1-indexed.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Visible page box `[llx, lly, urx, ury]` in PDF user space.
    fn page_box(&self, page: PageId) -> Result<[f32; 4]>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Look up a named XObject, first in `form`'s resources (when drawing
    /// inside a form), then in the page's resources.
    fn xobject(&self, page: PageId, form: Option<ObjectRef>, name: &[u8]) -> XObject;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend — concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Default page box when a page declares none (US Letter).
const LETTER_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guard against cyclic `Parent` chains.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Follow a single indirect reference.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Look up a page attribute, walking up the page tree for inherited keys.
    fn inherited(&self, page: PageId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(obj) = dict.get(key) {
                return Some(self.resolve(obj));
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn rect_array(&self, obj: &Object) -> Option<[f32; 4]> {
        let array = obj.as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let mut values = [0.0f32; 4];
        for (slot, item) in values.iter_mut().zip(array) {
            *slot = object_number(self.resolve(item))?;
        }
        // Normalise so that ll < ur.
        Some([
            values[0].min(values[2]),
            values[1].min(values[3]),
            values[0].max(values[2]),
            values[1].max(values[3]),
        ])
    }

    /// Find `name` in the `/XObject` subdictionary of a resources object.
    fn xobject_in(&self, resources: &Object, name: &[u8]) -> Option<ObjectRef> {
        let resources = self.resolve(resources).as_dict().ok()?;
        let xobjects = self.resolve(resources.get(b"XObject").ok()?).as_dict().ok()?;
        xobjects.get(name).ok()?.as_reference().ok()
    }

    fn describe_xobject(&self, id: ObjectRef) -> Result<XObject> {
        let stream = self.doc.get_object(id)?.as_stream()?;
        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|s| s.as_name().ok())
            .unwrap_or(b"");

        match subtype {
            b"Image" => Ok(XObject::Image),
            b"Form" => {
                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|m| m.as_array().ok())
                    .filter(|m| m.len() >= 6)
                    .map(|m| {
                        let n = |i: usize| object_number(self.resolve(&m[i]));
                        Matrix::new(
                            n(0).unwrap_or(1.0),
                            n(1).unwrap_or(0.0),
                            n(2).unwrap_or(0.0),
                            n(3).unwrap_or(1.0),
                            n(4).unwrap_or(0.0),
                            n(5).unwrap_or(0.0),
                        )
                    })
                    .unwrap_or_default();
                Ok(XObject::Form {
                    id,
                    matrix,
                    content: stream_bytes(stream)?,
                })
            }
            _ => Ok(XObject::Unsupported),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_box(&self, page: PageId) -> Result<[f32; 4]> {
        if self.doc.get_dictionary(page).is_err() {
            return Err(Error::PdfParse(format!(
                "Page object {} {} is not a dictionary",
                page.0, page.1
            )));
        }
        let visible = self
            .inherited(page, b"CropBox")
            .and_then(|b| self.rect_array(b))
            .or_else(|| {
                self.inherited(page, b"MediaBox")
                    .and_then(|b| self.rect_array(b))
            });
        Ok(visible.unwrap_or(LETTER_BOX))
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without /Contents is blank, not broken.
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            Object::Stream(s) => stream_bytes(s),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = self.resolve(obj) {
                        match stream_bytes(s) {
                            Ok(data) => {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                            Err(e) => log::warn!("Skipping unreadable content stream: {}", e),
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn xobject(&self, page: PageId, form: Option<ObjectRef>, name: &[u8]) -> XObject {
        let from_form = form.and_then(|id| {
            let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
            self.xobject_in(stream.dict.get(b"Resources").ok()?, name)
        });
        let id = from_form.or_else(|| self.xobject_in(self.inherited(page, b"Resources")?, name));

        match id.map(|id| self.describe_xobject(id)) {
            Some(Ok(xobject)) => xobject,
            Some(Err(e)) => {
                log::debug!("Unreadable XObject /{}: {}", String::from_utf8_lossy(name), e);
                XObject::Unsupported
            }
            None => XObject::Unsupported,
        }
    }
}

/// Stream payload with filters applied; unfiltered streams are returned as-is.
fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        // BOM + "문"
        let bytes = vec![0xFE, 0xFF, 0xBB, 0x38];
        assert_eq!(decode_text_simple(&bytes), "문");
    }

    #[test]
    fn test_content_op_matrix() {
        let op = ContentOp {
            operator: "cm".to_string(),
            operands: vec![
                PdfValue::Integer(2),
                PdfValue::Integer(0),
                PdfValue::Integer(0),
                PdfValue::Real(2.0),
                PdfValue::Integer(10),
                PdfValue::Real(20.5),
            ],
        };
        assert_eq!(
            op.matrix(),
            Some(Matrix::new(2.0, 0.0, 0.0, 2.0, 10.0, 20.5))
        );

        let short = ContentOp {
            operator: "cm".to_string(),
            operands: vec![PdfValue::Integer(1)],
        };
        assert!(short.matrix().is_none());
    }

    #[test]
    fn test_content_op_number_default() {
        let op = ContentOp {
            operator: "Tf".to_string(),
            operands: vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
        };
        assert_eq!(op.number(1, 0.0), 12.0);
        assert_eq!(op.number(0, 7.0), 7.0);
        assert_eq!(op.number(5, 3.0), 3.0);
    }
}
