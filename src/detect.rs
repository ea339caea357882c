//! PDF header sniffing.
//!
//! The exam PDF is opened once per run; checking the `%PDF-x.y` magic first
//! turns "wrong file" mistakes into [`Error::UnknownFormat`] instead of an
//! opaque parser failure deep inside lopdf.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Read the header of `path` and return the declared PDF version (e.g. `"1.7"`).
pub fn sniff_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    pdf_version(&header)
}

/// Return the declared PDF version of an in-memory document header.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version = rest.get(..3).ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}
