//! DOCX input detection and validation.
//!
//! A `.docx` file is an OPC package, i.e. a ZIP archive. Detection checks the
//! file extension the way users name their files and the ZIP signature the
//! way the container is actually stored.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ZIP signature found at the start of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipSignature {
    /// Regular archive starting with a local file header (`PK\x03\x04`)
    LocalFile,
    /// Archive with no entries (`PK\x05\x06`)
    Empty,
    /// Spanned archive marker (`PK\x07\x08`)
    Spanned,
}

impl std::fmt::Display for ZipSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZipSignature::LocalFile => write!(f, "ZIP"),
            ZipSignature::Empty => write!(f, "ZIP (empty)"),
            ZipSignature::Spanned => write!(f, "ZIP (spanned)"),
        }
    }
}

const ZIP_MAGIC_LEN: usize = 4;

/// Expected extension for WordprocessingML documents.
pub const DOCX_EXTENSION: &str = "docx";

/// Detect the container signature from a file path.
///
/// # Example
/// ```no_run
/// use docstyle::detect::detect_format_from_path;
///
/// let signature = detect_format_from_path("report.docx").unwrap();
/// println!("container: {}", signature);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ZipSignature> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; ZIP_MAGIC_LEN];
    reader.read_exact(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the container signature from bytes.
///
/// # Returns
/// * `Ok(ZipSignature)` if the data starts with a ZIP signature
/// * `Err(Error::UnsupportedFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ZipSignature> {
    if data.len() < ZIP_MAGIC_LEN || &data[..2] != b"PK" {
        return Err(Error::UnsupportedFormat("not a ZIP container".to_string()));
    }

    match (data[2], data[3]) {
        (0x03, 0x04) => Ok(ZipSignature::LocalFile),
        (0x05, 0x06) => Ok(ZipSignature::Empty),
        (0x07, 0x08) => Ok(ZipSignature::Spanned),
        _ => Err(Error::UnsupportedFormat("not a ZIP container".to_string())),
    }
}

/// Validate an input path before opening it.
///
/// Fails with [`Error::FileNotFound`] when the path does not exist and with
/// [`Error::UnsupportedFormat`] when its extension is not `.docx`.
pub fn check_input_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !has_docx_extension(path) {
        return Err(Error::UnsupportedFormat(path.display().to_string()));
    }
    Ok(())
}

/// Check whether a path carries the `.docx` extension (case-insensitive).
pub fn has_docx_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION))
        .unwrap_or(false)
}

/// Check if a file looks like a DOCX document (extension and signature).
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    has_docx_extension(path) && detect_format_from_path(path).is_ok()
}

/// Check if bytes start with a ZIP signature.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
