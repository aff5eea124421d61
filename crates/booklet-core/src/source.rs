//! Input loading and validation
//!
//! Inputs arrive as raw bytes (from disk, or base64 in a command). They are
//! checked for a PDF header, parsed with lopdf and, when encrypted, decrypted
//! with the caller's password.

use crate::error::BookletError;
use lopdf::encryption::DecryptionError;
use lopdf::Document;
use serde::Serialize;

/// A named input file
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, using its file name as display name
    pub fn read(path: &std::path::Path) -> Result<Self, BookletError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// PDF file information extracted during validation
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

/// Validate a PDF file and extract basic info
pub fn validate_pdf(bytes: &[u8]) -> Result<PdfInfo, BookletError> {
    if bytes.len() < 8 {
        return Err(BookletError::ParseError(
            "File too small to be a valid PDF".into(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(BookletError::ParseError(
            "Not a valid PDF file (missing %PDF- header)".into(),
        ));
    }

    let version = extract_version(bytes);

    let document =
        Document::load_mem(bytes).map_err(|e| BookletError::ParseError(e.to_string()))?;

    let encrypted = document.is_encrypted();

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(BookletError::ParseError("PDF has no pages".into()));
    }

    let (title, author) = extract_metadata(&document);

    Ok(PdfInfo {
        page_count,
        version,
        encrypted,
        size_bytes: bytes.len(),
        title,
        author,
    })
}

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, BookletError> {
    let doc = Document::load_mem(bytes).map_err(|e| BookletError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

/// Parse an input, decrypting it when needed.
///
/// An absent password is tried as the empty string, which opens documents
/// that only carry an owner password. Only a rejected password maps to
/// `IncorrectPassword`; unsupported schemes (AES) are `ParseError`.
pub fn load_document(
    name: &str,
    bytes: &[u8],
    password: Option<&str>,
) -> Result<Document, BookletError> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| BookletError::ParseError(format!("{}: {}", name, e)))?;

    if doc.is_encrypted() {
        tracing::debug!("Decrypting {}", name);
        doc.decrypt(password.unwrap_or("")).map_err(|e| match e {
            lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
                BookletError::IncorrectPassword(name.to_string())
            }
            other => BookletError::ParseError(format!("{}: {}", name, other)),
        })?;
    }

    Ok(doc)
}

/// Extract PDF version from header
fn extract_version(bytes: &[u8]) -> String {
    // Header format: %PDF-1.7
    if bytes.len() >= 8 && bytes.starts_with(b"%PDF-") {
        if let Ok(version) = std::str::from_utf8(&bytes[5..8]) {
            return version.trim().to_string();
        }
    }
    "1.4".to_string()
}

/// Extract title and author from the Info dictionary
fn extract_metadata(document: &Document) -> (Option<String>, Option<String>) {
    let info_dict = document
        .trailer
        .get(b"Info")
        .and_then(|o| o.as_reference())
        .ok()
        .and_then(|id| document.objects.get(&id))
        .and_then(|o| o.as_dict().ok());

    let Some(info_dict) = info_dict else {
        return (None, None);
    };

    let field = |key: &[u8]| {
        info_dict
            .get(key)
            .and_then(|o| o.as_str())
            .ok()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .filter(|s| !s.is_empty())
    };

    (field(b"Title"), field(b"Author"))
}
