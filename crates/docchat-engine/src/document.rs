//! Documents and the upload file handle.
//!
//! An [`UploadFile`] is what the file picker hands over: a name, a declared
//! media type and the raw bytes. Once the session accepts it, the session
//! keeps only a [`Document`] reference (name and size).

use std::path::Path;

/// The only media type the session accepts for upload.
pub const DOCUMENT_MIME: &str = "application/pdf";

/// Media type declared for files with an unrecognised extension.
const FALLBACK_MIME: &str = "application/octet-stream";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// A file selected for upload, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name (no directory components).
    pub name: String,
    /// Declared media type.
    pub media_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload file from in-memory contents.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            name,
            media_type: media_type_for(path).to_string(),
            bytes,
        })
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared media type is the document type.
    pub fn is_document(&self) -> bool {
        self.media_type == DOCUMENT_MIME
    }
}

/// Declared media type for a path, based on its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => DOCUMENT_MIME,
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html" | "htm") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => FALLBACK_MIME,
    }
}

/// The document bound to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl Document {
    /// Create a document reference.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Human-readable size, e.g. `2.19 MB`.
    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }
}

impl From<&UploadFile> for Document {
    fn from(file: &UploadFile) -> Self {
        Self::new(file.name.clone(), file.size())
    }
}

/// Format a byte count: `n bytes` below 1 KB, then KB and MB with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} bytes")
    } else if bytes < MIB {
        format!("{} KB", two_decimals(bytes, KIB))
    } else {
        format!("{} MB", two_decimals(bytes, MIB))
    }
}

/// `bytes / unit` with two decimals, ties rounded up.
fn two_decimals(bytes: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let hundredths = (u128::from(bytes) * 100 + unit / 2) / unit;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// The assistant greeting seeded into an empty history once processing succeeds.
pub fn welcome_message(document: &Document) -> String {
    format!(
        "I've processed your PDF \"{}\" ({}). What would you like to know about it?",
        document.name,
        document.size_label()
    )
}
