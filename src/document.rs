//! The uploaded document and its declared kind.
//!
//! A [`Document`] lives for exactly one request. The file extension gates
//! the upload: a name ending in anything but `.txt`, `.pdf` or `.docx` is
//! rejected whatever MIME type it declares. Within that gate the declared
//! MIME type picks the parser, falling back to the extension when the MIME
//! type is missing or generic (`application/octet-stream`). Names without an
//! extension rely on the MIME type alone.

use crate::error::WordCloudError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The three document kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Kind for a MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            MIME_TEXT => Some(DocumentKind::PlainText),
            MIME_PDF => Some(DocumentKind::Pdf),
            MIME_DOCX => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    /// Kind for a file name's extension (`.txt`, `.pdf`, `.docx`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;
        match ext.as_str() {
            "txt" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::PlainText => MIME_TEXT,
            DocumentKind::Pdf => MIME_PDF,
            DocumentKind::Docx => MIME_DOCX,
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::PlainText => "plain text",
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "Word document",
        }
    }
}

/// Name, type and size of an upload, as shown to the user before processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDetails {
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
}

/// Raw bytes of one upload plus what the client claims it is.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    /// MIME type declared by the client; may be empty.
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes,
        }
    }

    /// Build a document from bytes, declaring the MIME type implied by the
    /// file name (or nothing, for unknown extensions).
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let declared = DocumentKind::from_file_name(&name)
            .map(|k| k.mime_type().to_string())
            .unwrap_or_default();
        Self::new(name, declared, bytes)
    }

    /// Read a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordCloudError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => WordCloudError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => WordCloudError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_named_bytes(name, bytes))
    }

    /// Resolve the document kind, or fail with `UnsupportedFormat`.
    pub fn kind(&self) -> Result<DocumentKind, WordCloudError> {
        let by_extension = DocumentKind::from_file_name(&self.name);
        let has_extension = Path::new(&self.name).extension().is_some();
        if has_extension && by_extension.is_none() {
            return Err(self.unsupported());
        }
        DocumentKind::from_mime(&self.declared_type)
            .or(by_extension)
            .ok_or_else(|| self.unsupported())
    }

    fn unsupported(&self) -> WordCloudError {
        WordCloudError::UnsupportedFormat {
            name: self.name.clone(),
            declared: if self.declared_type.is_empty() {
                "unknown type".to_string()
            } else {
                self.declared_type.clone()
            },
        }
    }

    pub fn details(&self) -> UploadDetails {
        UploadDetails {
            file_name: self.name.clone(),
            file_type: self.declared_type.clone(),
            file_size: self.bytes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_mime_ignores_parameters() {
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_mime(MIME_DOCX), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_mime("text/csv"), None);
    }

    #[test]
    fn kind_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_file_name("Report.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_file_name("notes.txt"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_file_name("data.csv"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn declared_mime_picks_parser_within_supported_extensions() {
        let doc = Document::new("scan.txt", MIME_PDF, vec![]);
        assert_eq!(doc.kind().unwrap(), DocumentKind::Pdf);
        let doc = Document::new("upload", MIME_PDF, vec![]);
        assert_eq!(doc.kind().unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn unsupported_extension_beats_declared_mime() {
        for (name, mime) in [
            ("data.csv", MIME_TEXT),
            ("upload.bin", MIME_PDF),
            ("sheet.xlsx", MIME_DOCX),
        ] {
            let err = Document::new(name, mime, b"x".to_vec()).kind().unwrap_err();
            assert!(matches!(err, WordCloudError::UnsupportedFormat { .. }), "{name}");
        }
    }

    #[test]
    fn no_extension_and_no_mime_is_unsupported() {
        let err = Document::new("README", "", vec![]).kind().unwrap_err();
        assert!(err.to_string().contains("unknown type"));
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        let doc = Document::new("essay.docx", "application/octet-stream", vec![]);
        assert_eq!(doc.kind().unwrap(), DocumentKind::Docx);
    }

    #[test]
    fn csv_is_unsupported() {
        let doc = Document::from_named_bytes("table.csv", b"a,b\n1,2\n".to_vec());
        let err = doc.kind().unwrap_err();
        assert!(matches!(err, WordCloudError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("table.csv"));
    }

    #[test]
    fn details_report_size_and_type() {
        let doc = Document::from_named_bytes("a.txt", b"hello".to_vec());
        let details = doc.details();
        assert_eq!(details.file_name, "a.txt");
        assert_eq!(details.file_type, MIME_TEXT);
        assert_eq!(details.file_size, 5);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Document::from_path("/no/such/dir/file.txt").unwrap_err();
        assert!(matches!(err, WordCloudError::FileNotFound { .. }));
    }
}
