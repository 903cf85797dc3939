//! Document loading and backend selection
//!
//! This module contains `load_document()`, which picks a backend from the
//! file extension, runs the pre-parse checks and hands the bytes to the
//! backend.

use std::path::Path;
use tracing::{debug, info};

use super::io::{is_temporary_artifact, read_bytes, validate_container};
use super::models::*;
use super::parsing::formatting::extract_paragraph;
use super::parsing::table::extract_table;
use super::word97::Word97Backend;
use crate::error::{DocumentError, Unreadable};

/// A parser for one on-disk Word format.
pub trait WordBackend {
    fn format(&self) -> DocumentFormat;

    /// Parse an in-memory file into the document model.
    fn parse(&self, title: &str, bytes: &[u8]) -> Result<Document, Unreadable>;
}

/// Office Open XML documents, read through docx-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxBackend;

impl WordBackend for DocxBackend {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn parse(&self, title: &str, bytes: &[u8]) -> Result<Document, Unreadable> {
        let docx = docx_rs::read_docx(bytes)?;
        let mut blocks = Vec::new();

        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(para) => {
                    blocks.push(Block::Paragraph(extract_paragraph(para)));
                }
                docx_rs::DocumentChild::Table(table) => {
                    blocks.push(Block::Table(extract_table(table)));
                }
                _ => {}
            }
        }

        Ok(Document {
            title: title.to_string(),
            format: DocumentFormat::Docx,
            blocks,
        })
    }
}

/// Pick the backend for a format. Decided once, at load time.
pub fn backend_for(format: DocumentFormat) -> Box<dyn WordBackend> {
    match format {
        DocumentFormat::Docx => Box::new(DocxBackend),
        DocumentFormat::Doc => Box::new(Word97Backend),
    }
}

/// Load a `.doc` or `.docx` file into the document model
///
/// This function:
/// 1. Selects the backend from the extension
/// 2. Rejects Office lock files by name
/// 3. Reads the bytes (the file handle is closed right after)
/// 4. Sniffs the container
/// 5. Parses with the selected backend
pub fn load_document(path: &Path, temp_marker: &str) -> Result<Document, DocumentError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| DocumentError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_string(),
    })?;

    if is_temporary_artifact(path, temp_marker) {
        return Err(DocumentError::unreadable(path, Unreadable::TemporaryArtifact));
    }

    let bytes = read_bytes(path).map_err(|reason| DocumentError::unreadable(path, reason))?;
    validate_container(&bytes, format).map_err(|reason| DocumentError::unreadable(path, reason))?;

    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled Document")
        .to_string();

    let backend = backend_for(format);
    debug!(path = %path.display(), format = ?backend.format(), "parsing document");
    let document = backend
        .parse(&title, &bytes)
        .map_err(|reason| DocumentError::unreadable(path, reason))?;

    info!(
        path = %path.display(),
        tables = document.tables().count(),
        paragraphs = document.paragraphs().count(),
        "loaded document"
    );
    Ok(document)
}
