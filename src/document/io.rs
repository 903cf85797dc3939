//! File I/O operations and validation
//!
//! This module handles the checks that must happen before a full parse:
//! rejecting Office lock files, sniffing the container, and reading the
//! bytes under a scoped file handle.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use super::models::DocumentFormat;
use crate::error::Unreadable;

/// OLE2 / CFB signature shared by all legacy Office formats.
pub(crate) const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Office leaves `~$name.docx` lock files next to documents that are open.
pub(crate) fn is_temporary_artifact(path: &Path, temp_marker: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(temp_marker))
}

/// Read the whole file. The handle is dropped before this returns, on the
/// error path as well.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, Unreadable> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Check the container matches the claimed format before parsing it.
pub(crate) fn validate_container(bytes: &[u8], format: DocumentFormat) -> Result<(), Unreadable> {
    match format {
        DocumentFormat::Docx => validate_docx_container(bytes),
        DocumentFormat::Doc => validate_doc_container(bytes),
    }
}

fn validate_docx_container(bytes: &[u8]) -> Result<(), Unreadable> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    if archive.by_name("word/document.xml").is_err() {
        // Check if it might be an Excel file
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(Unreadable::Container(
                "this appears to be an Excel workbook, not a Word document".to_string(),
            ));
        }

        return Err(Unreadable::Container(
            "missing word/document.xml".to_string(),
        ));
    }

    Ok(())
}

fn validate_doc_container(bytes: &[u8]) -> Result<(), Unreadable> {
    if bytes.len() < CFB_SIGNATURE.len() {
        return Err(Unreadable::Container(format!(
            "file too small to be a compound document ({} bytes)",
            bytes.len()
        )));
    }

    if bytes[..CFB_SIGNATURE.len()] != CFB_SIGNATURE {
        if bytes.starts_with(b"PK") {
            return Err(Unreadable::Container(
                "ZIP container with a .doc extension; rename it to .docx".to_string(),
            ));
        }
        return Err(Unreadable::Container(format!(
            "invalid compound document signature {:02X?}",
            &bytes[..CFB_SIGNATURE.len()]
        )));
    }

    Ok(())
}
