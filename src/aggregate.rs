//! Batch processing over a directory tree
//!
//! Documents are processed one at a time in sorted path order. A failing
//! document is logged and recorded, and the batch moves on.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::{DocumentFormat, load_document};
use crate::error::DocumentError;
use crate::extract::{ChangeRecord, Extractor};

/// A document that was excluded from the aggregate.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: DocumentError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ChangeRecord>,
    pub documents_processed: usize,
    /// Office lock files found next to open documents
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<DocumentFailure>,
}

/// Every `.doc`/`.docx` file below `root`, sorted by path.
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && DocumentFormat::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }

    paths
}

/// Load and extract one document, then apply the batch-level rules: the
/// mapping name becomes the file stem and excluded change numbers are
/// dropped.
pub fn process_file(path: &Path, extractor: &Extractor<'_>) -> Result<Vec<ChangeRecord>, DocumentError> {
    let settings = extractor.settings();
    let document = load_document(path, &settings.file_name.temp_marker)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();

    let extraction = extractor.extract(&document, file_name);
    let before = extraction.records.len();
    let records: Vec<ChangeRecord> = extraction
        .records
        .into_iter()
        .filter(|record| !settings.filter.excludes(record.change_number()))
        .map(|record| record.with_mapping_name(stem.as_str()))
        .collect();

    if records.len() < before {
        debug!(
            path = %path.display(),
            dropped = before - records.len(),
            "filtered excluded change numbers"
        );
    }
    Ok(records)
}

/// Process every document below `root`.
pub fn process_folder(root: &Path, extractor: &Extractor<'_>) -> BatchOutcome {
    let paths = discover_documents(root);
    let mut outcome = BatchOutcome::default();

    if paths.is_empty() {
        warn!(root = %root.display(), "no .doc or .docx files found");
        return outcome;
    }
    info!(root = %root.display(), documents = paths.len(), "processing folder");

    for path in paths {
        match process_file(&path, extractor) {
            Ok(records) => {
                outcome.documents_processed += 1;
                outcome.records.extend(records);
            }
            Err(err) if err.is_temporary_artifact() => {
                info!(path = %path.display(), "skipping temporary file");
                outcome.skipped.push(path);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to process document");
                outcome.failures.push(DocumentFailure { path, error: err });
            }
        }
    }

    info!(
        processed = outcome.documents_processed,
        failed = outcome.failures.len(),
        records = outcome.records.len(),
        "batch finished"
    );
    outcome
}
