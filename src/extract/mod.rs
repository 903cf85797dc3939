//! Change extraction for one document
//!
//! Walks every table row, classifies the content cell and emits one
//! [`ChangeRecord`] per row with red text. Table name, release marker and
//! mapping name are resolved once and shared by every record.

pub mod classify;
pub mod metadata;
pub mod record;

pub use classify::{Classification, classify};
pub use metadata::DocumentIdentity;
pub use record::{ChangeKind, ChangeRecord};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::document::{Document, Row};
use crate::error::SettingsError;
use record::DocumentFields;

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub table_name: String,
    pub release_marker: String,
    pub identity: DocumentIdentity,
    pub records: Vec<ChangeRecord>,
}

/// Extraction policy with its patterns compiled once per batch.
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    settings: &'a Settings,
    release_pattern: Regex,
}

impl<'a> Extractor<'a> {
    pub fn new(settings: &'a Settings) -> Result<Self, SettingsError> {
        Ok(Extractor {
            settings,
            release_pattern: settings.release_regex()?,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn extract(&self, document: &Document, file_name: &str) -> Extraction {
        let settings = self.settings;
        let chain = settings.strategies.for_format(document.format);

        let table_name = metadata::resolve_table_name(document, &chain.table_name, &settings.anchors)
            .unwrap_or_else(|| {
                warn!(file_name, "table name not found");
                settings.placeholders.table_name.clone()
            });
        let release_marker = metadata::resolve_release_marker(
            document,
            &chain.release_marker,
            &settings.anchors,
            &self.release_pattern,
        )
        .unwrap_or_else(|| {
            warn!(file_name, "release marker not found");
            settings.placeholders.release_marker.clone()
        });
        let identity = DocumentIdentity::from_file_name(file_name, &settings.file_name);

        let fields = DocumentFields {
            table_name: &table_name,
            release_marker: &release_marker,
            mapping_name: identity
                .mapping
                .as_deref()
                .unwrap_or(settings.placeholders.mapping_name.as_str()),
        };
        let records: Vec<ChangeRecord> = document
            .rows()
            .filter_map(|row| self.extract_row(row, &fields))
            .collect();

        info!(
            file_name,
            table_name = %table_name,
            release_marker = %release_marker,
            records = records.len(),
            "extracted changes"
        );

        Extraction {
            table_name,
            release_marker,
            identity,
            records,
        }
    }

    fn extract_row(&self, row: &Row, fields: &DocumentFields<'_>) -> Option<ChangeRecord> {
        let [number_cell, content_cell, ..] = row.cells.as_slice() else {
            return None;
        };
        let red = &self.settings.red;

        let classification = classify(content_cell, red);
        if classification.change_text.is_empty() {
            return None;
        }

        let full_row_text = row
            .cells
            .iter()
            .filter(|cell| classify::has_red_run(cell, red))
            .map(|cell| cell.text().trim().to_string())
            .collect::<Vec<_>>()
            .join(&self.settings.report.row_delimiter);

        let change_number = number_cell.text().trim().to_string();
        debug!(
            change_number = %change_number,
            change_text = %classification.change_text,
            kind = ?classification.change_kind,
            fully_red = classification.is_fully_red,
            "change found"
        );

        Some(ChangeRecord::new(
            fields,
            change_number,
            classification,
            full_row_text,
        ))
    }
}

/// Extract the changes of one document with the given settings.
pub fn extract(
    document: &Document,
    file_name: &str,
    settings: &Settings,
) -> Result<Extraction, SettingsError> {
    Ok(Extractor::new(settings)?.extract(document, file_name))
}
