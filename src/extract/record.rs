//! Change records and their classification

use serde::Serialize;

/// Whether a change adds or removes logic, decided by strikethrough.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Addition,
    Removal,
}

impl ChangeKind {
    /// Report label for this kind, given the configured wording.
    pub fn label<'a>(&self, addition: &'a str, removal: &'a str) -> &'a str {
        match self {
            ChangeKind::Addition => addition,
            ChangeKind::Removal => removal,
        }
    }
}

/// One row-level change extracted from one document.
///
/// Built once by the extractor; the aggregator may only swap the mapping
/// name through [`ChangeRecord::with_mapping_name`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeRecord {
    table_name: String,
    change_number: String,
    change_text: String,
    full_row_text: String,
    release_marker: String,
    mapping_name: String,
    is_fully_red: bool,
    change_kind: ChangeKind,
}

/// Per-document fields shared by every record from that document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentFields<'a> {
    pub table_name: &'a str,
    pub release_marker: &'a str,
    pub mapping_name: &'a str,
}

impl ChangeRecord {
    pub(crate) fn new(
        document: &DocumentFields<'_>,
        change_number: String,
        classification: super::Classification,
        full_row_text: String,
    ) -> Self {
        ChangeRecord {
            table_name: document.table_name.to_string(),
            change_number,
            change_text: classification.change_text,
            full_row_text,
            release_marker: document.release_marker.to_string(),
            mapping_name: document.mapping_name.to_string(),
            is_fully_red: classification.is_fully_red,
            change_kind: classification.change_kind,
        }
    }

    pub fn with_mapping_name(mut self, mapping_name: impl Into<String>) -> Self {
        self.mapping_name = mapping_name.into();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn change_number(&self) -> &str {
        &self.change_number
    }

    pub fn change_text(&self) -> &str {
        &self.change_text
    }

    pub fn full_row_text(&self) -> &str {
        &self.full_row_text
    }

    pub fn release_marker(&self) -> &str {
        &self.release_marker
    }

    pub fn mapping_name(&self) -> &str {
        &self.mapping_name
    }

    pub fn is_fully_red(&self) -> bool {
        self.is_fully_red
    }

    pub fn change_kind(&self) -> ChangeKind {
        self.change_kind
    }
}
