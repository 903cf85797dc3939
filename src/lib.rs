//! redmark: change-log extraction for Word documents
//!
//! This library reads `.doc` and `.docx` files whose tables mark changes in
//! red (struck through for removals), classifies every change and writes a
//! two-sheet Excel report.

pub mod aggregate;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod logging;
pub mod report;

/// Export format options
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Two-sheet Excel workbook
    #[default]
    Xlsx,
    /// Records and failures as JSON on stdout
    Json,
}

// Re-export commonly used types
pub use aggregate::{BatchOutcome, process_file, process_folder};
pub use config::Settings;
pub use document::{Document, load_document};
pub use error::{DocumentError, ReportError};
pub use extract::{ChangeKind, ChangeRecord, Extraction, Extractor, classify, extract};
pub use report::write_report;
