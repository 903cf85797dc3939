//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Why a single document could not be turned into records.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file format '{extension}': {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("unreadable document {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: Unreadable },
}

impl DocumentError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            DocumentError::UnsupportedFormat { path, .. } => path,
            DocumentError::Unreadable { path, .. } => path,
        }
    }

    /// An Office lock file rather than a real document.
    pub fn is_temporary_artifact(&self) -> bool {
        matches!(
            self,
            DocumentError::Unreadable {
                reason: Unreadable::TemporaryArtifact,
                ..
            }
        )
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl Into<Unreadable>) -> Self {
        DocumentError::Unreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Unreadable {
    #[error("temporary lock file, not document content")]
    TemporaryArtifact,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid container: {0}")]
    Container(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("document is encrypted")]
    Encrypted,
}

impl From<zip::result::ZipError> for Unreadable {
    fn from(err: zip::result::ZipError) -> Self {
        Unreadable::Container(err.to_string())
    }
}

impl From<docx_rs::ReaderError> for Unreadable {
    fn from(err: docx_rs::ReaderError) -> Self {
        Unreadable::Malformed(err.to_string())
    }
}

/// Failure while writing the workbook. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to assemble workbook {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write settings {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid release pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
