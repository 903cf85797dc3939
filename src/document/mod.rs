//! Document parsing and data structures module
//!
//! This module loads Word documents (`.doc` and `.docx`) into one read-only
//! model of paragraphs, tables, rows, cells and formatted runs.

pub mod cleanup;
pub(crate) mod io;
pub mod loader;
pub mod models;
pub(crate) mod parsing;
pub mod query;
pub mod word97;

pub use loader::{DocxBackend, WordBackend, backend_for, load_document};
pub use models::*;
pub use query::*;
pub use word97::Word97Backend;
