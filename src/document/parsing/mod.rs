//! OOXML parsing utilities
//!
//! Conversion from docx-rs element trees into the document model.

pub(crate) mod formatting;
pub(crate) mod table;
