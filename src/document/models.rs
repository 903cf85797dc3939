//! Core data structures for document representation
//!
//! This module defines the read-only view both backends produce: body blocks
//! in reading order, tables broken down into rows and cells, and text runs
//! carrying the two formatting attributes change tracking relies on.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source format of a document, decided by file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Word 97-2003 binary (`.doc`)
    Doc,
    /// Office Open XML (`.docx`)
    Docx,
}

impl DocumentFormat {
    /// Select the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "doc" => Some(DocumentFormat::Doc),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub format: DocumentFormat,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// How a run's color was stored in the source file.
///
/// The two formats disagree: OOXML writes hex strings, Word 97 mostly writes
/// an index into its 16-color palette. Keeping the raw representation lets
/// the red check be configured per format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RunColor {
    #[default]
    Auto,
    /// Upper-case `RRGGBB`, no leading `#`
    Rgb(String),
    /// Word 97 `ico` palette index
    Palette(u8),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunFormatting {
    pub color: RunColor,
    pub strikethrough: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub text: String,
    pub formatting: RunFormatting,
}

impl Run {
    pub fn new(text: impl Into<String>, formatting: RunFormatting) -> Self {
        Run {
            text: text.into(),
            formatting,
        }
    }

    /// Consolidate adjacent runs with identical formatting into single runs
    pub fn consolidate_runs(runs: Vec<Run>) -> Vec<Run> {
        let mut consolidated: Vec<Run> = Vec::with_capacity(runs.len());

        for run in runs {
            match consolidated.last_mut() {
                Some(current) if current.formatting == run.formatting => {
                    current.text.push_str(&run.text);
                }
                _ => consolidated.push(run),
            }
        }

        consolidated
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Paragraph { runs }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Cell { paragraphs }
    }

    /// Full cell text, one line per paragraph.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flat_map(|para| para.runs.iter())
    }
}

impl Document {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(para) => Some(para),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.tables().flat_map(|table| table.rows.iter())
    }

    /// All text in reading order, paragraphs and cells on separate lines.
    pub fn full_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(para) => lines.push(para.text()),
                Block::Table(table) => {
                    for row in &table.rows {
                        for cell in &row.cells {
                            lines.push(cell.text());
                        }
                    }
                }
            }
        }
        lines.join("\n")
    }
}
