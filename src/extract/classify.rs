//! Pure classification of a single cell's red runs

use serde::Serialize;

use super::record::ChangeKind;
use crate::config::RedSentinel;
use crate::document::Cell;
use crate::document::cleanup::collapse_whitespace;
use crate::document::models::Run;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub change_text: String,
    pub is_fully_red: bool,
    pub change_kind: ChangeKind,
}

/// Runs rendered in the change color that carry visible text.
pub fn red_runs<'a>(cell: &'a Cell, red: &'a RedSentinel) -> impl Iterator<Item = &'a Run> {
    cell.runs()
        .filter(move |run| red.is_red(&run.formatting.color) && !run.text.trim().is_empty())
}

/// Red run texts, each trimmed, joined by single spaces. Docx runs follow
/// the same trimming rule as legacy `.doc` runs.
pub fn red_run_text<'a>(runs: impl IntoIterator<Item = &'a Run>) -> String {
    let joined = runs
        .into_iter()
        .map(|run| run.text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// True iff nothing in the cell is outside the red text.
pub fn is_fully_red(change_text: &str, cell_text: &str) -> bool {
    !change_text.is_empty() && change_text == collapse_whitespace(cell_text)
}

/// Removal iff any red run is struck through.
pub fn change_kind<'a>(red_runs: impl IntoIterator<Item = &'a Run>) -> ChangeKind {
    if red_runs.into_iter().any(|run| run.formatting.strikethrough) {
        ChangeKind::Removal
    } else {
        ChangeKind::Addition
    }
}

/// Classify one content cell. `change_text` is empty when the cell has no
/// red text; such a cell produces no record.
pub fn classify(cell: &Cell, red: &RedSentinel) -> Classification {
    let change_text = red_run_text(red_runs(cell, red));
    Classification {
        is_fully_red: is_fully_red(&change_text, &cell.text()),
        change_kind: change_kind(red_runs(cell, red)),
        change_text,
    }
}

pub fn has_red_run(cell: &Cell, red: &RedSentinel) -> bool {
    red_runs(cell, red).next().is_some()
}
