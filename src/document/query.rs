//! Read-only lookups over a parsed document
//!
//! Metadata in change logs sits in label/value rows: a first cell holding a
//! known phrase and a second cell holding the value.

use super::models::*;

/// A label/value row that matched an anchor phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMatch {
    pub table_index: usize,
    pub row_index: usize,
    pub label: String,
    pub value: String,
}

/// Find every row whose first cell contains `phrase`, in document order.
///
/// Only rows with more than one cell qualify; the value is the second
/// cell's trimmed text.
pub fn find_anchor_rows(document: &Document, phrase: &str) -> Vec<AnchorMatch> {
    let mut matches = Vec::new();
    if phrase.is_empty() {
        return matches;
    }

    for (table_index, table) in document.tables().enumerate() {
        for (row_index, row) in table.rows.iter().enumerate() {
            let [label, value, ..] = row.cells.as_slice() else {
                continue;
            };
            let label = label.text();
            if label.trim().contains(phrase) {
                matches.push(AnchorMatch {
                    table_index,
                    row_index,
                    label: label.trim().to_string(),
                    value: value.text().trim().to_string(),
                });
            }
        }
    }

    matches
}

/// Value of the first row anchored by `phrase`.
pub fn find_anchor_value(document: &Document, phrase: &str) -> Option<String> {
    find_anchor_rows(document, phrase)
        .into_iter()
        .next()
        .map(|found| found.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_cell(text: &str) -> Cell {
        Cell::new(vec![Paragraph::new(vec![Run::new(
            text,
            RunFormatting::default(),
        )])])
    }

    fn document(rows: Vec<Vec<&str>>) -> Document {
        Document {
            title: "test".to_string(),
            format: DocumentFormat::Docx,
            blocks: vec![Block::Table(Table {
                rows: rows
                    .into_iter()
                    .map(|cells| Row::new(cells.into_iter().map(text_cell).collect()))
                    .collect(),
            })],
        }
    }

    #[test]
    fn test_find_anchor_value() {
        let doc = document(vec![
            vec!["Tabellenname/View", "  T_TEST "],
            vec!["Releasestand", "2024Q1"],
        ]);
        assert_eq!(
            find_anchor_value(&doc, "Tabellenname/View").as_deref(),
            Some("T_TEST")
        );
        assert_eq!(find_anchor_value(&doc, "Releasestand").as_deref(), Some("2024Q1"));
    }

    #[test]
    fn test_anchor_phrase_is_a_substring_match() {
        let doc = document(vec![vec!["Ziel Tabellenname/View:", "T_X"]]);
        let rows = find_anchor_rows(&doc, "Tabellenname/View");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Ziel Tabellenname/View:");
    }

    #[test]
    fn test_single_cell_rows_do_not_anchor() {
        let doc = document(vec![vec!["Tabellenname/View"]]);
        assert!(find_anchor_value(&doc, "Tabellenname/View").is_none());
    }

    #[test]
    fn test_empty_phrase_matches_nothing() {
        let doc = document(vec![vec!["a", "b"]]);
        assert!(find_anchor_rows(&doc, "").is_empty());
    }
}
