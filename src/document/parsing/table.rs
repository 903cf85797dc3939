//! Table extraction
//!
//! This module turns docx-rs tables into rows of cells, keeping every
//! paragraph and run of each cell so the change engine can inspect run
//! formatting.

use super::super::models::*;
use super::formatting::extract_paragraph;

/// Extract table data from a docx-rs Table
pub(crate) fn extract_table(table: &docx_rs::Table) -> Table {
    let mut rows = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut cells = Vec::new();

        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let mut paragraphs = Vec::new();
            collect_cell_paragraphs(&cell.children, &mut paragraphs);
            cells.push(Cell::new(paragraphs));
        }

        if !cells.is_empty() {
            rows.push(Row::new(cells));
        }
    }

    Table { rows }
}

// Nested tables contribute their paragraphs to the enclosing cell
fn collect_cell_paragraphs(contents: &[docx_rs::TableCellContent], paragraphs: &mut Vec<Paragraph>) {
    for content in contents {
        match content {
            docx_rs::TableCellContent::Paragraph(para) => {
                paragraphs.push(extract_paragraph(para));
            }
            docx_rs::TableCellContent::Table(nested) => {
                for table_child in &nested.rows {
                    let docx_rs::TableChild::TableRow(row) = table_child;
                    for row_child in &row.cells {
                        let docx_rs::TableRowChild::TableCell(cell) = row_child;
                        collect_cell_paragraphs(&cell.children, paragraphs);
                    }
                }
            }
            _ => {}
        }
    }
}
