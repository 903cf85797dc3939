//! Block assembly for Word 97 main text
//!
//! Walks the decoded text once. Paragraph marks (0x0D) and cell marks (0x07)
//! end paragraphs, and the PAPX of each mark says whether the paragraph sits
//! in a table cell, ends a row, or belongs to a nested table.

use std::mem;

use super::fkp::FcIndex;
use super::piece_table::TextUnit;
use super::sprm::{CharProps, ParaProps};
use crate::document::models::{Block, Cell, Paragraph, Row, Run, RunFormatting, Table};

const PARAGRAPH_MARK: u16 = 0x0D;
const CELL_MARK: u16 = 0x07;
const FIELD_BEGIN: u16 = 0x13;
const FIELD_SEPARATOR: u16 = 0x14;
const FIELD_END: u16 = 0x15;

pub(crate) fn assemble(
    units: &[TextUnit],
    chars: &FcIndex<CharProps>,
    paras: &FcIndex<ParaProps>,
) -> Vec<Block> {
    let mut layout = Layout::default();
    let mut runs = RunBuilder::default();
    // One entry per open field, true while in its instruction part
    let mut fields: Vec<bool> = Vec::new();

    for unit in units {
        match unit.unit {
            FIELD_BEGIN => fields.push(true),
            FIELD_SEPARATOR => {
                if let Some(top) = fields.last_mut() {
                    *top = false;
                }
            }
            FIELD_END => {
                fields.pop();
            }
            PARAGRAPH_MARK | CELL_MARK => {
                let paragraph = runs.finish();
                layout.end_paragraph(paragraph, unit.unit, paras.lookup(unit.fc).copied());
            }
            _ if fields.iter().any(|&instruction| instruction) => {}
            other => {
                if let Some(mapped) = map_unit(other) {
                    let props = chars.lookup(unit.fc).cloned().unwrap_or_default();
                    runs.push(mapped, props);
                }
            }
        }
    }

    let trailing = runs.finish();
    if !trailing.runs.is_empty() {
        layout.end_paragraph(trailing, PARAGRAPH_MARK, None);
    }
    layout.finish()
}

fn map_unit(unit: u16) -> Option<u16> {
    match unit {
        0x09 => Some(unit),
        // vertical tab (manual line break) and page/section break
        0x0B | 0x0C => Some(u16::from(b'\n')),
        // non-breaking hyphen
        0x1E => Some(u16::from(b'-')),
        0x00..=0x1F => None,
        _ => Some(unit),
    }
}

#[derive(Default)]
struct RunBuilder {
    runs: Vec<Run>,
    pending: Vec<u16>,
    props: CharProps,
}

impl RunBuilder {
    fn push(&mut self, unit: u16, props: CharProps) {
        if !self.pending.is_empty() && props != self.props {
            self.flush();
        }
        self.props = props;
        self.pending.push(unit);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf16_lossy(&self.pending);
        self.pending.clear();
        self.runs.push(Run::new(
            text,
            RunFormatting {
                color: self.props.color.clone(),
                strikethrough: self.props.strikethrough,
            },
        ));
    }

    fn finish(&mut self) -> Paragraph {
        self.flush();
        Paragraph::new(Run::consolidate_runs(mem::take(&mut self.runs)))
    }
}

#[derive(Default)]
struct Layout {
    blocks: Vec<Block>,
    rows: Vec<Row>,
    cells: Vec<Cell>,
    paragraphs: Vec<Paragraph>,
    after_cell_mark: bool,
}

impl Layout {
    fn end_paragraph(&mut self, paragraph: Paragraph, terminator: u16, props: Option<ParaProps>) {
        let props = props.unwrap_or_else(|| self.infer(&paragraph, terminator));
        let mut cell_closed = false;

        match props.depth() {
            0 => {
                self.end_table();
                self.blocks.push(Block::Paragraph(paragraph));
            }
            1 if props.ttp => self.end_row(),
            1 => {
                self.paragraphs.push(paragraph);
                if terminator == CELL_MARK {
                    self.end_cell();
                    cell_closed = true;
                }
            }
            // Nested tables flatten into the enclosing cell
            _ => {
                if !props.inner_ttp {
                    self.paragraphs.push(paragraph);
                }
            }
        }

        self.after_cell_mark = cell_closed;
    }

    /// Table structure for files without paragraph properties: a cell mark
    /// puts the paragraph in a cell, and an empty one right after a cell
    /// closes the row.
    fn infer(&self, paragraph: &Paragraph, terminator: u16) -> ParaProps {
        if terminator != CELL_MARK {
            return ParaProps::default();
        }
        ParaProps {
            in_table: true,
            ttp: self.after_cell_mark && paragraph.runs.is_empty(),
            ..ParaProps::default()
        }
    }

    fn end_cell(&mut self) {
        self.cells.push(Cell::new(mem::take(&mut self.paragraphs)));
    }

    fn end_row(&mut self) {
        if !self.paragraphs.is_empty() {
            self.end_cell();
        }
        if !self.cells.is_empty() {
            self.rows.push(Row::new(mem::take(&mut self.cells)));
        }
    }

    fn end_table(&mut self) {
        self.end_row();
        if !self.rows.is_empty() {
            self.blocks.push(Block::Table(Table {
                rows: mem::take(&mut self.rows),
            }));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.end_table();
        self.blocks
    }
}
