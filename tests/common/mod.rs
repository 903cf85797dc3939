//! Fixture builders shared by the integration tests
#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

/// Formatting of a text span in a fixture cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Red,
    RedStruck,
}

pub type Span<'a> = (&'a str, Style);

pub fn plain(text: &str) -> Vec<Span<'_>> {
    vec![(text, Style::Plain)]
}

pub fn red(text: &str) -> Vec<Span<'_>> {
    vec![(text, Style::Red)]
}

// ---------------------------------------------------------------------------
// .docx fixtures (written with docx-rs)
// ---------------------------------------------------------------------------

fn docx_run(text: &str, style: Style) -> docx_rs::Run {
    let run = docx_rs::Run::new().add_text(text);
    match style {
        Style::Plain => run,
        Style::Red => run.color("FF0000"),
        Style::RedStruck => run.color("FF0000").strike(),
    }
}

fn docx_cell(spans: &[Span<'_>]) -> docx_rs::TableCell {
    let para = spans
        .iter()
        .fold(docx_rs::Paragraph::new(), |para, (text, style)| {
            para.add_run(docx_run(text, *style))
        });
    docx_rs::TableCell::new().add_paragraph(para)
}

/// Builder for a `.docx` with paragraphs and one table.
#[derive(Default)]
pub struct DocxFixture {
    paragraphs: Vec<String>,
    rows: Vec<Vec<Vec<(String, Style)>>>,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push(text.to_string());
        self
    }

    pub fn row(mut self, cells: &[Vec<Span<'_>>]) -> Self {
        self.rows.push(
            cells
                .iter()
                .map(|spans| spans.iter().map(|(t, s)| (t.to_string(), *s)).collect())
                .collect(),
        );
        self
    }

    pub fn write(&self, path: &Path) {
        let mut docx = docx_rs::Docx::new();
        for text in &self.paragraphs {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)),
            );
        }
        if !self.rows.is_empty() {
            let rows = self
                .rows
                .iter()
                .map(|cells| {
                    docx_rs::TableRow::new(
                        cells
                            .iter()
                            .map(|spans| {
                                let spans: Vec<Span<'_>> =
                                    spans.iter().map(|(t, s)| (t.as_str(), *s)).collect();
                                docx_cell(&spans)
                            })
                            .collect(),
                    )
                })
                .collect();
            docx = docx.add_table(docx_rs::Table::new(rows));
        }

        let file = File::create(path).expect("create docx fixture");
        docx.build().pack(file).expect("pack docx fixture");
    }
}

// ---------------------------------------------------------------------------
// .doc fixtures (Word 97 binary inside a CFB container)
// ---------------------------------------------------------------------------

const TEXT_FC: u32 = 1024;
const FIB_CLX: usize = 33;
pub const FIB_CHPX: usize = 12;
const FIB_PAPX: usize = 13;

const IN_TABLE: [u8; 3] = [0x16, 0x24, 0x01];
const ROW_END: [u8; 6] = [0x16, 0x24, 0x01, 0x17, 0x24, 0x01];

fn char_grpprl(style: Style) -> Option<Vec<u8>> {
    match style {
        Style::Plain => None,
        // sprmCIco = 6 (red)
        Style::Red => Some(vec![0x42, 0x2A, 0x06]),
        // sprmCIco = 6, sprmCFStrike = 1
        Style::RedStruck => Some(vec![0x42, 0x2A, 0x06, 0x37, 0x08, 0x01]),
    }
}

/// Builder for a Word 97 `.doc` with paragraphs and table rows in order.
#[derive(Default)]
pub struct DocFixture {
    text: Vec<u16>,
    /// (cp_start, cp_end, grpprl) covering the text contiguously
    char_runs: Vec<(u32, u32, Option<Vec<u8>>)>,
    /// (cp_start, cp_end, grpprl) per paragraph
    para_runs: Vec<(u32, u32, Option<Vec<u8>>)>,
    para_start: u32,
}

impl DocFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn cp(&self) -> u32 {
        self.text.len() as u32
    }

    fn push(&mut self, text: &str, style: Style) {
        let start = self.cp();
        self.text.extend(text.encode_utf16());
        if self.cp() > start {
            self.char_runs.push((start, self.cp(), char_grpprl(style)));
        }
    }

    fn end_paragraph(&mut self, mark: u16, grpprl: Option<Vec<u8>>) {
        let start = self.cp();
        self.text.push(mark);
        self.char_runs.push((start, self.cp(), None));
        self.para_runs.push((self.para_start, self.cp(), grpprl));
        self.para_start = self.cp();
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.push(text, Style::Plain);
        self.end_paragraph(0x0D, None);
        self
    }

    pub fn row(mut self, cells: &[Vec<Span<'_>>]) -> Self {
        for spans in cells {
            for (text, style) in spans {
                self.push(text, *style);
            }
            self.end_paragraph(0x07, Some(IN_TABLE.to_vec()));
        }
        self.end_paragraph(0x07, Some(ROW_END.to_vec()));
        self
    }

    fn fc(&self, cp: u32) -> u32 {
        TEXT_FC + cp * 2
    }

    fn chpx_page(&self) -> Vec<u8> {
        let mut page = vec![0u8; 512];
        let count = self.char_runs.len();
        for (index, (start, _, _)) in self.char_runs.iter().enumerate() {
            page[index * 4..index * 4 + 4].copy_from_slice(&self.fc(*start).to_le_bytes());
        }
        let end = self.fc(self.char_runs.last().map_or(0, |run| run.1));
        page[count * 4..count * 4 + 4].copy_from_slice(&end.to_le_bytes());

        let rgb = (count + 1) * 4;
        let mut top = 511;
        for (index, (_, _, grpprl)) in self.char_runs.iter().enumerate() {
            if let Some(grpprl) = grpprl {
                let offset = (top - 1 - grpprl.len()) & !1;
                page[offset] = grpprl.len() as u8;
                page[offset + 1..offset + 1 + grpprl.len()].copy_from_slice(grpprl);
                page[rgb + index] = (offset / 2) as u8;
                top = offset;
            }
        }
        assert!(top > rgb + count, "CHPX fixture page overflow");
        page[511] = count as u8;
        page
    }

    fn papx_page(&self) -> Vec<u8> {
        let mut page = vec![0u8; 512];
        let count = self.para_runs.len();
        for (index, (start, _, _)) in self.para_runs.iter().enumerate() {
            page[index * 4..index * 4 + 4].copy_from_slice(&self.fc(*start).to_le_bytes());
        }
        let end = self.fc(self.para_runs.last().map_or(0, |run| run.1));
        page[count * 4..count * 4 + 4].copy_from_slice(&end.to_le_bytes());

        let bx = (count + 1) * 4;
        let mut top = 511;
        for (index, (_, _, grpprl)) in self.para_runs.iter().enumerate() {
            if let Some(grpprl) = grpprl {
                // istd + grpprl, stored as 2 * cb - 1 bytes
                let len = 2 + grpprl.len();
                let cb = (len + 2) / 2;
                let offset = (top - 2 * cb) & !1;
                page[offset] = cb as u8;
                page[offset + 3..offset + 3 + grpprl.len()].copy_from_slice(grpprl);
                page[bx + index * 13] = (offset / 2) as u8;
                top = offset;
            }
        }
        assert!(top > bx + count * 13, "PAPX fixture page overflow");
        page[511] = count as u8;
        page
    }

    fn bin_table(&self, first_cp: u32, last_cp: u32, pn: u32) -> Vec<u8> {
        let mut table = Vec::new();
        table.extend_from_slice(&self.fc(first_cp).to_le_bytes());
        table.extend_from_slice(&self.fc(last_cp).to_le_bytes());
        table.extend_from_slice(&pn.to_le_bytes());
        table
    }

    /// The raw `WordDocument` and `1Table` streams.
    pub fn streams(&self) -> (Vec<u8>, Vec<u8>) {
        let ccp = self.cp();

        // Table stream: Clx, then the two bin tables
        let mut table = Vec::new();
        let mut plc_pcd = Vec::new();
        plc_pcd.extend_from_slice(&0u32.to_le_bytes());
        plc_pcd.extend_from_slice(&ccp.to_le_bytes());
        plc_pcd.extend_from_slice(&0u16.to_le_bytes());
        plc_pcd.extend_from_slice(&TEXT_FC.to_le_bytes());
        plc_pcd.extend_from_slice(&0u16.to_le_bytes());
        table.push(0x02);
        table.extend_from_slice(&(plc_pcd.len() as u32).to_le_bytes());
        table.extend_from_slice(&plc_pcd);
        let clx = (0u32, table.len() as u32);

        // WordDocument: FIB, text, then one CHPX and one PAPX page
        let text_end = TEXT_FC as usize + self.text.len() * 2;
        let chpx_pn = text_end.div_ceil(512) as u32;
        let papx_pn = chpx_pn + 1;

        let chpx_bte = self.bin_table(0, ccp, chpx_pn);
        let chpx = (table.len() as u32, chpx_bte.len() as u32);
        table.extend_from_slice(&chpx_bte);
        let papx_bte = self.bin_table(0, ccp, papx_pn);
        let papx = (table.len() as u32, papx_bte.len() as u32);
        table.extend_from_slice(&papx_bte);

        let mut word = vec![0u8; (papx_pn as usize + 1) * 512];
        word[0..2].copy_from_slice(&0xA5ECu16.to_le_bytes());
        word[2..4].copy_from_slice(&0x00C1u16.to_le_bytes());
        word[10..12].copy_from_slice(&0x0200u16.to_le_bytes());
        word[32..34].copy_from_slice(&14u16.to_le_bytes());
        word[62..64].copy_from_slice(&22u16.to_le_bytes());
        word[76..80].copy_from_slice(&ccp.to_le_bytes());
        word[152..154].copy_from_slice(&93u16.to_le_bytes());
        for (index, (fc, lcb)) in [(FIB_CLX, clx), (FIB_CHPX, chpx), (FIB_PAPX, papx)] {
            patch_fib_pair(&mut word, index, fc, lcb);
        }

        for (index, unit) in self.text.iter().enumerate() {
            let offset = TEXT_FC as usize + index * 2;
            word[offset..offset + 2].copy_from_slice(&unit.to_le_bytes());
        }
        let chpx_at = chpx_pn as usize * 512;
        word[chpx_at..chpx_at + 512].copy_from_slice(&self.chpx_page());
        let papx_at = papx_pn as usize * 512;
        word[papx_at..papx_at + 512].copy_from_slice(&self.papx_page());

        (word, table)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let (word, table) = self.streams();
        compound_bytes(&word, &table)
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write doc fixture");
    }
}

/// Point fc/lcb pair `index` of the FIB in a `WordDocument` stream elsewhere.
pub fn patch_fib_pair(word: &mut [u8], index: usize, fc: u32, lcb: u32) {
    let offset = 154 + index * 8;
    word[offset..offset + 4].copy_from_slice(&fc.to_le_bytes());
    word[offset + 4..offset + 8].copy_from_slice(&lcb.to_le_bytes());
}

/// Wrap raw `WordDocument` and `1Table` streams in a compound file.
pub fn compound_bytes(word: &[u8], table: &[u8]) -> Vec<u8> {
    let mut compound =
        cfb::CompoundFile::create(Cursor::new(Vec::new())).expect("create compound file");
    compound
        .create_stream("WordDocument")
        .and_then(|mut stream| stream.write_all(word))
        .expect("write WordDocument");
    compound
        .create_stream("1Table")
        .and_then(|mut stream| stream.write_all(table))
        .expect("write 1Table");
    compound.flush().expect("flush compound file");
    compound.into_inner().into_inner()
}

/// The scenario document: anchors for table name and release, one removal
/// row, one addition row, one unchanged row.
pub fn scenario_rows() -> Vec<Vec<Vec<Span<'static>>>> {
    vec![
        vec![plain("Tabellenname/View"), plain("T_TEST")],
        vec![plain("Releasestand"), plain("2024Q1")],
        vec![
            plain("F1"),
            vec![("Feld gelöscht", Style::RedStruck), (" aktiv", Style::Plain)],
        ],
        vec![plain("F2"), red("Neues Feld")],
        vec![plain("F3"), plain("unverändert")],
    ]
}

/// Read one part of a ZIP container as text.
pub fn zip_part(path: &Path, name: &str) -> String {
    use std::io::Read;
    let file = File::open(path).expect("open zip");
    let mut archive = zip::ZipArchive::new(file).expect("read zip");
    let mut part = archive.by_name(name).expect("zip part exists");
    let mut content = String::new();
    part.read_to_string(&mut content).expect("utf-8 part");
    content
}
