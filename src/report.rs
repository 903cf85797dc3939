//! Two-sheet `.xlsx` report
//!
//! The workbook is assembled part by part into a ZIP container. Cells are
//! written as inline strings, so there is no shared string table and no
//! styles part.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::config::ReportLayout;
use crate::error::ReportError;
use crate::extract::ChangeRecord;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

/// Record counts per sheet, for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub data_model_rows: usize,
    pub logic_rows: usize,
}

/// Escape XML special characters and drop characters XML 1.0 forbids.
fn escape_xml(s: &str) -> String {
    s.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert a 1-based column number to letters (1 -> "A", 27 -> "AA").
fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

/// Cell values of one record, in column order.
fn record_row<'a>(record: &'a ChangeRecord, layout: &'a ReportLayout) -> [&'a str; 7] {
    [
        record.table_name(),
        record.change_number(),
        record.change_text(),
        record.release_marker(),
        record
            .change_kind()
            .label(&layout.addition_label, &layout.removal_label),
        record.mapping_name(),
        record.full_row_text(),
    ]
}

fn write_row(xml: &mut String, row: u32, values: &[&str]) {
    let _ = write!(xml, r#"<row r="{row}">"#);
    for (index, value) in values.iter().enumerate() {
        let cell_ref = format!("{}{row}", column_to_letters(index as u32 + 1));
        let _ = write!(
            xml,
            r#"<c r="{cell_ref}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            escape_xml(value)
        );
    }
    xml.push_str("</row>");
}

pub(crate) fn generate_sheet_xml<'a>(
    records: impl IntoIterator<Item = &'a ChangeRecord>,
    layout: &ReportLayout,
) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);
    xml.push_str("<sheetData>");

    let headers: Vec<&str> = layout.headers.iter().map(String::as_str).collect();
    write_row(&mut xml, 1, &headers);
    for (index, record) in records.into_iter().enumerate() {
        write_row(&mut xml, index as u32 + 2, &record_row(record, layout));
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

pub(crate) fn generate_workbook_xml(layout: &ReportLayout) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#);
    xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for (index, name) in [&layout.data_model_sheet, &layout.logic_sheet].iter().enumerate() {
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet_name(name)),
            index + 1,
            index + 1
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

/// Excel limits sheet names to 31 characters without `[]:*?/\`.
fn sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect()
}

/// Write the records to `path` as a workbook with a data-model sheet
/// (fully red changes) and a logic sheet (everything else).
pub fn write_report(
    records: &[ChangeRecord],
    path: &Path,
    layout: &ReportLayout,
) -> Result<ReportSummary, ReportError> {
    let (data_model, logic): (Vec<&ChangeRecord>, Vec<&ChangeRecord>) =
        records.iter().partition(|record| record.is_fully_red());

    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let zip_err = |source| ReportError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", generate_workbook_xml(layout)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", generate_sheet_xml(data_model.iter().copied(), layout)),
        ("xl/worksheets/sheet2.xml", generate_sheet_xml(logic.iter().copied(), layout)),
    ];
    for (name, content) in parts {
        writer.start_file(name, options).map_err(zip_err)?;
        writer.write_all(content.as_bytes()).map_err(io_err)?;
    }

    let mut inner = writer.finish().map_err(zip_err)?;
    inner.flush().map_err(io_err)?;

    let summary = ReportSummary {
        data_model_rows: data_model.len(),
        logic_rows: logic.len(),
    };
    info!(
        path = %path.display(),
        data_model = summary.data_model_rows,
        logic = summary.logic_rows,
        "report written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(7), "G");
        assert_eq!(column_to_letters(27), "AA");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("x\u{1}y\nz"), "xy\nz");
    }

    #[test]
    fn test_workbook_lists_both_sheets() {
        let xml = generate_workbook_xml(&ReportLayout::default());
        assert!(xml.contains(r#"<sheet name="Datenmodelländerungen" sheetId="1" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<sheet name="Logikänderungen" sheetId="2" r:id="rId2"/>"#));
    }

    #[test]
    fn test_empty_sheet_has_header_row() {
        let xml = generate_sheet_xml(std::iter::empty(), &ReportLayout::default());
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">Tabellenname</t></is></c>"#));
        assert!(xml.contains(r#"<c r="G1" t="inlineStr"><is><t xml:space="preserve">Ganze Reihe</t></is></c>"#));
        assert!(!xml.contains(r#"<row r="2">"#));
    }

    #[test]
    fn test_sheet_name_is_sanitized() {
        assert_eq!(sheet_name("a/b:c"), "abc");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }
}
