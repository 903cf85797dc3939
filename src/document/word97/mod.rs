//! Word 97-2003 binary (`.doc`) backend
//!
//! Reads the OLE compound file with `cfb`, then follows the FIB to the piece
//! table and the CHPX/PAPX bin tables. Only direct formatting is resolved;
//! colors and strikethrough inherited from styles are not.

mod binary;
mod fib;
mod fkp;
mod layout;
mod piece_table;
mod sprm;

use std::io::{Cursor, Read};
use tracing::debug;

use self::binary::slice_at;
use self::fib::{FcLcb, FileInformationBlock};
use self::piece_table::PieceTable;
use super::loader::WordBackend;
use super::models::{Document, DocumentFormat};
use crate::error::Unreadable;

const WORD_DOCUMENT_STREAM: &str = "WordDocument";

#[derive(Debug, Clone, Copy, Default)]
pub struct Word97Backend;

impl WordBackend for Word97Backend {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Doc
    }

    fn parse(&self, title: &str, bytes: &[u8]) -> Result<Document, Unreadable> {
        let mut compound = cfb::CompoundFile::open(Cursor::new(bytes))
            .map_err(|e| Unreadable::Container(format!("not an OLE compound file: {e}")))?;

        let word_document = read_stream(&mut compound, WORD_DOCUMENT_STREAM)?;
        let fib = FileInformationBlock::parse(&word_document)?;
        let table_stream = read_stream(&mut compound, fib.table_stream_name())?;
        debug!(
            n_fib = fib.n_fib,
            table_stream = fib.table_stream_name(),
            ccp_text = fib.ccp_text,
            "read FIB"
        );

        let clx = slice_at(&table_stream, fib.clx.fc, fib.clx.lcb)
            .ok_or_else(|| Unreadable::Malformed("Clx lies outside the table stream".to_string()))?;
        let pieces = PieceTable::parse(clx)?;
        let units = pieces.decode(&word_document, fib.ccp_text)?;

        let chpx = bin_table(&table_stream, fib.plcf_bte_chpx, "PlcfBteChpx")?;
        let papx = bin_table(&table_stream, fib.plcf_bte_papx, "PlcfBtePapx")?;
        let chars = fkp::character_runs(chpx, &word_document);
        let paras = fkp::paragraph_runs(papx, &word_document);
        debug!(
            pieces = pieces.pieces().len(),
            character_runs = chars.len(),
            paragraph_runs = paras.len(),
            "decoded main text"
        );

        Ok(Document {
            title: title.to_string(),
            format: DocumentFormat::Doc,
            blocks: layout::assemble(&units, &chars, &paras),
        })
    }
}

/// A bin table is optional; an empty pair means no direct formatting, but a
/// pair pointing past the table stream is corruption.
fn bin_table<'a>(
    table_stream: &'a [u8],
    pair: FcLcb,
    name: &str,
) -> Result<&'a [u8], Unreadable> {
    if pair.lcb == 0 {
        return Ok(&[]);
    }
    slice_at(table_stream, pair.fc, pair.lcb)
        .ok_or_else(|| Unreadable::Malformed(format!("{name} lies outside the table stream")))
}

fn read_stream<F: Read + std::io::Seek>(
    compound: &mut cfb::CompoundFile<F>,
    name: &str,
) -> Result<Vec<u8>, Unreadable> {
    let mut stream = compound
        .open_stream(name)
        .map_err(|_| Unreadable::Container(format!("missing {name} stream")))?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}
