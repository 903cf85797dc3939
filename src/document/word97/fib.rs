//! File Information Block (FIB)
//!
//! The FIB sits at offset 0 of the WordDocument stream and locates every
//! other structure: which table stream to read, how long the main text is,
//! and the (fc, lcb) pairs of the piece table and property bin tables.

use super::binary::{read_u16, read_u32};
use crate::error::Unreadable;

const WORD97_MAGIC: u16 = 0xA5EC;
const WORD6_MAGIC: u16 = 0xA5DC;
const FIB_BASE_SIZE: usize = 32;

const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE_STREAM: u16 = 0x0200;

// Index of ccpText in FibRgLw97
const INDEX_CCP_TEXT: usize = 3;

// Indices into FibRgFcLcb97
const INDEX_PLCF_BTE_CHPX: usize = 12;
const INDEX_PLCF_BTE_PAPX: usize = 13;
const INDEX_CLX: usize = 33;

/// An (offset, length) pair into the table stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FcLcb {
    pub fc: u32,
    pub lcb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileInformationBlock {
    pub n_fib: u16,
    /// `1Table` when set, `0Table` otherwise
    pub which_table_stream: bool,
    /// Length of the main document text in characters
    pub ccp_text: u32,
    pub clx: FcLcb,
    pub plcf_bte_chpx: FcLcb,
    pub plcf_bte_papx: FcLcb,
}

impl FileInformationBlock {
    pub fn parse(word_document: &[u8]) -> Result<Self, Unreadable> {
        if word_document.len() < FIB_BASE_SIZE {
            return Err(Unreadable::Malformed(
                "WordDocument stream too short for FIB".to_string(),
            ));
        }

        let magic = read_u16(word_document, 0).unwrap_or(0);
        match magic {
            WORD97_MAGIC => {}
            WORD6_MAGIC => {
                return Err(Unreadable::Malformed(
                    "Word 6.0/95 documents are not supported".to_string(),
                ));
            }
            other => {
                return Err(Unreadable::Malformed(format!(
                    "invalid FIB magic number 0x{other:04X}"
                )));
            }
        }

        let n_fib = read_u16(word_document, 2).unwrap_or(0);
        let flags = read_u16(word_document, 10).unwrap_or(0);
        if flags & FLAG_ENCRYPTED != 0 {
            return Err(Unreadable::Encrypted);
        }

        // csw, fibRgW, cslw and fibRgLw are variable-length; walk them
        let truncated = || Unreadable::Malformed("FIB is truncated".to_string());
        let csw = read_u16(word_document, FIB_BASE_SIZE).ok_or_else(truncated)? as usize;
        let rg_lw_count_offset = FIB_BASE_SIZE + 2 + csw * 2;
        let cslw = read_u16(word_document, rg_lw_count_offset).ok_or_else(truncated)? as usize;
        if cslw <= INDEX_CCP_TEXT {
            return Err(Unreadable::Malformed(format!(
                "FIB has only {cslw} fibRgLw entries"
            )));
        }
        let rg_lw_offset = rg_lw_count_offset + 2;
        let ccp_text =
            read_u32(word_document, rg_lw_offset + INDEX_CCP_TEXT * 4).ok_or_else(truncated)?;
        let rg_fc_lcb_count_offset = rg_lw_offset + cslw * 4;
        let cb_rg_fc_lcb =
            read_u16(word_document, rg_fc_lcb_count_offset).ok_or_else(truncated)? as usize;
        let rg_fc_lcb_offset = rg_fc_lcb_count_offset + 2;

        if cb_rg_fc_lcb <= INDEX_CLX {
            return Err(Unreadable::Malformed(format!(
                "FIB has only {cb_rg_fc_lcb} fc/lcb pairs"
            )));
        }

        let pair = |index: usize| -> Result<FcLcb, Unreadable> {
            let offset = rg_fc_lcb_offset + index * 8;
            Ok(FcLcb {
                fc: read_u32(word_document, offset).ok_or_else(truncated)?,
                lcb: read_u32(word_document, offset + 4).ok_or_else(truncated)?,
            })
        };

        Ok(FileInformationBlock {
            n_fib,
            which_table_stream: flags & FLAG_WHICH_TABLE_STREAM != 0,
            ccp_text,
            clx: pair(INDEX_CLX)?,
            plcf_bte_chpx: pair(INDEX_PLCF_BTE_CHPX)?,
            plcf_bte_papx: pair(INDEX_PLCF_BTE_PAPX)?,
        })
    }

    pub fn table_stream_name(&self) -> &'static str {
        if self.which_table_stream {
            "1Table"
        } else {
            "0Table"
        }
    }
}
