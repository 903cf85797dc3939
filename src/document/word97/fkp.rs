//! Formatted disk pages (FKP) and their bin tables
//!
//! PlcfBteChpx / PlcfBtePapx in the table stream list 512-byte pages of the
//! WordDocument stream. Each page maps FC ranges to a grpprl of character
//! (CHPX) or paragraph (PAPX) properties.

use super::binary::{read_u16, read_u32};
use super::piece_table::Plc;
use super::sprm::{CharProps, ParaProps};

const FKP_PAGE_SIZE: usize = 512;
const PAPX_BX_SIZE: usize = 13;

/// Properties covering the byte range `fc_start..fc_end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FcRange<P> {
    pub fc_start: u32,
    pub fc_end: u32,
    pub props: P,
}

/// Sorted, non-overlapping FC ranges with point lookup.
#[derive(Debug, Clone, Default)]
pub(crate) struct FcIndex<P> {
    ranges: Vec<FcRange<P>>,
}

impl<P> FcIndex<P> {
    pub fn new(mut ranges: Vec<FcRange<P>>) -> Self {
        ranges.sort_by_key(|range| range.fc_start);
        FcIndex { ranges }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn lookup(&self, fc: u32) -> Option<&P> {
        let index = self.ranges.partition_point(|range| range.fc_start <= fc);
        let range = self.ranges.get(index.checked_sub(1)?)?;
        (fc < range.fc_end).then_some(&range.props)
    }
}

fn fkp_pages<'a>(bin_table: &'a [u8], word_document: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
    let plc = Plc::parse(bin_table, 4);
    let count = plc.as_ref().map_or(0, Plc::len);

    (0..count).filter_map(move |index| {
        let item = plc.as_ref()?.item(index)?;
        // PnFkp: low 22 bits are the page number
        let pn = read_u32(item, 0)? & 0x003F_FFFF;
        let start = pn as usize * FKP_PAGE_SIZE;
        word_document.get(start..start + FKP_PAGE_SIZE)
    })
}

fn page_fcs(page: &[u8], count: usize) -> Option<Vec<u32>> {
    (0..=count).map(|index| read_u32(page, index * 4)).collect()
}

/// Character property ranges from PlcfBteChpx.
pub(crate) fn character_runs(bin_table: &[u8], word_document: &[u8]) -> FcIndex<CharProps> {
    let mut ranges = Vec::new();

    for page in fkp_pages(bin_table, word_document) {
        let crun = page[FKP_PAGE_SIZE - 1] as usize;
        let Some(fcs) = page_fcs(page, crun) else {
            continue;
        };
        let rgb_offset = (crun + 1) * 4;

        for index in 0..crun {
            let Some(&b) = page.get(rgb_offset + index) else {
                break;
            };
            // b == 0: no direct formatting
            let props = if b == 0 {
                CharProps::default()
            } else {
                let offset = b as usize * 2;
                let cb = page.get(offset).copied().unwrap_or(0) as usize;
                page.get(offset + 1..offset + 1 + cb)
                    .map(CharProps::from_grpprl)
                    .unwrap_or_default()
            };
            ranges.push(FcRange {
                fc_start: fcs[index],
                fc_end: fcs[index + 1],
                props,
            });
        }
    }

    FcIndex::new(ranges)
}

/// Paragraph property ranges from PlcfBtePapx.
pub(crate) fn paragraph_runs(bin_table: &[u8], word_document: &[u8]) -> FcIndex<ParaProps> {
    let mut ranges = Vec::new();

    for page in fkp_pages(bin_table, word_document) {
        let cpara = page[FKP_PAGE_SIZE - 1] as usize;
        let Some(fcs) = page_fcs(page, cpara) else {
            continue;
        };
        let bx_offset = (cpara + 1) * 4;

        for index in 0..cpara {
            let Some(&b) = page.get(bx_offset + index * PAPX_BX_SIZE) else {
                break;
            };
            let props = papx_grpprl(page, b as usize * 2)
                .map(ParaProps::from_grpprl)
                .unwrap_or_default();
            ranges.push(FcRange {
                fc_start: fcs[index],
                fc_end: fcs[index + 1],
                props,
            });
        }
    }

    FcIndex::new(ranges)
}

/// PapxInFkp: a size byte (or a zero then a size byte), an istd, the grpprl.
fn papx_grpprl(page: &[u8], offset: usize) -> Option<&[u8]> {
    if offset == 0 {
        return None;
    }
    let cb = *page.get(offset)? as usize;
    let (start, len) = if cb == 0 {
        (offset + 2, *page.get(offset + 1)? as usize * 2)
    } else {
        (offset + 1, cb * 2 - 1)
    };
    let grpprl_and_istd = page.get(start..start + len)?;
    // Skip the style index
    read_u16(grpprl_and_istd, 0)?;
    grpprl_and_istd.get(2..)
}
