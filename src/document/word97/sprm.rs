//! Single Property Modifier (SPRM) decoding
//!
//! A grpprl is a packed list of SPRMs. Only the handful that matter for
//! change tracking are interpreted: text color, strikethrough, and the
//! paragraph flags that place a paragraph inside a table.

use super::binary::{read_u16, read_u32};
use crate::document::models::RunColor;

pub(crate) const SPRM_C_F_STRIKE: u16 = 0x0837;
pub(crate) const SPRM_C_F_D_STRIKE: u16 = 0x2A53;
pub(crate) const SPRM_C_ICO: u16 = 0x2A42;
pub(crate) const SPRM_C_CV: u16 = 0x6870;
pub(crate) const SPRM_P_F_IN_TABLE: u16 = 0x2416;
pub(crate) const SPRM_P_F_TTP: u16 = 0x2417;
pub(crate) const SPRM_P_ITAP: u16 = 0x6649;
pub(crate) const SPRM_P_F_INNER_TABLE_CELL: u16 = 0x244B;
pub(crate) const SPRM_P_F_INNER_TTP: u16 = 0x244C;

const SPRM_T_DEF_TABLE: u16 = 0xD608;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sprm<'a> {
    pub opcode: u16,
    pub operand: &'a [u8],
}

impl Sprm<'_> {
    pub fn byte(&self) -> u8 {
        self.operand.first().copied().unwrap_or(0)
    }

    pub fn dword(&self) -> u32 {
        read_u32(self.operand, 0).unwrap_or(0)
    }
}

/// Split a grpprl into its SPRMs. A truncated trailing SPRM is dropped.
pub(crate) fn parse_sprms(grpprl: &[u8]) -> Vec<Sprm<'_>> {
    let mut sprms = Vec::new();
    let mut offset = 0;

    while let Some(opcode) = read_u16(grpprl, offset) {
        offset += 2;

        // spra lives in the top three bits of the opcode
        let operand_len = match opcode >> 13 {
            0 | 1 => 1,
            2 | 4 | 5 => 2,
            3 => 4,
            7 => 3,
            _ if opcode == SPRM_T_DEF_TABLE => match read_u16(grpprl, offset) {
                Some(cb) => 2 + (cb as usize).saturating_sub(1),
                None => break,
            },
            _ => match grpprl.get(offset) {
                Some(&cb) => 1 + cb as usize,
                None => break,
            },
        };

        let Some(operand) = grpprl.get(offset..offset + operand_len) else {
            break;
        };
        sprms.push(Sprm { opcode, operand });
        offset += operand_len;
    }

    sprms
}

/// Character properties relevant to change tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CharProps {
    pub color: RunColor,
    pub strikethrough: bool,
}

impl CharProps {
    pub fn from_grpprl(grpprl: &[u8]) -> Self {
        let mut props = CharProps::default();

        for sprm in parse_sprms(grpprl) {
            match sprm.opcode {
                SPRM_C_F_STRIKE | SPRM_C_F_D_STRIKE => {
                    props.strikethrough = toggle(sprm.byte(), props.strikethrough);
                }
                SPRM_C_ICO => {
                    props.color = match sprm.byte() {
                        0 => RunColor::Auto,
                        index => RunColor::Palette(index),
                    };
                }
                SPRM_C_CV => props.color = colorref(sprm.dword()),
                _ => {}
            }
        }

        props
    }
}

/// Toggle operands: 0 off, 1 on, 0x80 keep the style value, 0x81 invert it.
/// Styles are not resolved, so the style value is taken as off.
fn toggle(operand: u8, current: bool) -> bool {
    match operand {
        0 => false,
        1 => true,
        0x80 => false,
        0x81 => true,
        _ => current,
    }
}

/// COLORREF is `0x00BBGGRR` with `0xFF` in the top byte meaning automatic.
fn colorref(value: u32) -> RunColor {
    if value >> 24 == 0xFF {
        return RunColor::Auto;
    }
    let r = value & 0xFF;
    let g = (value >> 8) & 0xFF;
    let b = (value >> 16) & 0xFF;
    RunColor::Rgb(format!("{r:02X}{g:02X}{b:02X}"))
}

/// Paragraph properties that locate a paragraph inside a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ParaProps {
    pub in_table: bool,
    /// Row terminator paragraph
    pub ttp: bool,
    /// Table nesting depth
    pub itap: u32,
    pub inner_cell: bool,
    pub inner_ttp: bool,
}

impl ParaProps {
    pub fn from_grpprl(grpprl: &[u8]) -> Self {
        let mut props = ParaProps::default();

        for sprm in parse_sprms(grpprl) {
            match sprm.opcode {
                SPRM_P_F_IN_TABLE => props.in_table = sprm.byte() != 0,
                SPRM_P_F_TTP => props.ttp = sprm.byte() != 0,
                SPRM_P_ITAP => props.itap = sprm.dword(),
                SPRM_P_F_INNER_TABLE_CELL => props.inner_cell = sprm.byte() != 0,
                SPRM_P_F_INNER_TTP => props.inner_ttp = sprm.byte() != 0,
                _ => {}
            }
        }

        props
    }

    pub fn depth(&self) -> u32 {
        if self.itap > 0 {
            self.itap
        } else {
            u32::from(self.in_table)
        }
    }
}
