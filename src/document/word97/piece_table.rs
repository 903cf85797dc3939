//! Piece table and main-text decoding
//!
//! The Clx in the table stream maps character positions (CP) to byte
//! offsets (FC) in the WordDocument stream. Each piece is either 8-bit
//! Windows-1252 ("compressed") or UTF-16LE.

use super::binary::{read_u16, read_u32};
use crate::error::Unreadable;

/// A PLC: `n + 1` CPs followed by `n` fixed-size data items.
pub(crate) struct Plc<'a> {
    data: &'a [u8],
    count: usize,
    item_size: usize,
}

impl<'a> Plc<'a> {
    pub fn parse(data: &'a [u8], item_size: usize) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        let count = (data.len() - 4) / (4 + item_size);
        Some(Plc {
            data,
            count,
            item_size,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn range(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.count {
            return None;
        }
        Some((read_u32(self.data, index * 4)?, read_u32(self.data, index * 4 + 4)?))
    }

    pub fn item(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = (self.count + 1) * 4 + index * self.item_size;
        self.data.get(start..start + self.item_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextPiece {
    pub cp_start: u32,
    pub cp_end: u32,
    /// Byte offset of the piece in the WordDocument stream
    pub fc: u32,
    pub compressed: bool,
}

impl TextPiece {
    fn byte_len(&self) -> usize {
        let chars = (self.cp_end - self.cp_start) as usize;
        if self.compressed { chars } else { chars * 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PieceTable {
    pieces: Vec<TextPiece>,
}

/// One decoded character of the main text with the FC it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextUnit {
    pub unit: u16,
    pub fc: u32,
}

impl PieceTable {
    pub fn parse(clx: &[u8]) -> Result<Self, Unreadable> {
        let malformed = |what: &str| Unreadable::Malformed(format!("piece table: {what}"));
        let mut offset = 0;

        // Skip the Prc entries (0x01, cb: u16, grpprl)
        while clx.get(offset) == Some(&0x01) {
            let cb = read_u16(clx, offset + 1).ok_or_else(|| malformed("truncated Prc"))?;
            offset += 3 + cb as usize;
        }

        if clx.get(offset) != Some(&0x02) {
            return Err(malformed("missing Pcdt marker"));
        }
        let lcb = read_u32(clx, offset + 1).ok_or_else(|| malformed("truncated Pcdt"))? as usize;
        offset += 5;
        let plc_pcd = clx
            .get(offset..offset + lcb)
            .ok_or_else(|| malformed("PlcPcd exceeds Clx"))?;

        let plc = Plc::parse(plc_pcd, 8).ok_or_else(|| malformed("empty PlcPcd"))?;
        let mut pieces = Vec::with_capacity(plc.len());

        for index in 0..plc.len() {
            let (cp_start, cp_end) = plc.range(index).ok_or_else(|| malformed("bad CP"))?;
            let pcd = plc.item(index).ok_or_else(|| malformed("bad Pcd"))?;
            let fc_raw = read_u32(pcd, 2).ok_or_else(|| malformed("bad Pcd"))?;
            if cp_end < cp_start {
                return Err(malformed("pieces out of order"));
            }

            // Bit 30 set: 8-bit text at fc / 2
            let compressed = fc_raw & 0x4000_0000 != 0;
            let fc = fc_raw & 0x3FFF_FFFF;
            pieces.push(TextPiece {
                cp_start,
                cp_end,
                fc: if compressed { fc / 2 } else { fc },
                compressed,
            });
        }

        pieces.sort_by_key(|piece| piece.cp_start);
        Ok(PieceTable { pieces })
    }

    pub fn pieces(&self) -> &[TextPiece] {
        &self.pieces
    }

    /// Decode CPs `0..ccp` as UTF-16 units, each tagged with its FC.
    pub fn decode(&self, word_document: &[u8], ccp: u32) -> Result<Vec<TextUnit>, Unreadable> {
        let mut units = Vec::with_capacity(ccp as usize);

        for piece in &self.pieces {
            if piece.cp_start >= ccp {
                break;
            }
            let end = piece.cp_end.min(ccp);
            let piece = TextPiece {
                cp_end: end,
                ..*piece
            };

            let start = piece.fc as usize;
            let bytes = word_document
                .get(start..start + piece.byte_len())
                .ok_or_else(|| {
                    Unreadable::Malformed(format!(
                        "text piece at 0x{:X} runs past the WordDocument stream",
                        piece.fc
                    ))
                })?;

            if piece.compressed {
                let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                // Windows-1252 is single-byte: one char per byte, all in the BMP
                for (index, ch) in decoded.chars().enumerate() {
                    units.push(TextUnit {
                        unit: ch as u32 as u16,
                        fc: piece.fc + index as u32,
                    });
                }
            } else {
                for (index, pair) in bytes.chunks_exact(2).enumerate() {
                    units.push(TextUnit {
                        unit: u16::from_le_bytes([pair[0], pair[1]]),
                        fc: piece.fc + (index * 2) as u32,
                    });
                }
            }
        }

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clx_with_pieces(pieces: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut plc = Vec::new();
        for (cp, _, _) in pieces {
            plc.extend_from_slice(&cp.to_le_bytes());
        }
        let last = pieces.last().map(|piece| piece.1).unwrap_or(0);
        plc.extend_from_slice(&last.to_le_bytes());
        for (_, _, fc_raw) in pieces {
            plc.extend_from_slice(&0u16.to_le_bytes());
            plc.extend_from_slice(&fc_raw.to_le_bytes());
            plc.extend_from_slice(&0u16.to_le_bytes());
        }

        let mut clx = vec![0x01, 0x02, 0x00, 0xAA, 0xBB];
        clx.push(0x02);
        clx.extend_from_slice(&(plc.len() as u32).to_le_bytes());
        clx.extend_from_slice(&plc);
        clx
    }

    #[test]
    fn test_piece_table_compressed_and_unicode() {
        let clx = clx_with_pieces(&[(0, 3, 0x4000_0000 | (16 * 2)), (3, 5, 32)]);
        let table = PieceTable::parse(&clx).expect("valid clx");
        assert_eq!(table.pieces().len(), 2);
        assert!(table.pieces()[0].compressed);
        assert_eq!(table.pieces()[0].fc, 16);

        let mut stream = vec![0u8; 64];
        stream[16..19].copy_from_slice(b"F\xFCr");
        stream[32..36].copy_from_slice(&[b'o', 0, b'k', 0]);

        let units = table.decode(&stream, 5).expect("decodes");
        let text = String::from_utf16_lossy(&units.iter().map(|u| u.unit).collect::<Vec<_>>());
        assert_eq!(text, "Fürok");
        assert_eq!(units[1].fc, 17);
        assert_eq!(units[4].fc, 34);
    }

    #[test]
    fn test_piece_table_requires_pcdt() {
        assert!(PieceTable::parse(&[0x01, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_piece_past_stream_is_malformed() {
        let clx = clx_with_pieces(&[(0, 10, 60)]);
        let table = PieceTable::parse(&clx).expect("valid clx");
        assert!(table.decode(&[0u8; 64], 10).is_err());
    }
}
