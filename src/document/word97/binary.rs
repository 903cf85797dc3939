//! Little-endian readers over byte slices

#[inline]
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

#[inline]
pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Slice `len` bytes at `offset`, as addressed by an (fc, lcb) pair.
pub(crate) fn slice_at(data: &[u8], offset: u32, len: u32) -> Option<&[u8]> {
    let start = offset as usize;
    data.get(start..start.checked_add(len as usize)?)
}
