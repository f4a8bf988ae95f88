//! Little-endian field access and sub-byte pixel cursors.

use crate::error::BitmapError;

/// Read-only view of a fixed-layout header region.
///
/// Every accessor is bounds-checked; a field that runs past the end of the
/// region means the header was cut short.
pub(crate) struct LeFields<'a> {
    buf: &'a [u8],
}

impl<'a> LeFields<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], BitmapError> {
        let bytes = offset
            .checked_add(N)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(BitmapError::UnexpectedEof)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub(crate) fn u16_at(&self, offset: usize) -> Result<u16, BitmapError> {
        self.array::<2>(offset).map(u16::from_le_bytes)
    }

    pub(crate) fn u32_at(&self, offset: usize) -> Result<u32, BitmapError> {
        self.array::<4>(offset).map(u32::from_le_bytes)
    }

    pub(crate) fn i32_at(&self, offset: usize) -> Result<i32, BitmapError> {
        self.array::<4>(offset).map(i32::from_le_bytes)
    }
}

/// Writable counterpart of [`LeFields`] for header synthesis.
///
/// Offsets are compile-time constants of the header layout, so writes past
/// the end are a programming error and panic.
pub(crate) struct LeFieldsMut<'a> {
    buf: &'a mut [u8],
}

impl<'a> LeFieldsMut<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn put_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn put_u16(&mut self, offset: usize, v: u16) {
        self.put_bytes(offset, &v.to_le_bytes());
    }

    pub(crate) fn put_u32(&mut self, offset: usize, v: u32) {
        self.put_bytes(offset, &v.to_le_bytes());
    }

    pub(crate) fn put_i32(&mut self, offset: usize, v: i32) {
        self.put_bytes(offset, &v.to_le_bytes());
    }
}

/// Cursor over packed pixel fields of `bits` width (1, 2, 4 or 8),
/// most-significant field first within each byte.
///
/// Used for sub-byte indexed rows in both directions and for the nibble
/// packing of RLE4 runs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BitCursor {
    bits: u8,
    byte: usize,
    shift: u8,
}

impl BitCursor {
    pub(crate) fn new(bits: u8) -> Self {
        debug_assert!(matches!(bits, 1 | 2 | 4 | 8));
        Self {
            bits,
            byte: 0,
            shift: 8 - bits,
        }
    }

    /// Index of the byte holding the next field.
    pub(crate) fn position(&self) -> usize {
        self.byte
    }

    fn mask(&self) -> u8 {
        (((1u16) << self.bits) - 1) as u8
    }

    fn advance(&mut self) {
        if self.shift == 0 {
            self.shift = 8 - self.bits;
            self.byte += 1;
        } else {
            self.shift -= self.bits;
        }
    }

    /// Read the next field. `bytes` must extend past [`Self::position`].
    pub(crate) fn read(&mut self, bytes: &[u8]) -> u8 {
        let v = (bytes[self.byte] >> self.shift) & self.mask();
        self.advance();
        v
    }

    /// Read the next field, starting over at the first byte once `bytes`
    /// is exhausted. Expands a repeating packed pattern such as an RLE4
    /// encoded run.
    pub(crate) fn read_cycling(&mut self, bytes: &[u8]) -> u8 {
        let v = self.read(bytes);
        if self.byte == bytes.len() {
            self.byte = 0;
        }
        v
    }

    /// Overwrite the next field with the low bits of `v`.
    pub(crate) fn write(&mut self, bytes: &mut [u8], v: u8) {
        let mask = self.mask();
        let b = &mut bytes[self.byte];
        *b = (*b & !(mask << self.shift)) | ((v & mask) << self.shift);
        self.advance();
    }
}

/// On-disk length of one row: `ceil(bits * width / 8)` rounded up to a
/// multiple of 4.
pub(crate) fn padded_row_len(bits: u16, width: usize) -> Option<usize> {
    width
        .checked_mul(usize::from(bits))?
        .checked_add(31)
        .map(|b| b / 32 * 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_msb_first() {
        let bytes = [0b1011_0001, 0b0110_0000];
        let mut c = BitCursor::new(2);
        let got: alloc::vec::Vec<u8> = (0..6).map(|_| c.read(&bytes)).collect();
        assert_eq!(got, [0b10, 0b11, 0b00, 0b01, 0b01, 0b10]);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn write_then_read_nibbles() {
        let mut bytes = [0xFFu8; 2];
        let mut w = BitCursor::new(4);
        for v in [0x1, 0x2, 0x3] {
            w.write(&mut bytes, v);
        }
        assert_eq!(bytes, [0x12, 0x3F]);
    }

    #[test]
    fn cycling_alternates_nibbles() {
        let mut c = BitCursor::new(4);
        let got: alloc::vec::Vec<u8> = (0..5).map(|_| c.read_cycling(&[0xAB])).collect();
        assert_eq!(got, [0xA, 0xB, 0xA, 0xB, 0xA]);

        let mut c8 = BitCursor::new(8);
        assert_eq!(c8.read_cycling(&[7]), 7);
        assert_eq!(c8.read_cycling(&[7]), 7);
    }

    #[test]
    fn row_padding() {
        assert_eq!(padded_row_len(1, 1), Some(4));
        assert_eq!(padded_row_len(1, 33), Some(8));
        assert_eq!(padded_row_len(4, 9), Some(8));
        assert_eq!(padded_row_len(8, 5), Some(8));
        assert_eq!(padded_row_len(24, 3), Some(12));
        assert_eq!(padded_row_len(32, 3), Some(12));
        assert_eq!(padded_row_len(16, 0), Some(0));
    }

    #[test]
    fn short_header_field_is_eof() {
        let f = LeFields::new(&[1, 0, 0]);
        assert_eq!(f.u16_at(0).ok(), Some(1));
        assert!(matches!(f.u32_at(0), Err(BitmapError::UnexpectedEof)));
    }
}
