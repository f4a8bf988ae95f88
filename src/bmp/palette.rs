//! Colour table (BGRx quads) reading and writing.

use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::bitmap::Palette;
use crate::error::BitmapError;
use crate::io::{ByteSink, ByteSource};

/// Read `count` four-byte entries. The reserved fourth byte is ignored.
pub(crate) fn read_palette<S: ByteSource + ?Sized>(
    src: &mut S,
    count: u32,
) -> Result<Palette, BitmapError> {
    let mut raw = vec![0u8; count as usize * 4];
    src.read_exact(&mut raw)?;
    let entries = raw
        .chunks_exact(4)
        .map(|q| RGB8::new(q[2], q[1], q[0]))
        .collect();
    Palette::new(entries)
}

/// Write every entry as B, G, R, 0.
pub(crate) fn write_palette<K: ByteSink + ?Sized>(
    sink: &mut K,
    palette: &Palette,
) -> Result<(), BitmapError> {
    let raw: Vec<u8> = palette
        .entries()
        .iter()
        .flat_map(|c| [c.b, c.g, c.r, 0])
        .collect();
    sink.write_all(&raw)
}

/// Smallest indexed depth that can address `len` entries.
pub(crate) fn bits_for_palette(len: usize) -> u16 {
    match len {
        0..=2 => 1,
        3..=4 => 2,
        5..=16 => 4,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceSource;

    #[test]
    fn quads_are_bgr() {
        let mut src = SliceSource::new(&[1, 2, 3, 99, 4, 5, 6, 0]);
        let p = read_palette(&mut src, 2).unwrap();
        assert_eq!(p.entries(), &[RGB8::new(3, 2, 1), RGB8::new(6, 5, 4)]);

        let mut out = Vec::new();
        write_palette(&mut out, &p).unwrap();
        assert_eq!(out, [1, 2, 3, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn depth_from_length() {
        assert_eq!(bits_for_palette(1), 1);
        assert_eq!(bits_for_palette(2), 1);
        assert_eq!(bits_for_palette(3), 2);
        assert_eq!(bits_for_palette(16), 4);
        assert_eq!(bits_for_palette(17), 8);
        assert_eq!(bits_for_palette(256), 8);
    }
}
