//! Output format selection and the encode direction of the row transcoder.

use alloc::borrow::Cow;
use alloc::vec;

use enough::Stop;
use log::debug;

use super::cursor::{BitCursor, padded_row_len};
use super::header::BmpHeader;
use super::palette::{bits_for_palette, write_palette};
use super::rows::row_source;
use crate::bitmap::{Bitmap, Palette};
use crate::error::BitmapError;
use crate::io::ByteSink;
use crate::pixel::PixelLayout;

/// What gets written for a given bitmap.
#[derive(Debug)]
enum Target<'a> {
    /// Palette indices at 1, 2, 4 or 8 bits, copied from the bitmap's bytes.
    Indexed { bits: u16, palette: Cow<'a, Palette> },
    /// 24 bpp BGR.
    Bgr24,
    /// 32 bpp BGRA, straight alpha.
    Bgra32,
}

impl Target<'_> {
    fn bits(&self) -> u16 {
        match self {
            Self::Indexed { bits, .. } => *bits,
            Self::Bgr24 => 24,
            Self::Bgra32 => 32,
        }
    }
}

fn select(bitmap: &Bitmap) -> Result<Target<'_>, BitmapError> {
    let target = match bitmap.layout() {
        PixelLayout::Indexed8 => {
            let palette = bitmap.palette().ok_or_else(|| {
                BitmapError::InvalidData("indexed bitmap without palette".into())
            })?;
            if palette.is_empty() || palette.len() > Palette::MAX_LEN {
                return Err(BitmapError::InvalidData(alloc::format!(
                    "bad palette length: {}",
                    palette.len()
                )));
            }
            // Indices past the palette end must survive the trip, so they
            // widen the depth too.
            let max_index = (0..bitmap.height() as usize)
                .filter_map(|y| bitmap.row(y).iter().max().copied())
                .max()
                .unwrap_or(0);
            Target::Indexed {
                bits: bits_for_palette(palette.len().max(usize::from(max_index) + 1)),
                palette: Cow::Borrowed(palette),
            }
        }
        PixelLayout::Gray8 => Target::Indexed {
            bits: 8,
            palette: Cow::Owned(Palette::grayscale()),
        },
        layout if layout.has_alpha() && !bitmap.is_opaque() => Target::Bgra32,
        _ => Target::Bgr24,
    };
    debug!(
        "BMP encode {}x{} {:?} as {} bpp",
        bitmap.width(),
        bitmap.height(),
        bitmap.layout(),
        target.bits()
    );
    Ok(target)
}

/// Write `bitmap` as an uncompressed, bottom-up BMP.
pub(crate) fn encode<K: ByteSink + ?Sized>(
    sink: &mut K,
    bitmap: &Bitmap,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    let target = select(bitmap)?;
    let (width, height) = (bitmap.width(), bitmap.height());
    let bits = target.bits();
    let row_len = padded_row_len(bits, width as usize)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let palette_len = match &target {
        Target::Indexed { palette, .. } => palette.len() as u32,
        _ => 0,
    };

    let header = BmpHeader::for_encoding(width, height, bits, palette_len, row_len)?;
    sink.write_all(&header.to_bytes())?;
    if let Target::Indexed { palette, .. } = &target {
        write_palette(sink, palette)?;
    }
    if width == 0 || height == 0 {
        return Ok(());
    }

    let mut row = vec![0u8; row_len];
    let mut rgba = match target {
        Target::Indexed { .. } => vec![],
        _ => vec![0u8; width as usize * 4],
    };
    let source = row_source(bitmap);

    for (i, y) in (0..height as usize).rev().enumerate() {
        if i % 16 == 0 {
            stop.check()?;
        }
        match &target {
            Target::Indexed { bits: 8, .. } => {
                row[..width as usize].copy_from_slice(bitmap.row(y));
            }
            Target::Indexed { bits, .. } => {
                let mut cursor = BitCursor::new(*bits as u8);
                for &index in bitmap.row(y) {
                    cursor.write(&mut row, index);
                }
            }
            Target::Bgr24 => {
                source.rgba_row(y, &mut rgba);
                for (px, dst) in rgba.chunks_exact(4).zip(row.chunks_exact_mut(3)) {
                    dst.copy_from_slice(&[px[2], px[1], px[0]]);
                }
            }
            Target::Bgra32 => {
                source.rgba_row(y, &mut rgba);
                for (px, dst) in rgba.chunks_exact(4).zip(row.chunks_exact_mut(4)) {
                    dst.copy_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
        }
        sink.write_all(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use enough::Unstoppable;
    use rgb::RGB8;

    fn encoded(bitmap: &Bitmap) -> Vec<u8> {
        let mut out = Vec::new();
        encode(&mut out, bitmap, &Unstoppable).unwrap();
        out
    }

    #[test]
    fn opaque_rgba_drops_to_24_bpp() {
        let bmp = Bitmap::new(1, 1, PixelLayout::Rgba8, vec![10, 20, 30, 255]).unwrap();
        let out = encoded(&bmp);
        assert_eq!(u16::from_le_bytes([out[28], out[29]]), 24);
        assert_eq!(&out[54..], &[30, 20, 10, 0]);
    }

    #[test]
    fn premultiplied_is_written_straight() {
        let bmp = Bitmap::new(1, 1, PixelLayout::RgbaPremul8, vec![64, 0, 128, 128]).unwrap();
        let out = encoded(&bmp);
        assert_eq!(u16::from_le_bytes([out[28], out[29]]), 32);
        assert_eq!(&out[54..], &[255, 0, 127, 128]);
    }

    #[test]
    fn three_colours_pack_at_two_bits() {
        let palette = Palette::new(vec![RGB8::new(0, 0, 0); 3]).unwrap();
        let bmp = Bitmap::indexed(5, 1, palette, vec![0, 1, 2, 1, 2]).unwrap();
        let out = encoded(&bmp);
        assert_eq!(u16::from_le_bytes([out[28], out[29]]), 2);
        // colours used is written because 3 < 4
        assert_eq!(u32::from_le_bytes([out[46], out[47], out[48], out[49]]), 3);
        assert_eq!(&out[54 + 12..], &[0b00_01_10_01, 0b10_00_00_00, 0, 0]);
    }

    #[test]
    fn zero_height_writes_header_and_palette_only() {
        let bmp = Bitmap::new(7, 0, PixelLayout::Gray8, vec![]).unwrap();
        assert_eq!(encoded(&bmp).len(), 54 + 256 * 4);
    }
}
