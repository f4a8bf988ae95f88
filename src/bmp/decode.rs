//! Row transcoder, decode direction: on-disk rows to [`Bitmap`] rows.

use alloc::vec;

use enough::Stop;

use super::cursor::{BitCursor, padded_row_len};
use super::header::{ChannelMasks, PixelFormat};
use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::io::ByteSource;

/// Unpack one stored row into `out`, which holds `width` output pixels.
fn unpack_row(format: &PixelFormat, row: &[u8], out: &mut [u8]) {
    match format.bits_per_pixel {
        bits @ (1 | 2 | 4) => {
            let mut cursor = BitCursor::new(bits as u8);
            for index in out.iter_mut() {
                *index = cursor.read(row);
            }
        }
        8 => out.copy_from_slice(&row[..out.len()]),
        16 => {
            let rgb565 = format.masks == Some(ChannelMasks::Rgb565);
            for (px, dst) in row.chunks_exact(2).zip(out.chunks_exact_mut(3)) {
                let v = u16::from_le_bytes([px[0], px[1]]);
                let (r, g, b) = if rgb565 {
                    ((v >> 11) << 3, ((v >> 5) & 0x3F) << 2, (v & 0x1F) << 3)
                } else {
                    (((v >> 10) & 0x1F) << 3, ((v >> 5) & 0x1F) << 3, (v & 0x1F) << 3)
                };
                dst.copy_from_slice(&[r as u8, g as u8, b as u8]);
            }
        }
        24 => {
            for (px, dst) in row.chunks_exact(3).zip(out.chunks_exact_mut(3)) {
                dst.copy_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        32 => {
            let opaque = format.masks == Some(ChannelMasks::Xrgb8888);
            for (px, dst) in row.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
                let a = if opaque { u8::MAX } else { px[3] };
                dst.copy_from_slice(&[px[2], px[1], px[0], a]);
            }
        }
        _ => unreachable!("bit depth validated by the header parser"),
    }
}

/// Read `bitmap.height()` padded rows from `src` into `bitmap`, honouring
/// the stored row order.
pub(crate) fn read_rows<S: ByteSource + ?Sized>(
    src: &mut S,
    format: &PixelFormat,
    bitmap: &mut Bitmap,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let row_len = padded_row_len(format.bits_per_pixel, width as usize)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let mut row = vec![0u8; row_len];
    let height = height as usize;

    for i in 0..height {
        if i % 16 == 0 {
            stop.check()?;
        }
        let y = if format.top_down { i } else { height - 1 - i };
        src.read_exact(&mut row)?;
        unpack_row(format, &row, bitmap.row_mut(y));
    }
    Ok(())
}
