//! BMP decoder and encoder internals.
//!
//! Use the crate-level [`crate::decode_bmp`], [`crate::encode_bmp`], etc.

mod cursor;
mod decode;
mod encode;
mod header;
mod palette;
mod rle;
pub(crate) mod rows;

pub use header::{BmpHeader, ChannelMasks, Compression, PixelFormat};

use enough::Stop;

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::io::{ByteSink, ByteSource};
use crate::limits::Limits;

/// Read the header and colour table, leaving `src` at the first pixel byte.
pub(crate) fn probe<S: ByteSource + ?Sized>(src: &mut S) -> Result<ImageInfo, BitmapError> {
    let header = header::read_header(src)?;
    let palette = match header.palette_len {
        0 => None,
        n => Some(palette::read_palette(src, n)?),
    };
    Ok(ImageInfo::new(header, palette))
}

/// Decode a complete BMP stream.
pub(crate) fn decode<S: ByteSource + ?Sized>(
    src: &mut S,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Bitmap, BitmapError> {
    let info = probe(src)?;
    let (width, height) = (info.width, info.height);
    if let Some(limits) = limits {
        limits.check_dimensions(width, height)?;
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(info.layout.bytes_per_pixel()))
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        limits.check_allocation(bytes)?;
    }
    stop.check()?;

    let format = info.format;
    let mut bitmap = Bitmap::zeroed(width, height, info.layout, info.palette)?;
    if width == 0 || height == 0 {
        return Ok(bitmap);
    }
    if format.is_rle() {
        let bits = format.bits_per_pixel as u8;
        rle::decode_rle(src, bits, width, height, bitmap.pixels_mut(), stop)?;
    } else {
        decode::read_rows(src, &format, &mut bitmap, stop)?;
    }
    Ok(bitmap)
}

/// Encode `bitmap` into `sink`.
pub(crate) fn encode<K: ByteSink + ?Sized>(
    sink: &mut K,
    bitmap: &Bitmap,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    stop.check()?;
    encode::encode(sink, bitmap, stop)
}
