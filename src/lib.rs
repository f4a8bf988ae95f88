//! # zenbmp
//!
//! BMP (Windows bitmap) decoder and encoder.
//!
//! ## Decoding
//!
//! - 1, 2, 4 and 8 bpp palette images, decoded to palette indices plus the palette
//! - RLE4 and RLE8 compressed palette images
//! - 16 bpp RGB555 / RGB565, 24 bpp RGB, 32 bpp with or without alpha
//! - BITMAPINFOHEADER, BITMAPV4HEADER and BITMAPV5HEADER files, top-down or bottom-up
//!
//! ## Encoding
//!
//! Always uncompressed and bottom-up with a BITMAPINFOHEADER. The depth is
//! picked from the bitmap: indexed bitmaps use the smallest depth that fits
//! their palette, grayscale becomes 8 bpp with a grey palette, opaque colour
//! becomes 24 bpp and anything with real transparency 32 bpp.
//!
//! ## Non-Goals
//!
//! - Writing RLE or top-down files
//! - OS/2 and other DIB header variants
//! - ICC profiles and other BITMAPV5HEADER metadata
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{Bitmap, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.format);
//!
//! let bitmap: Bitmap = zenbmp::decode_bmp(data, Unstoppable)?;
//! let encoded: Vec<u8> = zenbmp::encode_bmp(&bitmap, Unstoppable)?;
//! # Ok::<(), zenbmp::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod error;
mod info;
mod limits;
mod pixel;

pub mod bmp;
pub mod format;
pub mod io;

mod decode;

use alloc::vec::Vec;

// Re-exports
pub use bitmap::{Bitmap, Palette};
pub use bmp::{BmpHeader, ChannelMasks, Compression, PixelFormat};
pub use decode::DecodeRequest;
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::BitmapError;
pub use info::ImageInfo;
pub use io::{ByteSink, ByteSource, SliceSource};
pub use limits::Limits;
pub use pixel::PixelLayout;
pub use rgb::{RGB8, RGBA8};

/// Parse the header and palette of an in-memory BMP file.
pub fn probe_bmp(data: &[u8]) -> Result<ImageInfo, BitmapError> {
    ImageInfo::from_bytes(data)
}

/// Decode an in-memory BMP file.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<Bitmap, BitmapError> {
    bmp::decode(&mut SliceSource::new(data), None, &stop)
}

/// Decode an in-memory BMP file, rejecting it if it exceeds `limits`.
pub fn decode_bmp_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    bmp::decode(&mut SliceSource::new(data), Some(limits), &stop)
}

/// Decode from any [`ByteSource`]. Reads nothing past the last pixel row.
pub fn decode_bmp_from<S: ByteSource>(
    mut src: S,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    bmp::decode(&mut src, limits, &stop)
}

/// Encode `bitmap` as a new BMP file.
pub fn encode_bmp(bitmap: &Bitmap, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
    let mut out = Vec::new();
    bmp::encode(&mut out, bitmap, &stop)?;
    Ok(out)
}

/// Encode `bitmap` into any [`ByteSink`]. On error the sink may hold a
/// partial file.
pub fn encode_bmp_to<K: ByteSink>(
    mut sink: K,
    bitmap: &Bitmap,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    bmp::encode(&mut sink, bitmap, &stop)
}

/// Parse the header and palette from a reader, leaving it at the pixel data.
#[cfg(feature = "std")]
pub fn probe_bmp_reader<R: std::io::Read>(reader: R) -> Result<ImageInfo, BitmapError> {
    bmp::probe(&mut io::IoSource(reader))
}

/// Decode a BMP file from a reader.
#[cfg(feature = "std")]
pub fn decode_bmp_reader<R: std::io::Read>(
    reader: R,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    decode_bmp_from(io::IoSource(reader), limits, stop)
}

/// Encode `bitmap` to a writer. Write errors are returned as [`BitmapError::Io`].
#[cfg(feature = "std")]
pub fn encode_bmp_writer<W: std::io::Write>(
    writer: W,
    bitmap: &Bitmap,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    encode_bmp_to(io::IoSink(writer), bitmap, stop)
}
