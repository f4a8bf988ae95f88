//! File header and DIB header parsing, validation and synthesis.

use log::trace;

use super::cursor::{LeFields, LeFieldsMut};
use crate::error::BitmapError;
use crate::io::ByteSource;

pub(crate) const FILE_HEADER_LEN: u32 = 14;
/// BITMAPINFOHEADER.
pub(crate) const INFO_HEADER_LEN: u32 = 40;
/// BITMAPV4HEADER.
pub(crate) const V4_HEADER_LEN: u32 = 108;
/// BITMAPV5HEADER.
pub(crate) const V5_HEADER_LEN: u32 = 124;

/// Channel masks following a BITMAPINFOHEADER under BI_BITFIELDS.
const MASK_TABLE_LEN: u32 = 12;

/// Upper bound on everything read before the pixel data.
const LOOKAHEAD_LEN: usize = 1024;

/// Pixels-per-metre written on encode (72 DPI).
const DEFAULT_RESOLUTION: u32 = 2835;

/// Compression field of the DIB header.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Rle8,
    Rle4,
    BitFields,
}

impl Compression {
    fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Rle8),
            2 => Some(Self::Rle4),
            3 => Some(Self::BitFields),
            _ => None,
        }
    }

    fn to_u32(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::BitFields => 3,
        }
    }
}

/// Channel layout of a 16 or 32 bpp pixel.
///
/// Only the standard mask triples are recognised; anything else is rejected
/// while parsing the header.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMasks {
    /// 16 bpp, 5 bits per channel (`0x7C00, 0x03E0, 0x001F`).
    Rgb555,
    /// 16 bpp, 6-bit green (`0xF800, 0x07E0, 0x001F`).
    Rgb565,
    /// 32 bpp BGRA storage whose fourth byte is not alpha. Alpha decodes as 255.
    Xrgb8888,
    /// 32 bpp BGRA storage with a real alpha byte.
    Argb8888,
}

impl ChannelMasks {
    /// Match explicit BI_BITFIELDS masks. `alpha` is `None` when the header
    /// has no alpha mask field.
    fn from_bitfields(bpp: u16, rgb: [u32; 3], alpha: Option<u32>) -> Option<Self> {
        match (bpp, rgb) {
            (16, [0xF800, 0x07E0, 0x001F]) => Some(Self::Rgb565),
            (16, [0x7C00, 0x03E0, 0x001F]) => Some(Self::Rgb555),
            (32, [0x00FF_0000, 0x0000_FF00, 0x0000_00FF]) => match alpha {
                None => Some(Self::Xrgb8888),
                Some(0xFF00_0000) => Some(Self::Argb8888),
                Some(_) => None,
            },
            _ => None,
        }
    }
}

/// How the pixel data of a file is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    /// One of 1, 2, 4, 8, 16, 24, 32.
    pub bits_per_pixel: u16,
    /// The compression declared by the file.
    pub compression: Compression,
    /// Rows stored first-to-last instead of the default last-to-first.
    pub top_down: bool,
    /// Channel layout, present for 16 and 32 bpp only.
    pub masks: Option<ChannelMasks>,
}

impl PixelFormat {
    /// Palette-indexed (1, 2, 4 or 8 bpp).
    pub fn is_indexed(&self) -> bool {
        self.bits_per_pixel <= 8
    }

    /// RLE4 or RLE8 compressed.
    pub fn is_rle(&self) -> bool {
        matches!(self.compression, Compression::Rle4 | Compression::Rle8)
    }
}

/// The fixed file header plus the fields of the DIB header this codec uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    /// Offset of the pixel data from the start of the file.
    pub data_offset: u32,
    /// 40, 108 or 124.
    pub dib_len: u32,
    pub width: u32,
    /// Magnitude of the stored height; the sign lives in `format.top_down`.
    pub height: u32,
    pub planes: u16,
    pub image_size: u32,
    /// Colours-used field as stored (0 means "all").
    pub colors_used: u32,
    /// Palette entries actually present after the header (0 for truecolor).
    pub palette_len: u32,
    pub format: PixelFormat,
}

fn unsupported(what: impl Into<alloc::string::String>) -> BitmapError {
    BitmapError::UnsupportedVariant(what.into())
}

fn check_offset(declared: u32, expected: u64) -> Result<(), BitmapError> {
    if u64::from(declared) != expected {
        return Err(unsupported(alloc::format!(
            "bitmap offset {declared} (expected {expected})"
        )));
    }
    Ok(())
}

/// Read and validate everything up to (not including) the palette.
///
/// Consumes exactly the file header, the DIB header and, for a
/// BITMAPINFOHEADER with BI_BITFIELDS, the 12-byte mask table.
pub(crate) fn read_header<S: ByteSource + ?Sized>(src: &mut S) -> Result<BmpHeader, BitmapError> {
    let mut buf = [0u8; LOOKAHEAD_LEN];
    let probe_end = FILE_HEADER_LEN as usize + 4;
    src.read_exact(&mut buf[..probe_end])?;
    if buf[..2] != *b"BM" {
        return Err(BitmapError::UnrecognizedFormat);
    }

    let dib_len = LeFields::new(&buf[..probe_end]).u32_at(14)?;
    if !matches!(dib_len, INFO_HEADER_LEN | V4_HEADER_LEN | V5_HEADER_LEN) {
        return Err(unsupported(alloc::format!(
            "DIB header version ({dib_len} bytes)"
        )));
    }
    let mut end = (FILE_HEADER_LEN + dib_len) as usize;
    src.read_exact(&mut buf[probe_end..end])?;

    let f = LeFields::new(&buf[..end]);
    let file_size = f.u32_at(2)?;
    let data_offset = f.u32_at(10)?;
    let raw_width = f.i32_at(18)?;
    let raw_height = f.i32_at(22)?;
    let planes = f.u16_at(26)?;
    let bpp = f.u16_at(28)?;
    let raw_compression = f.u32_at(30)?;
    let image_size = f.u32_at(34)?;
    let colors_used = f.u32_at(46)?;

    let top_down = raw_height < 0;
    let height = if top_down {
        raw_height.checked_neg()
    } else {
        Some(raw_height)
    };
    let (width, height) = match (u32::try_from(raw_width), height.map(u32::try_from)) {
        (Ok(w), Some(Ok(h))) => (w, h),
        _ => return Err(unsupported("non-positive dimension")),
    };
    if planes != 1 {
        return Err(unsupported(alloc::format!("planes {planes}")));
    }

    let compression = Compression::from_u32(raw_compression)
        .ok_or_else(|| unsupported(alloc::format!("compression method {raw_compression}")))?;

    let mut mask_table_len = 0;
    let mut masks = None;
    match compression {
        Compression::BitFields => {
            if dib_len == INFO_HEADER_LEN {
                mask_table_len = MASK_TABLE_LEN;
                let table_end = end + MASK_TABLE_LEN as usize;
                src.read_exact(&mut buf[end..table_end])?;
                end = table_end;
            }
            let f = LeFields::new(&buf[..end]);
            let rgb = [f.u32_at(54)?, f.u32_at(58)?, f.u32_at(62)?];
            let alpha = if dib_len == INFO_HEADER_LEN {
                None
            } else {
                Some(f.u32_at(66)?)
            };
            masks = Some(
                ChannelMasks::from_bitfields(bpp, rgb, alpha)
                    .ok_or_else(|| unsupported("bit mask combination"))?,
            );
        }
        Compression::Rle4 | Compression::Rle8 => {
            let depth_matches = matches!(
                (bpp, compression),
                (4, Compression::Rle4) | (8, Compression::Rle8)
            );
            if !depth_matches {
                return Err(unsupported(alloc::format!(
                    "compression method {compression:?} at {bpp} bpp"
                )));
            }
            if top_down {
                return Err(unsupported("RLE compression with top-down row order"));
            }
        }
        Compression::None => {}
    }

    let header_len = u64::from(FILE_HEADER_LEN + dib_len);
    let palette_len = match bpp {
        1 | 2 | 4 | 8 => {
            let max = 1u32 << bpp;
            let colors = if colors_used == 0 { max } else { colors_used };
            if colors > max {
                return Err(BitmapError::InvalidHeader(alloc::format!(
                    "palette of {colors} colours exceeds {max} for {bpp} bpp"
                )));
            }
            check_offset(data_offset, header_len + 4 * u64::from(colors))?;
            colors
        }
        16 | 24 | 32 => {
            check_offset(data_offset, header_len + u64::from(mask_table_len))?;
            masks = match bpp {
                16 => masks.or(Some(ChannelMasks::Rgb555)),
                32 => masks.or(Some(ChannelMasks::Argb8888)),
                _ => None,
            };
            0
        }
        _ => return Err(unsupported(alloc::format!("bit depth {bpp}"))),
    };

    let format = PixelFormat {
        bits_per_pixel: bpp,
        compression,
        top_down,
        masks,
    };
    trace!("BMP {width}x{height}, DIB header {dib_len} bytes, {format:?}");
    trace!("BMP data offset {data_offset}, palette entries {palette_len}");

    Ok(BmpHeader {
        file_size,
        data_offset,
        dib_len,
        width,
        height,
        planes,
        image_size,
        colors_used,
        palette_len,
        format,
    })
}

impl BmpHeader {
    /// Length of the synthesized file + BITMAPINFOHEADER.
    pub(crate) const ENCODED_LEN: usize = (FILE_HEADER_LEN + INFO_HEADER_LEN) as usize;

    /// Header for an uncompressed, bottom-up file with a BITMAPINFOHEADER.
    pub(crate) fn for_encoding(
        width: u32,
        height: u32,
        bits_per_pixel: u16,
        palette_len: u32,
        row_len: usize,
    ) -> Result<Self, BitmapError> {
        let too_large = BitmapError::DimensionsTooLarge { width, height };
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(too_large);
        }
        let image_size = row_len
            .checked_mul(height as usize)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        let data_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + 4 * palette_len;
        let file_size = data_offset.checked_add(image_size).ok_or(too_large)?;
        let colors_used = if bits_per_pixel <= 8 && palette_len < 1 << bits_per_pixel {
            palette_len
        } else {
            0
        };
        Ok(Self {
            file_size,
            data_offset,
            dib_len: INFO_HEADER_LEN,
            width,
            height,
            planes: 1,
            image_size,
            colors_used,
            palette_len,
            format: PixelFormat {
                bits_per_pixel,
                compression: Compression::None,
                top_down: false,
                masks: None,
            },
        })
    }

    /// Serialize as a file header followed by a BITMAPINFOHEADER.
    pub(crate) fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        let mut f = LeFieldsMut::new(&mut out);
        f.put_bytes(0, b"BM");
        f.put_u32(2, self.file_size);
        f.put_u32(10, self.data_offset);
        f.put_u32(14, INFO_HEADER_LEN);
        f.put_i32(18, self.width as i32);
        let height = self.height as i32;
        f.put_i32(22, if self.format.top_down { -height } else { height });
        f.put_u16(26, self.planes);
        f.put_u16(28, self.format.bits_per_pixel);
        f.put_u32(30, self.format.compression.to_u32());
        f.put_u32(34, self.image_size);
        f.put_u32(38, DEFAULT_RESOLUTION);
        f.put_u32(42, DEFAULT_RESOLUTION);
        f.put_u32(46, self.colors_used);
        // important colours (50) stays 0
        out
    }
}
