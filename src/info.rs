use crate::bitmap::Palette;
use crate::bmp::{self, BmpHeader, PixelFormat};
use crate::error::BitmapError;
use crate::io::SliceSource;
use crate::pixel::PixelLayout;

/// Everything known about a BMP file without touching its pixel data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// On-disk storage: depth, compression, row order, channel masks.
    pub format: PixelFormat,
    /// Layout [`crate::decode_bmp`] will produce.
    pub layout: PixelLayout,
    /// Colour table of an indexed file.
    pub palette: Option<Palette>,
    /// The raw header fields.
    pub header: BmpHeader,
}

impl ImageInfo {
    pub(crate) fn new(header: BmpHeader, palette: Option<Palette>) -> Self {
        let format = header.format;
        let layout = match format.bits_per_pixel {
            1 | 2 | 4 | 8 => PixelLayout::Indexed8,
            32 => PixelLayout::Rgba8,
            _ => PixelLayout::Rgb8,
        };
        Self {
            width: header.width,
            height: header.height,
            format,
            layout,
            palette,
            header,
        }
    }

    /// Probe BMP header bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        bmp::probe(&mut SliceSource::new(data))
    }
}
