use alloc::vec;
use alloc::vec::Vec;

use rgb::{RGB8, RGBA8};

use crate::bmp::rows::{self, RowSource};
use crate::error::BitmapError;
use crate::pixel::PixelLayout;

/// Ordered list of opaque colours. A pixel's index is its position here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<RGB8>,
}

impl Palette {
    /// Largest palette a BMP file can carry (8 bits per index).
    pub const MAX_LEN: usize = 256;

    /// Build a palette of 1 to 256 entries.
    pub fn new(entries: Vec<RGB8>) -> Result<Self, BitmapError> {
        if entries.is_empty() || entries.len() > Self::MAX_LEN {
            return Err(BitmapError::InvalidData(alloc::format!(
                "bad palette length: {}",
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// 256-entry grey ramp, entry `i` is `(i, i, i)`.
    pub fn grayscale() -> Self {
        Self {
            entries: (0..=255u8).map(|v| RGB8::new(v, v, v)).collect(),
        }
    }

    pub fn entries(&self) -> &[RGB8] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<RGB8> {
        self.entries.get(usize::from(index)).copied()
    }
}

/// An in-memory raster: the output of decoding and the input of encoding.
///
/// Rows are `stride` bytes apart; only the first `width * bytes_per_pixel`
/// bytes of each row are pixels. `Indexed8` bitmaps always carry a palette,
/// no other layout does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    layout: PixelLayout,
    palette: Option<Palette>,
    pixels: Vec<u8>,
}

fn row_len(width: u32, height: u32, layout: PixelLayout) -> Result<usize, BitmapError> {
    (width as usize)
        .checked_mul(layout.bytes_per_pixel())
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}

/// Bytes needed to hold `height` rows `stride` apart, the last one unpadded.
fn required_len(
    width: u32,
    height: u32,
    stride: usize,
    layout: PixelLayout,
) -> Result<usize, BitmapError> {
    let row = row_len(width, height, layout)?;
    if height == 0 || row == 0 {
        return Ok(0);
    }
    stride
        .checked_mul(height as usize - 1)
        .and_then(|n| n.checked_add(row))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}

impl Bitmap {
    /// Wrap tightly packed truecolor or grayscale pixels.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        pixels: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        let stride = row_len(width, height, layout)?;
        Self::with_stride(width, height, stride, layout, pixels)
    }

    /// Wrap truecolor or grayscale pixels whose rows are `stride` bytes apart.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        layout: PixelLayout,
        pixels: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        if layout == PixelLayout::Indexed8 {
            return Err(BitmapError::InvalidData(
                "indexed bitmaps need a palette, use Bitmap::indexed".into(),
            ));
        }
        Self::checked(width, height, stride, layout, None, pixels)
    }

    /// Wrap one palette index per pixel, rows packed `width` bytes apart.
    pub fn indexed(
        width: u32,
        height: u32,
        palette: Palette,
        indices: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        Self::checked(
            width,
            height,
            width as usize,
            PixelLayout::Indexed8,
            Some(palette),
            indices,
        )
    }

    /// Opaque RGB bitmap from typed pixels.
    pub fn from_rgb8(width: u32, height: u32, pixels: &[RGB8]) -> Result<Self, BitmapError> {
        let bytes = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        Self::new(width, height, PixelLayout::Rgb8, bytes)
    }

    /// Straight-alpha RGBA bitmap from typed pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[RGBA8]) -> Result<Self, BitmapError> {
        let bytes = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self::new(width, height, PixelLayout::Rgba8, bytes)
    }

    fn checked(
        width: u32,
        height: u32,
        stride: usize,
        layout: PixelLayout,
        palette: Option<Palette>,
        pixels: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        if stride < row_len(width, height, layout)? {
            return Err(BitmapError::InvalidData(alloc::format!(
                "stride {stride} is shorter than a row of {width} {layout:?} pixels"
            )));
        }
        let needed = required_len(width, height, stride, layout)?;
        if pixels.len() < needed {
            return Err(BitmapError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            layout,
            palette,
            pixels,
        })
    }

    /// Zero-filled, tightly packed bitmap for the decoder to fill in.
    pub(crate) fn zeroed(
        width: u32,
        height: u32,
        layout: PixelLayout,
        palette: Option<Palette>,
    ) -> Result<Self, BitmapError> {
        let stride = row_len(width, height, layout)?;
        let len = stride
            .checked_mul(height as usize)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            stride,
            layout,
            palette,
            pixels: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// The palette of an `Indexed8` bitmap.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Raw pixel bytes, including any row padding.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel bytes of row `y` (top row is 0), without padding.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.pixels[start..start + self.width as usize * self.layout.bytes_per_pixel()]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let len = self.width as usize * self.layout.bytes_per_pixel();
        &mut self.pixels[start..start + len]
    }

    /// Whether every pixel has full alpha. Layouts without alpha are always opaque.
    pub fn is_opaque(&self) -> bool {
        let Some(offset) = self.layout.alpha_offset() else {
            return true;
        };
        (0..self.height as usize).all(|y| {
            self.row(y)
                .chunks_exact(4)
                .all(|px| px[offset] == u8::MAX)
        })
    }

    /// Every pixel as straight-alpha RGBA, top row first.
    pub fn to_rgba8(&self) -> Vec<RGBA8> {
        let w = self.width as usize;
        let source = rows::row_source(self);
        let mut row = vec![0u8; w * 4];
        let mut out = Vec::with_capacity(w * self.height as usize);
        for y in 0..self.height as usize {
            source.rgba_row(y, &mut row);
            out.extend(
                row.chunks_exact(4)
                    .map(|px| RGBA8::new(px[0], px[1], px[2], px[3])),
            );
        }
        out
    }

    /// Straight-alpha RGBA copy as an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<RGBA8> {
        imgref::ImgVec::new(
            self.to_rgba8(),
            self.width as usize,
            self.height as usize,
        )
    }

    /// Zero-copy view of the raw bytes as an [`imgref::ImgRef`], or `None`
    /// for an empty bitmap.
    ///
    /// Width and stride are measured in bytes, so one pixel spans
    /// `layout().bytes_per_pixel()` columns.
    #[cfg(feature = "imgref")]
    pub fn as_byte_imgref(&self) -> Option<imgref::ImgRef<'_, u8>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(imgref::ImgRef::new_stride(
            &self.pixels,
            self.width as usize * self.layout.bytes_per_pixel(),
            self.height as usize,
            self.stride,
        ))
    }
}
