/// In-memory pixel layout of a [`crate::Bitmap`].
///
/// The decoder only ever produces `Indexed8`, `Rgb8` and `Rgba8`. The other
/// layouts are accepted by the encoder so callers can hand over buffers in
/// whatever order they already have.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// One palette index per byte; the bitmap carries the palette.
    Indexed8,
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// 3 channels, 8-bit RGB, always opaque.
    Rgb8,
    /// 4 channels, 8-bit RGBA, straight (non-premultiplied) alpha.
    Rgba8,
    /// 4 channels, 8-bit RGBA, colour channels premultiplied by alpha.
    RgbaPremul8,
    /// 3 channels, 8-bit BGR.
    Bgr8,
    /// 4 channels, 8-bit BGRA, straight alpha.
    Bgra8,
    /// 4 channels, 8-bit BGRX (opaque; 4th byte is padding, not alpha).
    Bgrx8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Indexed8 | Self::Gray8 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::RgbaPremul8 | Self::Bgra8 | Self::Bgrx8 => 4,
        }
    }

    /// Whether the layout stores a meaningful alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba8 | Self::RgbaPremul8 | Self::Bgra8)
    }

    /// Byte offset of the alpha channel within a pixel, if any.
    pub(crate) fn alpha_offset(&self) -> Option<usize> {
        self.has_alpha().then_some(3)
    }
}
