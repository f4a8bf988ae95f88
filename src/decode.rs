use enough::Stop;

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::io::SliceSource;
use crate::limits::Limits;

/// Builder for decoding an in-memory BMP file.
///
/// ```no_run
/// use zenbmp::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits {
///     max_pixels: Some(64 * 1024 * 1024),
///     ..Default::default()
/// };
/// let bitmap = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// # Ok::<(), zenbmp::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Reject images whose dimensions or buffer size exceed `limits`.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Parse the header and palette only.
    pub fn probe(&self) -> Result<ImageInfo, BitmapError> {
        ImageInfo::from_bytes(self.data)
    }

    pub fn decode(self, stop: impl Stop) -> Result<Bitmap, BitmapError> {
        crate::bmp::decode(&mut SliceSource::new(self.data), self.limits, &stop)
    }
}
