//! Registration with an application's format table.
//!
//! Nothing registers itself. An application that dispatches on file
//! signatures calls [`register`] once with its own registry.

use enough::Stop;

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::io::SliceSource;

/// Entry points and identification data for one image format.
#[derive(Debug)]
pub struct FormatDescriptor {
    pub name: &'static str,
    /// Lowercase, without the dot.
    pub extensions: &'static [&'static str],
    pub mime_type: &'static str,
    /// Leading bytes every file of the format starts with.
    pub signature: &'static [u8],
    pub probe: fn(&[u8]) -> Result<ImageInfo, BitmapError>,
    pub decode: fn(&[u8], &dyn Stop) -> Result<Bitmap, BitmapError>,
}

impl FormatDescriptor {
    /// Whether `data` starts with this format's signature.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.starts_with(self.signature)
    }
}

fn decode_unlimited(data: &[u8], stop: &dyn Stop) -> Result<Bitmap, BitmapError> {
    crate::bmp::decode(&mut SliceSource::new(data), None, stop)
}

/// Windows bitmap.
pub static BMP_FORMAT: FormatDescriptor = FormatDescriptor {
    name: "bmp",
    extensions: &["bmp", "dib"],
    mime_type: "image/bmp",
    signature: b"BM",
    probe: ImageInfo::from_bytes,
    decode: decode_unlimited,
};

/// A table of formats, keyed however the application likes.
pub trait FormatRegistry {
    fn register(&mut self, format: &'static FormatDescriptor);
}

impl FormatRegistry for alloc::vec::Vec<&'static FormatDescriptor> {
    fn register(&mut self, format: &'static FormatDescriptor) {
        self.push(format);
    }
}

/// Add BMP to `registry`.
pub fn register<R: FormatRegistry + ?Sized>(registry: &mut R) {
    registry.register(&BMP_FORMAT);
}
