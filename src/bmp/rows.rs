//! Per-layout access to a [`Bitmap`] as straight-alpha RGBA rows.
//!
//! The encoder and [`Bitmap::to_rgba8`] both go through [`row_source`], which
//! picks the cheapest reader for the bitmap's layout once instead of
//! dispatching per pixel.

use alloc::boxed::Box;

use crate::bitmap::{Bitmap, Palette};
use crate::pixel::PixelLayout;

/// Produces one row of straight RGBA at a time.
pub(crate) trait RowSource {
    /// Fill `out` (exactly `width * 4` bytes) with row `y`, top row 0.
    fn rgba_row(&self, y: usize, out: &mut [u8]);
}

struct IndexedRows<'a> {
    bitmap: &'a Bitmap,
    palette: &'a Palette,
}

impl RowSource for IndexedRows<'_> {
    fn rgba_row(&self, y: usize, out: &mut [u8]) {
        for (&index, px) in self.bitmap.row(y).iter().zip(out.chunks_exact_mut(4)) {
            // Out-of-range indices read as black.
            let c = self.palette.get(index).unwrap_or_default();
            px.copy_from_slice(&[c.r, c.g, c.b, u8::MAX]);
        }
    }
}

struct OpaqueRows<'a>(&'a Bitmap);

impl RowSource for OpaqueRows<'_> {
    fn rgba_row(&self, y: usize, out: &mut [u8]) {
        for (src, px) in self.0.row(y).chunks_exact(3).zip(out.chunks_exact_mut(4)) {
            px[..3].copy_from_slice(src);
            px[3] = u8::MAX;
        }
    }
}

/// Four-byte layouts with straight alpha; `bgr` swaps the colour order.
struct StraightRows<'a> {
    bitmap: &'a Bitmap,
    bgr: bool,
}

impl RowSource for StraightRows<'_> {
    fn rgba_row(&self, y: usize, out: &mut [u8]) {
        let row = self.bitmap.row(y);
        out.copy_from_slice(row);
        if self.bgr {
            for px in out.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
    }
}

struct PremultipliedRows<'a>(&'a Bitmap);

impl RowSource for PremultipliedRows<'_> {
    fn rgba_row(&self, y: usize, out: &mut [u8]) {
        for (src, px) in self.0.row(y).chunks_exact(4).zip(out.chunks_exact_mut(4)) {
            px.copy_from_slice(&unpremultiply([src[0], src[1], src[2], src[3]]));
        }
    }
}

/// Layouts with no fast path: decoded one pixel at a time.
struct GenericRows<'a>(&'a Bitmap);

impl RowSource for GenericRows<'_> {
    fn rgba_row(&self, y: usize, out: &mut [u8]) {
        let layout = self.0.layout();
        let bpp = layout.bytes_per_pixel();
        for (src, px) in self.0.row(y).chunks_exact(bpp).zip(out.chunks_exact_mut(4)) {
            let rgba = match layout {
                PixelLayout::Gray8 | PixelLayout::Indexed8 => [src[0], src[0], src[0], u8::MAX],
                PixelLayout::Bgr8 | PixelLayout::Bgrx8 => [src[2], src[1], src[0], u8::MAX],
                _ => [src[0], src[1], src[2], u8::MAX],
            };
            px.copy_from_slice(&rgba);
        }
    }
}

/// Recover straight colour from a premultiplied pixel.
///
/// Fully transparent pixels become all zero and fully opaque ones pass
/// through; everything else is divided back out at 16-bit precision.
pub(crate) fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0; 4],
        u8::MAX => [r, g, b, a],
        _ => {
            let a32 = u32::from(a);
            let un = |c: u8| ((u32::from(c) * 0xFFFF / a32) >> 8).min(255) as u8;
            [un(r), un(g), un(b), a]
        }
    }
}

/// Pick a row reader for `bitmap`'s layout.
pub(crate) fn row_source(bitmap: &Bitmap) -> Box<dyn RowSource + '_> {
    match (bitmap.layout(), bitmap.palette()) {
        (PixelLayout::Indexed8, Some(palette)) => Box::new(IndexedRows { bitmap, palette }),
        (PixelLayout::Rgb8, _) => Box::new(OpaqueRows(bitmap)),
        (PixelLayout::Rgba8, _) => Box::new(StraightRows { bitmap, bgr: false }),
        (PixelLayout::Bgra8, _) => Box::new(StraightRows { bitmap, bgr: true }),
        (PixelLayout::RgbaPremul8, _) => Box::new(PremultipliedRows(bitmap)),
        _ => Box::new(GenericRows(bitmap)),
    }
}
