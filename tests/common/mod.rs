//! Hand-built BMP fixtures shared by the integration tests.
#![allow(dead_code)]

use zenbmp::{BitmapError, ByteSource};

/// Assembles a BMP file field by field, including deliberately broken ones.
#[derive(Clone, Debug)]
pub struct BmpBuilder {
    width: i32,
    height: i32,
    bpp: u16,
    planes: u16,
    compression: u32,
    dib_len: u32,
    colors_used: u32,
    palette: Vec<[u8; 3]>,
    masks: Option<([u32; 3], u32)>,
    offset: Option<u32>,
    data: Vec<u8>,
}

impl BmpBuilder {
    pub fn new(width: i32, height: i32, bpp: u16) -> Self {
        Self {
            width,
            height,
            bpp,
            planes: 1,
            compression: 0,
            dib_len: 40,
            colors_used: 0,
            palette: Vec::new(),
            masks: None,
            offset: None,
            data: Vec::new(),
        }
    }

    pub fn compression(mut self, c: u32) -> Self {
        self.compression = c;
        self
    }

    pub fn dib_len(mut self, len: u32) -> Self {
        self.dib_len = len;
        self
    }

    pub fn planes(mut self, planes: u16) -> Self {
        self.planes = planes;
        self
    }

    /// RGB entries; written as B, G, R, 0 with colours-used set to the count.
    pub fn palette(mut self, entries: &[[u8; 3]]) -> Self {
        self.palette = entries.to_vec();
        self.colors_used = entries.len() as u32;
        self
    }

    pub fn colors_used(mut self, n: u32) -> Self {
        self.colors_used = n;
        self
    }

    /// Switch to BI_BITFIELDS with the given masks. `alpha` only lands in the
    /// file for headers longer than 40 bytes.
    pub fn masks(mut self, rgb: [u32; 3], alpha: u32) -> Self {
        self.compression = 3;
        self.masks = Some((rgb, alpha));
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Pixel bytes exactly as stored, padding included.
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut dib = vec![0u8; self.dib_len as usize];
        dib[0..4].copy_from_slice(&self.dib_len.to_le_bytes());
        dib[4..8].copy_from_slice(&self.width.to_le_bytes());
        dib[8..12].copy_from_slice(&self.height.to_le_bytes());
        dib[12..14].copy_from_slice(&self.planes.to_le_bytes());
        dib[14..16].copy_from_slice(&self.bpp.to_le_bytes());
        dib[16..20].copy_from_slice(&self.compression.to_le_bytes());
        dib[20..24].copy_from_slice(&(self.data.len() as u32).to_le_bytes());
        dib[32..36].copy_from_slice(&self.colors_used.to_le_bytes());

        let mut mask_table = Vec::new();
        if let Some((rgb, alpha)) = self.masks {
            let mut fields: Vec<u8> = rgb.iter().flat_map(|m| m.to_le_bytes()).collect();
            if self.dib_len == 40 {
                mask_table = fields;
            } else {
                fields.extend_from_slice(&alpha.to_le_bytes());
                dib[40..56].copy_from_slice(&fields);
            }
        }

        let palette: Vec<u8> = self
            .palette
            .iter()
            .flat_map(|&[r, g, b]| [b, g, r, 0])
            .collect();
        let offset = self.offset.unwrap_or(
            14 + self.dib_len + mask_table.len() as u32 + palette.len() as u32,
        );
        let file_size = offset + self.data.len() as u32;

        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&dib);
        out.extend_from_slice(&mask_table);
        out.extend_from_slice(&palette);
        out.extend_from_slice(&self.data);
        out
    }
}

/// [`ByteSource`] over a slice that records how many bytes were requested.
pub struct CountingSource<'a> {
    data: &'a [u8],
    pub consumed: usize,
}

impl<'a> CountingSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, consumed: 0 }
    }
}

impl ByteSource for CountingSource<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError> {
        let end = self.consumed + buf.len();
        let src = self
            .data
            .get(self.consumed..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        buf.copy_from_slice(src);
        self.consumed = end;
        Ok(())
    }
}

/// Deterministic RGBA noise with a mix of alpha values.
pub fn noise_rgba(w: usize, h: usize) -> Vec<u8> {
    let mut state = 0x2545_F491u32;
    (0..w * h * 4)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Opaque RGB checkerboard.
pub fn checkerboard_rgb(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                pixels.extend_from_slice(&[255, 0, 128]);
            } else {
                pixels.extend_from_slice(&[0, 200, 50]);
            }
        }
    }
    pixels
}
