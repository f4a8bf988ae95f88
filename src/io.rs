//! Byte-level I/O primitives.
//!
//! The codec only ever needs "read exactly N bytes" and "write all of these
//! bytes", strictly forward. [`ByteSource`] and [`ByteSink`] are those two
//! operations; anything that can provide them can be decoded from or encoded
//! into.

use alloc::vec::Vec;

use crate::error::BitmapError;

/// Forward-only byte input.
pub trait ByteSource {
    /// Fill `buf` completely.
    ///
    /// Running out of input before `buf` is full must be reported as
    /// [`BitmapError::UnexpectedEof`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError>;
}

/// Forward-only byte output.
pub trait ByteSink {
    /// Write all of `buf`. Errors from the underlying sink are returned as-is.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), BitmapError>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError> {
        (**self).read_exact(buf)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        (**self).write_all(buf)
    }
}

/// [`ByteSource`] over an in-memory buffer.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or(BitmapError::UnexpectedEof)?;
        let src = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// [`ByteSource`] over any [`std::io::Read`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError> {
        self.0.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                BitmapError::UnexpectedEof
            } else {
                BitmapError::Io(e)
            }
        })
    }
}

/// [`ByteSink`] over any [`std::io::Write`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for IoSink<W> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        self.0.write_all(buf)?;
        Ok(())
    }
}
