//! RLE4 / RLE8 decompression into a palette-index buffer.

use enough::Stop;
use log::debug;

use super::cursor::BitCursor;
use crate::error::BitmapError;
use crate::io::ByteSource;

/// One decoded opcode. Literal bytes of an absolute run borrow the
/// decoder's scratch buffer.
#[derive(Debug, PartialEq, Eq)]
enum RleOp<'b> {
    EndOfLine,
    EndOfBitmap,
    Delta { dx: u8, dy: u8 },
    Absolute { count: u8, packed: &'b [u8] },
    Encoded { count: u8, value: u8 },
}

fn invalid() -> BitmapError {
    BitmapError::InvalidData("invalid RLE data".into())
}

struct RleReader<'s, S: ?Sized> {
    src: &'s mut S,
    bits: u8,
    scratch: [u8; 256],
}

impl<'s, S: ByteSource + ?Sized> RleReader<'s, S> {
    fn pair(&mut self) -> Result<[u8; 2], BitmapError> {
        let mut pair = [0u8; 2];
        self.src.read_exact(&mut pair)?;
        Ok(pair)
    }

    fn next_op(&mut self) -> Result<RleOp<'_>, BitmapError> {
        let op = match self.pair()? {
            [0, 0] => RleOp::EndOfLine,
            [0, 1] => RleOp::EndOfBitmap,
            [0, 2] => {
                let [dx, dy] = self.pair()?;
                RleOp::Delta { dx, dy }
            }
            [0, count] => {
                // Literal runs are padded to a 16-bit boundary.
                let packed_len = (usize::from(count) * usize::from(self.bits)).div_ceil(8);
                let stored_len = packed_len.next_multiple_of(2);
                self.src.read_exact(&mut self.scratch[..stored_len])?;
                RleOp::Absolute {
                    count,
                    packed: &self.scratch[..packed_len],
                }
            }
            [count, value] => RleOp::Encoded { count, value },
        };
        Ok(op)
    }
}

/// Write position, image coordinates with row 0 at the top.
struct Pen {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl Pen {
    fn in_bounds(&self) -> bool {
        (0..self.width).contains(&self.x) && (0..self.height).contains(&self.y)
    }

    fn check(&self) -> Result<(), BitmapError> {
        if self.in_bounds() { Ok(()) } else { Err(invalid()) }
    }

    /// Store `index` under the pen and advance one column.
    fn put(&mut self, out: &mut [u8], index: u8) -> Result<(), BitmapError> {
        self.check()?;
        out[(self.y * self.width + self.x) as usize] = index;
        self.x += 1;
        Ok(())
    }
}

/// Decode an RLE stream of `bits` (4 or 8) per pixel into `out`, a packed
/// `width * height` index buffer, top row first.
///
/// Drawing starts at the bottom-left. Pixels the stream never reaches keep
/// their existing value (index 0 for a fresh buffer).
pub(crate) fn decode_rle<S: ByteSource + ?Sized>(
    src: &mut S,
    bits: u8,
    width: u32,
    height: u32,
    out: &mut [u8],
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    debug_assert!(matches!(bits, 4 | 8));
    let mut reader = RleReader {
        src,
        bits,
        scratch: [0; 256],
    };
    let mut pen = Pen {
        x: 0,
        y: i64::from(height) - 1,
        width: i64::from(width),
        height: i64::from(height),
    };

    let mut ops = 0u64;
    loop {
        ops += 1;
        if ops % 1024 == 0 {
            stop.check()?;
        }
        match reader.next_op()? {
            RleOp::EndOfLine => {
                pen.x = 0;
                pen.y -= 1;
                pen.check()?;
            }
            RleOp::EndOfBitmap => break,
            RleOp::Delta { dx, dy } => {
                pen.x += i64::from(dx);
                pen.y -= i64::from(dy);
                pen.check()?;
            }
            RleOp::Absolute { count, packed } => {
                let mut cursor = BitCursor::new(bits);
                for _ in 0..count {
                    pen.put(out, cursor.read(packed))?;
                }
            }
            RleOp::Encoded { count, value } => {
                let pattern = [value];
                let mut cursor = BitCursor::new(bits);
                for _ in 0..count {
                    pen.put(out, cursor.read_cycling(&pattern))?;
                }
            }
        }
    }
    debug!("RLE{bits} stream ended after {ops} opcodes at row {}", pen.y);
    Ok(())
}
