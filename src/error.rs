use alloc::string::String;
use enough::StopReason;

/// Errors from BMP decoding and encoding.
///
/// Input problems fall into two classes, see [`BitmapError::is_malformed`]
/// and [`BitmapError::is_unsupported`]. Everything else is an I/O, resource
/// or caller error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("invalid format: not a BMP file")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported feature: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BitmapError {
    /// The input breaks a structural rule of the format and can never decode.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedFormat | Self::InvalidHeader(_) | Self::InvalidData(_)
        )
    }

    /// The input is well-formed but uses a feature this codec does not implement.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedVariant(_))
    }
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
