use thiserror::Error;

/// Failures raised while building a compressed frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("input buffer of {0} bytes cannot hold a frame header")]
    HeaderTooShort(usize),

    #[error("payload of {0} bytes exceeds the 16-bit frame size limit")]
    PayloadTooLarge(usize),
}

/// Failures raised while decoding a frame or its token stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressionError {
    #[error("input buffer of {0} bytes cannot hold a frame header")]
    HeaderTooShort(usize),

    #[error("unexpected end of token stream")]
    UnexpectedEof,

    #[error("back-reference of {distance} bytes at output position {position} reaches before the stream start")]
    InvalidOffset { distance: usize, position: usize },

    #[error("decoded {actual} bytes where the header promised {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
