//! Error types for matrix construction, the multiply kernel and the wire codec.

use thiserror::Error;

/// Errors raised by [`Matrix`](crate::Matrix) construction and the kernel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("matrix shape {rows}x{cols} does not match {len} elements")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("cannot stack blocks: expected {expected} {axis}, block {index} has {found}")]
    StackMismatch {
        axis: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("range {start}..{end} out of bounds for {len} {axis}")]
    OutOfBounds {
        axis: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Errors raised while reading or writing a frame.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("truncated frame: expected {expected} bytes, connection closed after {received}")]
    TruncatedFrame { expected: usize, received: usize },

    #[error("frame of {len} bytes exceeds limit {limit}")]
    FrameTooLarge { len: u64, limit: u64 },

    #[error("decode failure: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for WireError {
    fn from(err: Error) -> Self {
        WireError::Malformed(err.to_string())
    }
}
