//! Common error type returned by every public entry point in this crate
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Errors produced by the encode and decode pipelines
#[allow(clippy::module_name_repetitions)]
pub enum BitGrainError {
    /// A caller-supplied argument (quality, channel count, null buffer) is
    /// out of the accepted range
    InvalidArgument(String),
    /// Width/height are zero or exceed the configured limits
    DimensionsOutOfRange,
    /// The caller's output buffer is too small to hold the result
    BufferTooSmall {
        /// bytes required
        needed: usize,
        /// bytes the caller supplied
        available: usize
    },
    /// Wrong magic bytes or an unrecognized version byte
    MalformedHeader(String),
    /// The payload ran out of bytes before every declared block was decoded
    TruncatedPayload,
    /// A Huffman code, run length, or dequantized coefficient was invalid
    MalformedPayload(String),
    /// An internal transient buffer could not be obtained
    ///
    /// Unreachable in practice under safe Rust (a failed `Vec` allocation
    /// aborts the process rather than returning), kept for parity with the
    /// C ABI this codec was distilled from.
    AllocationFailed
}

impl Debug for BitGrainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(ref reason) => write!(f, "Invalid argument: {reason}"),
            Self::DimensionsOutOfRange => {
                write!(f, "Width/height are zero or exceed the codec's limits")
            }
            Self::BufferTooSmall { needed, available } => write!(
                f,
                "Output buffer too small: need {needed} bytes, got {available}"
            ),
            Self::MalformedHeader(ref reason) => write!(f, "Malformed .bg header: {reason}"),
            Self::TruncatedPayload => {
                write!(f, "Payload ran out of bytes before all blocks were decoded")
            }
            Self::MalformedPayload(ref reason) => {
                write!(f, "Malformed entropy-coded payload: {reason}")
            }
            Self::AllocationFailed => write!(f, "Could not obtain an internal transient buffer")
        }
    }
}

impl Display for BitGrainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Error for BitGrainError {}
