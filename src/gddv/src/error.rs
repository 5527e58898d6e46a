//! Decode error taxonomy.

use crate::cursor::OutOfBounds;
use thiserror::Error;

/// Errors that can occur while decoding a vault blob.
///
/// Header-level variants (`BadSignature`, `SizeMismatch`,
/// `UnsupportedVersion`, `DecompressionFailed`, `OutputTooLarge`) abort the
/// whole decode. `Truncated` ends the entry stream but everything decoded
/// before the cut is still returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("bad container signature 0x{0:04x}")]
    BadSignature(u16),

    #[error("{what}: expected {expected}, found {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported container version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("truncated record: {0}")]
    Truncated(#[from] OutOfBounds),

    #[error("payload decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("declared decompressed size of {0} bytes is too large")]
    OutputTooLarge(u64),
}
