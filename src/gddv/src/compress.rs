//! Compressed payload inflation.
//!
//! Compressed vault payloads are LZMA-alone streams. Their 13-byte header
//! (5 property bytes plus a u64 size word) reports the destination size up
//! front, so inflation runs in two passes: probe the declared size, then
//! decompress into a buffer of exactly that size and verify the result.

use crate::error::DecodeError;
use lzma_rs::decompress::{Options, UnpackedSize};

/// LZMA-alone header length: property bytes plus the declared-size word.
const STREAM_HEADER_LEN: usize = 13;
/// Size word written by encoders that stream without knowing the final
/// size. Vault payloads always declare theirs.
const UNDECLARED_SIZE: u64 = u64::MAX;
/// Upper bound on the declared size. Real vaults are tens of KiB; anything
/// near this bound is attacker-directed allocation, not configuration.
const MAX_DECLARED_SIZE: u64 = 256 * 1024 * 1024;

/// Declared decompressed size of an LZMA-alone stream.
pub fn declared_size(payload: &[u8]) -> Result<u64, DecodeError> {
    let word = payload
        .get(5..STREAM_HEADER_LEN)
        .and_then(|b| <[u8; 8]>::try_from(b).ok())
        .ok_or_else(|| DecodeError::DecompressionFailed("stream header too short".into()))?;
    let size = u64::from_le_bytes(word);
    if size == UNDECLARED_SIZE {
        return Err(DecodeError::DecompressionFailed(
            "stream does not declare its decompressed size".into(),
        ));
    }
    Ok(size)
}

/// Inflate a compressed payload into a fresh buffer.
pub fn decompress(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let declared = declared_size(payload)?;
    if declared > MAX_DECLARED_SIZE || usize::try_from(declared).is_err() {
        return Err(DecodeError::OutputTooLarge(declared));
    }

    let mut output = Vec::with_capacity(declared as usize);
    let options = Options {
        unpacked_size: UnpackedSize::ReadHeaderButUseProvided(Some(declared)),
        ..Options::default()
    };
    lzma_rs::lzma_decompress_with_options(&mut &payload[..], &mut output, &options)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    if output.len() as u64 != declared {
        return Err(DecodeError::DecompressionFailed(format!(
            "expected {declared} bytes, produced {}",
            output.len()
        )));
    }
    Ok(output)
}
