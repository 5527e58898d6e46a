//! Container parsing: header recognition, payload decompression, and the
//! key/value entry stream.
//!
//! Two container generations exist. Version 1 is a 12-byte header followed
//! directly by entry records. Version 2 adds a segment name, a comment, a
//! payload SHA-256, and explicit payload sizing; its payload is either an
//! LZMA stream holding a whole nested blob, or a run of sub-blobs that each
//! open with a two-byte marker.

use crate::compress;
use crate::cursor::{trim_nul_lossy, ByteCursor};
use crate::error::DecodeError;
use crate::records;
use crate::tree::{Entry, EntryTree};
use crate::value::{self, DataType, EntryValue};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Container magic at offset 0.
pub const HEADER_SIGNATURE: u16 = 0x1FE5;
/// Marker opening an item-keys section inside a version-2 payload stream.
pub const ITEM_KEYS_SIGNATURE: u16 = 0xA0D8;
/// Flag bit marking a compressed version-2 payload.
pub const COMPRESSED_PAYLOAD: u32 = 0x4000_0000;

/// Fixed size of the version-2 header.
pub const V2_HEADER_SIZE: usize = 148;

const SEGMENT_ID_LEN: usize = 32;
const COMMENT_LEN: usize = 64;
const PAYLOAD_HASH_LEN: usize = 32;
/// Path keys carry this flag; anything else marks a placeholder entry.
const KEY_FLAG_PATH: u32 = 1;
/// How many nested compressed payloads to follow before giving up. Real
/// vaults nest once; an attacker-built blob must not loop the decoder.
const MAX_RESTART_DEPTH: u32 = 8;

/// Container format version word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u16,
}

impl FormatVersion {
    fn from_word(word: u32) -> Self {
        Self {
            major: (word >> 24) as u8,
            minor: (word >> 16) as u8,
            revision: word as u16,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Extended header fields present from major version 2 on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct V2Header {
    pub segment_id: String,
    pub comment: String,
    #[serde(serialize_with = "ser_hex")]
    pub payload_hash: [u8; PAYLOAD_HASH_LEN],
    pub payload_size: u32,
    #[serde(serialize_with = "ser_tag")]
    pub payload_class: [u8; 4],
}

impl V2Header {
    /// Payload class as text, e.g. `KEYS`.
    pub fn payload_class_str(&self) -> String {
        trim_nul_lossy(&self.payload_class)
    }
}

fn ser_hex<S: Serializer>(bytes: &[u8; PAYLOAD_HASH_LEN], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}

fn ser_tag<S: Serializer>(tag: &[u8; 4], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&trim_nul_lossy(tag))
}

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerHeader {
    pub signature: u16,
    pub header_size: u16,
    pub version: FormatVersion,
    pub flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v2: Option<V2Header>,
}

impl ContainerHeader {
    pub fn is_compressed(&self) -> bool {
        self.v2.is_some() && self.flags & COMPRESSED_PAYLOAD != 0
    }

    /// Check the stored payload hash against the actual payload bytes.
    /// `None` for version-1 headers, which carry no hash.
    pub fn verify_payload_hash(&self, payload: &[u8]) -> Option<bool> {
        let v2 = self.v2.as_ref()?;
        Some(Sha256::digest(payload)[..] == v2.payload_hash)
    }
}

/// Fully decoded vault.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataVault {
    /// The outermost container's header. Nested and decompressed headers
    /// are validated but only their entries are merged into the tree.
    pub header: ContainerHeader,
    pub entries: EntryTree,
    /// Set when the entry stream was cut mid-record; `entries` then holds
    /// everything decoded before the cut.
    #[serde(skip)]
    pub truncation: Option<DecodeError>,
}

/// Parse just the container header of a blob.
pub fn read_header(buf: &[u8]) -> Result<ContainerHeader, DecodeError> {
    parse_header(buf, true)
}

/// Decode a firmware policy blob.
///
/// Header-level problems (signature, sizes, versions, decompression) fail
/// the whole decode and yield no tree. Once the entry stream starts,
/// malformed entries degrade to explicitly marked raw or partial nodes;
/// only a record running past the end of the buffer stops decoding, and
/// everything before the cut is still returned.
pub fn decode(buf: &[u8]) -> Result<DataVault, DecodeError> {
    let header = parse_header(buf, true)?;
    let mut entries = EntryTree::new();
    let truncation = decode_blob(buf, &header, &mut entries, 0)?;
    Ok(DataVault {
        header,
        entries,
        truncation,
    })
}

/// Parse a header at the start of `buf`.
///
/// Top-level blobs (`exact`) must account for the whole buffer; a nested
/// sub-blob only has to fit inside what is left of its parent's payload.
fn parse_header(buf: &[u8], exact: bool) -> Result<ContainerHeader, DecodeError> {
    let mut cur = ByteCursor::new(buf);
    let signature = cur.read_u16_le()?;
    if signature != HEADER_SIGNATURE {
        return Err(DecodeError::BadSignature(signature));
    }
    let header_size = cur.read_u16_le()?;
    let version = FormatVersion::from_word(cur.read_u32_le()?);
    let flags = cur.read_u32_le()?;

    match version.major {
        0 | 1 => {
            if usize::from(header_size) > buf.len() {
                return Err(DecodeError::SizeMismatch {
                    what: "v1 header size past end of buffer",
                    expected: buf.len(),
                    actual: usize::from(header_size),
                });
            }
            Ok(ContainerHeader {
                signature,
                header_size,
                version,
                flags,
                v2: None,
            })
        }
        2 => {
            if usize::from(header_size) != V2_HEADER_SIZE {
                return Err(DecodeError::SizeMismatch {
                    what: "v2 header size",
                    expected: V2_HEADER_SIZE,
                    actual: usize::from(header_size),
                });
            }
            let segment_id = cur.read_fixed_str(SEGMENT_ID_LEN)?;
            let comment = cur.read_fixed_str(COMMENT_LEN)?;
            let mut payload_hash = [0u8; PAYLOAD_HASH_LEN];
            payload_hash.copy_from_slice(cur.take(PAYLOAD_HASH_LEN)?);
            let payload_size = cur.read_u32_le()?;
            let mut payload_class = [0u8; 4];
            payload_class.copy_from_slice(cur.take(4)?);

            let available = buf.len() - V2_HEADER_SIZE;
            let claimed = payload_size as usize;
            if claimed > available || (exact && claimed != available) {
                return Err(DecodeError::SizeMismatch {
                    what: "v2 payload size",
                    expected: available,
                    actual: claimed,
                });
            }
            Ok(ContainerHeader {
                signature,
                header_size,
                version,
                flags,
                v2: Some(V2Header {
                    segment_id,
                    comment,
                    payload_hash,
                    payload_size,
                    payload_class,
                }),
            })
        }
        major => Err(DecodeError::UnsupportedVersion {
            major,
            minor: version.minor,
        }),
    }
}

/// Decode the body of a parsed blob into `entries`.
///
/// Returns the truncation error when the entry stream ended mid-record.
fn decode_blob(
    buf: &[u8],
    header: &ContainerHeader,
    entries: &mut EntryTree,
    depth: u32,
) -> Result<Option<DecodeError>, DecodeError> {
    let Some(v2) = &header.v2 else {
        return Ok(decode_entries(&buf[usize::from(header.header_size)..], entries).err());
    };

    let payload = &buf[V2_HEADER_SIZE..];
    if header.verify_payload_hash(payload) == Some(false) {
        log::warn!(
            "payload hash mismatch in segment {:?}, decoding anyway",
            v2.segment_id
        );
    }

    if header.is_compressed() {
        if depth >= MAX_RESTART_DEPTH {
            return Err(DecodeError::DecompressionFailed(
                "too many nested compressed payloads".into(),
            ));
        }
        // The inflated buffer opens with its own full header; restart
        // against it as if it were the original input.
        let inflated = compress::decompress(payload)?;
        let inner = parse_header(&inflated, true)?;
        return decode_blob(&inflated, &inner, entries, depth + 1);
    }

    decode_stream(payload, entries, depth)
}

/// Walk the consecutive sub-blobs of an uncompressed version-2 payload.
///
/// An unsupported marker or an undecodable nested blob stops the walk with
/// a diagnostic; material decoded before it is kept.
fn decode_stream(
    payload: &[u8],
    entries: &mut EntryTree,
    depth: u32,
) -> Result<Option<DecodeError>, DecodeError> {
    let mut offset = 0usize;
    while offset + 2 <= payload.len() {
        let rest = &payload[offset..];
        let marker = u16::from_le_bytes([rest[0], rest[1]]);

        if marker == ITEM_KEYS_SIGNATURE {
            // Item-keys sections carry no length; they run to the end.
            return Ok(decode_entries(&rest[2..], entries).err());
        }
        if marker != HEADER_SIGNATURE {
            log::warn!("unsupported sub-blob marker 0x{marker:04x} at payload offset {offset}");
            break;
        }

        let nested = match parse_header(rest, false) {
            Ok(header) => header,
            Err(err) => {
                log::warn!("nested blob at payload offset {offset} not decoded: {err}");
                break;
            }
        };
        let extent = match &nested.v2 {
            Some(v2) => V2_HEADER_SIZE + v2.payload_size as usize,
            // v1 blobs carry no payload size; they consume the rest.
            None => rest.len(),
        };
        match decode_blob(&rest[..extent], &nested, entries, depth + 1) {
            Ok(None) => {}
            // A cut inside the nested blob ends the whole stream.
            Ok(some_truncation) => return Ok(some_truncation),
            Err(err) => {
                log::warn!("nested blob at payload offset {offset} not decoded: {err}");
                break;
            }
        }
        offset += extent;
    }
    Ok(None)
}

/// Decode consecutive key/value records into the tree.
fn decode_entries(body: &[u8], entries: &mut EntryTree) -> Result<(), DecodeError> {
    let mut cur = ByteCursor::new(body);
    while !cur.is_empty() {
        decode_entry(&mut cur, entries)?;
    }
    Ok(())
}

/// One key record and its value record.
fn decode_entry(cur: &mut ByteCursor<'_>, entries: &mut EntryTree) -> Result<(), DecodeError> {
    let key_flag = cur.read_u32_le()?;
    let key_len = cur.read_u32_le()?;
    let name = trim_nul_lossy(cur.take_long(u64::from(key_len))?);

    let value_flag = cur.read_u32_le()?;
    let value_len = cur.read_u32_le()?;
    let payload = cur.take_long(u64::from(value_len))?;

    if key_flag != KEY_FLAG_PATH {
        // Firmware writes placeholder entries under non-path key flags;
        // they decode to a literal false marker, not a hierarchy.
        entries.insert(name, Entry::Value(EntryValue::Marker(false)));
        return Ok(());
    }

    let leaf = name.rsplit('/').next().unwrap_or(&name);
    let entry_value = if value_flag == DataType::Binary as u32 {
        match records::decoder_for(leaf) {
            Some(decoder) => EntryValue::Record(decoder(payload)),
            None => value::decode_value(value_flag, payload),
        }
    } else {
        value::decode_value(value_flag, payload)
    };

    let node = entries.resolve_path(&name);
    node.insert(name, Entry::Value(entry_value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_word(major: u8, minor: u8, revision: u16) -> u32 {
        (u32::from(major) << 24) | (u32::from(minor) << 16) | u32::from(revision)
    }

    fn v1_blob(body: &[u8]) -> Vec<u8> {
        let mut blob = Vec::new();
        blob.extend_from_slice(&HEADER_SIGNATURE.to_le_bytes());
        blob.extend_from_slice(&12u16.to_le_bytes());
        blob.extend_from_slice(&version_word(1, 0, 0).to_le_bytes());
        blob.extend_from_slice(&0u32.to_le_bytes());
        blob.extend_from_slice(body);
        blob
    }

    #[test]
    fn test_version_word_split() {
        let v = FormatVersion::from_word(0x0201_0003);
        assert_eq!(v.major, 2);
        assert_eq!(v.minor, 1);
        assert_eq!(v.revision, 3);
        assert_eq!(v.to_string(), "2.1.3");
    }

    #[test]
    fn test_bad_signature_rejected() {
        let mut blob = v1_blob(&[]);
        blob[0] = 0x00;
        assert!(matches!(
            decode(&blob),
            Err(DecodeError::BadSignature(0x1F00))
        ));
    }

    #[test]
    fn test_unsupported_major_version() {
        let mut blob = v1_blob(&[]);
        blob[4..8].copy_from_slice(&version_word(3, 1, 0).to_le_bytes());
        assert!(matches!(
            decode(&blob),
            Err(DecodeError::UnsupportedVersion { major: 3, minor: 1 })
        ));
    }

    #[test]
    fn test_v1_header_size_past_buffer() {
        let mut blob = v1_blob(&[]);
        blob[2..4].copy_from_slice(&64u16.to_le_bytes());
        assert!(matches!(
            decode(&blob),
            Err(DecodeError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decode(&[0xE5, 0x1F, 0x0C]),
            Err(DecodeError::Truncated(_))
        ));
    }
}
