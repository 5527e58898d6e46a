//! Supported-feature GUID lists (`/idsp` payloads and the standalone
//! firmware feature buffer).
//!
//! The firmware stores GUIDs mixed-endian: the first three groups in native
//! little-endian order, the trailing eight bytes as-is. An all-zero record
//! is the firmware's null entry and contributes nothing.

use crate::cursor::ByteCursor;
use crate::value::{DataType, TaggedField};
use serde::Serialize;
use uuid::Uuid;

/// Ordered list of feature GUIDs in canonical uppercase form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureGuidList {
    pub guids: Vec<String>,
}

impl FeatureGuidList {
    /// Decode an in-vault `/idsp` payload: tagged GUID records.
    ///
    /// A record that is not a GUID field, or is shorter than 16 bytes,
    /// ends the list rather than failing it.
    pub fn decode(payload: &[u8]) -> Self {
        let mut cur = ByteCursor::new(payload);
        let mut list = FeatureGuidList::default();
        while !cur.is_empty() {
            let Ok(TaggedField::Bytes { tag, data }) = TaggedField::read(&mut cur) else {
                break;
            };
            if DataType::from_tag(tag) != Some(DataType::Guid) || data.len() < 16 {
                break;
            }
            list.push_guid(&data[..16]);
        }
        list
    }

    /// Decode the standalone firmware feature buffer: consecutive raw
    /// 16-byte records. A trailing partial record is dropped.
    pub fn from_raw(data: &[u8]) -> Self {
        let mut list = FeatureGuidList::default();
        for chunk in data.chunks_exact(16) {
            list.push_guid(chunk);
        }
        list
    }

    fn push_guid(&mut self, bytes: &[u8]) {
        if bytes.iter().all(|&b| b == 0) {
            return; // null entry
        }
        if let Some(guid) = format_guid(bytes) {
            self.guids.push(guid);
        }
    }
}

/// Render 16 mixed-endian bytes as a canonical uppercase GUID string.
pub(crate) fn format_guid(bytes: &[u8]) -> Option<String> {
    let raw: [u8; 16] = bytes.get(..16)?.try_into().ok()?;
    let uuid = Uuid::from_bytes_le(raw);
    let mut buf = Uuid::encode_buffer();
    Some(uuid.hyphenated().encode_upper(&mut buf).to_string())
}
