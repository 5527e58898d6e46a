//! Generic tagged-field fallback for unrecognized binary payloads.
//!
//! When a binary value matches no table prefix, its body is still usually a
//! run of tagged fields. Decoding them under synthetic names keeps the data
//! inspectable without pretending to know what it means.

use super::guids;
use crate::cursor::{trim_nul_lossy, ByteCursor};
use crate::value::{DataType, EntryValue, TaggedField, Temperature, UNKNOWN_PREVIEW_MAX};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Name→value dump of sequential tagged fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDump {
    pub fields: Vec<(String, EntryValue)>,
    /// Preview of the bytes left behind when an unrecognized tag stopped
    /// the loop.
    pub trailing: Option<Vec<u8>>,
}

impl FieldDump {
    /// Decode fields until the payload is exhausted or a tag is not
    /// recognized; an unknown tag makes the remaining length unknowable,
    /// so the loop stops and keeps a bounded preview of the rest.
    pub fn decode(payload: &[u8]) -> Self {
        let mut cur = ByteCursor::new(payload);
        let mut dump = FieldDump::default();
        let mut index = 0usize;
        while !cur.is_empty() {
            let rest = cur.remaining_bytes();
            let value = TaggedField::read(&mut cur).ok().and_then(|f| field_value(&f));
            let Some(value) = value else {
                let keep = rest.len().min(UNKNOWN_PREVIEW_MAX);
                dump.trailing = Some(rest[..keep].to_vec());
                break;
            };
            dump.fields.push((format!("field{index}"), value));
            index += 1;
        }
        dump
    }
}

fn field_value(field: &TaggedField<'_>) -> Option<EntryValue> {
    let ty = field.data_type()?;
    Some(match (ty, field) {
        (DataType::Temperature, TaggedField::Number { value, .. }) => {
            EntryValue::Temperature(Temperature::from_raw_u64(*value))
        }
        (DataType::Guid, TaggedField::Bytes { data, .. }) if data.len() >= 16 => {
            EntryValue::Text(guids::format_guid(data)?)
        }
        (_, TaggedField::Bytes { data, .. }) if ty.is_text() => {
            EntryValue::Text(trim_nul_lossy(data))
        }
        (_, TaggedField::Bytes { data, .. }) => EntryValue::Bytes(data.to_vec()),
        (_, TaggedField::Number { value, .. }) => EntryValue::Integer(*value),
    })
}

impl Serialize for FieldDump {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.trailing.is_some());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        if let Some(trailing) = &self.trailing {
            map.serialize_entry("trailing", &hex::encode(trailing))?;
        }
        map.end()
    }
}
