//! Tagged value decoding.
//!
//! Every value in a vault carries a vendor type tag. Entry records store the
//! tag next to an explicit byte length; sub-record bodies use the compact
//! `{u32 tag, u64 word}` field where the word is either the value itself or,
//! for string-class tags, the length of the bytes that follow.
//!
//! Unrecognized tags never fail a decode: they surface as explicitly marked
//! unparsed nodes so one unknown field cannot blank out a valid tree.

use crate::cursor::{trim_nul_lossy, ByteCursor, OutOfBounds};
use crate::records::{self, guids, FieldDump, SubRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Vendor data-type tags used by value records and tagged fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DataType {
    UInt8 = 1,
    UInt16 = 2,
    UInt32 = 3,
    UInt64 = 4,
    Guid = 5,
    Temperature = 6,
    Binary = 7,
    String = 8,
    Unicode = 9,
    Int8 = 11,
    Int16 = 12,
    Int32 = 13,
    Int64 = 14,
    Register = 15,
    Ipv4 = 16,
    Ipv6 = 17,
    Pointer = 18,
    Enum = 19,
    Handle = 20,
    Void = 24,
    Power = 26,
    Qualifier = 28,
    Percent = 29,
    Instance = 30,
    Time = 31,
    Structure = 32,
    Dsp = 33,
    Blob = 34,
    Table = 35,
    Auto = 36,
    Xml = 38,
    Decibel = 39,
    Frequency = 40,
    Angle = 41,
    Json = 42,
}

impl DataType {
    /// Map a wire tag to its data type, if known.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            1 => Self::UInt8,
            2 => Self::UInt16,
            3 => Self::UInt32,
            4 => Self::UInt64,
            5 => Self::Guid,
            6 => Self::Temperature,
            7 => Self::Binary,
            8 => Self::String,
            9 => Self::Unicode,
            11 => Self::Int8,
            12 => Self::Int16,
            13 => Self::Int32,
            14 => Self::Int64,
            15 => Self::Register,
            16 => Self::Ipv4,
            17 => Self::Ipv6,
            18 => Self::Pointer,
            19 => Self::Enum,
            20 => Self::Handle,
            24 => Self::Void,
            26 => Self::Power,
            28 => Self::Qualifier,
            29 => Self::Percent,
            30 => Self::Instance,
            31 => Self::Time,
            32 => Self::Structure,
            33 => Self::Dsp,
            34 => Self::Blob,
            35 => Self::Table,
            36 => Self::Auto,
            38 => Self::Xml,
            39 => Self::Decibel,
            40 => Self::Frequency,
            41 => Self::Angle,
            42 => Self::Json,
            _ => return None,
        })
    }

    /// Tags whose tagged-field word is a byte length, with the bytes inline.
    pub fn carries_length(self) -> bool {
        matches!(
            self,
            Self::Guid
                | Self::Binary
                | Self::String
                | Self::Unicode
                | Self::Structure
                | Self::Dsp
                | Self::Blob
                | Self::Table
                | Self::Xml
                | Self::Json
        )
    }

    /// Tags decoded as plain unsigned numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Register
                | Self::Enum
                | Self::Handle
                | Self::Qualifier
                | Self::Power
                | Self::Percent
                | Self::Instance
                | Self::Time
                | Self::Decibel
                | Self::Frequency
                | Self::Angle
        )
    }

    /// Tags rendered as text.
    pub fn is_text(self) -> bool {
        matches!(self, Self::String | Self::Unicode | Self::Xml | Self::Json)
    }
}

/// Sentinel the firmware stores for "no reading".
const INVALID_TEMPERATURE: u32 = 0xFFFF_FFFF;
/// 0 °C in deci-Kelvin.
const DECI_KELVIN_OFFSET: i64 = 2732;

/// A temperature in tenths of a degree Celsius, or the firmware's explicit
/// invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperature {
    Tenths(i32),
    Invalid,
}

impl Temperature {
    /// Convert a raw deci-Kelvin reading.
    pub fn from_deci_kelvin(raw: u32) -> Self {
        if raw == INVALID_TEMPERATURE {
            Temperature::Invalid
        } else {
            Temperature::Tenths((i64::from(raw) - DECI_KELVIN_OFFSET) as i32)
        }
    }

    /// Convert a deci-Kelvin reading stored in a 64-bit field.
    ///
    /// Values past the 32-bit range cannot be real readings and collapse to
    /// the invalid marker.
    pub fn from_raw_u64(raw: u64) -> Self {
        match u32::try_from(raw) {
            Ok(raw) => Self::from_deci_kelvin(raw),
            Err(_) => Temperature::Invalid,
        }
    }

    /// Degrees Celsius, unless invalid.
    pub fn celsius(self) -> Option<f64> {
        match self {
            Temperature::Tenths(t) => Some(f64::from(t) / 10.0),
            Temperature::Invalid => None,
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperature::Tenths(t) => {
                let sign = if *t < 0 { "-" } else { "" };
                let t = t.unsigned_abs();
                write!(f, "{}{}.{}°C", sign, t / 10, t % 10)
            }
            Temperature::Invalid => write!(f, "Invalid"),
        }
    }
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One `{type, word}` field from a sub-record body.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedField<'a> {
    Number { tag: u32, value: u64 },
    Bytes { tag: u32, data: &'a [u8] },
}

impl<'a> TaggedField<'a> {
    /// Read the next field from the cursor.
    pub fn read(cur: &mut ByteCursor<'a>) -> Result<Self, OutOfBounds> {
        let tag = cur.read_u32_le()?;
        let value = cur.read_u64_le()?;
        let carries = DataType::from_tag(tag).is_some_and(DataType::carries_length);
        if carries {
            let data = cur.take_long(value)?;
            Ok(TaggedField::Bytes { tag, data })
        } else {
            Ok(TaggedField::Number { tag, value })
        }
    }

    pub fn tag(&self) -> u32 {
        match self {
            TaggedField::Number { tag, .. } | TaggedField::Bytes { tag, .. } => *tag,
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        DataType::from_tag(self.tag())
    }

    /// Numeric word, if this is a number field.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TaggedField::Number { value, .. } => Some(*value),
            TaggedField::Bytes { .. } => None,
        }
    }

    /// NUL-trimmed text, if this is a string-class field.
    pub fn as_str(&self) -> Option<String> {
        match self {
            TaggedField::Bytes { tag, data }
                if DataType::from_tag(*tag).is_some_and(DataType::is_text) =>
            {
                Some(trim_nul_lossy(data))
            }
            _ => None,
        }
    }
}

/// Largest unrecognized binary payload kept verbatim instead of being fed
/// through the generic field-dump fallback.
const SHORT_BINARY_MAX: usize = 0x30;
/// Preview bytes kept for values with unknown type tags.
pub(crate) const UNKNOWN_PREVIEW_MAX: usize = 255;

/// A decoded leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// Placeholder marker written for tombstone keys.
    Marker(bool),
    Integer(u64),
    Temperature(Temperature),
    Text(String),
    Bytes(Vec<u8>),
    /// A structured table payload.
    Record(SubRecord),
    /// Generic tagged-field dump of an unrecognized binary payload.
    Fields(FieldDump),
    /// Value with an unrecognized type tag, kept as an explicit unparsed node.
    Unknown {
        type_tag: u32,
        length: u32,
        preview: Vec<u8>,
    },
}

impl Serialize for EntryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryValue::Marker(b) => serializer.serialize_bool(*b),
            EntryValue::Integer(n) => serializer.serialize_u64(*n),
            EntryValue::Temperature(t) => t.serialize(serializer),
            EntryValue::Text(s) => serializer.serialize_str(s),
            EntryValue::Bytes(b) => serializer.serialize_str(&hex::encode(b)),
            EntryValue::Record(r) => r.serialize(serializer),
            EntryValue::Fields(d) => d.serialize(serializer),
            EntryValue::Unknown {
                type_tag,
                length,
                preview,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", type_tag)?;
                map.serialize_entry("length", length)?;
                map.serialize_entry("preview", &hex::encode(preview))?;
                map.end()
            }
        }
    }
}

/// Decode an entry-record value from its tag and length-prefixed payload.
///
/// Binary payloads reach this only when no sub-record decoder claimed them.
pub(crate) fn decode_value(tag: u32, payload: &[u8]) -> EntryValue {
    let Some(ty) = DataType::from_tag(tag) else {
        let keep = payload.len().min(UNKNOWN_PREVIEW_MAX);
        return EntryValue::Unknown {
            type_tag: tag,
            length: payload.len() as u32,
            preview: payload[..keep].to_vec(),
        };
    };
    match ty {
        DataType::Temperature => match payload.len() {
            4 => EntryValue::Temperature(Temperature::from_deci_kelvin(u32::from_le_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ]))),
            8 => EntryValue::Temperature(Temperature::from_raw_u64(u64::from_le_bytes([
                payload[0], payload[1], payload[2], payload[3], payload[4], payload[5], payload[6],
                payload[7],
            ]))),
            _ => EntryValue::Bytes(payload.to_vec()),
        },
        DataType::Guid => match guids::format_guid(payload) {
            Some(guid) => EntryValue::Text(guid),
            None => EntryValue::Bytes(payload.to_vec()),
        },
        ty if ty.is_text() => EntryValue::Text(trim_nul_lossy(payload)),
        ty if ty.is_numeric() => match payload.len() {
            1 => EntryValue::Integer(u64::from(payload[0])),
            2 => EntryValue::Integer(u64::from(u16::from_le_bytes([payload[0], payload[1]]))),
            4 => EntryValue::Integer(u64::from(u32::from_le_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ]))),
            8 => EntryValue::Integer(u64::from_le_bytes([
                payload[0], payload[1], payload[2], payload[3], payload[4], payload[5], payload[6],
                payload[7],
            ])),
            _ => EntryValue::Bytes(payload.to_vec()),
        },
        _ if payload.len() < SHORT_BINARY_MAX => EntryValue::Bytes(payload.to_vec()),
        _ => EntryValue::Fields(records::FieldDump::decode(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_from_tag() {
        assert_eq!(DataType::from_tag(3), Some(DataType::UInt32));
        assert_eq!(DataType::from_tag(7), Some(DataType::Binary));
        assert_eq!(DataType::from_tag(8), Some(DataType::String));
        assert_eq!(DataType::from_tag(0), None);
        assert_eq!(DataType::from_tag(999), None);
    }

    #[test]
    fn test_room_temperature_conversion() {
        // 298.2 K == 25.0 °C; the offset is exact, not a rounded constant
        assert_eq!(Temperature::from_deci_kelvin(2982), Temperature::Tenths(250));
        assert_eq!(Temperature::from_deci_kelvin(2982).celsius(), Some(25.0));
    }

    #[test]
    fn test_temperature_sentinel_is_invalid_marker() {
        assert_eq!(
            Temperature::from_deci_kelvin(0xFFFF_FFFF),
            Temperature::Invalid
        );
        assert_eq!(Temperature::from_deci_kelvin(0xFFFF_FFFF).celsius(), None);
    }

    #[test]
    fn test_temperature_display() {
        assert_eq!(Temperature::Tenths(250).to_string(), "25.0°C");
        assert_eq!(Temperature::Tenths(-2732).to_string(), "-273.2°C");
        assert_eq!(Temperature::Invalid.to_string(), "Invalid");
    }

    #[test]
    fn test_tagged_field_number() {
        let mut bytes = 4u32.to_le_bytes().to_vec(); // UINT64
        bytes.extend_from_slice(&0xDEADu64.to_le_bytes());
        let mut cur = ByteCursor::new(&bytes);

        let field = TaggedField::read(&mut cur).unwrap();
        assert_eq!(field.as_u64(), Some(0xDEAD));
        assert!(cur.is_empty());
    }

    #[test]
    fn test_tagged_field_string() {
        let mut bytes = 8u32.to_le_bytes().to_vec(); // STRING
        bytes.extend_from_slice(&4u64.to_le_bytes());
        bytes.extend_from_slice(b"CPU\0");
        let mut cur = ByteCursor::new(&bytes);

        let field = TaggedField::read(&mut cur).unwrap();
        assert_eq!(field.as_str().as_deref(), Some("CPU"));
        assert_eq!(field.as_u64(), None);
    }

    #[test]
    fn test_tagged_field_truncated_string() {
        let mut bytes = 8u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&100u64.to_le_bytes()); // length past the end
        bytes.extend_from_slice(b"short");
        let mut cur = ByteCursor::new(&bytes);
        assert!(TaggedField::read(&mut cur).is_err());
    }

    #[test]
    fn test_decode_value_widths() {
        assert_eq!(decode_value(3, &7u32.to_le_bytes()), EntryValue::Integer(7));
        assert_eq!(
            decode_value(4, &0x1_0000_0000u64.to_le_bytes()),
            EntryValue::Integer(0x1_0000_0000)
        );
        assert_eq!(decode_value(1, &[9]), EntryValue::Integer(9));
    }

    #[test]
    fn test_decode_value_text_trims_nul() {
        assert_eq!(
            decode_value(8, b"hello\0\0"),
            EntryValue::Text("hello".to_string())
        );
    }

    #[test]
    fn test_decode_value_unknown_tag_keeps_preview() {
        let payload = vec![0xAB; 600];
        let value = decode_value(0x7777, &payload);
        match value {
            EntryValue::Unknown {
                type_tag,
                length,
                preview,
            } => {
                assert_eq!(type_tag, 0x7777);
                assert_eq!(length, 600);
                assert_eq!(preview.len(), UNKNOWN_PREVIEW_MAX);
            }
            other => panic!("expected unknown node, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_value_short_binary_kept_raw() {
        let payload = [1u8, 2, 3, 4];
        assert_eq!(
            decode_value(7, &payload),
            EntryValue::Bytes(payload.to_vec())
        );
    }
}
