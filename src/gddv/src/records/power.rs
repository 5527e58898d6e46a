//! Power-limit capability table (`/ppcc` payloads).
//!
//! The only table without a version gate: a run of tagged u64 fields where
//! positions 2 through 6 are the power-limit capabilities and positions 0
//! and 1 are reserved words. Firmware revisions append extra fields past
//! the known layout; those are kept under sequential names.

use super::read_number;
use crate::cursor::ByteCursor;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// First field index past the known layout.
const KNOWN_FIELDS: usize = 7;

/// Named positions of the known fields.
const FIELD_NAMES: [(usize, &str); 5] = [
    (2, "power_limit_min"),
    (3, "power_limit_max"),
    (4, "time_window_min"),
    (5, "time_window_max"),
    (6, "step_size"),
];

/// Power-limit capabilities, kept in raw wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerLimitTable {
    /// Field values in wire order; indexes 0 and 1 are reserved words.
    pub fields: Vec<u64>,
}

impl PowerLimitTable {
    /// Decode a power-limit payload. Fields that are absent stay absent;
    /// nothing is zero-filled.
    pub fn decode(data: &[u8]) -> Self {
        let mut cur = ByteCursor::new(data);
        let mut fields = Vec::new();
        while !cur.is_empty() {
            let Some(value) = read_number(&mut cur) else {
                break;
            };
            fields.push(value);
        }
        PowerLimitTable { fields }
    }

    pub fn power_limit_min(&self) -> Option<u64> {
        self.fields.get(2).copied()
    }

    pub fn power_limit_max(&self) -> Option<u64> {
        self.fields.get(3).copied()
    }

    pub fn time_window_min(&self) -> Option<u64> {
        self.fields.get(4).copied()
    }

    pub fn time_window_max(&self) -> Option<u64> {
        self.fields.get(5).copied()
    }

    pub fn step_size(&self) -> Option<u64> {
        self.fields.get(6).copied()
    }

    /// Fields past the known layout.
    pub fn overflow(&self) -> &[u64] {
        self.fields.get(KNOWN_FIELDS..).unwrap_or(&[])
    }
}

impl Serialize for PowerLimitTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (index, name) in FIELD_NAMES {
            if let Some(value) = self.fields.get(index) {
                map.serialize_entry(name, value)?;
            }
        }
        for (index, value) in self.fields.iter().enumerate().skip(KNOWN_FIELDS) {
            map.serialize_entry(&format!("field{index}"), value)?;
        }
        map.end()
    }
}
