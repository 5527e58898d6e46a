//! Passive-cooling table (`/psvt` payloads).

use super::{read_number, read_text};
use crate::cursor::ByteCursor;
use crate::value::{TaggedField, Temperature};
use serde::Serialize;

/// Layout revision this decoder understands.
const SUPPORTED_VERSION: u64 = 2;

/// Ordered passive-cooling relationships between a heat source and the
/// device that throttles it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassiveCoolingTable {
    pub version: u64,
    pub entries: Vec<PassiveEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassiveEntry {
    pub source: String,
    pub target: String,
    pub priority: u64,
    pub sample_period: u64,
    pub temperature: Temperature,
    pub domain: u64,
    pub control_knob: u64,
    pub limit: Limit,
    pub step_size: u64,
    pub limit_coeff: u64,
    pub unlimit_coeff: u64,
}

/// Throttle limit: a control-knob value or a named state like `MAX`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Limit {
    Value(u64),
    Text(String),
}

impl PassiveCoolingTable {
    /// Decode a passive-cooling payload.
    pub fn decode(data: &[u8]) -> Self {
        let mut cur = ByteCursor::new(data);
        let version = read_number(&mut cur).unwrap_or(0);
        let mut table = PassiveCoolingTable {
            version,
            entries: Vec::new(),
        };
        if version != SUPPORTED_VERSION {
            return table;
        }
        while !cur.is_empty() {
            let Some(entry) = read_entry(&mut cur) else {
                break;
            };
            table.entries.push(entry);
        }
        table
    }
}

fn read_entry(cur: &mut ByteCursor<'_>) -> Option<PassiveEntry> {
    let source = read_text(cur)?;
    let target = read_text(cur)?;
    let priority = read_number(cur)?;
    let sample_period = read_number(cur)?;
    let temperature = Temperature::from_raw_u64(read_number(cur)?);
    let domain = read_number(cur)?;
    let control_knob = read_number(cur)?;
    let limit = match TaggedField::read(cur).ok()? {
        field @ TaggedField::Bytes { .. } => Limit::Text(field.as_str()?),
        TaggedField::Number { value, .. } => Limit::Value(value),
    };
    let step_size = read_number(cur)?;
    let limit_coeff = read_number(cur)?;
    let unlimit_coeff = read_number(cur)?;
    read_number(cur)?; // reserved trailing word

    Some(PassiveEntry {
        source,
        target,
        priority,
        sample_period,
        temperature,
        domain,
        control_knob,
        limit,
        step_size,
        limit_coeff,
        unlimit_coeff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testenc::{concat, str_field, u64_field};

    fn entry(source: &str, target: &str, temp: u64, limit: Vec<u8>) -> Vec<u8> {
        concat(&[
            str_field(source),
            str_field(target),
            u64_field(1),    // priority
            u64_field(5000), // sample period
            u64_field(temp),
            u64_field(0),  // domain
            u64_field(9),  // control knob
            limit,
            u64_field(2),  // step size
            u64_field(40), // limit coeff
            u64_field(10), // unlimit coeff
            u64_field(0),  // reserved
        ])
    }

    #[test]
    fn test_decode_numeric_and_text_limits() {
        let payload = concat(&[
            u64_field(2),
            entry("\\_SB_.PC00.TCPU", "SEN1", 3230, u64_field(75)),
            entry("\\_SB_.PC00.TCPU", "SEN2", 3031, str_field("MAX")),
        ]);
        let table = PassiveCoolingTable::decode(&payload);

        assert_eq!(table.version, 2);
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].limit, Limit::Value(75));
        assert_eq!(table.entries[0].temperature, Temperature::Tenths(498));
        assert_eq!(table.entries[1].limit, Limit::Text("MAX".to_string()));
        assert_eq!(table.entries[1].temperature, Temperature::Tenths(299));
    }

    #[test]
    fn test_version_gate() {
        let payload = concat(&[u64_field(1), entry("a", "b", 3000, u64_field(1))]);
        let table = PassiveCoolingTable::decode(&payload);
        assert_eq!(table.version, 1);
        assert!(table.entries.is_empty());
    }

    #[test]
    fn test_sentinel_temperature() {
        let payload = concat(&[
            u64_field(2),
            entry("src", "tgt", 0xFFFF_FFFF, u64_field(1)),
        ]);
        let table = PassiveCoolingTable::decode(&payload);
        assert_eq!(table.entries[0].temperature, Temperature::Invalid);
    }
}
