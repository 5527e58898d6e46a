//! Structured sub-record decoders.
//!
//! Some vault entries carry whole tables as opaque binary values; the leaf
//! name's prefix selects the decoder. Each table gates its layout on a
//! leading version field and, when the version or a record is not what it
//! expects, stops with what it already has instead of guessing.

mod conditions;
mod custom;
mod dump;
pub(crate) mod guids;
mod passive;
mod power;
mod targets;

pub use conditions::{ConditionClause, ConditionSet, ConditionTarget, DurationClause};
pub use custom::{CustomCondition, CustomConditionTable};
pub use dump::FieldDump;
pub use guids::FeatureGuidList;
pub use passive::{Limit, PassiveCoolingTable, PassiveEntry};
pub use power::PowerLimitTable;
pub use targets::{TargetDefinition, TargetTable};

use crate::cursor::ByteCursor;
use crate::value::TaggedField;
use serde::Serialize;

/// A decoded table payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubRecord {
    Targets(TargetTable),
    Conditions(ConditionSet),
    CustomConditions(CustomConditionTable),
    PowerLimits(PowerLimitTable),
    PassiveTable(PassiveCoolingTable),
    FeatureGuids(FeatureGuidList),
}

type RecordDecoder = fn(&[u8]) -> SubRecord;

/// Leaf-name prefixes with their table decoders, checked in order.
///
/// This table is the only state shared between decode calls and it never
/// changes at runtime.
const RECORD_DECODERS: &[(&str, RecordDecoder)] = &[
    ("/apat", |data| SubRecord::Targets(TargetTable::decode(data))),
    ("/apct", |data| {
        SubRecord::Conditions(ConditionSet::decode(data))
    }),
    ("/appc", |data| {
        SubRecord::CustomConditions(CustomConditionTable::decode(data))
    }),
    ("/ppcc", |data| {
        SubRecord::PowerLimits(PowerLimitTable::decode(data))
    }),
    ("/psvt", |data| {
        SubRecord::PassiveTable(PassiveCoolingTable::decode(data))
    }),
    ("/idsp", |data| {
        SubRecord::FeatureGuids(FeatureGuidList::decode(data))
    }),
];

/// Table decoder for a leaf segment, if its prefix matches.
///
/// Matching is case-sensitive and anchored at the start of the segment.
pub(crate) fn decoder_for(leaf: &str) -> Option<RecordDecoder> {
    let leaf = leaf.strip_prefix('/').unwrap_or(leaf);
    RECORD_DECODERS
        .iter()
        .find(|(prefix, _)| leaf.starts_with(&prefix[1..]))
        .map(|(_, decoder)| *decoder)
}

/// Next field as a number; `None` stops the enclosing record loop.
fn read_number(cur: &mut ByteCursor<'_>) -> Option<u64> {
    TaggedField::read(cur).ok()?.as_u64()
}

/// Next field as text; `None` stops the enclosing record loop.
fn read_text(cur: &mut ByteCursor<'_>) -> Option<String> {
    TaggedField::read(cur).ok()?.as_str()
}

#[cfg(test)]
pub(crate) mod testenc {
    //! Wire-format field encoders shared by the record tests.

    use crate::value::DataType;

    pub fn num_field(tag: DataType, value: u64) -> Vec<u8> {
        let mut out = (tag as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&value.to_le_bytes());
        out
    }

    pub fn u64_field(value: u64) -> Vec<u8> {
        num_field(DataType::UInt64, value)
    }

    pub fn str_field(text: &str) -> Vec<u8> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let mut out = (DataType::String as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&bytes);
        out
    }

    pub fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
        parts.concat()
    }
}
