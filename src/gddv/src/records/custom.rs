//! Custom-condition table (`/appc` payloads).
//!
//! Maps OEM-defined condition codes onto named virtual sensors so condition
//! sets can reference them like built-in condition kinds.

use super::{read_number, read_text};
use crate::cursor::ByteCursor;
use serde::Serialize;

/// Layout revision this decoder understands.
const SUPPORTED_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomConditionTable {
    pub version: u64,
    pub conditions: Vec<CustomCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomCondition {
    pub condition: u64,
    pub name: String,
    pub participant: String,
    pub domain: u64,
    #[serde(rename = "type")]
    pub kind: u64,
}

impl CustomConditionTable {
    /// Decode a custom-condition payload.
    pub fn decode(data: &[u8]) -> Self {
        let mut cur = ByteCursor::new(data);
        let version = read_number(&mut cur).unwrap_or(0);
        let mut table = CustomConditionTable {
            version,
            conditions: Vec::new(),
        };
        if version != SUPPORTED_VERSION {
            return table;
        }
        while !cur.is_empty() {
            let Some(condition) = read_condition(&mut cur) else {
                break;
            };
            table.conditions.push(condition);
        }
        table
    }
}

fn read_condition(cur: &mut ByteCursor<'_>) -> Option<CustomCondition> {
    Some(CustomCondition {
        condition: read_number(cur)?,
        name: read_text(cur)?,
        participant: read_text(cur)?,
        domain: read_number(cur)?,
        kind: read_number(cur)?,
    })
}
