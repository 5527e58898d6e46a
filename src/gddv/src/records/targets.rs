//! Target-definition table (`/apat` payloads).

use super::{read_number, read_text};
use crate::cursor::ByteCursor;
use serde::Serialize;

/// Layout revision this decoder understands.
const SUPPORTED_VERSION: u64 = 2;

/// Ordered list of policy target definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetTable {
    pub version: u64,
    pub targets: Vec<TargetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDefinition {
    pub target_id: u64,
    pub name: String,
    pub participant: String,
    pub domain: u64,
    pub code: String,
    pub argument: String,
}

impl TargetTable {
    /// Decode a target-table payload.
    ///
    /// An unsupported version keeps only the version field; a record cut
    /// short ends the list with the targets read so far.
    pub fn decode(data: &[u8]) -> Self {
        let mut cur = ByteCursor::new(data);
        let version = read_number(&mut cur).unwrap_or(0);
        let mut table = TargetTable {
            version,
            targets: Vec::new(),
        };
        if version != SUPPORTED_VERSION {
            return table;
        }
        while !cur.is_empty() {
            let Some(target) = read_target(&mut cur) else {
                break;
            };
            table.targets.push(target);
        }
        table
    }
}

fn read_target(cur: &mut ByteCursor<'_>) -> Option<TargetDefinition> {
    Some(TargetDefinition {
        target_id: read_number(cur)?,
        name: read_text(cur)?,
        participant: read_text(cur)?,
        domain: read_number(cur)?,
        code: read_text(cur)?,
        argument: read_text(cur)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testenc::{concat, str_field, u64_field};

    fn target(id: u64, name: &str) -> Vec<u8> {
        concat(&[
            u64_field(id),
            str_field(name),
            str_field("\\_SB_.PC00.LPCB.EC0_"),
            u64_field(0),
            str_field("PSVT"),
            str_field("MAX"),
        ])
    }

    #[test]
    fn test_decode_two_targets() {
        let payload = concat(&[u64_field(2), target(1, "CPU"), target(2, "SEN1")]);
        let table = TargetTable::decode(&payload);

        assert_eq!(table.version, 2);
        assert_eq!(table.targets.len(), 2);
        assert_eq!(table.targets[0].target_id, 1);
        assert_eq!(table.targets[0].name, "CPU");
        assert_eq!(table.targets[1].name, "SEN1");
        assert_eq!(table.targets[1].code, "PSVT");
    }

    #[test]
    fn test_unsupported_version_keeps_version_only() {
        let payload = concat(&[u64_field(3), target(1, "CPU")]);
        let table = TargetTable::decode(&payload);
        assert_eq!(table.version, 3);
        assert!(table.targets.is_empty());
    }

    #[test]
    fn test_truncated_record_keeps_earlier_targets() {
        let mut payload = concat(&[u64_field(2), target(1, "CPU")]);
        payload.extend_from_slice(&u64_field(2)[..8]); // cut mid-field
        let table = TargetTable::decode(&payload);
        assert_eq!(table.targets.len(), 1);
    }
}
