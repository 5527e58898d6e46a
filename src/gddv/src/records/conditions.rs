//! Condition-set table (`/apct` payloads).
//!
//! Two layouts share the clause shape. Version 1 gives every target a fixed
//! block of ten clause slots with an operation code between consecutive
//! slots; a `FOR` operation pulls in a duration sub-clause that occupies the
//! following slot. Version 2 stores an explicit clause count per target and
//! names the participant device in each clause.

use super::read_number;
use crate::cursor::ByteCursor;
use crate::value::TaggedField;
use serde::Serialize;

/// Operation chaining two clauses.
pub const OPERATION_AND: u64 = 1;
/// Operation attaching a duration window; consumes the next clause slot.
pub const OPERATION_FOR: u64 = 2;

/// Clause slots per target in the version-1 layout.
const V1_SLOTS: usize = 10;

/// Condition clauses grouped per policy target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSet {
    pub version: u64,
    pub targets: Vec<ConditionTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionTarget {
    pub target: u64,
    pub clauses: Vec<ConditionClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionClause {
    /// Participant device, present in the version-2 layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub condition: u64,
    pub comparator: u64,
    pub argument: u64,
    /// Operation chaining this clause to the next one; absent on the last
    /// slot of a target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<u64>,
    /// Duration window attached by a `FOR` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationClause {
    pub comparator: u64,
    pub value: u64,
}

impl ConditionSet {
    /// Decode a condition-set payload.
    ///
    /// An unsupported version keeps only the version field; a target cut
    /// short ends the set with the targets read so far.
    pub fn decode(data: &[u8]) -> Self {
        let mut cur = ByteCursor::new(data);
        let version = read_number(&mut cur).unwrap_or(0);
        let mut set = ConditionSet {
            version,
            targets: Vec::new(),
        };
        let reader: fn(&mut ByteCursor<'_>) -> Option<ConditionTarget> = match version {
            1 => read_target_v1,
            2 => read_target_v2,
            _ => return set,
        };
        while !cur.is_empty() {
            let Some(target) = reader(&mut cur) else {
                break;
            };
            set.targets.push(target);
        }
        set
    }
}

fn read_clause(cur: &mut ByteCursor<'_>, device: Option<String>) -> Option<ConditionClause> {
    Some(ConditionClause {
        device,
        condition: read_number(cur)?,
        comparator: read_number(cur)?,
        argument: read_number(cur)?,
        operation: None,
        duration: None,
    })
}

/// Duration sub-clause of a `FOR` operation: two padding words around the
/// time comparator and value.
fn read_duration(cur: &mut ByteCursor<'_>) -> Option<DurationClause> {
    read_number(cur)?;
    let comparator = read_number(cur)?;
    let value = read_number(cur)?;
    read_number(cur)?;
    Some(DurationClause { comparator, value })
}

fn read_target_v1(cur: &mut ByteCursor<'_>) -> Option<ConditionTarget> {
    let target = read_number(cur)?;
    let mut clauses = Vec::new();
    let mut slot = 0;
    while slot < V1_SLOTS {
        let mut clause = read_clause(cur, None)?;
        if slot + 1 < V1_SLOTS {
            let operation = read_number(cur)?;
            clause.operation = Some(operation);
            if operation == OPERATION_FOR {
                clause.duration = Some(read_duration(cur)?);
                slot += 1; // the duration occupies the next slot
            }
        }
        clauses.push(clause);
        slot += 1;
    }
    Some(ConditionTarget { target, clauses })
}

fn read_target_v2(cur: &mut ByteCursor<'_>) -> Option<ConditionTarget> {
    let target = read_number(cur)?;
    let count = usize::try_from(read_number(cur)?).ok()?;
    let mut clauses = Vec::new();
    let mut slot = 0;
    while slot < count {
        let device = TaggedField::read(cur).ok()?.as_str()?;
        let mut clause = read_clause(cur, Some(device))?;
        if slot + 1 < count {
            let operation = read_number(cur)?;
            clause.operation = Some(operation);
            if operation == OPERATION_FOR {
                clause.duration = Some(read_duration(cur)?);
                slot += 1;
            }
        }
        clauses.push(clause);
        slot += 1;
    }
    Some(ConditionTarget { target, clauses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testenc::{concat, str_field, u64_field};

    fn clause(condition: u64, comparator: u64, argument: u64) -> Vec<u8> {
        concat(&[
            u64_field(condition),
            u64_field(comparator),
            u64_field(argument),
        ])
    }

    fn duration(comparator: u64, value: u64) -> Vec<u8> {
        concat(&[
            u64_field(0),
            u64_field(comparator),
            u64_field(value),
            u64_field(0),
        ])
    }

    /// A full v1 target: ten slots, `AND` between all of them.
    fn v1_target_plain(target: u64) -> Vec<u8> {
        let mut out = u64_field(target);
        for slot in 0..10 {
            out.extend_from_slice(&clause(1, 1, slot));
            if slot < 9 {
                out.extend_from_slice(&u64_field(OPERATION_AND));
            }
        }
        out
    }

    #[test]
    fn test_v1_plain_target() {
        let payload = concat(&[u64_field(1), v1_target_plain(42)]);
        let set = ConditionSet::decode(&payload);

        assert_eq!(set.version, 1);
        assert_eq!(set.targets.len(), 1);
        let target = &set.targets[0];
        assert_eq!(target.target, 42);
        assert_eq!(target.clauses.len(), 10);
        assert_eq!(target.clauses[0].operation, Some(OPERATION_AND));
        assert_eq!(target.clauses[9].operation, None);
    }

    #[test]
    fn test_v1_for_operation_consumes_two_slots() {
        // Slots 0-2 plain, slot 3 chained with FOR (slot 4 is its duration),
        // slots 5-9 plain again.
        let mut body = u64_field(7);
        for slot in 0..3 {
            body.extend_from_slice(&clause(1, 1, slot));
            body.extend_from_slice(&u64_field(OPERATION_AND));
        }
        body.extend_from_slice(&clause(16, 3, 300)); // slot 3
        body.extend_from_slice(&u64_field(OPERATION_FOR));
        body.extend_from_slice(&duration(2, 600)); // slot 4
        for slot in 5..10 {
            body.extend_from_slice(&clause(1, 1, slot));
            if slot < 9 {
                body.extend_from_slice(&u64_field(OPERATION_AND));
            }
        }

        let payload = concat(&[u64_field(1), body]);
        let set = ConditionSet::decode(&payload);
        assert_eq!(set.targets.len(), 1);
        let clauses = &set.targets[0].clauses;

        // Ten slots collapse into nine clauses: the FOR pair is one clause
        assert_eq!(clauses.len(), 9);
        let for_clause = &clauses[3];
        assert_eq!(for_clause.operation, Some(OPERATION_FOR));
        assert_eq!(
            for_clause.duration,
            Some(DurationClause {
                comparator: 2,
                value: 600
            })
        );
        // Slot 5 carries on as the next independent clause
        assert_eq!(clauses[4].argument, 5);
    }

    #[test]
    fn test_v2_counted_clauses_with_devices() {
        let payload = concat(&[
            u64_field(2),
            u64_field(3), // target
            u64_field(2), // clause count
            str_field("SEN1"),
            clause(17, 3, 2982),
            u64_field(OPERATION_AND),
            str_field("SEN2"),
            clause(8, 1, 1),
        ]);
        let set = ConditionSet::decode(&payload);

        assert_eq!(set.version, 2);
        let target = &set.targets[0];
        assert_eq!(target.clauses.len(), 2);
        assert_eq!(target.clauses[0].device.as_deref(), Some("SEN1"));
        assert_eq!(target.clauses[0].operation, Some(OPERATION_AND));
        assert_eq!(target.clauses[1].device.as_deref(), Some("SEN2"));
        assert_eq!(target.clauses[1].operation, None);
    }

    #[test]
    fn test_unknown_version_keeps_version_only() {
        let payload = concat(&[u64_field(9), v1_target_plain(1)]);
        let set = ConditionSet::decode(&payload);
        assert_eq!(set.version, 9);
        assert!(set.targets.is_empty());
    }

    #[test]
    fn test_truncated_target_dropped() {
        let mut payload = concat(&[u64_field(1), v1_target_plain(1)]);
        payload.extend_from_slice(&u64_field(2)); // second target, then nothing
        let set = ConditionSet::decode(&payload);
        assert_eq!(set.targets.len(), 1);
    }
}
