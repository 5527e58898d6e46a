//! Reference data for decoded policy values.
//!
//! Symbolic names for the vendor's condition kinds, comparators, chained
//! operations, and the known thermal-policy GUIDs. Decoding keeps the raw
//! codes; these tables exist for display and tooling.

// ============================================================================
// Condition kinds
// ============================================================================

/// Condition-kind names indexed by wire value; index 0 is the invalid marker.
pub const CONDITION_NAMES: &[&str] = &[
    "Invalid",
    "Default",
    "Orientation",
    "Proximity",
    "Motion",
    "Dock",
    "Workload",
    "Cooling_mode",
    "Power_source",
    "Aggregate_power_percentage",
    "Lid_state",
    "Platform_type",
    "Platform_SKU",
    "Utilisation",
    "TDP",
    "Duty_cycle",
    "Power",
    "Temperature",
    "Display_orientation",
    "Oem0",
    "Oem1",
    "Oem2",
    "Oem3",
    "Oem4",
    "Oem5",
    "PMAX",
    "PSRC",
    "ARTG",
    "CTYP",
    "PROP",
    "Unk1",
    "Unk2",
    "Battery_state",
    "Battery_rate",
    "Battery_remaining",
    "Battery_voltage",
    "PBSS",
    "Battery_cycles",
    "Battery_last_full",
    "Power_personality",
    "Battery_design_capacity",
    "Screen_state",
    "AVOL",
    "ACUR",
    "AP01",
    "AP02",
    "AP10",
    "Time",
    "Temperature_without_hysteresis",
    "Mixed_reality",
    "User_presence",
    "RBHF",
    "VBNL",
    "CMPP",
    "Battery_percentage",
    "Battery_count",
    "Power_slider",
];

/// Name for a condition kind, if it is in the known range.
pub fn condition_name(kind: u64) -> Option<&'static str> {
    CONDITION_NAMES.get(usize::try_from(kind).ok()?).copied()
}

// ============================================================================
// Comparators and operations
// ============================================================================

/// Comparator names indexed by wire value; index 0 is the invalid marker.
pub const COMPARATOR_NAMES: &[&str] = &[
    "INVALID",
    "ADAPTIVE_EQUAL",
    "ADAPTIVE_LESSER_OR_EQUAL",
    "ADAPTIVE_GREATER_OR_EQUAL",
];

/// Name for a clause comparator.
pub fn comparator_name(code: u64) -> Option<&'static str> {
    COMPARATOR_NAMES.get(usize::try_from(code).ok()?).copied()
}

/// Name for a chained-operation code (`AND` chains clauses, `FOR` attaches
/// a duration window).
pub fn operation_name(code: u64) -> Option<&'static str> {
    match code {
        1 => Some("AND"),
        2 => Some("FOR"),
        _ => None,
    }
}

// ============================================================================
// Known policy GUIDs
// ============================================================================

/// A policy GUID the firmware may advertise in its supported-feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGuid {
    /// Canonical uppercase GUID string, as produced by the decoder.
    pub guid: &'static str,
    /// Firmware method code tied to the policy, where one is known.
    pub code: Option<&'static str>,
    pub name: &'static str,
}

/// All known policy GUIDs.
pub const POLICY_GUIDS: &[PolicyGuid] = &[
    PolicyGuid {
        guid: "42A441D6-AE6A-462B-A84B-4A8CE79027D3",
        code: Some("DPSP"),
        name: "Passive 1",
    },
    PolicyGuid {
        guid: "3A95C389-E4B8-4629-A526-C52C88626BAE",
        code: Some("DASP"),
        name: "Active",
    },
    PolicyGuid {
        guid: "97C68AE7-15FA-499C-B8C9-5DA81D606E0A",
        code: Some("DCSP"),
        name: "Critical",
    },
    PolicyGuid {
        guid: "63BE270F-1C11-48FD-A6F7-3AF253FF3E2D",
        code: Some("DAPP"),
        name: "Adaptive Performance",
    },
    PolicyGuid {
        guid: "5349962F-71E6-431D-9AE8-0A635B710AEE",
        code: None,
        name: "Emergency Call Mode",
    },
    PolicyGuid {
        guid: "9E04115A-AE87-4D1C-9500-0F3E340BFE75",
        code: Some("DP2P"),
        name: "Passive 2",
    },
    PolicyGuid {
        guid: "F5A35014-C209-46A4-993A-EB56DE7530A1",
        code: Some("POBP"),
        name: "Power Boss",
    },
    PolicyGuid {
        guid: "6ED722A7-9240-48A5-B479-31EEF723D7CF",
        code: Some("DVSP"),
        name: "Virtual Sensor",
    },
    PolicyGuid {
        guid: "16CAF1B7-DD38-40ED-B1C1-1B8A1913D531",
        code: Some("DMSP"),
        name: "Cooling Mode",
    },
    PolicyGuid {
        guid: "BE84BABF-C4D4-403D-B495-3128FD44DAC1",
        code: Some("HDCP"),
        name: "Hardware Duty Cycling",
    },
    PolicyGuid {
        guid: "0E56FAB6-BDFC-4E8C-8246-40ECFD4D74EA",
        code: Some("DA2P"),
        name: "Active 2",
    },
];

/// Policy name for a decoded GUID string, if it is a known policy.
pub fn policy_name(guid: &str) -> Option<&'static str> {
    POLICY_GUIDS
        .iter()
        .find(|p| p.guid.eq_ignore_ascii_case(guid))
        .map(|p| p.name)
}
