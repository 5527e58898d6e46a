//! # gddv
//!
//! Decoder for the self-describing binary configuration blobs ("vaults")
//! that platform firmware returns for its thermal and power policy engine.
//!
//! A vault is a versioned container of slash-path keyed entries. This
//! library provides functionality to:
//! - Parse both container header generations, inflating LZMA-compressed
//!   version-2 payloads
//! - Rebuild the slash-path hierarchy as an ordered entry tree
//! - Decode typed leaf values (numbers, strings, deci-Kelvin temperatures,
//!   GUIDs, raw bytes)
//! - Decode the embedded policy tables: target definitions, condition sets,
//!   custom conditions, power limits, passive cooling, and feature GUIDs
//!
//! Malformed input degrades instead of failing: unknown type tags and table
//! versions surface as explicitly marked unparsed nodes, and a buffer cut
//! mid-record still yields every entry decoded before the cut.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = std::fs::read("gddv.bin")?;
//! let vault = gddv::decode(&blob)?;
//!
//! println!("container version {}", vault.header.version);
//! println!("{}", serde_json::to_string_pretty(&vault.entries)?);
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod container;
pub mod cursor;
pub mod error;
pub mod records;
pub mod reference;
pub mod tree;
pub mod value;

// Re-export commonly used items
#[doc(inline)]
pub use container::{
    decode, read_header, ContainerHeader, DataVault, FormatVersion, V2Header, COMPRESSED_PAYLOAD,
    HEADER_SIGNATURE, ITEM_KEYS_SIGNATURE, V2_HEADER_SIZE,
};
#[doc(inline)]
pub use cursor::{ByteCursor, OutOfBounds};
#[doc(inline)]
pub use error::DecodeError;
#[doc(inline)]
pub use records::{
    ConditionClause, ConditionSet, ConditionTarget, CustomCondition, CustomConditionTable,
    DurationClause, FeatureGuidList, FieldDump, Limit, PassiveCoolingTable, PassiveEntry,
    PowerLimitTable, SubRecord, TargetDefinition, TargetTable,
};
#[doc(inline)]
pub use tree::{Entry, EntryTree};
#[doc(inline)]
pub use value::{DataType, EntryValue, TaggedField, Temperature};
