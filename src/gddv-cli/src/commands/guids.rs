//! Decode a standalone supported-feature GUID buffer.

use anyhow::{Context, Result};
use gddv::{reference, FeatureGuidList};
use std::fmt::Write as _;
use std::path::Path;

pub fn run(input: &Path) -> Result<String> {
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let list = FeatureGuidList::from_raw(&data);

    let mut out = String::new();
    for guid in &list.guids {
        match reference::policy_name(guid) {
            Some(name) => writeln!(out, "{guid}  {name}")?,
            None => writeln!(out, "{guid}  (unknown policy)")?,
        }
    }
    Ok(out)
}
