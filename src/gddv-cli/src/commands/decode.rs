//! Decode a vault blob into its entry tree.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(input: &Path, format: OutputFormat) -> Result<String> {
    let blob = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let vault = gddv::decode(&blob)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if let Some(err) = &vault.truncation {
        eprintln!("warning: entry stream cut short ({err}); printing partial tree");
    }

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&vault.entries)?,
        OutputFormat::Yaml => serde_yaml::to_string(&vault.entries)?,
    };
    Ok(rendered)
}
