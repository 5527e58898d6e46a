//! Show the container header of a vault blob.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

pub fn run(input: &Path) -> Result<String> {
    let blob = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let header = gddv::read_header(&blob)
        .with_context(|| format!("Failed to parse header of {}", input.display()))?;

    let mut out = String::new();
    writeln!(out, "Signature:  0x{:04X}", header.signature)?;
    writeln!(out, "Version:    {}", header.version)?;
    writeln!(out, "Header:     {} bytes", header.header_size)?;
    writeln!(
        out,
        "Flags:      0x{:08X}{}",
        header.flags,
        if header.is_compressed() {
            " (compressed payload)"
        } else {
            ""
        }
    )?;
    writeln!(out, "Length:     {} bytes", blob.len())?;

    if let Some(v2) = &header.v2 {
        writeln!(out, "Segment:    {}", v2.segment_id)?;
        writeln!(out, "Comment:    {}", v2.comment)?;
        writeln!(out, "Class:      {}", v2.payload_class_str())?;
        writeln!(out, "Payload:    {} bytes", v2.payload_size)?;
        let verdict = match header.verify_payload_hash(&blob[gddv::V2_HEADER_SIZE..]) {
            Some(true) => " (matches payload)",
            Some(false) => " (DOES NOT match payload)",
            None => "",
        };
        writeln!(out, "SHA-256:    {}{verdict}", hex::encode(v2.payload_hash))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_header_output() {
        let mut blob = Vec::new();
        blob.extend_from_slice(&0x1FE5u16.to_le_bytes());
        blob.extend_from_slice(&12u16.to_le_bytes());
        blob.extend_from_slice(&0x0102_0003u32.to_le_bytes());
        blob.extend_from_slice(&0u32.to_le_bytes());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&blob).unwrap();

        let output = run(file.path()).unwrap();
        assert!(output.contains("Signature:  0x1FE5"));
        assert!(output.contains("Version:    1.2.3"));
    }
}
