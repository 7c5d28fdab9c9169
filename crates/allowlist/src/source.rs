//! Allowlist source formats.
//!
//! Two encodings are accepted:
//!
//! - JSON: an array of `["0xaddress", allocation]` tuples or of
//!   `{ "address": "0x..", "allocation": .. }` objects. Allocations may be JSON
//!   numbers, decimal strings or `0x` hex strings.
//! - Text: one `address,allocation` record per line. Blank lines and lines
//!   starting with `#` are skipped.

use crate::error::CompileError;
use alloy_primitives::{Address, U256};
use sale_primitives::AllowlistEntry;
use serde::Deserialize;
use std::{fs, path::Path, str::FromStr};

/// Encoding of an allowlist file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// JSON array of tuples or objects.
    Json,
    /// Comma separated `address,allocation` lines.
    Csv,
}

impl SourceFormat {
    /// Picks the format from the file extension; anything but `.json` is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllocation {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Tuple(String, RawAllocation),
    Object {
        address: String,
        allocation: RawAllocation,
    },
}

/// Loads entries from `path`, choosing the format by extension.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<AllowlistEntry>, CompileError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let entries = parse(&raw, SourceFormat::from_path(path))?;
    tracing::debug!(
        target: "allowlist",
        path = %path.display(),
        entries = entries.len(),
        "loaded allowlist source"
    );
    Ok(entries)
}

/// Parses `raw` in the given format.
pub fn parse(raw: &str, format: SourceFormat) -> Result<Vec<AllowlistEntry>, CompileError> {
    match format {
        SourceFormat::Json => parse_json(raw),
        SourceFormat::Csv => parse_csv(raw),
    }
}

/// Parses the JSON encoding.
pub fn parse_json(raw: &str) -> Result<Vec<AllowlistEntry>, CompileError> {
    let records: Vec<RawEntry> =
        serde_json::from_str(raw).map_err(|err| CompileError::invalid_source("json", err))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> Result<AllowlistEntry, CompileError> {
            let location = format!("entry {index}");
            let (address, allocation) = match record {
                RawEntry::Tuple(address, allocation) => (address, allocation),
                RawEntry::Object {
                    address,
                    allocation,
                } => (address, allocation),
            };
            let allocation = match allocation {
                RawAllocation::Number(value) => U256::from(value),
                RawAllocation::Text(text) => parse_allocation(&text, &location)?,
            };
            Ok(AllowlistEntry::new(
                parse_address(&address, &location)?,
                allocation,
            ))
        })
        .collect()
}

/// Parses the line based text encoding.
pub fn parse_csv(raw: &str) -> Result<Vec<AllowlistEntry>, CompileError> {
    let mut entries = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let location = format!("line {}", number + 1);
        let (address, allocation) = line.split_once(',').ok_or_else(|| {
            CompileError::invalid_source(&location, "expected `address,allocation`")
        })?;
        entries.push(AllowlistEntry::new(
            parse_address(address, &location)?,
            parse_allocation(allocation, &location)?,
        ));
    }
    Ok(entries)
}

fn parse_address(raw: &str, location: &str) -> Result<Address, CompileError> {
    Address::from_str(raw.trim()).map_err(|err| CompileError::invalid_source(location, err))
}

fn parse_allocation(raw: &str, location: &str) -> Result<U256, CompileError> {
    U256::from_str(raw.trim()).map_err(|err| CompileError::invalid_source(location, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const A1: Address = address!("0x00000000000000000000000000000000000000a1");
    const B1: Address = address!("0x00000000000000000000000000000000000000b1");

    #[test]
    fn parses_tuple_json() {
        let raw = r#"[
            ["0x00000000000000000000000000000000000000a1", 2],
            ["0x00000000000000000000000000000000000000b1", "0x10"]
        ]"#;
        let entries = parse_json(raw).unwrap();
        assert_eq!(
            entries,
            vec![
                AllowlistEntry::from((A1, 2u64)),
                AllowlistEntry::from((B1, 16u64)),
            ]
        );
    }

    #[test]
    fn parses_object_json() {
        let raw = r#"[
            {"address": "0x00000000000000000000000000000000000000a1", "allocation": "25"}
        ]"#;
        let entries = parse_json(raw).unwrap();
        assert_eq!(entries[0].allocation, U256::from(25u64));
    }

    #[test]
    fn parses_text_lines() {
        let raw = "# pre-sale round 1\n\
                   0x00000000000000000000000000000000000000a1, 2\n\
                   \n\
                   0x00000000000000000000000000000000000000b1,1\n";
        let entries = parse_csv(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].allocation, U256::from(1u64));
    }

    #[test]
    fn reports_bad_line_location() {
        let raw = "0x00000000000000000000000000000000000000a1,2\nnot-an-address,1\n";
        match parse_csv(raw) {
            Err(CompileError::Source { location, .. }) => assert_eq!(location, "line 2"),
            other => panic!("expected source error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_separator() {
        let raw = "0x00000000000000000000000000000000000000a1";
        assert!(matches!(parse_csv(raw), Err(CompileError::Source { .. })));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("list.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("list.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("list")), SourceFormat::Csv);
    }
}
