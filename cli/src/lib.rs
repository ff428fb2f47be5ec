//! Shared plumbing for the command-line binaries: tracing setup and the
//! CSV field-value format used for public and private inputs.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use groth16_core::groth16_field::Fr;

/// Installs a fmt subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Parses one field value: decimal digits, or `0x`-prefixed hex.
pub fn parse_field_value(s: &str) -> Result<Fr> {
    let s = s.trim();
    if s.is_empty() {
        bail!("empty field value");
    }
    if let Some(hex) = s.strip_prefix("0x") {
        return Fr::from_hex(hex).with_context(|| format!("bad hex value {s:?}"));
    }
    let mut acc = Fr::ZERO;
    let ten = Fr::from(10u64);
    for ch in s.chars() {
        let digit = ch
            .to_digit(10)
            .with_context(|| format!("bad decimal value {s:?}"))?;
        acc = acc * ten + Fr::from(digit as u64);
    }
    Ok(acc)
}

/// Reads a CSV file of field values, split on commas and newlines.
pub fn read_field_csv(path: &Path) -> Result<Vec<Fr>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    text.split(|c: char| c == ',' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_field_value)
        .collect()
}

/// Reads a whole binary file.
pub fn read_binary(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Writes a whole binary file.
pub fn write_binary(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_field_value("12").unwrap(), Fr::from(12u64));
        assert_eq!(parse_field_value(" 500 ").unwrap(), Fr::from(500u64));
        assert_eq!(parse_field_value("0x1f4").unwrap(), Fr::from(500u64));
        assert!(parse_field_value("12a").is_err());
        assert!(parse_field_value("").is_err());
    }

    #[test]
    fn test_csv_splitting() {
        let dir = std::env::temp_dir().join("groth16-cli-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("inputs.csv");
        std::fs::write(&path, "1, 2\n3,\n0x0a\n").unwrap();
        let values = read_field_csv(&path).unwrap();
        assert_eq!(
            values,
            vec![
                Fr::from(1u64),
                Fr::from(2u64),
                Fr::from(3u64),
                Fr::from(10u64)
            ]
        );
    }
}
