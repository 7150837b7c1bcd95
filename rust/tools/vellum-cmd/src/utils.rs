//! Helpers shared by the vellum-cmd subcommands.

use anyhow::{Context, Result, ensure};

/// Fails unless `path` names a regular file.
pub fn validate_file_exists(path: &str) -> Result<()> {
    let metadata = std::fs::metadata(path).with_context(|| format!("Cannot access {path}"))?;
    ensure!(metadata.is_file(), "Not a regular file: {path}");
    Ok(())
}

/// Renders a byte count with a binary unit, e.g. `2.00 KB`.
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if size < 1024 {
        return format!("{size} B");
    }
    let mut scaled = size as f64 / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit + 1 < UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{scaled:.2} {}", UNITS[unit])
}

/// Space-separated lowercase hex.
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a four-byte file identifier given on the command line.
pub fn parse_identifier(ident: &str) -> Result<[u8; 4]> {
    <[u8; 4]>::try_from(ident.as_bytes())
        .with_context(|| format!("File identifier must be exactly 4 bytes: {ident:?}"))
}
