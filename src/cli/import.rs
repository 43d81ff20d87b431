use anyhow::{Context, Result};
use std::path::Path;

use quire::config::QuireConfig;
use quire::journal::{EntryBook, ExportData};

use super::open_store;

/// Import entries from an export file. Entries whose id already exists are skipped.
pub fn import(config: &QuireConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: ExportData = serde_json::from_str(&json).context("failed to parse import JSON")?;

    let mut book = EntryBook::load(open_store(config)?);
    let report = book.import(data);

    println!(
        "Import complete: {} imported, {} skipped (already present).",
        report.imported, report.skipped
    );
    Ok(())
}
