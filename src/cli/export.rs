use anyhow::Result;

use quire::config::QuireConfig;
use quire::journal::EntryBook;

use super::open_store;

/// Export every entry as JSON to stdout.
pub fn export(config: &QuireConfig) -> Result<()> {
    let book = EntryBook::load(open_store(config)?);
    let data = book.export();

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} entries.", data.entries.len());
    Ok(())
}
