//! Entry commands: `write`, `list`, `show`, `delete`, `title`.

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::io::Read;

use quire::config::QuireConfig;
use quire::journal::{group_by_day, EntryBook};

use super::{open_store, preview};

pub fn write(config: &QuireConfig, id: Option<&str>, words: &[String]) -> Result<()> {
    let text = if words.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read entry from stdin")?;
        buf
    } else {
        words.join(" ")
    };

    let mut book = EntryBook::load(open_store(config)?);
    let existed = id.is_some_and(|id| book.get(id).is_some());
    match book.save_entry(id, &text) {
        Some(entry) if existed => println!("Updated {} ({} words)", entry.id, entry.word_count),
        Some(entry) => println!("Saved {} ({} words)", entry.id, entry.word_count),
        None => println!("Nothing to save."),
    }
    Ok(())
}

pub fn list(config: &QuireConfig, search: Option<&str>) -> Result<()> {
    let book = EntryBook::load(open_store(config)?);
    let entries = book.filter(search.unwrap_or_default());

    if entries.is_empty() {
        match search {
            Some(q) => println!("No entries match \"{q}\"."),
            None => println!("No entries yet. Start with `quire write`."),
        }
        return Ok(());
    }

    for (heading, group) in group_by_day(entries, &Local::now()) {
        println!("{heading}");
        for entry in group {
            let label = entry
                .title
                .clone()
                .unwrap_or_else(|| preview(&entry.content, 60));
            println!("  {}  {}  ({} words)", entry.id, label, entry.word_count);
        }
        println!();
    }
    Ok(())
}

pub fn show(config: &QuireConfig, id: &str) -> Result<()> {
    let book = EntryBook::load(open_store(config)?);
    let Some(entry) = book.get(id) else {
        bail!("no entry with id {id}");
    };

    if let Some(title) = &entry.title {
        println!("{title}");
    }
    println!(
        "{}  ({} words)",
        entry.date.with_timezone(&Local).format("%A, %B %-d, %Y %H:%M"),
        entry.word_count
    );
    println!();
    println!("{}", entry.content);
    Ok(())
}

pub fn delete(config: &QuireConfig, id: &str) -> Result<()> {
    let mut book = EntryBook::load(open_store(config)?);
    if !book.delete(id) {
        bail!("no entry with id {id}");
    }
    println!("Deleted {id}");
    Ok(())
}

pub fn title(config: &QuireConfig, id: &str, title: Option<&str>, clear: bool) -> Result<()> {
    let mut book = EntryBook::load(open_store(config)?);
    let found = match (title, clear) {
        (_, true) => book.clear_title(id),
        (Some(title), false) if !title.trim().is_empty() => book.set_title(id, title),
        _ => bail!("give a title, or --clear to remove it"),
    };
    if !found {
        bail!("no entry with id {id}");
    }
    println!("Updated title for {id}");
    Ok(())
}
