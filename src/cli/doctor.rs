//! CLI `doctor` command: database diagnostics plus an endpoint probe.

use anyhow::{Context, Result};
use std::sync::Arc;

use quire::assistant;
use quire::config::QuireConfig;
use quire::db::{self, SqliteStore};
use quire::journal::{EntryBook, ENTRIES_KEY};

pub async fn doctor(config: &QuireConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `quire write` to start a journal.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    let store = Arc::new(SqliteStore::new(conn));
    let book = EntryBook::load(store.clone());

    println!("Quire Health Report");
    println!("===================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Stored keys:");
    if report.keys.is_empty() {
        println!("  (none)");
    }
    for (key, len) in &report.keys {
        println!("  {key:<17}  {}", format_bytes(*len as u64));
    }
    println!("Journal entries:   {}", book.len());
    if book.is_empty() && report.keys.iter().any(|(k, len)| k == ENTRIES_KEY && *len > 2) {
        println!("  WARNING: stored journal could not be read. Export from a backup and reimport.");
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    let assistant = assistant::build(config, store);
    let monitor = assistant.monitor();
    let status = monitor.check_status().await;
    let model = monitor.catalog().current_model();
    println!();
    println!("Ollama:");
    println!("  Endpoint:        {}", monitor.client().base_url());
    println!("  Selected model:  {} ({})", model.name, model.id);
    println!("  Status:          {}", status.label(model));

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db {}", db_path.display());
        println!("  2. Or export from a good copy and reimport:");
        println!("     quire export > backup.json");
        println!("     quire import backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
