pub mod ask;
pub mod doctor;
pub mod entries;
pub mod export;
pub mod import;
pub mod models;
pub mod status;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use quire::config::QuireConfig;
use quire::db::{KeyValueStore, SqliteStore};

/// Open the configured database as a key-value store.
pub fn open_store(config: &QuireConfig) -> Result<Arc<dyn KeyValueStore>> {
    let db_path = config.resolved_db_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open journal at {}", db_path.display()))?;
    Ok(Arc::new(store))
}

/// A stderr spinner for waits on the model.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// First line of `text`, cut to `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
