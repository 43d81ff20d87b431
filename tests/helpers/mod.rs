#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use quire::assistant::{
    AiStatus, Assistant, ConnectionMonitor, ContextAssembler, ModelCatalog, OllamaClient,
};
use quire::config::{AiConfig, ContextConfig};
use quire::db::{self, KeyValueStore, MemoryStore};
use quire::journal::JournalEntry;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

/// Probe settings for a mock server: short timeout, no settle delay after a pull.
pub fn ai_config(endpoint: &str) -> AiConfig {
    AiConfig {
        endpoint: endpoint.to_string(),
        probe_timeout_secs: 1,
        pull_settle_ms: 0,
        ..AiConfig::default()
    }
}

pub fn test_monitor(endpoint: &str, store: Arc<dyn KeyValueStore>) -> Arc<ConnectionMonitor> {
    let catalog = Arc::new(ModelCatalog::load(store));
    let config = ai_config(endpoint);
    Arc::new(ConnectionMonitor::new(
        OllamaClient::new(endpoint),
        catalog,
        &config,
    ))
}

pub fn test_assistant(endpoint: &str, store: Arc<dyn KeyValueStore>) -> Assistant {
    Assistant::new(
        test_monitor(endpoint, store),
        ContextAssembler::new(ContextConfig::default()),
    )
}

/// Record every status the monitor reports, in order.
pub fn record_statuses(monitor: &ConnectionMonitor) -> Arc<Mutex<Vec<AiStatus>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    monitor.add_listener(move |s: AiStatus| -> anyhow::Result<()> {
        sink.lock().unwrap().push(s);
        Ok(())
    });
    seen
}

/// Noon UTC on the given day.
pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn entry(id: &str, content: &str, date: DateTime<Utc>) -> JournalEntry {
    JournalEntry::new(id, content, date)
}

/// `/api/tags` body listing `names`.
pub fn tags_body(names: &[&str]) -> Value {
    let models: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
    json!({ "models": models })
}
