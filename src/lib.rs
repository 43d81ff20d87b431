//! A local journal with a reflection companion backed by Ollama.
//!
//! Quire keeps journal entries in a small SQLite-backed key-value store and can
//! answer questions about them by sending a bounded slice of the journal to a
//! locally running [Ollama](https://ollama.com/) server. Entries are never sent
//! anywhere else.
//!
//! # Architecture
//!
//! - **Storage**: SQLite `kv_store` table behind the [`db::KeyValueStore`] trait
//! - **Journal**: entries serialized as one JSON collection, most recent first
//! - **Context**: keyword relevance split into three tiers (relevant, recent,
//!   older-by-month) so the prompt stays bounded however long the journal gets
//! - **Endpoint**: Ollama's `/api/tags`, `/api/pull` and `/api/generate`
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, health checks, key-value store
//! - [`journal`]: Journal entries and the entry book (save, import, export, filter)
//! - [`assistant`]: Model catalog, connection monitor, context assembly and chat

pub mod assistant;
pub mod config;
pub mod db;
pub mod journal;
