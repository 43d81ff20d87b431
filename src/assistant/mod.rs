//! The AI side of the journal.
//!
//! - [`catalog`]: fixed model table and the persisted selection
//! - [`client`]: Ollama HTTP calls (`/api/tags`, `/api/pull`, `/api/generate`)
//! - [`monitor`]: readiness state machine and status listeners
//! - [`context`] and [`prompt`]: bounded context text and the instruction template
//! - [`chat`]: [`Assistant::chat_with_entries`], tying the above together

pub mod catalog;
pub mod chat;
pub mod client;
pub mod context;
pub mod error;
pub mod monitor;
pub mod prompt;
pub mod status;

pub use catalog::{Category, ModelCatalog, ModelDescriptor, SpeedClass};
pub use chat::Assistant;
pub use client::OllamaClient;
pub use context::ContextAssembler;
pub use error::AiError;
pub use monitor::{ConnectionMonitor, StatusListener};
pub use status::AiStatus;

use std::sync::Arc;

use crate::config::QuireConfig;
use crate::db::KeyValueStore;

/// Wire up catalog, client, monitor and assembler from configuration.
pub fn build(config: &QuireConfig, store: Arc<dyn KeyValueStore>) -> Assistant {
    let catalog = Arc::new(ModelCatalog::load(store));
    let client = OllamaClient::new(config.ai.endpoint.clone());
    let monitor = Arc::new(ConnectionMonitor::new(client, catalog, &config.ai));
    Assistant::new(monitor, ContextAssembler::new(config.context.clone()))
}
