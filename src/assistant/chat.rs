//! Asking the model about the journal.

use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info};

use crate::assistant::context::ContextAssembler;
use crate::assistant::error::AiError;
use crate::assistant::monitor::ConnectionMonitor;
use crate::assistant::prompt::{compose_prompt, current_entry_block};
use crate::journal::types::JournalEntry;

/// Answers questions about journal entries through the monitored endpoint.
pub struct Assistant {
    monitor: Arc<ConnectionMonitor>,
    assembler: ContextAssembler,
}

impl Assistant {
    pub fn new(monitor: Arc<ConnectionMonitor>, assembler: ContextAssembler) -> Self {
        Self { monitor, assembler }
    }

    pub fn monitor(&self) -> &Arc<ConnectionMonitor> {
        &self.monitor
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// The full prompt for `query`, with the entry `current_entry_id` (if found)
    /// appended as the entry being viewed.
    pub fn build_prompt(
        &self,
        query: &str,
        entries: &[JournalEntry],
        current_entry_id: Option<&str>,
    ) -> String {
        self.build_prompt_in(query, entries, current_entry_id, &Local)
    }

    pub fn build_prompt_in<Tz: TimeZone>(
        &self,
        query: &str,
        entries: &[JournalEntry],
        current_entry_id: Option<&str>,
        tz: &Tz,
    ) -> String
    where
        Tz::Offset: Display,
    {
        let context = self.assembler.build_context_in(query, entries, tz);
        let current = current_entry_id
            .and_then(|id| entries.iter().find(|e| e.id == id))
            .map(|entry| current_entry_block(entry, tz));
        compose_prompt(query, &context, current.as_deref())
    }

    /// Ask `query` about `entries` and return the model's answer.
    ///
    /// Fails with [`AiError::ServiceUnavailable`] without any request unless the
    /// monitor reports [`Connected`](crate::assistant::AiStatus::Connected).
    /// There is no retry and no timeout beyond the HTTP client's own.
    pub async fn chat_with_entries(
        &self,
        query: &str,
        entries: &[JournalEntry],
        current_entry_id: Option<&str>,
    ) -> Result<String, AiError> {
        let status = self.monitor.status();
        if !status.is_connected() {
            debug!(%status, "chat refused, endpoint not ready");
            return Err(AiError::ServiceUnavailable { status });
        }

        let prompt = self.build_prompt(query, entries, current_entry_id);
        let model = self.monitor.catalog().current_model();
        info!(
            model = model.id,
            entries = entries.len(),
            prompt_chars = prompt.len(),
            "sending chat request"
        );

        self.monitor.client().generate(model.id, &prompt).await
    }
}
