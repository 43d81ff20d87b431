//! `ask` and `context`: questions about the journal.

use anyhow::{bail, Result};
use tracing::warn;

use quire::assistant;
use quire::config::QuireConfig;
use quire::journal::EntryBook;

use super::{open_store, spinner};

/// Probe Ollama, then ask `question` about the whole journal.
///
/// Failures are shown as the assistant's friendly troubleshooting message.
pub async fn ask(config: &QuireConfig, question: &str, entry: Option<&str>) -> Result<()> {
    if question.trim().is_empty() {
        bail!("ask needs a question");
    }

    let store = open_store(config)?;
    let book = EntryBook::load(store.clone());
    let assistant = assistant::build(config, store);
    let monitor = assistant.monitor();

    let status = monitor.check_status().await;
    let model = monitor.catalog().current_model();
    eprintln!("{}", status.label(model));

    let pb = spinner(format!("Asking {}...", model.name));
    let result = assistant
        .chat_with_entries(question, book.entries(), entry)
        .await;
    pb.finish_and_clear();

    match result {
        Ok(answer) => println!("{answer}"),
        Err(e) => {
            warn!(error = %e, "chat failed");
            println!("{}", e.user_message(model));
        }
    }
    Ok(())
}

/// Print what would be sent for `question` without contacting Ollama.
pub fn context(
    config: &QuireConfig,
    question: &str,
    entry: Option<&str>,
    full_prompt: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let book = EntryBook::load(store.clone());
    let assistant = assistant::build(config, store);

    let text = if full_prompt {
        assistant.build_prompt(question, book.entries(), entry)
    } else {
        assistant.assembler().build_context(question, book.entries())
    };
    println!("{text}");
    Ok(())
}
