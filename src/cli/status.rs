use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};

use quire::assistant::{self, AiStatus};
use quire::config::QuireConfig;

use super::open_store;

/// Probe once and print the status label.
pub async fn status(config: &QuireConfig) -> Result<()> {
    let assistant = assistant::build(config, open_store(config)?);
    let monitor = assistant.monitor();

    let status = monitor.check_status().await;
    let model = monitor.catalog().current_model();

    println!("{}", status.label(model));
    println!("  Endpoint:  {}", monitor.client().base_url());
    println!("  Model:     {} ({})", model.name, model.id);
    if status == AiStatus::ModelMissing {
        println!();
        println!("Run `quire model use {}` or `ollama pull {}`.", model.id, model.id);
    }
    Ok(())
}

/// Probe on the configured interval and print each transition until Ctrl-C.
pub async fn watch(config: &QuireConfig) -> Result<()> {
    let assistant = assistant::build(config, open_store(config)?);
    let monitor = Arc::clone(assistant.monitor());

    let catalog = Arc::clone(monitor.catalog());
    let last = Mutex::new(None);
    monitor.add_listener(move |status: AiStatus| -> anyhow::Result<()> {
        // Every probe passes through Checking; only print settled changes.
        let mut last = last.lock().unwrap_or_else(|e| e.into_inner());
        if status == AiStatus::Checking || *last == Some(status) {
            return Ok(());
        }
        *last = Some(status);
        println!(
            "{}  {}",
            chrono::Local::now().format("%H:%M:%S"),
            status.label(catalog.current_model())
        );
        Ok(())
    });

    eprintln!(
        "Watching {} every {}s (Ctrl-C to stop)",
        monitor.client().base_url(),
        config.ai.probe_interval_secs
    );
    let probe = Arc::clone(&monitor).spawn_probe_loop(config.ai.probe_interval());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    probe.abort();
    Ok(())
}
