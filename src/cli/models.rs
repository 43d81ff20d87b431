//! `models` and `model use`.

use anyhow::{bail, Result};
use std::future::Future;
use std::time::Duration;

use quire::assistant::{self, AiError, AiStatus, ConnectionMonitor, ModelCatalog};
use quire::config::QuireConfig;

use super::{open_store, spinner};

/// How long `model use --wait` keeps polling before giving up.
const WAIT_DEADLINE: Duration = Duration::from_secs(30 * 60);

/// Print the built-in models by category, marking the current selection.
pub fn list(config: &QuireConfig) -> Result<()> {
    let catalog = ModelCatalog::load(open_store(config)?);
    let current = catalog.current_model();

    for (category, models) in catalog.by_category() {
        println!("{} Models", category.label());
        for model in models {
            let marker = if model.id == current.id { "*" } else { " " };
            println!(
                "{marker} {:<22} {:<20} {:>6}  {:<10}  {}",
                model.id,
                model.name,
                model.size_label,
                model.speed.label(),
                model.description
            );
        }
        println!();
    }
    println!("Select with `quire model use <id>`.");
    Ok(())
}

/// Select `id` and make sure Ollama has it. With `wait`, poll until it is ready.
pub async fn use_model(config: &QuireConfig, id: &str, wait: bool) -> Result<()> {
    let assistant = assistant::build(config, open_store(config)?);
    let monitor = assistant.monitor();

    let pb = spinner(format!("Switching to {id}..."));
    let mut status = match monitor.select_model(id).await {
        Ok(status) => status,
        Err(AiError::UnknownModel(id)) => {
            pb.finish_and_clear();
            bail!("unknown model {id:?}; run `quire models` to see the choices");
        }
        Err(e) => {
            pb.finish_and_clear();
            let model = monitor.catalog().current_model();
            println!("Selected {}, but the download could not start: {e}", model.name);
            println!("Try `ollama pull {}` manually.", model.id);
            return Ok(());
        }
    };

    let model = monitor.catalog().current_model();
    if wait && status == AiStatus::ModelMissing {
        let poll = Duration::from_secs(config.ai.probe_timeout_secs.max(1) + 2);
        let attempts = (WAIT_DEADLINE.as_secs() / poll.as_secs()).max(1) as u32;
        pb.set_message(format!("Waiting for {} to finish downloading...", model.name));
        let monitor: &ConnectionMonitor = monitor;
        status = wait_for_model(status, attempts, poll, move || monitor.check_status()).await;
    }
    pb.finish_and_clear();

    println!("Selected {} ({})", model.name, model.id);
    println!("{}", status.label(model));
    if status == AiStatus::ModelMissing {
        if wait {
            println!(
                "Still not installed after {} minutes. Check `ollama list` or run `ollama pull {}`.",
                WAIT_DEADLINE.as_secs() / 60,
                model.id
            );
        } else {
            println!("Not ready yet; rerun with --wait to stay attached until the download finishes.");
        }
    }
    Ok(())
}

/// Re-probe every `poll` while the model is missing, at most `attempts` times.
async fn wait_for_model<F, Fut>(
    mut status: AiStatus,
    attempts: u32,
    poll: Duration,
    mut probe: F,
) -> AiStatus
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AiStatus>,
{
    for _ in 0..attempts {
        if status != AiStatus::ModelMissing {
            break;
        }
        tokio::time::sleep(poll).await;
        status = probe().await;
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn wait_gives_up_after_attempts() {
        let calls = Cell::new(0);
        let status = wait_for_model(AiStatus::ModelMissing, 3, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            async { AiStatus::ModelMissing }
        })
        .await;

        assert_eq!(status, AiStatus::ModelMissing);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn wait_stops_once_ready() {
        let calls = Cell::new(0);
        let status = wait_for_model(AiStatus::ModelMissing, 10, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            let next = if calls.get() == 2 {
                AiStatus::Connected
            } else {
                AiStatus::ModelMissing
            };
            async move { next }
        })
        .await;

        assert_eq!(status, AiStatus::Connected);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn wait_leaves_other_statuses_alone() {
        let calls = Cell::new(0);
        let status = wait_for_model(AiStatus::NotInstalled, 5, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            async { AiStatus::Connected }
        })
        .await;

        assert_eq!(status, AiStatus::NotInstalled);
        assert_eq!(calls.get(), 0);
    }
}
