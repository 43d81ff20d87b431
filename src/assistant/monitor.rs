//! Endpoint readiness state machine.
//!
//! ```text
//! Disconnected ─► Checking ─► Connected | ModelMissing | Timeout | NotInstalled | Disconnected
//! Connected | ModelMissing ─► Downloading ─► Checking          (model switch)
//! ```
//!
//! [`ConnectionMonitor::check_status`] is re-entered by a periodic probe and by
//! model switches. At most one probe is outstanding: a second caller gets the
//! current status back without touching the network, while a model switch
//! waits for the outstanding probe and then runs its own.

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::assistant::catalog::ModelCatalog;
use crate::assistant::client::{model_installed, OllamaClient};
use crate::assistant::error::AiError;
use crate::assistant::status::AiStatus;
use crate::config::AiConfig;

/// Receives every status transition.
///
/// An error from one listener is logged and does not stop delivery to the rest.
/// Listeners must not register further listeners from inside `on_status`.
pub trait StatusListener: Send + Sync {
    fn on_status(&self, status: AiStatus) -> anyhow::Result<()>;
}

impl<F> StatusListener for F
where
    F: Fn(AiStatus) -> anyhow::Result<()> + Send + Sync,
{
    fn on_status(&self, status: AiStatus) -> anyhow::Result<()> {
        self(status)
    }
}

pub struct ConnectionMonitor {
    client: OllamaClient,
    catalog: Arc<ModelCatalog>,
    probe_timeout: Duration,
    pull_settle: Duration,
    status: watch::Sender<AiStatus>,
    listeners: RwLock<Vec<Box<dyn StatusListener>>>,
    /// Held for the duration of a probe.
    probe: Mutex<()>,
}

impl ConnectionMonitor {
    pub fn new(client: OllamaClient, catalog: Arc<ModelCatalog>, config: &AiConfig) -> Self {
        let (status, _) = watch::channel(AiStatus::Disconnected);
        Self {
            client,
            catalog,
            probe_timeout: config.probe_timeout(),
            pull_settle: config.pull_settle(),
            status,
            listeners: RwLock::new(Vec::new()),
            probe: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn status(&self) -> AiStatus {
        *self.status.borrow()
    }

    /// A channel view of the status; each receiver sees the latest value.
    pub fn subscribe(&self) -> watch::Receiver<AiStatus> {
        self.status.subscribe()
    }

    pub fn add_listener(&self, listener: impl StatusListener + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    /// Move to `status` without probing and notify listeners.
    pub fn force_status(&self, status: AiStatus) {
        self.transition(status);
    }

    fn transition(&self, status: AiStatus) {
        let previous = self.status.send_replace(status);
        debug!(from = %previous, to = %status, "ai status");

        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        for (index, listener) in listeners.iter().enumerate() {
            if let Err(e) = listener.on_status(status) {
                warn!(listener = index, status = %status, error = %e, "status listener failed");
            }
        }
    }

    /// Probe the endpoint and update the status.
    ///
    /// If a probe is already running this returns the current status (normally
    /// [`AiStatus::Checking`]) without issuing a request.
    pub async fn check_status(&self) -> AiStatus {
        let Ok(_guard) = self.probe.try_lock() else {
            debug!("status probe already in flight");
            return self.status();
        };
        self.probe_locked().await
    }

    /// Probe with the `probe` guard already held by the caller.
    async fn probe_locked(&self) -> AiStatus {
        self.transition(AiStatus::Checking);
        let model = self.catalog.current_model();

        let next = match self.client.list_models(self.probe_timeout).await {
            Ok(installed) if model_installed(&installed, model.id) => AiStatus::Connected,
            Ok(_) => {
                info!(model = model.id, "selected model is not installed");
                AiStatus::ModelMissing
            }
            Err(AiError::RequestFailed { status, .. }) => {
                warn!(%status, "ollama answered the status probe with an error");
                AiStatus::Disconnected
            }
            Err(e) if e.is_timeout() => {
                warn!(timeout = ?self.probe_timeout, "ollama status probe timed out");
                AiStatus::Timeout
            }
            Err(e) => {
                debug!(error = %e, endpoint = self.client.base_url(), "ollama not reachable");
                AiStatus::NotInstalled
            }
        };

        self.transition(next);
        next
    }

    /// Switch to `id`, pulling it if Ollama does not have it, then re-probe.
    ///
    /// An unknown id is rejected before any transition. If making the model
    /// available fails the status becomes [`AiStatus::ModelMissing`] and the
    /// error is returned. The closing probe always runs, after any probe that
    /// was already in flight.
    pub async fn select_model(&self, id: &str) -> Result<AiStatus, AiError> {
        let model = self.catalog.select_model(id)?;
        self.transition(AiStatus::Downloading);

        if let Err(e) = self.ensure_model(model.id).await {
            warn!(model = model.id, error = %e, "could not make model available");
            self.transition(AiStatus::ModelMissing);
            return Err(e);
        }

        // A probe already in flight may have read the previous selection.
        // Wait for it, then probe again so the new model decides the status.
        let _guard = self.probe.lock().await;
        Ok(self.probe_locked().await)
    }

    async fn ensure_model(&self, id: &str) -> Result<(), AiError> {
        let installed = match self.client.list_models(self.probe_timeout).await {
            Ok(installed) => installed,
            Err(AiError::RequestFailed { status, .. }) => {
                debug!(%status, "model listing refused, skipping pull");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if model_installed(&installed, id) {
            debug!(model = id, "model already installed");
            return Ok(());
        }

        info!(model = id, "pulling model");
        self.client.pull(id).await?;
        tokio::time::sleep(self.pull_settle).await;
        info!(model = id, "model download initiated");
        Ok(())
    }

    /// Probe now and then every `interval` until the task is aborted.
    pub fn spawn_probe_loop(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                self.check_status().await;
            }
        })
    }
}
