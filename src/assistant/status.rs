//! Readiness states of the generation endpoint.

use serde::Serialize;

use crate::assistant::catalog::ModelDescriptor;

/// Connectivity and readiness of the Ollama endpoint as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiStatus {
    /// Nothing probed yet, or the endpoint answered with an error status.
    Disconnected,
    /// A status probe is in flight.
    Checking,
    /// Endpoint reachable and the selected model is installed.
    Connected,
    /// Endpoint reachable but the selected model is not installed.
    ModelMissing,
    /// A model switch is pulling the model.
    Downloading,
    /// The probe did not answer within its timeout.
    Timeout,
    /// Nothing is listening at the endpoint.
    NotInstalled,
}

impl AiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Checking => "checking",
            Self::Connected => "connected",
            Self::ModelMissing => "model-missing",
            Self::Downloading => "downloading",
            Self::Timeout => "timeout",
            Self::NotInstalled => "not-installed",
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == Self::Connected
    }

    /// Status indicator text, naming `model` when connected.
    pub fn label(&self, model: &ModelDescriptor) -> String {
        match self {
            Self::Connected => format!("AI: {}", model.name),
            Self::Checking => "AI: Checking...".into(),
            Self::Downloading => "AI: Downloading model...".into(),
            Self::ModelMissing => "AI: Model not found".into(),
            Self::Timeout => "AI: Connection timeout".into(),
            Self::NotInstalled => "AI: Ollama not found".into(),
            Self::Disconnected => "AI: Disconnected".into(),
        }
    }
}

impl std::fmt::Display for AiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
