//! Errors surfaced by the assistant.

use thiserror::Error;

use crate::assistant::catalog::ModelDescriptor;
use crate::assistant::status::AiStatus;

#[derive(Debug, Error)]
pub enum AiError {
    /// Generation was requested while the endpoint is not [`AiStatus::Connected`].
    #[error("AI service not available (status: {status})")]
    ServiceUnavailable { status: AiStatus },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{operation} request failed with HTTP {status}")]
    RequestFailed {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    /// The request could not be sent or no response arrived.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape Ollama sends.
    #[error("{operation} response could not be read: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The id is not in the model catalog.
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

impl AiError {
    /// True when the request was abandoned because its timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport { source, .. } | Self::Decode { source, .. } if source.is_timeout()
        )
    }

    /// Message suitable for showing to the person using the journal.
    ///
    /// Connectivity failures all read the same way and explain how to get
    /// `model` running.
    pub fn user_message(&self, model: &ModelDescriptor) -> String {
        match self {
            Self::UnknownModel(id) => format!("There is no model called \"{id}\" in the catalog."),
            Self::ServiceUnavailable { .. }
            | Self::RequestFailed { .. }
            | Self::Transport { .. }
            | Self::Decode { .. } => {
                format!(
                    "I'm having trouble connecting right now and can't respond to your question.\n\n\
                     To get me working again:\n\
                     \u{2022} Make sure Ollama is running on your computer\n\
                     \u{2022} Download the {} model: ollama pull {}\n\n\
                     I'll be here when you get me connected!",
                    model.name, model.id
                )
            }
        }
    }
}
