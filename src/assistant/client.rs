//! HTTP client for the three Ollama endpoints the assistant uses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::assistant::error::AiError;

/// Default Ollama base URL.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Talks to an Ollama server at `base_url`.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/tags`: names of the installed models.
    pub async fn list_models(&self, timeout: Duration) -> Result<Vec<String>, AiError> {
        const OP: &str = "list models";
        let response = self
            .http
            .get(self.url("/api/tags"))
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| AiError::Transport { operation: OP, source })?;

        if !response.status().is_success() {
            return Err(AiError::RequestFailed {
                operation: OP,
                status: response.status(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|source| AiError::Decode { operation: OP, source })?;
        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        debug!(count = names.len(), "listed installed models");
        Ok(names)
    }

    /// `POST /api/pull`: ask Ollama to start downloading `model`.
    ///
    /// Returns once the server accepts the request. The progress stream is
    /// drained on a background task so the pull is not cancelled by closing
    /// the connection.
    pub async fn pull(&self, model: &str) -> Result<(), AiError> {
        const OP: &str = "pull";
        let response = self
            .http
            .post(self.url("/api/pull"))
            .json(&PullRequest { name: model })
            .send()
            .await
            .map_err(|source| AiError::Transport { operation: OP, source })?;

        if !response.status().is_success() {
            return Err(AiError::RequestFailed {
                operation: OP,
                status: response.status(),
            });
        }

        let model = model.to_string();
        tokio::spawn(async move {
            match response.bytes().await {
                Ok(body) => debug!(model = %model, bytes = body.len(), "pull stream finished"),
                Err(e) => debug!(model = %model, error = %e, "pull stream ended early"),
            }
        });
        Ok(())
    }

    /// `POST /api/generate` without streaming; returns the trimmed response text.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, AiError> {
        const OP: &str = "generate";
        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|source| AiError::Transport { operation: OP, source })?;

        if !response.status().is_success() {
            return Err(AiError::RequestFailed {
                operation: OP,
                status: response.status(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|source| AiError::Decode { operation: OP, source })?;
        Ok(body.response.trim().to_string())
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Whether any installed model name matches `model_id`.
///
/// `family:tag` matches a name that contains both `family` and `tag`, so
/// `llama3.2:1b` matches `llama3.2:1b` and `library/llama3.2:1b-q4`. An id
/// without a tag matches names containing the whole id.
pub fn model_installed<S: AsRef<str>>(installed: &[S], model_id: &str) -> bool {
    let matches = |name: &str| match model_id.split_once(':') {
        Some((family, tag)) => name.contains(family) && name.contains(tag),
        None => name.contains(model_id),
    };
    installed.iter().any(|name| matches(name.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn model_match_uses_family_and_tag() {
        let installed = vec!["llama3.2:1b".to_string(), "qwen3:4b".to_string()];
        assert!(model_installed(&installed, "llama3.2:1b"));
        assert!(model_installed(&installed, "qwen3:4b"));
        assert!(!model_installed(&installed, "qwen3:1.7b"));
        assert!(!model_installed(&installed, "gemma3:4b"));
        assert!(model_installed(&["library/llama3.2:1b-q4_K_M"], "llama3.2:1b"));
        assert!(model_installed(&["mistral:latest"], "mistral"));
        assert!(!model_installed::<String>(&[], "mistral"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/");
        assert_eq!(client.url("/api/tags"), "http://localhost:11434/api/tags");
    }

    #[tokio::test]
    async fn list_models_parses_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3.2:1b", "size": 1}, {"name": "qwen3:4b"}]
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let names = client.list_models(Duration::from_secs(3)).await.unwrap();
        assert_eq!(names, vec!["llama3.2:1b", "qwen3:4b"]);
    }

    #[tokio::test]
    async fn list_models_without_models_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        assert!(client.list_models(Duration::from_secs(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_models_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"models": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let err = client
            .list_models(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err}");
    }

    #[tokio::test]
    async fn generate_sends_model_and_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(serde_json::json!({
                "model": "qwen3:4b",
                "prompt": "hi",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen3:4b",
                "response": "  hello there \n",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let text = client.generate("qwen3:4b", "hi").await.unwrap();
        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn generate_error_status_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "model 'qwen3:4b' not found"
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let err = client.generate("qwen3:4b", "hi").await.unwrap_err();
        assert!(matches!(
            err,
            AiError::RequestFailed { operation: "generate", status } if status.as_u16() == 404
        ));
    }

    #[tokio::test]
    async fn pull_posts_model_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .and(body_json(serde_json::json!({"name": "gemma3:1b"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("{\"status\":\"pulling manifest\"}\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        client.pull("gemma3:1b").await.unwrap();
    }

    #[tokio::test]
    async fn html_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let err = client.list_models(Duration::from_secs(3)).await.unwrap_err();
        assert!(matches!(err, AiError::Decode { operation: "list models", .. }));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = OllamaClient::new(format!("http://{addr}"));
        let err = client.list_models(Duration::from_secs(3)).await.unwrap_err();
        assert!(matches!(err, AiError::Transport { .. }));
        assert!(!err.is_timeout());
    }
}
