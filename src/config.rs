use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuireConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub ai: AiConfig,
    pub context: ContextConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `warn` or `quire=debug`.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Ollama endpoint and status probe settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub probe_timeout_secs: u64,
    pub probe_interval_secs: u64,
    /// How long to wait after a pull request is accepted before re-probing.
    pub pull_settle_ms: u64,
}

/// Bounds on how much journal text goes into a prompt.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContextConfig {
    pub relevant_chars: usize,
    pub recent_chars: usize,
    pub recent_limit: usize,
    pub theme_count: usize,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            ai: AiConfig::default(),
            context: ContextConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_quire_dir()
            .join("journal.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".into(),
            probe_timeout_secs: 3,
            probe_interval_secs: 30,
            pull_settle_ms: 2000,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            relevant_chars: 500,
            recent_chars: 300,
            recent_limit: 15,
            theme_count: 3,
        }
    }
}

impl AiConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn pull_settle(&self) -> Duration {
        Duration::from_millis(self.pull_settle_ms)
    }
}

/// Returns `~/.quire/`, or `./.quire` when no home directory can be found.
pub fn default_quire_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quire")
}

/// Returns the default config file path: `~/.quire/config.toml`
pub fn default_config_path() -> PathBuf {
    default_quire_dir().join("config.toml")
}

impl QuireConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            QuireConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (QUIRE_DB, QUIRE_LOG_LEVEL, QUIRE_OLLAMA_URL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("QUIRE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("QUIRE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("QUIRE_OLLAMA_URL") {
            self.ai.endpoint = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
