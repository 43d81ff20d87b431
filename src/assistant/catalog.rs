//! The fixed table of selectable generation models and the persisted choice.

use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::assistant::error::AiError;
use crate::db::KeyValueStore;

/// Store key holding the selected model id.
pub const SELECTED_MODEL_KEY: &str = "selected_model";

/// Relative generation speed, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedClass {
    UltraFast,
    VeryFast,
    Fast,
    Medium,
    Slow,
}

impl SpeedClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UltraFast => "Ultra Fast",
            Self::VeryFast => "Very Fast",
            Self::Fast => "Fast",
            Self::Medium => "Medium",
            Self::Slow => "Slow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Latest,
    Thinking,
    Reliable,
}

impl Category {
    /// Display order.
    pub const ALL: [Category; 3] = [Self::Latest, Self::Thinking, Self::Reliable];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::Thinking => "Thinking",
            Self::Reliable => "Reliable",
        }
    }
}

/// Static metadata for one selectable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Ollama model name, `family:tag`.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Approximate download size.
    pub size_label: &'static str,
    pub speed: SpeedClass,
    pub category: Category,
}

/// Fallback when nothing (or something unknown) is selected.
pub const DEFAULT_MODEL: ModelDescriptor = ModelDescriptor {
    id: "llama3.2:1b",
    name: "Llama 3.2 1B",
    description: "Compact and efficient (current default)",
    size_label: "1.3GB",
    speed: SpeedClass::VeryFast,
    category: Category::Reliable,
};

pub const DEFAULT_MODEL_ID: &str = DEFAULT_MODEL.id;

static BUILTIN_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "qwen3:0.6b",
        name: "Qwen3 0.6B",
        description: "Latest Qwen model, ultra-fast and efficient",
        size_label: "0.4GB",
        speed: SpeedClass::UltraFast,
        category: Category::Latest,
    },
    ModelDescriptor {
        id: "qwen3:1.7b",
        name: "Qwen3 1.7B",
        description: "Latest Qwen with excellent reasoning",
        size_label: "1.0GB",
        speed: SpeedClass::VeryFast,
        category: Category::Latest,
    },
    ModelDescriptor {
        id: "qwen3:4b",
        name: "Qwen3 4B",
        description: "High-quality latest generation model",
        size_label: "2.4GB",
        speed: SpeedClass::Fast,
        category: Category::Latest,
    },
    ModelDescriptor {
        id: "gemma3:1b",
        name: "Gemma3 1B",
        description: "Google's latest, most efficient model",
        size_label: "0.7GB",
        speed: SpeedClass::UltraFast,
        category: Category::Latest,
    },
    ModelDescriptor {
        id: "gemma3:4b",
        name: "Gemma3 4B",
        description: "Latest Gemma with superior capabilities",
        size_label: "2.5GB",
        speed: SpeedClass::Fast,
        category: Category::Latest,
    },
    ModelDescriptor {
        id: "deepseek-r1:1.5b",
        name: "DeepSeek-R1 1.5B",
        description: "Thinking model with reasoning chains",
        size_label: "0.9GB",
        speed: SpeedClass::Fast,
        category: Category::Thinking,
    },
    ModelDescriptor {
        id: "deepseek-r1:7b",
        name: "DeepSeek-R1 7B",
        description: "Advanced thinking model, excellent reasoning",
        size_label: "4.1GB",
        speed: SpeedClass::Medium,
        category: Category::Thinking,
    },
    ModelDescriptor {
        id: "gpt-oss:20b",
        name: "GPT-OSS 20B",
        description: "OpenAI-style thinking model, very capable",
        size_label: "12GB",
        speed: SpeedClass::Slow,
        category: Category::Thinking,
    },
    ModelDescriptor {
        id: "llama3.1:8b",
        name: "Llama 3.1 8B",
        description: "Meta's proven model, reliable and fast",
        size_label: "4.7GB",
        speed: SpeedClass::Medium,
        category: Category::Reliable,
    },
    DEFAULT_MODEL,
];

/// The built-in models plus the user's persisted selection.
pub struct ModelCatalog {
    store: Arc<dyn KeyValueStore>,
    selected: RwLock<String>,
}

impl ModelCatalog {
    /// Read the selection from `store`; unreadable or missing means the default.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let selected = match store.get(SELECTED_MODEL_KEY) {
            Ok(Some(id)) => id,
            Ok(None) => DEFAULT_MODEL_ID.to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read selected model, using default");
                DEFAULT_MODEL_ID.to_string()
            }
        };
        debug!(model = %selected, "model selection loaded");
        Self {
            store,
            selected: RwLock::new(selected),
        }
    }

    /// All models in table order.
    pub fn list_models(&self) -> &'static [ModelDescriptor] {
        BUILTIN_MODELS
    }

    pub fn get(&self, id: &str) -> Option<&'static ModelDescriptor> {
        BUILTIN_MODELS.iter().find(|m| m.id == id)
    }

    /// Models grouped by category in display order; empty categories are skipped.
    pub fn by_category(&self) -> Vec<(Category, Vec<&'static ModelDescriptor>)> {
        Category::ALL
            .iter()
            .map(|&category| {
                let models = BUILTIN_MODELS
                    .iter()
                    .filter(|m| m.category == category)
                    .collect::<Vec<_>>();
                (category, models)
            })
            .filter(|(_, models)| !models.is_empty())
            .collect()
    }

    /// The raw persisted selection, which may not be a catalog id.
    pub fn selected_id(&self) -> String {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The selected model, or [`DEFAULT_MODEL`] if the selection is not in the catalog.
    pub fn current_model(&self) -> &'static ModelDescriptor {
        let selected = self.selected_id();
        match self.get(&selected) {
            Some(model) => model,
            None => {
                debug!(model = %selected, "selected model not in catalog, using default");
                &DEFAULT_MODEL
            }
        }
    }

    /// Make `id` the selection and persist it.
    ///
    /// This only records the choice; whether Ollama has the model is a separate question.
    pub fn select_model(&self, id: &str) -> Result<&'static ModelDescriptor, AiError> {
        let model = self
            .get(id)
            .ok_or_else(|| AiError::UnknownModel(id.to_string()))?;

        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = model.id.to_string();
        if let Err(e) = self.store.set(SELECTED_MODEL_KEY, model.id) {
            warn!(error = %e, model = model.id, "failed to persist model selection");
        }
        info!(model = model.id, "model selected");
        Ok(model)
    }
}
