//! Typed view of the merged configuration.
//!
//! Every section carries serde defaults, so an empty `config.yml` yields the
//! built-in portfolio setup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::service::redact_sensitive_values;
use super::validation::validate_config;
use super::ConfigError;
use crate::rag::Passage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub app: AppSettings,
    pub llm: LlmSettings,
    pub rag: RagSettings,
    pub persona: PersonaSettings,
    pub messages: MessageSettings,
    pub knowledge: KnowledgeSettings,
}

impl Settings {
    /// Validates the raw merged config and decodes it.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        validate_config(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// JSON view with credentials masked, for logging.
    pub fn redacted(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => redact_sensitive_values(&value),
            Err(_) => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Longest accepted query, in characters.
    pub max_input_length: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_input_length: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
    pub embedding_batch_size: usize,
}

impl LlmSettings {
    /// The credential, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: 60,
            embedding_batch_size: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Embed the query and pick the closest chunks.
    Similarity,
    /// Send the whole knowledge store as context.
    Static,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Similarity => "similarity",
            RetrievalMode::Static => "static",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub mode: RetrievalMode,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            mode: RetrievalMode::Similarity,
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    pub name: String,
    pub short_name: String,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            name: "Khalid Mehtab Khan".to_string(),
            short_name: "Khalid".to_string(),
        }
    }
}

/// Fixed user-facing copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    pub fallback_context: String,
    pub apology: String,
    pub config_error: String,
    pub contact_ack: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            fallback_context:
                "Khalid Mehtab Khan is an NLP Researcher & Data Scientist based in San Francisco, CA."
                    .to_string(),
            apology: "I'm having trouble connecting right now. Please try again later.".to_string(),
            config_error: "Server configuration error: OpenAI API key not set.".to_string(),
            contact_ack: "Thank you for your message! I'll get back to you soon.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    /// Replaces the built-in biography when set.
    pub passages: Option<Vec<Passage>>,
}
