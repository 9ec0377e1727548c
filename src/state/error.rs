use thiserror::Error;

use crate::core::config::ConfigError;
use crate::llm::ProviderError;
use crate::rag::{IndexError, KnowledgeError};

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid knowledge passages: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Failed to initialize LLM client: {0}")]
    Provider(#[source] ProviderError),

    #[error("Failed to build embedding index: {0}")]
    Index(#[from] IndexError),
}
