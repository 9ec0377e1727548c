pub mod openai;
pub mod provider;
pub mod service;
pub mod types;


pub use openai::OpenAiClient;
pub use provider::{EmbeddingProvider, LlmProvider, ProviderError};
pub use service::{ChatService, Providers};
pub use types::{ChatMessage, ChatRequest};
