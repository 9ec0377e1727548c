use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::Settings;
use crate::llm::{ChatService, OpenAiClient, Providers};
use crate::rag::KnowledgeStore;

pub mod error;

use error::InitializationError;

/// Shared application state handed to every route.
///
/// Built once at startup; nothing in it is mutated afterwards.
pub struct AppState {
    pub settings: Settings,
    pub chat: Arc<ChatService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds the chat pipeline from validated settings.
    ///
    /// 1. Loads the knowledge passages (configured or built-in)
    /// 2. Creates the OpenAI-compatible client when a key is present
    /// 3. Embeds and indexes every chunk in similarity mode
    ///
    /// A missing key is not an error: the service starts unconfigured.
    pub async fn initialize(settings: Settings) -> Result<Arc<Self>, InitializationError> {
        let store = match &settings.knowledge.passages {
            Some(passages) => KnowledgeStore::new(passages.clone())?,
            None => KnowledgeStore::portfolio(),
        };
        tracing::info!("Loaded {} knowledge passages", store.len());

        let providers = match settings.llm.api_key() {
            Some(key) => {
                let client = Arc::new(
                    OpenAiClient::new(&settings.llm, key)
                        .map_err(InitializationError::Provider)?,
                );
                Some(Providers {
                    llm: client.clone(),
                    embedder: client,
                })
            }
            None => None,
        };

        let chat = ChatService::build(&settings, &store, providers).await?;
        if chat.is_configured() {
            tracing::info!(
                "Chat service ready ({} retrieval, {} chunks indexed)",
                settings.rag.mode.as_str(),
                chat.indexed_chunks()
            );
        }

        Ok(Self::from_parts(settings, chat))
    }

    pub fn from_parts(settings: Settings, chat: ChatService) -> Arc<Self> {
        Arc::new(Self {
            settings,
            chat: Arc::new(chat),
            started_at: Utc::now(),
        })
    }
}
