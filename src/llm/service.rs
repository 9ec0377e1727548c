use std::sync::Arc;

use crate::context::PromptComposer;
use crate::core::config::{LlmSettings, MessageSettings, RetrievalMode, Settings};
use crate::llm::provider::{EmbeddingProvider, LlmProvider};
use crate::llm::types::ChatRequest;
use crate::rag::{
    BruteForceIndex, Chunker, ContextRetriever, IndexError, KnowledgeStore, RetrievalOutcome,
};

/// External clients the chat pipeline needs once a credential is present.
#[derive(Clone)]
pub struct Providers {
    pub llm: Arc<dyn LlmProvider>,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

enum Backend {
    Ready {
        retriever: ContextRetriever,
        composer: PromptComposer,
        llm: Arc<dyn LlmProvider>,
    },
    /// No credential: every answer is the configuration error.
    Unconfigured,
}

/// Retrieve, compose, generate. Always yields text for the caller.
pub struct ChatService {
    backend: Backend,
    llm_settings: LlmSettings,
    messages: MessageSettings,
}

impl ChatService {
    pub fn new(
        retriever: ContextRetriever,
        composer: PromptComposer,
        llm: Arc<dyn LlmProvider>,
        llm_settings: LlmSettings,
        messages: MessageSettings,
    ) -> Self {
        Self {
            backend: Backend::Ready {
                retriever,
                composer,
                llm,
            },
            llm_settings,
            messages,
        }
    }

    pub fn unconfigured(messages: MessageSettings) -> Self {
        Self {
            backend: Backend::Unconfigured,
            llm_settings: LlmSettings::default(),
            messages,
        }
    }

    /// Wires the pipeline from settings.
    ///
    /// With `providers == None` the service is unconfigured and nothing is
    /// embedded. In similarity mode the index is built here, and an embedding
    /// failure is returned to the caller as fatal.
    pub async fn build(
        settings: &Settings,
        store: &KnowledgeStore,
        providers: Option<Providers>,
    ) -> Result<Self, IndexError> {
        if store.is_empty() {
            tracing::warn!("Knowledge store is empty; answers will use the fallback context");
        }

        let Some(providers) = providers else {
            tracing::warn!("API key is missing; chat requests will return a configuration error");
            return Ok(Self::unconfigured(settings.messages.clone()));
        };

        let fallback = settings.messages.fallback_context.clone();
        let retriever = match settings.rag.mode {
            RetrievalMode::Similarity => {
                let chunker = Chunker::new(settings.rag.chunk_size, settings.rag.chunk_overlap);
                let chunks = store.chunks(&chunker);
                let index = BruteForceIndex::build(chunks, providers.embedder).await?;
                ContextRetriever::similarity(Arc::new(index), settings.rag.top_k, fallback)
            }
            RetrievalMode::Static => ContextRetriever::fixed(store, fallback),
        };

        Ok(Self::new(
            retriever,
            PromptComposer::new(&settings.persona),
            providers.llm,
            settings.llm.clone(),
            settings.messages.clone(),
        ))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready { .. })
    }

    pub fn retrieval_mode(&self) -> Option<RetrievalMode> {
        match &self.backend {
            Backend::Ready { retriever, .. } => Some(retriever.mode()),
            Backend::Unconfigured => None,
        }
    }

    pub fn indexed_chunks(&self) -> usize {
        match &self.backend {
            Backend::Ready { retriever, .. } => retriever.indexed_chunks(),
            Backend::Unconfigured => 0,
        }
    }

    /// Answers `query`. Never fails: errors become fixed user-facing copy.
    pub async fn respond(&self, query: &str) -> String {
        let Backend::Ready {
            retriever,
            composer,
            llm,
        } = &self.backend
        else {
            return self.messages.config_error.clone();
        };

        let outcome = retriever.retrieve_outcome(query).await;
        if let RetrievalOutcome::Fallback(reason) = &outcome {
            tracing::debug!("Using fallback context: {:?}", reason);
        }
        let context = outcome.into_context(retriever.fallback());
        let prompt = composer.compose(query, &context);
        tracing::debug!("Composed prompt: {} chars", prompt.chars().count());

        let request = ChatRequest::from_prompt(prompt).with_settings(&self.llm_settings);
        match llm.complete(request).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::error!("LLM error ({}): empty completion", llm.name());
                    return self.messages.apology.clone();
                }
                text.to_string()
            }
            Err(err) => {
                tracing::error!("LLM error ({}): {}", llm.name(), err);
                self.messages.apology.clone()
            }
        }
    }
}
