//! Context retrieval for a single query.
//!
//! Retrieval never fails from the caller's point of view: problems are
//! reported as `RetrievalOutcome::Fallback` and resolved to the configured
//! fallback sentence by `ContextRetriever::retrieve`.

use std::sync::Arc;

use super::index::{VectorIndex, DEFAULT_TOP_K};
use super::knowledge::KnowledgeStore;
use crate::core::config::RetrievalMode;

const CONTEXT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing is indexed.
    EmptyIndex,
    /// Search ran but produced no usable text.
    NoHits,
    /// The index or embedding provider failed.
    SearchFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    Retrieved(String),
    Fallback(FallbackReason),
}

impl RetrievalOutcome {
    pub fn into_context(self, fallback: &str) -> String {
        match self {
            RetrievalOutcome::Retrieved(context) => context,
            RetrievalOutcome::Fallback(_) => fallback.to_string(),
        }
    }
}

enum Strategy {
    Similarity {
        index: Arc<dyn VectorIndex>,
        top_k: usize,
    },
    Static {
        context: String,
    },
}

pub struct ContextRetriever {
    strategy: Strategy,
    fallback: String,
}

impl ContextRetriever {
    /// Top-k similarity search over `index`.
    pub fn similarity(index: Arc<dyn VectorIndex>, top_k: usize, fallback: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Similarity {
                index,
                top_k: if top_k == 0 { DEFAULT_TOP_K } else { top_k },
            },
            fallback: fallback.into(),
        }
    }

    /// Always answers with the whole store.
    pub fn fixed(store: &KnowledgeStore, fallback: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Static {
                context: store.render(),
            },
            fallback: fallback.into(),
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        match self.strategy {
            Strategy::Similarity { .. } => RetrievalMode::Similarity,
            Strategy::Static { .. } => RetrievalMode::Static,
        }
    }

    /// Chunks searchable by this retriever; zero for the static strategy.
    pub fn indexed_chunks(&self) -> usize {
        match &self.strategy {
            Strategy::Similarity { index, .. } => index.len(),
            Strategy::Static { .. } => 0,
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub async fn retrieve_outcome(&self, query: &str) -> RetrievalOutcome {
        match &self.strategy {
            Strategy::Static { context } => {
                if context.is_empty() {
                    RetrievalOutcome::Fallback(FallbackReason::EmptyIndex)
                } else {
                    RetrievalOutcome::Retrieved(context.clone())
                }
            }
            Strategy::Similarity { index, top_k } => {
                if index.is_empty() {
                    return RetrievalOutcome::Fallback(FallbackReason::EmptyIndex);
                }

                match index.search(query, *top_k).await {
                    Ok(hits) => {
                        let parts: Vec<&str> = hits
                            .iter()
                            .map(|hit| hit.chunk.text.as_str())
                            .filter(|text| !text.trim().is_empty())
                            .collect();
                        if parts.is_empty() {
                            RetrievalOutcome::Fallback(FallbackReason::NoHits)
                        } else {
                            RetrievalOutcome::Retrieved(parts.join(CONTEXT_SEPARATOR))
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Vector search failed, using fallback context: {}", err);
                        RetrievalOutcome::Fallback(FallbackReason::SearchFailed(err.to_string()))
                    }
                }
            }
        }
    }

    /// Context string for `query`; the fallback sentence when retrieval fails.
    pub async fn retrieve(&self, query: &str) -> String {
        self.retrieve_outcome(query).await.into_context(&self.fallback)
    }
}
