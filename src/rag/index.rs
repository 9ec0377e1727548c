//! Embedding index over knowledge chunks.
//!
//! `VectorIndex` is the narrow seam the retriever depends on. The shipped
//! implementation, `BruteForceIndex`, keeps every chunk vector as a row of an
//! ndarray matrix and scores a query against all of them.

use std::sync::Arc;

use async_trait::async_trait;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chunker::Chunk;
use crate::llm::{EmbeddingProvider, ProviderError};
use crate::vector_math::{cosine_scores, rank_descending};

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("embedding provider failed: {0}")]
    Embedding(#[from] ProviderError),
    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid embedding matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// A chunk returned from a search, with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk: Chunk,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` chunks closest to `query`, best first.
    ///
    /// `k` is clamped into `1..=len()`; an empty index returns no hits.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, IndexError>;
}

/// Exact nearest-neighbour search by full scan.
pub struct BruteForceIndex {
    chunks: Vec<Chunk>,
    vectors: Array2<f32>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for BruteForceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BruteForceIndex")
            .field("chunks", &self.chunks.len())
            .field("dimension", &self.dimension())
            .finish()
    }
}

impl BruteForceIndex {
    /// Embeds every chunk in one batch and builds the matrix.
    ///
    /// Any provider failure is returned as-is; the caller decides whether it
    /// is fatal. The index is only handed out once fully built.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, IndexError> {
        if chunks.is_empty() {
            return Ok(Self {
                chunks,
                vectors: Array2::zeros((0, 0)),
                embedder,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IndexError::CountMismatch {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }

        let dimension = embeddings[0].len();
        let mut flat = Vec::with_capacity(dimension * embeddings.len());
        for embedding in &embeddings {
            if embedding.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            flat.extend_from_slice(embedding);
        }

        let vectors = Array2::from_shape_vec((chunks.len(), dimension), flat)?;
        tracing::info!(
            "Built embedding index: {} chunks, dimension {} ({})",
            chunks.len(),
            dimension,
            embedder.name()
        );

        Ok(Self {
            chunks,
            vectors,
            embedder,
        })
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }
}

#[async_trait]
impl VectorIndex for BruteForceIndex {
    fn len(&self) -> usize {
        self.chunks.len()
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        if query_vector.len() != self.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension(),
                actual: query_vector.len(),
            });
        }

        let scores = cosine_scores(self.vectors.view(), ArrayView1::from(&query_vector[..]));
        let k = k.clamp(1, self.chunks.len());

        let hits: Vec<SearchHit> = rank_descending(scores.view())
            .into_iter()
            .take(k)
            .map(|(idx, score)| SearchHit {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect();

        tracing::debug!(
            "Index search returned {} hits (top score {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );
        Ok(hits)
    }
}
