//! Retrieval over the portfolio knowledge store.
//!
//! - `knowledge`: the fixed passages describing the subject
//! - `chunker`: overlapping, boundary-aware splitting
//! - `index`: embedding index behind the `VectorIndex` trait
//! - `retriever`: turns search hits into a prompt context

mod chunker;
mod index;
mod knowledge;
mod retriever;

pub use chunker::{split, Chunk, Chunker};
pub use index::{BruteForceIndex, IndexError, SearchHit, VectorIndex, DEFAULT_TOP_K};
pub use knowledge::{KnowledgeError, KnowledgeStore, Passage};
pub use retriever::{ContextRetriever, FallbackReason, RetrievalOutcome};
