//! Deterministic provider doubles shared by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{ChatRequest, EmbeddingProvider, LlmProvider, ProviderError};

/// Keyword lists, one per embedding axis.
const AXES: [&[&str]; 6] = [
    &["role", "current", "job", "work", "researcher", "lab", "present", "position", "associate"],
    &["study", "studied", "university", "degree", "master", "bachelor", "gpa", "education", "school"],
    &["python", "sql", "javascript", "react", "pytorch", "docker", "skills", "programming", "tableau"],
    &["project", "projects", "award", "hackathon", "built", "tool"],
    &["github", "linkedin", "website", "contact", "email"],
    &["san", "francisco", "india", "based", "where"],
];

/// Bag-of-words embedder: each axis counts keyword hits.
///
/// Same text always gives the same vector. Can be switched to fail.
#[derive(Default)]
pub struct KeywordEmbedder {
    failing: AtomicBool,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    embedded_texts: AtomicUsize,
}

impl KeywordEmbedder {
    pub const DIMENSION: usize = AXES.len();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.single_calls() + self.batch_calls()
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; Self::DIMENSION];
        for token in text.split_whitespace() {
            let token = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            for (axis, keywords) in AXES.iter().enumerate() {
                if keywords.contains(&token.as_str()) {
                    vector[axis] += 1.0;
                }
            }
        }
        vector
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 503,
                body: "embedding service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }
}

/// Language model that replies from a script and records every request.
pub struct ScriptedLlm {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(ProviderError::Status {
                status: 429,
                body: reason.clone(),
            }),
        }
    }
}
