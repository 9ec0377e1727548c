//! Knowledge store: the fixed set of labeled biography passages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chunker::{Chunk, Chunker};

/// A labeled piece of biography text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub category: String,
    pub content: String,
}

impl Passage {
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("passage category must not be blank")]
    BlankCategory,
    #[error("duplicate passage category: {0}")]
    DuplicateCategory(String),
}

/// Immutable collection of passages, fixed at startup.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    passages: Vec<Passage>,
}

impl KnowledgeStore {
    pub fn new(passages: Vec<Passage>) -> Result<Self, KnowledgeError> {
        let mut seen = HashSet::new();
        for passage in &passages {
            let category = passage.category.trim();
            if category.is_empty() {
                return Err(KnowledgeError::BlankCategory);
            }
            if !seen.insert(category.to_string()) {
                return Err(KnowledgeError::DuplicateCategory(category.to_string()));
            }
        }
        Ok(Self { passages })
    }

    /// The built-in portfolio biography.
    pub fn portfolio() -> Self {
        Self {
            passages: default_passages(),
        }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Splits every passage, in store order. Chunk indices restart per passage.
    pub fn chunks(&self, chunker: &Chunker) -> Vec<Chunk> {
        self.passages
            .iter()
            .flat_map(|passage| chunker.chunk_passage(passage))
            .collect()
    }

    /// Whole store as a bullet list, used when retrieval is disabled.
    pub fn render(&self) -> String {
        self.passages
            .iter()
            .map(|passage| format!("- {}", passage.content.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn default_passages() -> Vec<Passage> {
    vec![
        Passage::new(
            "personal",
            "Khalid Mehtab Khan is a 26-year-old NLP Researcher & Data Scientist based in San Francisco, CA. GitHub: https://github.com/Kahl-d, LinkedIn: https://www.linkedin.com/in/khalidm-khan/, Website: https://khalidmk.vercel.app",
        ),
        Passage::new(
            "education",
            "Currently pursuing Master of Science in Data Science & Artificial Intelligence at San Francisco State University (Aug 2023 – Aug 2025) with 4.0 GPA. Bachelor of Technology in Computer Science and Engineering from The LNM Institute of Information Technology, India (Aug 2017 – Sep 2021).",
        ),
        Passage::new(
            "current_role",
            "NLP Researcher at Tacit Alma Lab (Aug 2024 – Present) in San Francisco, CA. Develop essay-aware DeBERTa-based classifier for multi-label theme detection, improving F1 on rare classes by 5%. Fine-tune with domain-adaptive masked language modeling, automate hyperparameter optimization using Optuna, and use t-SNE for embedding analysis.",
        ),
        Passage::new(
            "previous_role",
            "Healthcare Associate at Innovaccer (Jan 2021 – Sep 2022) in Noida, India. Led team of 3 to architect ETL pipelines for 15+ healthcare data sources, reducing data latency by 30%. Designed 10+ Tableau dashboards improving client outreach by 15%. Worked with AWS EC2 and S3.",
        ),
        Passage::new(
            "skills_programming",
            "Programming skills: Python, SQL, JavaScript, React, Flask, FastAPI. Use Python extensively for NLP research, fine-tuning models, and building ML systems.",
        ),
        Passage::new(
            "skills_ml_ai",
            "Machine Learning & AI: PyTorch, LangChain, Transformers, BERT, T5, Mistral-7B, GPT-4. Work with transformers and fine-tune models for text classification and NLP tasks.",
        ),
        Passage::new(
            "skills_nlp",
            "NLP expertise: Text Classification, Entity Extraction, Fine-Tuning, LoRA, QLoRA, RAG, Embeddings, Semantic Search. Specialize in advanced NLP techniques and model optimization.",
        ),
        Passage::new(
            "skills_mlops",
            "MLOps & Cloud: AWS Lambda, AWS S3, AWS EC2, Docker, Weights & Biases, FAISS, Pinecone, Ollama. Deploy models using AWS services and manage ML infrastructure.",
        ),
        Passage::new(
            "skills_data",
            "Data Analytics: ETL, Data Warehousing, Tableau, A/B Testing, t-SNE, Experiment Design. Build data pipelines and create analytics dashboards.",
        ),
        Passage::new(
            "project_secure_sense",
            "Secure Sense project won SF Hacks 2025 Emerging AI Innovation award. Built privacy-preserving browser extension using fine-tuned DistilBERT for real-time PII redaction. Compressed model by 80% while maintaining 94% accuracy through knowledge distillation. Used AWS Lambda and S3 for serverless fallback system ensuring 99% uptime.",
        ),
        Passage::new(
            "project_data_augmentation",
            "Context-Aware Data Augmentation Tool uses BioBERT with masked-language modeling guided by domain knowledge graph to generate clinically valid synthetic data. Increased Random-Forest classifier accuracy by 5 percentage points on imbalanced public-health datasets, outperforming SMOTE and back-translation baselines.",
        ),
    ]
}
