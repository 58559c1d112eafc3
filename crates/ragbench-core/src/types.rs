//! Domain types shared by retrievers, generators, the judge, and the runner.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// A fixed-size slice of source text with stable identity, the unit of
/// retrieval.
///
/// - `id`: unique chunk identifier within a corpus
/// - `source`: name of the document the chunk came from
/// - `text`: the text payload
/// - `position`: position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub source: String,
    pub text: String,
    pub position: usize,
}

/// Resource usage and per-phase timing captured during retriever setup.
///
/// Strategy implementations fill the phase fields (`embedding_ms`,
/// `tokenizing_ms`, `indexing_ms`); the instrumented wrapper fills
/// `total_ms` and `memory_peak_mb` around the whole setup call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupMetrics {
    pub total_ms: f64,
    pub embedding_ms: f64,
    pub tokenizing_ms: f64,
    pub indexing_ms: f64,
    pub memory_peak_mb: f64,
    pub storage_mb: f64,
}

/// Chunks returned for one query plus the measured retrieval latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunks: Vec<String>,
    pub latency_ms: f64,
    pub metadata: Meta,
}

/// One generated answer with its latency and token cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub answer: String,
    pub latency_ms: f64,
    pub tokens_used: u64,
    pub metadata: Meta,
}

/// Everything the quality judge needs to score one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeSample {
    pub question: String,
    pub answer: String,
    pub contexts: Vec<String>,
    pub ground_truth: String,
}

/// Quality scores keyed by dimension name, each in `[0, 1]`, plus their
/// unweighted average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgeScores {
    pub dimensions: BTreeMap<String, f64>,
    pub average: f64,
}

impl JudgeScores {
    /// Build scores from named dimensions; the average is the unweighted
    /// mean over all dimensions.
    pub fn from_dimensions(dimensions: BTreeMap<String, f64>) -> Self {
        let average = if dimensions.is_empty() {
            0.0
        } else {
            dimensions.values().sum::<f64>() / dimensions.len() as f64
        };
        Self { dimensions, average }
    }
}
