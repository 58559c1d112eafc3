//! Reduction of accumulated per-query samples into one summary record per
//! retriever × generator combination.

use serde::{Deserialize, Serialize};

use ragbench_core::types::{GenerationResult, JudgeSample, JudgeScores, RetrievalResult, SetupMetrics};

/// Raw per-question measurements kept for detailed reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerQuestionRecord {
    pub question: String,
    pub retrieval_ms: f64,
    pub generation_ms: f64,
    pub tokens: u64,
}

/// Per-combination accumulator, owned by the runner and threaded through
/// the run as a value.
#[derive(Default)]
pub struct ComboAccumulator {
    pub retrieval_times: Vec<f64>,
    pub generation_times: Vec<f64>,
    pub token_counts: Vec<u64>,
    pub samples: Vec<JudgeSample>,
    pub per_question: Vec<PerQuestionRecord>,
}

impl ComboAccumulator {
    /// Record one question's measurements for this combination.
    pub fn record(
        &mut self,
        question: &str,
        ground_truth: &str,
        retrieval: &RetrievalResult,
        generation: &GenerationResult,
    ) {
        self.retrieval_times.push(retrieval.latency_ms);
        self.generation_times.push(generation.latency_ms);
        self.token_counts.push(generation.tokens_used);
        self.samples.push(JudgeSample {
            question: question.to_string(),
            answer: generation.answer.clone(),
            contexts: retrieval.chunks.clone(),
            ground_truth: ground_truth.to_string(),
        });
        self.per_question.push(PerQuestionRecord {
            question: question.to_string(),
            retrieval_ms: retrieval.latency_ms,
            generation_ms: generation.latency_ms,
            tokens: generation.tokens_used,
        });
    }

    pub fn len(&self) -> usize {
        self.per_question.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_question.is_empty()
    }
}

/// All metrics for one retriever × generator combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboResult {
    pub retriever_name: String,
    pub generator_name: String,
    pub setup_metrics: SetupMetrics,
    pub avg_retrieval_ms: f64,
    pub avg_generation_ms: f64,
    pub avg_total_ms: f64,
    pub avg_tokens: f64,
    pub judge_scores: JudgeScores,
    pub per_question: Vec<PerQuestionRecord>,
}

impl ComboResult {
    pub fn combo(&self) -> String {
        format!("{}+{}", self.retriever_name, self.generator_name)
    }
}

/// Reduce one accumulator into its summary record. Setup metrics come from
/// the retriever wrapper, not re-measured here.
pub fn summarize(
    retriever_name: &str,
    generator_name: &str,
    setup_metrics: SetupMetrics,
    judge_scores: JudgeScores,
    acc: ComboAccumulator,
) -> ComboResult {
    let n = acc.len().max(1) as f64;
    let retrieval_sum: f64 = acc.retrieval_times.iter().sum();
    let generation_sum: f64 = acc.generation_times.iter().sum();
    let token_sum: u64 = acc.token_counts.iter().sum();
    ComboResult {
        retriever_name: retriever_name.to_string(),
        generator_name: generator_name.to_string(),
        setup_metrics,
        avg_retrieval_ms: retrieval_sum / n,
        avg_generation_ms: generation_sum / n,
        avg_total_ms: (retrieval_sum + generation_sum) / n,
        avg_tokens: token_sum as f64 / n,
        judge_scores,
        per_question: acc.per_question,
    }
}
