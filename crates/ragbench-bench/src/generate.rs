//! Offline answer-generation backend.
//!
//! Answers with the best-ranked retrieved context and accounts tokens the
//! way a hosted model reports usage: prompt plus completion. Deterministic,
//! so latency and quality comparisons across retrievers stay meaningful
//! without a model provider configured.

use anyhow::Result;

use ragbench_core::traits::Generator;
use ragbench_core::types::{GenerationResult, Meta};

pub struct ExtractiveGenerator;

impl ExtractiveGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtractiveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for ExtractiveGenerator {
    fn name(&self) -> &str {
        "extractive"
    }

    fn generate(&self, query: &str, contexts: &[String]) -> Result<GenerationResult> {
        let answer = match contexts.first() {
            Some(context) => context.clone(),
            None => "No relevant context was retrieved for this question.".to_string(),
        };

        // Prompt-equivalent accounting: query + context block + answer.
        let prompt_tokens: usize = contexts
            .iter()
            .map(|c| c.split_whitespace().count())
            .sum::<usize>()
            + query.split_whitespace().count();
        let tokens_used = (prompt_tokens + answer.split_whitespace().count()) as u64;

        let mut metadata = Meta::new();
        metadata.insert("backend".to_string(), "extractive".to_string());
        Ok(GenerationResult { answer, latency_ms: 0.0, tokens_used, metadata })
    }
}
