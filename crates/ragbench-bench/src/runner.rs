//! Benchmark orchestration across every retriever × generator combination.
//!
//! Three strictly sequential phases: an interleaved query phase, per-combo
//! accumulation, and a judging phase. Questions run in fixed order, and each
//! question hits every combination before the next question starts, so any
//! time-varying external condition (rate limiting, provider load) affects
//! all combinations comparably within the same question.

use anyhow::Result;

use ragbench_core::corpus::GroundTruthEntry;
use ragbench_core::error::Error;
use ragbench_core::traits::Judge;
use ragbench_core::types::JudgeScores;

use crate::aggregate::{summarize, ComboAccumulator, ComboResult};
use crate::instrument::{BoxedTimedRetriever, TimedGenerator};

pub struct BenchmarkRunner {
    retrievers: Vec<BoxedTimedRetriever>,
    generators: Vec<TimedGenerator>,
    questions: Vec<GroundTruthEntry>,
    top_k: usize,
    judge: Box<dyn Judge>,
}

impl BenchmarkRunner {
    /// Retrievers must already be set up via `setup_and_time`; the runner
    /// only measures query-time performance.
    pub fn new(
        retrievers: Vec<BoxedTimedRetriever>,
        generators: Vec<TimedGenerator>,
        questions: Vec<GroundTruthEntry>,
        top_k: usize,
        judge: Box<dyn Judge>,
    ) -> Self {
        Self { retrievers, generators, questions, top_k, judge }
    }

    /// Run every combination over every question. Any retrieval,
    /// generation, or judging failure aborts the whole run; no partial
    /// results are produced.
    pub fn run_all(&self) -> Result<Vec<ComboResult>> {
        let combos: Vec<(usize, usize)> = (0..self.retrievers.len())
            .flat_map(|r| (0..self.generators.len()).map(move |g| (r, g)))
            .collect();

        let mut acc: Vec<ComboAccumulator> =
            combos.iter().map(|_| ComboAccumulator::default()).collect();

        // Phase 1+2: interleaved queries, accumulated per combo.
        for (q_i, entry) in self.questions.iter().enumerate() {
            let preview: String = entry.question.chars().take(65).collect();
            println!("\nQ{}/{}: {}...", q_i + 1, self.questions.len(), preview);
            for (c_i, &(r_i, g_i)) in combos.iter().enumerate() {
                let retriever = &self.retrievers[r_i];
                let generator = &self.generators[g_i];

                let retrieval = retriever.retrieve_and_time(&entry.question, self.top_k)?;
                let generation = generator.generate_and_time(&entry.question, &retrieval.chunks)?;

                acc[c_i].record(&entry.question, &entry.answer, &retrieval, &generation);
                println!(
                    "  {}+{}: ret={:.0}ms  gen={:.0}ms",
                    retriever.name(),
                    generator.name(),
                    retrieval.latency_ms,
                    generation.latency_ms
                );
            }
        }

        // Phase 3: judge each combination over its full sample batch.
        let mut results = Vec::with_capacity(combos.len());
        for (accumulator, &(r_i, g_i)) in acc.into_iter().zip(combos.iter()) {
            let retriever = &self.retrievers[r_i];
            let generator = &self.generators[g_i];
            println!(
                "\nJudging {}+{} ({} samples)...",
                retriever.name(),
                generator.name(),
                accumulator.len()
            );
            let scores = self.judge.evaluate_batch(&accumulator.samples)?;
            validate_scores(&scores)?;

            let result = summarize(
                retriever.name(),
                generator.name(),
                retriever.setup_metrics().clone(),
                scores,
                accumulator,
            );
            println!(
                "  avg score: {:.3} | avg latency: {:.0}ms",
                result.judge_scores.average, result.avg_total_ms
            );
            results.push(result);
        }
        Ok(results)
    }
}

/// The oracle must return at least one named dimension, every value in
/// [0, 1]. Anything else is a malformed response, never silently coerced.
fn validate_scores(scores: &JudgeScores) -> Result<()> {
    if scores.dimensions.is_empty() {
        return Err(Error::MalformedOracle("judge returned no dimensions".to_string()).into());
    }
    for (name, value) in &scores.dimensions {
        if !(0.0..=1.0).contains(value) || !value.is_finite() {
            return Err(Error::MalformedOracle(format!(
                "dimension '{name}' out of range: {value}"
            ))
            .into());
        }
    }
    Ok(())
}
