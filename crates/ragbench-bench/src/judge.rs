//! Deterministic lexical-overlap judge for offline runs.
//!
//! Scores the same four dimensions an LLM-as-judge oracle reports
//! (faithfulness, answer_relevancy, context_relevancy, completeness), but
//! from token overlap instead of a model call, so benchmark runs stay
//! reproducible without network access. Uses the sparse tokenization rule.

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};

use ragbench_core::error::Error;
use ragbench_core::traits::Judge;
use ragbench_core::types::{JudgeSample, JudgeScores};
use ragbench_sparse::tokenize;

pub struct OverlapJudge;

impl OverlapJudge {
    pub fn new() -> Self {
        Self
    }

    fn score_sample(sample: &JudgeSample) -> BTreeMap<String, f64> {
        let question: HashSet<String> = tokenize(&sample.question).into_iter().collect();
        let answer: HashSet<String> = tokenize(&sample.answer).into_iter().collect();
        let truth: HashSet<String> = tokenize(&sample.ground_truth).into_iter().collect();
        let contexts: HashSet<String> = sample
            .contexts
            .iter()
            .flat_map(|c| tokenize(c))
            .collect();

        let mut dims = BTreeMap::new();
        dims.insert("faithfulness".to_string(), coverage(&answer, &contexts));
        dims.insert("answer_relevancy".to_string(), coverage(&question, &answer));
        dims.insert("context_relevancy".to_string(), coverage(&question, &contexts));
        dims.insert("completeness".to_string(), coverage(&truth, &answer));
        dims
    }
}

impl Default for OverlapJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl Judge for OverlapJudge {
    fn evaluate_batch(&self, samples: &[JudgeSample]) -> Result<JudgeScores> {
        if samples.is_empty() {
            return Err(Error::Precondition("no samples to judge".to_string()).into());
        }
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for sample in samples {
            for (name, value) in Self::score_sample(sample) {
                *sums.entry(name).or_insert(0.0) += value;
            }
        }
        let n = samples.len() as f64;
        let dims: BTreeMap<String, f64> = sums.into_iter().map(|(k, v)| (k, v / n)).collect();
        Ok(JudgeScores::from_dimensions(dims))
    }
}

/// Fraction of `needles` present in `haystack`, 0.0 when `needles` is empty.
fn coverage(needles: &HashSet<String>, haystack: &HashSet<String>) -> f64 {
    if needles.is_empty() {
        return 0.0;
    }
    let found = needles.iter().filter(|t| haystack.contains(*t)).count();
    found as f64 / needles.len() as f64
}
