pub mod bm25;
pub mod tokenize;

pub use bm25::Bm25Index;
pub use tokenize::tokenize;

use anyhow::Result;
use std::time::Instant;

use ragbench_core::error::Error;
use ragbench_core::traits::Retriever;
use ragbench_core::types::{Chunk, SetupMetrics};

/// Sparse keyword retriever: BM25 over the shared tokenization rule.
/// No embeddings needed, fast setup, strong on exact keyword matches.
pub struct SparseRetriever {
    index: Option<Bm25Index>,
    texts: Vec<String>,
}

impl SparseRetriever {
    pub fn new() -> Self {
        Self { index: None, texts: Vec::new() }
    }
}

impl Default for SparseRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl Retriever for SparseRetriever {
    fn name(&self) -> &str {
        "sparse-bm25"
    }

    /// Tokenize every chunk and build the BM25 index. Calling setup again
    /// replaces the previous index.
    fn setup(&mut self, corpus: &[Chunk]) -> Result<SetupMetrics> {
        let mut metrics = SetupMetrics::default();

        println!("[{}] Tokenizing {} chunks...", self.name(), corpus.len());
        let start = Instant::now();
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|c| tokenize(&c.text)).collect();
        metrics.tokenizing_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let index = Bm25Index::build(&tokenized);
        metrics.indexing_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.texts = corpus.iter().map(|c| c.text.clone()).collect();
        self.index = Some(index);
        println!("[{}] BM25 index built", self.name());
        Ok(metrics)
    }

    /// Top-k chunk texts by BM25 score, descending, ties broken by original
    /// corpus order (stable sort).
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        let index = self.index.as_ref().ok_or_else(|| {
            Error::Precondition(format!("[{}] call setup() before retrieve()", self.name()))
        })?;

        let query_tokens = tokenize(query);
        let scores = index.scores(&query_tokens);

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(top_k);

        Ok(order.into_iter().map(|i| self.texts[i].clone()).collect())
    }
}
