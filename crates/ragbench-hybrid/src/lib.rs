pub mod fusion;

pub use fusion::{fused_scores, reciprocal_rank_fusion, DEFAULT_RRF_K};

use anyhow::Result;

use ragbench_core::error::Error;
use ragbench_core::traits::Retriever;
use ragbench_core::types::{Chunk, SetupMetrics};

/// Hybrid retriever: delegated composition of a dense and a sparse
/// sub-retriever, merged with Reciprocal Rank Fusion.
pub struct HybridRetriever<D: Retriever, S: Retriever> {
    dense: D,
    sparse: S,
    rrf_k: f64,
    corpus_len: usize,
    dense_metrics: SetupMetrics,
    sparse_metrics: SetupMetrics,
    ready: bool,
}

impl<D: Retriever, S: Retriever> HybridRetriever<D, S> {
    pub fn new(dense: D, sparse: S) -> Self {
        Self::with_rrf_k(dense, sparse, DEFAULT_RRF_K)
    }

    pub fn with_rrf_k(dense: D, sparse: S, rrf_k: f64) -> Self {
        Self {
            dense,
            sparse,
            rrf_k,
            corpus_len: 0,
            dense_metrics: SetupMetrics::default(),
            sparse_metrics: SetupMetrics::default(),
            ready: false,
        }
    }

    /// Setup metrics reported by the dense child during the last setup.
    pub fn dense_metrics(&self) -> &SetupMetrics {
        &self.dense_metrics
    }

    /// Setup metrics reported by the sparse child during the last setup.
    pub fn sparse_metrics(&self) -> &SetupMetrics {
        &self.sparse_metrics
    }
}

impl<D: Retriever, S: Retriever> Retriever for HybridRetriever<D, S> {
    fn name(&self) -> &str {
        "hybrid-rrf"
    }

    /// Set up both children and compose their phase timings:
    /// `embedding_ms` comes from the dense child, `tokenizing_ms` from the
    /// sparse child, `indexing_ms` is the sum of both. `total_ms` and
    /// `memory_peak_mb` are left for the outer wrapper, measured once
    /// around the whole composite so shared overhead is not double-counted.
    fn setup(&mut self, corpus: &[Chunk]) -> Result<SetupMetrics> {
        println!("[{}] Setting up dense sub-retriever...", self.name());
        self.dense_metrics = self.dense.setup(corpus)?;

        println!("[{}] Setting up sparse sub-retriever...", self.name());
        self.sparse_metrics = self.sparse.setup(corpus)?;

        self.corpus_len = corpus.len();
        self.ready = true;

        let metrics = SetupMetrics {
            embedding_ms: self.dense_metrics.embedding_ms,
            tokenizing_ms: self.sparse_metrics.tokenizing_ms,
            indexing_ms: self.dense_metrics.indexing_ms + self.sparse_metrics.indexing_ms,
            ..SetupMetrics::default()
        };
        println!("[{}] Hybrid setup complete", self.name());
        Ok(metrics)
    }

    /// Pull `min(top_k * 3, corpus_len)` candidates from each child (dense
    /// scanned first) and fuse by RRF.
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        if !self.ready {
            return Err(Error::Precondition(format!(
                "[{}] call setup() before retrieve()",
                self.name()
            ))
            .into());
        }
        let candidate_k = (top_k * 3).min(self.corpus_len);

        let dense_results = self.dense.retrieve(query, candidate_k)?;
        let sparse_results = self.sparse.retrieve(query, candidate_k)?;

        Ok(reciprocal_rank_fusion(
            &[&dense_results, &sparse_results],
            self.rrf_k,
            top_k,
        ))
    }
}
