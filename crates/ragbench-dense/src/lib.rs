pub mod embed;
pub mod index;

pub use embed::HashEmbedder;
pub use index::{normalize, FlatIpIndex};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

use ragbench_core::error::Error;
use ragbench_core::traits::{Embedder, Retriever};
use ragbench_core::types::{Chunk, SetupMetrics};

const EMBED_BATCH_SIZE: usize = 32;

/// Dense vector retriever: embeds every chunk through the provider,
/// L2-normalizes, and scans a flat inner-product index (cosine similarity
/// on normalized vectors).
pub struct DenseRetriever {
    embedder: Box<dyn Embedder>,
    index: Option<FlatIpIndex>,
    chunks: Vec<Chunk>,
}

/// On-disk form of the index artifact. The parallel chunk list is stored
/// separately so reporting can size the two files independently.
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    index: FlatIpIndex,
}

impl DenseRetriever {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder, index: None, chunks: Vec::new() }
    }

    fn embed_all(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let pb = ProgressBar::new(texts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            let embedded = self
                .embedder
                .embed_batch(batch)
                .map_err(|e| Error::Provider(format!("embedding call failed: {e}")))?;
            if embedded.len() != batch.len() {
                return Err(Error::Provider(format!(
                    "embedding provider returned {} vectors for {} texts",
                    embedded.len(),
                    batch.len()
                ))
                .into());
            }
            vectors.extend(embedded);
            pb.set_position(vectors.len() as u64);
        }
        pb.finish_and_clear();
        Ok(vectors)
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Provider(format!("query embedding failed: {e}")))?;
        if vectors.len() != 1 {
            return Err(Error::Provider(format!(
                "embedding provider returned {} vectors for one query",
                vectors.len()
            ))
            .into());
        }
        let mut v = vectors.remove(0);
        normalize(&mut v);
        Ok(v)
    }

    /// Persist the index and the corpus as two JSON artifacts.
    pub fn save(&self, index_path: &Path, chunks_path: &Path) -> Result<()> {
        let index = self.index.as_ref().ok_or_else(|| {
            Error::Precondition("save() called before setup()".to_string())
        })?;
        let persisted = PersistedIndex { index: index.clone() };
        fs::write(index_path, serde_json::to_string(&persisted)?)
            .with_context(|| format!("writing index to {}", index_path.display()))?;
        fs::write(chunks_path, serde_json::to_string(&self.chunks)?)
            .with_context(|| format!("writing chunks to {}", chunks_path.display()))?;
        Ok(())
    }

    /// Restore a saved index + chunk pair. Substitutes for the setup phase:
    /// the retriever is query-ready on success.
    pub fn load(&mut self, index_path: &Path, chunks_path: &Path) -> Result<()> {
        let index_json = fs::read_to_string(index_path)
            .with_context(|| format!("reading index from {}", index_path.display()))?;
        let persisted: PersistedIndex = serde_json::from_str(&index_json)
            .map_err(|e| Error::IndexCorruption(format!("unreadable index artifact: {e}")))?;
        let chunks_json = fs::read_to_string(chunks_path)
            .with_context(|| format!("reading chunks from {}", chunks_path.display()))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&chunks_json)
            .map_err(|e| Error::IndexCorruption(format!("unreadable chunk artifact: {e}")))?;

        if persisted.index.len() != chunks.len() {
            return Err(Error::IndexCorruption(format!(
                "index has {} vectors but chunk list has {} entries",
                persisted.index.len(),
                chunks.len()
            ))
            .into());
        }
        if persisted.index.dim() != self.embedder.dim() {
            return Err(Error::IndexCorruption(format!(
                "index dimension {} does not match embedder dimension {}",
                persisted.index.dim(),
                self.embedder.dim()
            ))
            .into());
        }

        self.index = Some(persisted.index);
        self.chunks = chunks;
        Ok(())
    }
}

impl Retriever for DenseRetriever {
    fn name(&self) -> &str {
        "dense-vector"
    }

    /// Embed all chunks (provider cost reported as `embedding_ms`), then
    /// normalize and build the flat index (`indexing_ms`).
    fn setup(&mut self, corpus: &[Chunk]) -> Result<SetupMetrics> {
        let mut metrics = SetupMetrics::default();
        let texts: Vec<String> = corpus.iter().map(|c| c.text.clone()).collect();

        println!("[{}] Embedding {} chunks...", self.name(), texts.len());
        let start = Instant::now();
        let mut vectors = self.embed_all(&texts)?;
        metrics.embedding_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let mut index = FlatIpIndex::new(self.embedder.dim());
        for v in &mut vectors {
            normalize(v);
        }
        for v in vectors {
            index.add(v)?;
        }
        metrics.indexing_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.chunks = corpus.to_vec();
        self.index = Some(index);
        println!("[{}] Indexed {} chunks", self.name(), self.chunks.len());
        Ok(metrics)
    }

    /// Top-k chunk texts by descending inner product; ties keep
    /// index-insertion order.
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        let index = self.index.as_ref().ok_or_else(|| {
            Error::Precondition(format!("[{}] call setup() before retrieve()", self.name()))
        })?;
        let query_vec = self.embed_query(query)?;
        let hits = index.search(&query_vec, top_k)?;
        Ok(hits.into_iter().map(|(i, _)| self.chunks[i].text.clone()).collect())
    }
}
