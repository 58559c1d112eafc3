//! Typed configuration sections extracted from the Figment `Config`.
//!
//! Merged from `config.toml` + `config.<env>.toml` + `APP_*` env vars; every
//! field has a default so a bare checkout runs without any config file.

use serde::Deserialize;

/// Knobs shared by all retrieval strategies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks returned per query.
    pub top_k: usize,
    /// RRF constant; larger values flatten the influence of rank position.
    pub rrf_k: f64,
    /// Embedding dimension of the dense provider.
    pub embedding_dim: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5, rrf_k: 60.0, embedding_dim: 384 }
    }
}

/// Where corpus, index artifacts, and reports live on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: String,
    pub chunks_path: String,
    pub index_path: String,
    pub index_chunks_path: String,
    pub ground_truth_path: String,
    pub report_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            chunks_path: "data/processed_chunks.json".to_string(),
            index_path: "data/dense_index.json".to_string(),
            index_chunks_path: "data/dense_chunks.json".to_string(),
            ground_truth_path: "data/ground_truth.json".to_string(),
            report_dir: "reports".to_string(),
        }
    }
}
