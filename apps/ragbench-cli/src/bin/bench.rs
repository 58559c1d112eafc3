//! Full benchmark run: set up every retrieval strategy over the corpus,
//! drive the retriever × generator grid over the ground-truth question set,
//! and write JSON/CSV/Markdown reports.

use anyhow::{bail, Result};
use std::fs;

use ragbench_bench::{
    measure_storage, BenchmarkReporter, BenchmarkRunner, ExtractiveGenerator, OverlapJudge,
    TimedGenerator, TimedRetriever,
};
use ragbench_core::config::{DataConfig, RetrievalConfig};
use ragbench_core::corpus::{self, CorpusProcessor};
use ragbench_core::types::Chunk;
use ragbench_core::{expand_path, Config};
use ragbench_dense::{DenseRetriever, HashEmbedder};
use ragbench_hybrid::HybridRetriever;
use ragbench_sparse::SparseRetriever;

fn main() -> Result<()> {
    let config = Config::load()?;
    let retrieval: RetrievalConfig = config.get("retrieval").unwrap_or_default();
    let data: DataConfig = config.get("data").unwrap_or_default();

    let chunks = load_corpus(&data)?;
    if chunks.is_empty() {
        bail!("no corpus chunks found; put .txt files under {} or provide {}",
            data.data_dir, data.chunks_path);
    }
    println!("Corpus: {} chunks", chunks.len());

    let ground_truth = corpus::load_ground_truth(&expand_path(&data.ground_truth_path))?;
    if ground_truth.is_empty() {
        bail!("ground truth file {} contains no questions", data.ground_truth_path);
    }
    println!("Questions: {}", ground_truth.len());

    let mut sparse = TimedRetriever::new(SparseRetriever::new());
    sparse.setup_and_time(&chunks)?;

    let mut dense = TimedRetriever::new(DenseRetriever::new(Box::new(HashEmbedder::new(
        retrieval.embedding_dim,
    ))));
    dense.setup_and_time(&chunks)?;

    // Persist the dense artifacts and record their disk footprint.
    let index_path = expand_path(&data.index_path);
    let index_chunks_path = expand_path(&data.index_chunks_path);
    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent)?;
    }
    dense.inner().save(&index_path, &index_chunks_path)?;
    dense.set_storage_mb(measure_storage(&[&index_path, &index_chunks_path]));

    let mut hybrid = TimedRetriever::new(HybridRetriever::with_rrf_k(
        DenseRetriever::new(Box::new(HashEmbedder::new(retrieval.embedding_dim))),
        SparseRetriever::new(),
        retrieval.rrf_k,
    ));
    hybrid.setup_and_time(&chunks)?;

    let retrievers = vec![sparse.into_boxed(), dense.into_boxed(), hybrid.into_boxed()];
    let generators = vec![TimedGenerator::new(Box::new(ExtractiveGenerator::new()))];

    let runner = BenchmarkRunner::new(
        retrievers,
        generators,
        ground_truth,
        retrieval.top_k,
        Box::new(OverlapJudge::new()),
    );
    let results = runner.run_all()?;

    let reporter = BenchmarkReporter::new(expand_path(&data.report_dir));
    reporter.save_all(&results, "benchmark")?;
    Ok(())
}

fn load_corpus(data: &DataConfig) -> Result<Vec<Chunk>> {
    let chunks_path = expand_path(&data.chunks_path);
    if chunks_path.exists() {
        return corpus::load_chunks(&chunks_path);
    }
    let chunks = CorpusProcessor::new().process_directory(&expand_path(&data.data_dir))?;
    if !chunks.is_empty() {
        if let Some(parent) = chunks_path.parent() {
            fs::create_dir_all(parent)?;
        }
        corpus::save_chunks(&chunks, &chunks_path)?;
    }
    Ok(chunks)
}
