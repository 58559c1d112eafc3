//! One-off query against a chosen retrieval strategy.

use anyhow::{bail, Result};
use std::env;

use ragbench_bench::TimedRetriever;
use ragbench_core::config::{DataConfig, RetrievalConfig};
use ragbench_core::corpus::{self, CorpusProcessor};
use ragbench_core::traits::Retriever;
use ragbench_core::{expand_path, Config};
use ragbench_dense::{DenseRetriever, HashEmbedder};
use ragbench_hybrid::HybridRetriever;
use ragbench_sparse::SparseRetriever;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <sparse|dense|hybrid> <query> [top_k]", args[0]);
        eprintln!("Example: {} hybrid 'how do I start a fire' 5", args[0]);
        std::process::exit(1);
    }
    let strategy = args[1].as_str();
    let query = &args[2];

    let config = Config::load()?;
    let retrieval: RetrievalConfig = config.get("retrieval").unwrap_or_default();
    let data: DataConfig = config.get("data").unwrap_or_default();
    let top_k = args
        .get(3)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(retrieval.top_k);

    let chunks_path = expand_path(&data.chunks_path);
    let chunks = if chunks_path.exists() {
        corpus::load_chunks(&chunks_path)?
    } else {
        CorpusProcessor::new().process_directory(&expand_path(&data.data_dir))?
    };
    if chunks.is_empty() {
        bail!("no corpus chunks found; put .txt files under {}", data.data_dir);
    }

    let inner: Box<dyn Retriever> = match strategy {
        "sparse" => Box::new(SparseRetriever::new()),
        "dense" => Box::new(DenseRetriever::new(Box::new(HashEmbedder::new(
            retrieval.embedding_dim,
        )))),
        "hybrid" => Box::new(HybridRetriever::with_rrf_k(
            DenseRetriever::new(Box::new(HashEmbedder::new(retrieval.embedding_dim))),
            SparseRetriever::new(),
            retrieval.rrf_k,
        )),
        other => bail!("unknown strategy '{}'; expected sparse, dense, or hybrid", other),
    };

    let mut retriever = TimedRetriever::new(inner);
    retriever.setup_and_time(&chunks)?;
    let result = retriever.retrieve_and_time(query, top_k)?;

    println!(
        "\nFound {} chunks for \"{}\" in {:.1}ms\n",
        result.chunks.len(),
        query,
        result.latency_ms
    );
    for (i, text) in result.chunks.iter().enumerate() {
        let preview: String = text.chars().take(160).collect();
        println!("  {}. {}", i + 1, preview);
    }
    Ok(())
}
