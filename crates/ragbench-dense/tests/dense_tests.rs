use std::collections::HashMap;

use ragbench_core::error::Error;
use ragbench_core::traits::{Embedder, Retriever};
use ragbench_core::types::Chunk;
use ragbench_dense::{normalize, DenseRetriever, FlatIpIndex, HashEmbedder};
use tempfile::TempDir;

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk { id: id.to_string(), source: "test".to_string(), text: text.to_string(), position: 0 }
}

/// Returns a fixed vector per known text; errors on anything else.
struct LookupEmbedder {
    dim: usize,
    table: HashMap<String, Vec<f32>>,
}

impl Embedder for LookupEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no embedding for {t:?}"))
            })
            .collect()
    }
}

#[test]
fn normalize_produces_unit_vectors_and_keeps_zero() {
    let mut v = vec![3.0, 4.0];
    normalize(&mut v);
    assert!((v[0] - 0.6).abs() < 1e-6);
    assert!((v[1] - 0.8).abs() < 1e-6);

    let mut zero = vec![0.0, 0.0];
    normalize(&mut zero);
    assert_eq!(zero, vec![0.0, 0.0], "zero vectors pass through unchanged");
}

#[test]
fn index_rejects_dimension_mismatch() {
    let mut index = FlatIpIndex::new(3);
    assert!(index.add(vec![1.0, 0.0]).is_err());
    assert!(index.add(vec![1.0, 0.0, 0.0]).is_ok());
    assert!(index.search(&[1.0, 0.0], 1).is_err());
}

#[test]
fn orthogonal_embeddings_rank_the_matching_chunk_first() {
    let table: HashMap<String, Vec<f32>> = [
        ("chunk a".to_string(), vec![1.0, 0.0]),
        ("chunk b".to_string(), vec![0.0, 1.0]),
        ("query for a".to_string(), vec![1.0, 0.0]),
    ]
    .into_iter()
    .collect();
    let corpus = vec![chunk("a", "chunk a"), chunk("b", "chunk b")];

    let mut retriever = DenseRetriever::new(Box::new(LookupEmbedder { dim: 2, table }));
    retriever.setup(&corpus).expect("setup");

    let results = retriever.retrieve("query for a", 1).expect("retrieve");
    assert_eq!(results, vec!["chunk a".to_string()]);
}

#[test]
fn equal_scores_keep_insertion_order() {
    // Every chunk embeds to the same vector, so all inner products tie and
    // the index-insertion order must win.
    let same = vec![0.6, 0.8];
    let table: HashMap<String, Vec<f32>> = [
        ("first".to_string(), same.clone()),
        ("second".to_string(), same.clone()),
        ("third".to_string(), same.clone()),
        ("q".to_string(), same),
    ]
    .into_iter()
    .collect();
    let corpus = vec![chunk("1", "first"), chunk("2", "second"), chunk("3", "third")];

    let mut retriever = DenseRetriever::new(Box::new(LookupEmbedder { dim: 2, table }));
    retriever.setup(&corpus).expect("setup");

    let results = retriever.retrieve("q", 3).expect("retrieve");
    assert_eq!(results, vec!["first".to_string(), "second".to_string(), "third".to_string()]);
}

#[test]
fn retrieve_before_setup_is_a_precondition_violation() {
    let retriever = DenseRetriever::new(Box::new(HashEmbedder::new(16)));
    let err = retriever.retrieve("anything", 1).expect_err("must fail before setup");
    assert!(
        matches!(err.downcast_ref::<Error>(), Some(Error::Precondition(_))),
        "expected Precondition, got: {err}"
    );
}

#[test]
fn failing_embedding_provider_surfaces_as_provider_error() {
    let mut retriever =
        DenseRetriever::new(Box::new(LookupEmbedder { dim: 2, table: HashMap::new() }));
    let err = retriever.setup(&[chunk("a", "unknown text")]).expect_err("embedder has no entry");
    assert!(
        matches!(err.downcast_ref::<Error>(), Some(Error::Provider(_))),
        "expected Provider, got: {err}"
    );
}

#[test]
fn save_load_round_trip_preserves_retrieval_output() {
    let corpus = vec![
        chunk("a", "rust borrow checker rules"),
        chunk("b", "async runtimes and executors"),
        chunk("c", "serde serialization formats"),
        chunk("d", "tokio channels and tasks"),
    ];
    let mut original = DenseRetriever::new(Box::new(HashEmbedder::new(64)));
    original.setup(&corpus).expect("setup");

    let tmp = TempDir::new().expect("tempdir");
    let index_path = tmp.path().join("index.json");
    let chunks_path = tmp.path().join("chunks.json");
    original.save(&index_path, &chunks_path).expect("save");

    let mut restored = DenseRetriever::new(Box::new(HashEmbedder::new(64)));
    restored.load(&index_path, &chunks_path).expect("load");

    for query in ["borrow checker", "async tasks", "serialization"] {
        let before = original.retrieve(query, 3).expect("retrieve original");
        let after = restored.retrieve(query, 3).expect("retrieve restored");
        assert_eq!(before, after, "round trip must preserve ranking for {query:?}");
    }
}

#[test]
fn load_detects_out_of_sync_artifacts() {
    let corpus = vec![chunk("a", "alpha"), chunk("b", "beta")];
    let mut retriever = DenseRetriever::new(Box::new(HashEmbedder::new(8)));
    retriever.setup(&corpus).expect("setup");

    let tmp = TempDir::new().expect("tempdir");
    let index_path = tmp.path().join("index.json");
    let chunks_path = tmp.path().join("chunks.json");
    retriever.save(&index_path, &chunks_path).expect("save");

    // Drop one chunk from the parallel list so the counts disagree.
    let truncated = serde_json::to_string(&corpus[..1]).expect("serialize");
    std::fs::write(&chunks_path, truncated).expect("write");

    let mut restored = DenseRetriever::new(Box::new(HashEmbedder::new(8)));
    let err = restored.load(&index_path, &chunks_path).expect_err("counts disagree");
    assert!(
        matches!(err.downcast_ref::<Error>(), Some(Error::IndexCorruption(_))),
        "expected IndexCorruption, got: {err}"
    );
}

#[test]
fn save_before_setup_is_a_precondition_violation() {
    let retriever = DenseRetriever::new(Box::new(HashEmbedder::new(8)));
    let tmp = TempDir::new().expect("tempdir");
    let err = retriever
        .save(&tmp.path().join("i.json"), &tmp.path().join("c.json"))
        .expect_err("nothing to save");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Precondition(_))));
}
