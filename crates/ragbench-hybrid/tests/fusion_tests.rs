use ragbench_core::error::Error;
use ragbench_core::traits::Retriever;
use ragbench_core::types::Chunk;
use ragbench_dense::{DenseRetriever, HashEmbedder};
use ragbench_hybrid::{fused_scores, reciprocal_rank_fusion, HybridRetriever};
use ragbench_sparse::SparseRetriever;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk { id: id.to_string(), source: "test".to_string(), text: text.to_string(), position: 0 }
}

#[test]
fn partial_scores_stay_within_the_rrf_bound() {
    // A text ranked once at rank r scores exactly 1/(k + r + 1), which for
    // any k > 0 and r >= 0 lies in (0, 1/(k + 1)].
    for rrf_k in [1.0, 10.0, 60.0, 500.0] {
        let list = strings(&["a", "b", "c", "d", "e"]);
        let scored = fused_scores(&[&list], rrf_k);
        for (rank, (_, score)) in scored.iter().enumerate() {
            assert!(*score > 0.0, "k={rrf_k} rank={rank}: score must be positive");
            assert!(
                *score <= 1.0 / (rrf_k + 1.0) + 1e-12,
                "k={rrf_k} rank={rank}: score {score} exceeds the bound"
            );
            assert!((score - 1.0 / (rrf_k + rank as f64 + 1.0)).abs() < 1e-12);
        }
    }
}

#[test]
fn agreement_between_lists_outranks_a_single_first_place() {
    // "both" is ranked 1st by both sub-retrievers; "solo" is 1st in only
    // one list. For any k > 0, "both" must rank at or above "solo".
    for rrf_k in [0.5, 1.0, 60.0, 1000.0] {
        let dense = strings(&["both", "solo", "x"]);
        let sparse = strings(&["both", "y", "x"]);
        let fused = reciprocal_rank_fusion(&[&dense, &sparse], rrf_k, 10);
        let pos_both = fused.iter().position(|t| t == "both").expect("both present");
        let pos_solo = fused.iter().position(|t| t == "solo").expect("solo present");
        assert!(pos_both < pos_solo, "k={rrf_k}: doubly-ranked chunk must come first");
    }
}

#[test]
fn fusion_keeps_every_candidate_before_truncation() {
    let dense = strings(&["a", "b", "c"]);
    let sparse = strings(&["d", "b", "e"]);
    let fused = reciprocal_rank_fusion(&[&dense, &sparse], 60.0, 100);
    for text in ["a", "b", "c", "d", "e"] {
        assert!(fused.iter().any(|t| t == text), "{text} missing from fused ranking");
    }
    assert_eq!(fused.len(), 5, "distinct candidates only");
}

#[test]
fn exact_ordering_for_the_reference_scenario() {
    // dense = [A, B, C], sparse = [B, A, C], k = 60.
    // A and B both score 1/61 + 1/62; C scores 2/63. A ties with B and was
    // seen first (dense list scanned before sparse), so the order is A, B, C.
    let dense = strings(&["A", "B", "C"]);
    let sparse = strings(&["B", "A", "C"]);

    let scored = fused_scores(&[&dense, &sparse], 60.0);
    let expected_ab = 1.0 / 61.0 + 1.0 / 62.0;
    let expected_c = 2.0 / 63.0;

    assert_eq!(scored[0].0, "A");
    assert_eq!(scored[1].0, "B");
    assert_eq!(scored[2].0, "C");
    assert!((scored[0].1 - expected_ab).abs() < 1e-12);
    assert!((scored[1].1 - expected_ab).abs() < 1e-12);
    assert!((scored[2].1 - expected_c).abs() < 1e-12);

    let fused = reciprocal_rank_fusion(&[&dense, &sparse], 60.0, 3);
    assert_eq!(fused, strings(&["A", "B", "C"]));
}

fn small_corpus() -> Vec<Chunk> {
    vec![
        chunk("0", "the cat sat on the mat"),
        chunk("1", "dogs chase cats in the yard"),
        chunk("2", "a treatise on bird migration"),
        chunk("3", "feeding your cat wet food"),
    ]
}

fn hybrid() -> HybridRetriever<DenseRetriever, SparseRetriever> {
    HybridRetriever::new(
        DenseRetriever::new(Box::new(HashEmbedder::new(32))),
        SparseRetriever::new(),
    )
}

#[test]
fn setup_composes_child_phase_metrics() {
    let mut retriever = hybrid();
    let metrics = retriever.setup(&small_corpus()).expect("setup");

    let dense = retriever.dense_metrics();
    let sparse = retriever.sparse_metrics();
    assert_eq!(
        metrics.indexing_ms,
        dense.indexing_ms + sparse.indexing_ms,
        "hybrid indexing time is exactly the sum of both children"
    );
    assert_eq!(metrics.embedding_ms, dense.embedding_ms);
    assert_eq!(metrics.tokenizing_ms, sparse.tokenizing_ms);
    // Composite-level fields are left for the outer wrapper.
    assert_eq!(metrics.total_ms, 0.0);
    assert_eq!(metrics.memory_peak_mb, 0.0);
}

#[test]
fn retrieve_before_setup_is_a_precondition_violation() {
    let retriever = hybrid();
    let err = retriever.retrieve("cat", 2).expect_err("must fail before setup");
    assert!(
        matches!(err.downcast_ref::<Error>(), Some(Error::Precondition(_))),
        "expected Precondition, got: {err}"
    );
}

#[test]
fn retrieve_returns_at_most_top_k_distinct_chunks() {
    let mut retriever = hybrid();
    retriever.setup(&small_corpus()).expect("setup");

    let results = retriever.retrieve("cat", 2).expect("retrieve");
    assert!(results.len() <= 2);
    let unique: std::collections::HashSet<&String> = results.iter().collect();
    assert_eq!(unique.len(), results.len(), "fused results are distinct");
}
