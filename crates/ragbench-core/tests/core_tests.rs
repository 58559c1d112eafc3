use std::collections::BTreeMap;
use std::fs;

use ragbench_core::config::{DataConfig, RetrievalConfig};
use ragbench_core::corpus::{self, CorpusProcessor};
use ragbench_core::types::{Chunk, JudgeScores};
use ragbench_core::{expand_path, Config};
use tempfile::TempDir;

#[test]
fn processor_turns_paragraphs_into_chunks_with_stable_ids() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(
        tmp.path().join("guide.txt"),
        "First paragraph about fire starting.\n\nSecond paragraph about shelter.",
    )
    .expect("write");

    let chunks = CorpusProcessor::new().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].id, "guide:0");
    assert_eq!(chunks[1].id, "guide:1");
    assert_eq!(chunks[0].source, "guide");
    assert_eq!(chunks[0].position, 0);
    assert_eq!(chunks[1].position, 1);
    assert!(chunks[0].text.contains("fire starting"));
}

#[test]
fn processor_returns_empty_for_a_directory_without_txt_files() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("notes.md"), "ignored").expect("write");
    let chunks = CorpusProcessor::new().process_directory(tmp.path()).expect("process");
    assert!(chunks.is_empty());
}

#[test]
fn chunks_round_trip_through_json() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("chunks.json");
    let chunks = vec![
        Chunk { id: "a:0".to_string(), source: "a".to_string(), text: "alpha".to_string(), position: 0 },
        Chunk { id: "a:1".to_string(), source: "a".to_string(), text: "beta".to_string(), position: 1 },
    ];

    corpus::save_chunks(&chunks, &path).expect("save");
    let loaded = corpus::load_chunks(&path).expect("load");

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, chunks[0].id);
    assert_eq!(loaded[1].text, chunks[1].text);
}

#[test]
fn duplicate_chunk_ids_are_rejected_on_load() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("chunks.json");
    let chunks = vec![
        Chunk { id: "dup".to_string(), source: "a".to_string(), text: "one".to_string(), position: 0 },
        Chunk { id: "dup".to_string(), source: "a".to_string(), text: "two".to_string(), position: 1 },
    ];
    fs::write(&path, serde_json::to_string(&chunks).expect("serialize")).expect("write");

    let err = corpus::load_chunks(&path).expect_err("duplicate ids");
    assert!(err.to_string().contains("duplicate chunk id"));
}

#[test]
fn ground_truth_preserves_question_order() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("gt.json");
    fs::write(
        &path,
        r#"[
            {"question": "first?", "answer": "a1"},
            {"question": "second?", "answer": "a2"}
        ]"#,
    )
    .expect("write");

    let entries = corpus::load_ground_truth(&path).expect("load");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].question, "first?");
    assert_eq!(entries[1].answer, "a2");
}

#[test]
fn config_sections_fall_back_to_defaults() {
    let retrieval = RetrievalConfig::default();
    assert_eq!(retrieval.top_k, 5);
    assert!((retrieval.rrf_k - 60.0).abs() < 1e-12);
    assert_eq!(retrieval.embedding_dim, 384);

    let data = DataConfig::default();
    assert_eq!(data.data_dir, "data");
    assert_eq!(data.report_dir, "reports");
}

#[test]
fn config_merges_toml_file_and_env_overrides() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [retrieval]
                top_k = 7
                rrf_k = 30.0
            "#,
        )?;
        // Env overrides win over the file; untouched keys keep file values
        // and unset keys fall back to serde defaults.
        jail.set_env("APP_RETRIEVAL", "{top_k=9}");

        let config = Config::load().expect("load config");
        let retrieval: RetrievalConfig = config.get("retrieval").expect("extract retrieval");
        assert_eq!(retrieval.top_k, 9);
        assert!((retrieval.rrf_k - 30.0).abs() < 1e-12);
        assert_eq!(retrieval.embedding_dim, 384);

        // Sections absent from every source are an extraction error; the
        // binaries fall back to defaults via unwrap_or_default.
        assert!(config.get::<DataConfig>("data").is_err());
        Ok(())
    });
}

#[test]
fn expand_path_resolves_env_vars_and_tilde() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("RAGBENCH_TEST_ROOT", "/srv/corpora");
        let expanded = expand_path("$RAGBENCH_TEST_ROOT/survival");
        assert_eq!(expanded, std::path::PathBuf::from("/srv/corpora/survival"));

        jail.set_env("HOME", "/home/bench");
        let home = expand_path("~/reports");
        assert_eq!(home, std::path::PathBuf::from("/home/bench/reports"));

        // Plain relative paths pass through untouched.
        assert_eq!(expand_path("data/chunks.json"), std::path::PathBuf::from("data/chunks.json"));
        Ok(())
    });
}

#[test]
fn judge_scores_average_is_the_unweighted_mean() {
    let mut dims = BTreeMap::new();
    dims.insert("a".to_string(), 0.2);
    dims.insert("b".to_string(), 0.4);
    dims.insert("c".to_string(), 0.9);
    let scores = JudgeScores::from_dimensions(dims);
    assert!((scores.average - 0.5).abs() < 1e-12);

    let empty = JudgeScores::from_dimensions(BTreeMap::new());
    assert_eq!(empty.average, 0.0);
}
