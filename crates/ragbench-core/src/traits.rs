use crate::types::{Chunk, GenerationResult, JudgeSample, JudgeScores, SetupMetrics};

/// One retrieval strategy. `setup` indexes a corpus once and reports its
/// per-phase timings; `retrieve` returns the top-k chunk texts for a query.
pub trait Retriever: Send {
    fn name(&self) -> &str;
    fn setup(&mut self, corpus: &[Chunk]) -> anyhow::Result<SetupMetrics>;
    fn retrieve(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<String>>;
}

impl<R: Retriever + ?Sized> Retriever for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn setup(&mut self, corpus: &[Chunk]) -> anyhow::Result<SetupMetrics> {
        (**self).setup(corpus)
    }

    fn retrieve(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<String>> {
        (**self).retrieve(query, top_k)
    }
}

/// An answer-generation backend. Fills `answer` and `tokens_used`; the
/// instrumented wrapper fills `latency_ms`.
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, query: &str, contexts: &[String]) -> anyhow::Result<GenerationResult>;
}

/// Quality oracle scoring a batch of generated answers. Returns the
/// averaged scores over the whole batch.
pub trait Judge: Send + Sync {
    fn evaluate_batch(&self, samples: &[JudgeSample]) -> anyhow::Result<JudgeScores>;
}

/// Text embedding provider. One fixed-length vector per input text,
/// deterministic for a given provider instance.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
