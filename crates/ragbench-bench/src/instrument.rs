//! Instrumented wrappers around retrievers and generators.
//!
//! Strategies report their own phase timings from `setup`; the wrapper owns
//! everything measured around the call: total wall clock, resident-memory
//! growth, query latency, and the query-ready state gate.

use anyhow::Result;
use std::collections::HashSet;
use std::time::Instant;

use ragbench_core::error::Error;
use ragbench_core::traits::{Generator, Retriever};
use ragbench_core::types::{Chunk, GenerationResult, Meta, RetrievalResult, SetupMetrics};

use crate::profiler::MemoryTracker;

/// The homogeneous form the benchmark runner works with.
pub type BoxedTimedRetriever = TimedRetriever<Box<dyn Retriever>>;

pub struct TimedRetriever<R: Retriever> {
    inner: R,
    name: String,
    setup_metrics: SetupMetrics,
    ready: bool,
}

impl<R: Retriever> TimedRetriever<R> {
    pub fn new(inner: R) -> Self {
        let name = inner.name().to_string();
        Self { inner, name, setup_metrics: SetupMetrics::default(), ready: false }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn setup_metrics(&self) -> &SetupMetrics {
        &self.setup_metrics
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Mark the wrapper query-ready without running setup, for retrievers
    /// restored from persisted artifacts.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Record the disk footprint of persisted index artifacts.
    pub fn set_storage_mb(&mut self, mb: f64) {
        self.setup_metrics.storage_mb = mb;
    }

    /// Erase the concrete retriever type, keeping metrics and ready state.
    pub fn into_boxed(self) -> BoxedTimedRetriever
    where
        R: 'static,
    {
        TimedRetriever {
            inner: Box::new(self.inner) as Box<dyn Retriever>,
            name: self.name,
            setup_metrics: self.setup_metrics,
            ready: self.ready,
        }
    }

    /// Run setup with wall-clock and memory instrumentation scoped around
    /// the whole call. The instance becomes query-ready only on success.
    pub fn setup_and_time(&mut self, corpus: &[Chunk]) -> Result<&SetupMetrics> {
        let tracker = MemoryTracker::start();
        let start = Instant::now();
        let mut metrics = self.inner.setup(corpus)?;
        metrics.total_ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics.memory_peak_mb = tracker.growth_mb();
        self.setup_metrics = metrics;
        self.ready = true;
        println!("[{}] Setup complete in {:.1}ms", self.name, self.setup_metrics.total_ms);
        Ok(&self.setup_metrics)
    }

    /// Retrieve with latency measurement. Duplicate texts are dropped while
    /// preserving rank order, so the result holds at most `top_k` distinct
    /// chunks.
    pub fn retrieve_and_time(&self, query: &str, top_k: usize) -> Result<RetrievalResult> {
        if !self.ready {
            return Err(Error::Precondition(format!(
                "[{}] call setup_and_time() before retrieve_and_time()",
                self.name
            ))
            .into());
        }
        let start = Instant::now();
        let chunks = self.inner.retrieve(query, top_k)?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let mut seen = HashSet::new();
        let chunks: Vec<String> = chunks.into_iter().filter(|c| seen.insert(c.clone())).collect();

        let mut metadata = Meta::new();
        metadata.insert("retriever".to_string(), self.name.clone());
        metadata.insert("top_k".to_string(), top_k.to_string());
        Ok(RetrievalResult { chunks, latency_ms, metadata })
    }
}

pub struct TimedGenerator {
    inner: Box<dyn Generator>,
    name: String,
}

impl TimedGenerator {
    pub fn new(inner: Box<dyn Generator>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generate_and_time(&self, query: &str, contexts: &[String]) -> Result<GenerationResult> {
        let start = Instant::now();
        let mut result = self.inner.generate(query, contexts)?;
        result.latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(result)
    }
}
