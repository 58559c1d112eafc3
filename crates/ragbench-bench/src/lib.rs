//! Benchmark orchestration and profiling for the retrieval strategies.
//!
//! The runner drives every retriever × generator combination over a fixed
//! question set with interleaved scheduling, accumulates per-query metrics,
//! delegates quality scoring to a judge, and reduces everything into one
//! `ComboResult` per combination for reporting.

pub mod aggregate;
pub mod generate;
pub mod instrument;
pub mod judge;
pub mod profiler;
pub mod report;
pub mod runner;

pub use aggregate::{ComboAccumulator, ComboResult, PerQuestionRecord};
pub use generate::ExtractiveGenerator;
pub use instrument::{BoxedTimedRetriever, TimedGenerator, TimedRetriever};
pub use judge::OverlapJudge;
pub use profiler::{measure_storage, MemorySnapshot, MemoryTracker};
pub use report::BenchmarkReporter;
pub use runner::BenchmarkRunner;
