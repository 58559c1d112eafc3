use thiserror::Error;

/// Error kinds the benchmark core distinguishes. Attached to
/// `anyhow::Error` at the failure site so callers can downcast.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller misuse, e.g. retrieve before setup. Unrecoverable.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// An external embedding/generation/judging call failed or returned
    /// malformed data.
    #[error("Provider failure: {0}")]
    Provider(String),

    /// Persisted index and chunk artifacts are out of sync.
    #[error("Index corruption: {0}")]
    IndexCorruption(String),

    /// Judge output missing required fields.
    #[error("Malformed oracle response: {0}")]
    MalformedOracle(String),
}
