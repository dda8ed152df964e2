//! Engine error types

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures of engine lookups.
///
/// Synthesis itself never fails: anomalies there are downgraded to
/// [`Diagnostic`](crate::Diagnostic)s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The identifier was not produced by this engine
    #[error("Unknown surrogate type: {0}")]
    UnknownSurrogate(String),
}
