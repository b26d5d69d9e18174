//! Error types shared by classifiers and neighbour searches.

/// Failures surfaced by `build`, `update` and `predict`.
///
/// Every variant is local to the failing call: the classifier keeps the state
/// it had before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// Training data or options violate the declared capabilities.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An instance does not match the schema fixed by the last build.
    #[error("incompatible instance types: {0}")]
    SchemaMismatch(String),

    /// `update` or `predict` called before any `build`.
    #[error("classifier has not been built")]
    NotBuilt,

    /// The neighbour search does not produce the requested measure.
    #[error("unknown measure: {0}")]
    UnknownMeasure(String),
}
