use thiserror::Error;

/// Convenience result type for compile and load operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Error type returned by table loading, config loading and the sector compiler.
///
/// Per-field parameter failures are not reported through this type; see
/// [`crate::compile::sectors::FieldError`].
#[derive(Debug, Error)]
pub enum CompileError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel loading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV loading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON table or configuration could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration cannot drive a compile (no sector columns, no name column, ...).
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// The input table does not have a usable shape.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}
