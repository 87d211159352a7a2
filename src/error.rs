use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SvmError>;

/// Everything that can go wrong before a loss/gradient pair is produced.
///
/// All checks happen up front, so an `Err` never comes with partial output.
#[derive(Error, Debug)]
pub enum SvmError {
    /// The minibatch has no rows, so the mean over N is undefined.
    #[error("empty minibatch: at least one example is required")]
    EmptyBatch,

    /// Two operands disagree on a dimension.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A label does not index a column of W.
    #[error("label {label} at index {index} is out of range for {num_classes} classes")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        num_classes: usize,
    },

    /// A NaN or infinite entry in W or X.
    #[error("non-finite value in {matrix} at ({row}, {col})")]
    NonFinite {
        matrix: &'static str,
        row: usize,
        col: usize,
    },

    #[error("regularization strength must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),

    /// Row-of-rows input where one row has a different length.
    #[error("ragged matrix: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
