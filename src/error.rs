//! Typed failure taxonomy for the query engine.

use thiserror::Error;

/// Everything that can go wrong while interpreting or evaluating a query.
///
/// Each variant renders as the user-facing detail string; the transport only
/// ever sees the rendered text, never the variant itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Malformed arithmetic expression, with the byte offset of the
    /// offending token in the original text.
    #[error("parse error at position {position}: {detail}")]
    Parse { position: usize, detail: String },

    /// Division by zero, or a computation that overflowed to infinity/NaN.
    #[error("{0}")]
    Arithmetic(String),

    /// A token sat where an asset was grammatically required but is not in
    /// the alias table.
    #[error("unknown asset \"{0}\"")]
    UnknownAsset(String),

    /// The external price source failed or timed out on a lookup.
    #[error("price unavailable: {0}")]
    PriceUnavailable(String),

    /// One or both legs of a conversion could not be priced.
    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl EngineError {
    pub fn parse(position: usize, detail: impl Into<String>) -> Self {
        EngineError::Parse {
            position,
            detail: detail.into(),
        }
    }
}
