use thiserror::Error;

use crate::gateway::GatewayError;

/// Validation errors raised while building domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol contains whitespace or a query delimiter '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid resolution '{value}', expected one of M5, M30, H1, D1")]
    InvalidResolution { value: String },

    #[error("currency must be a 3-letter ISO code: '{value}'")]
    InvalidCurrency { value: String },
    #[error("unknown commodity '{value}'")]
    UnknownCommodity { value: String },

    #[error("timestamp is not a recognised upstream format: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
