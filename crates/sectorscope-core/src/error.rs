use thiserror::Error;

/// Validation and contract errors exposed by `sectorscope-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid trade date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("invalid wall-clock time '{value}', expected HH:MM")]
    InvalidTimeOfDay { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("epoch millisecond value {millis} is outside the representable range")]
    TimestampOutOfRange { millis: i64 },

    #[error("tolerance must be a positive duration")]
    InvalidTolerance,
    #[error("rank depth must be greater than zero")]
    InvalidRankDepth,
    #[error("worker concurrency must be greater than zero")]
    InvalidConcurrency,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
