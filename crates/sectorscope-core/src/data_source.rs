use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::domain::{ChartSeries, Instrument};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Decode,
    Internal,
}

/// Structured source error surfaced by market-data adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Upstream market-data contract.
///
/// The analysis pipeline never sees transport details: a chart fetch either
/// yields a (possibly empty) series or a [`SourceError`], which the pipeline
/// folds into the empty-series path.
pub trait MarketDataSource: Send + Sync {
    /// Establishes whatever session state the upstream requires. Called once
    /// before a run fans out.
    fn prime<'a>(&'a self)
        -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send + 'a>>;

    /// Fetches the intraday chart series for one instrument.
    fn chart<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> Pin<Box<dyn Future<Output = Result<ChartSeries, SourceError>> + Send + 'a>>;

    /// Fetches the instruments constituting a named index.
    fn index_constituents<'a>(
        &'a self,
        index: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Instrument>, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_errors_are_retryable() {
        let error = SourceError::unavailable("upstream returned status 503");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.retryable());
        assert_eq!(error.code(), "source.unavailable");
    }

    #[test]
    fn decode_errors_are_not_retryable() {
        let error = SourceError::decode("unexpected payload shape");
        assert!(!error.retryable());
        assert_eq!(error.to_string(), "unexpected payload shape (source.decode)");
    }
}
