//! Core contracts for sectorscope.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The nearest-sample snapshot extractor and sector change aggregator
//! - The NSE chart adapter behind a data source trait
//! - The paced fan-out pipeline that assembles a run report

pub mod adapters;
pub mod aggregate;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod pipeline;
pub mod throttling;
pub mod universe;

pub use adapters::{NseAdapter, RawAudit, NSE_BASE_URL};
pub use aggregate::{ChangeAggregator, InstrumentOutcome, DEFAULT_RANK_DEPTH};
pub use data_source::{MarketDataSource, SourceError, SourceErrorKind};
pub use domain::{
    parse_time_of_day, ChangeRecord, ChartSeries, FailureReason, FailureRecord, Instrument,
    SectorAggregate, SeriesPoint, Snapshot, Symbol, TradingWindow, UtcDateTime, CLOSE_TIME,
    MARKET_OFFSET, OPEN_TIME,
};
pub use error::{CoreError, ValidationError};
pub use extract::{SnapshotExtractor, DEFAULT_TOLERANCE};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use pipeline::{AnalysisConfig, AnalysisReport, AnalysisRunner};
pub use throttling::{RequestPacer, DEFAULT_QUOTA_LIMIT, DEFAULT_QUOTA_WINDOW};
pub use universe::{Universe, UniverseError};
