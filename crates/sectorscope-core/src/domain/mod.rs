mod models;
mod symbol;
mod timestamp;
mod window;

pub use models::{
    ChangeRecord, ChartSeries, FailureReason, FailureRecord, Instrument, SectorAggregate,
    SeriesPoint, Snapshot,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
pub use window::{parse_time_of_day, TradingWindow, CLOSE_TIME, MARKET_OFFSET, OPEN_TIME};
