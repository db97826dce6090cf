use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset, time};
use time::{Date, OffsetDateTime, Time, UtcOffset};

use crate::domain::UtcDateTime;
use crate::ValidationError;

/// Fixed exchange offset. NSE trading times are IST (UTC+5:30), which has no
/// daylight transitions, so a fixed offset is exact.
pub const MARKET_OFFSET: UtcOffset = offset!(+5:30);

/// Default morning snapshot target (exchange wall clock).
pub const OPEN_TIME: Time = time!(09:15);

/// Default midday snapshot target (exchange wall clock).
pub const CLOSE_TIME: Time = time!(12:15);

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parses an exchange wall-clock time in `HH:MM` form.
pub fn parse_time_of_day(value: &str) -> Result<Time, ValidationError> {
    Time::parse(value.trim(), TIME_FORMAT).map_err(|_| ValidationError::InvalidTimeOfDay {
        value: value.to_owned(),
    })
}

/// One trading day plus the two wall-clock targets to snapshot.
///
/// Civil times only become comparable instants once the exchange offset is
/// applied; [`TradingWindow::open_instant`] and
/// [`TradingWindow::close_instant`] are the only places that conversion
/// happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    date: Date,
    open: Time,
    close: Time,
}

impl TradingWindow {
    pub fn new(date: Date, open: Time, close: Time) -> Self {
        Self { date, open, close }
    }

    /// Builds a window from a `YYYY-MM-DD` date string.
    pub fn for_date_str(value: &str, open: Time, close: Time) -> Result<Self, ValidationError> {
        let date = Date::parse(value.trim(), DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidDate {
                value: value.to_owned(),
            }
        })?;
        Ok(Self::new(date, open, close))
    }

    /// Builds a window for the current date as observed on the exchange clock.
    pub fn today(open: Time, close: Time) -> Self {
        let date = OffsetDateTime::now_utc().to_offset(MARKET_OFFSET).date();
        Self::new(date, open, close)
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    /// The morning target as an absolute instant.
    pub fn open_instant(&self) -> UtcDateTime {
        UtcDateTime::from_instant(self.date.with_time(self.open).assume_offset(MARKET_OFFSET))
    }

    /// The midday target as an absolute instant.
    pub fn close_instant(&self) -> UtcDateTime {
        UtcDateTime::from_instant(self.date.with_time(self.close).assume_offset(MARKET_OFFSET))
    }

    /// `YYYY-MM-DD` tag used in report file names.
    pub fn date_tag(&self) -> String {
        self.date
            .format(DATE_FORMAT)
            .expect("calendar dates are formattable")
    }
}
