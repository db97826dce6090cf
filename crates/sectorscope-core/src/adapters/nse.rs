use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{MarketDataSource, SourceError};
use crate::domain::{ChartSeries, Instrument, SeriesPoint, Symbol, UtcDateTime};
use crate::http_client::{HttpClient, HttpRequest};

pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

// The NSE API refuses requests that do not look like a browser session.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/114.0 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";

const LANDING_TIMEOUT_MS: u64 = 10_000;
const QUOTE_PAGE_TIMEOUT_MS: u64 = 8_000;
const API_TIMEOUT_MS: u64 = 10_000;

/// Best-effort persistence of decoded chart payloads for later inspection.
#[derive(Debug, Clone)]
pub struct RawAudit {
    pub dir: PathBuf,
    /// `YYYY-MM-DD` tag appended to each payload file name.
    pub date_tag: String,
}

/// Adapter for the NSE chart and index-constituents endpoints.
#[derive(Clone)]
pub struct NseAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    audit: Option<RawAudit>,
}

impl NseAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(NSE_BASE_URL),
            audit: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_audit(mut self, audit: RawAudit) -> Self {
        self.audit = Some(audit);
        self
    }

    fn request(&self, path_and_query: &str, timeout_ms: u64) -> HttpRequest {
        HttpRequest::get(format!("{}{path_and_query}", self.base_url))
            .with_header("user-agent", USER_AGENT)
            .with_header("accept", ACCEPT)
            .with_timeout_ms(timeout_ms)
    }

    /// Visits the symbol's quote page. Some chart identifiers only resolve
    /// after this page has been served to the session; failures are ignored.
    async fn visit_quote_page(&self, symbol: &Symbol) {
        let path = format!(
            "/get-quotes/equity?symbol={}",
            urlencoding::encode(symbol.as_str())
        );
        if let Err(error) = self
            .http_client
            .execute(self.request(&path, QUOTE_PAGE_TIMEOUT_MS))
            .await
        {
            debug!(%symbol, error = %error, "quote page visit failed");
        }
    }

    fn audit_payload(&self, symbol: &Symbol, body: &str) {
        let Some(audit) = &self.audit else {
            return;
        };
        // Only payloads that parse are worth keeping.
        if serde_json::from_str::<serde_json::Value>(body).is_err() {
            return;
        }
        let path = audit.dir.join(format!("{symbol}_{}.json", audit.date_tag));
        if let Err(error) = std::fs::write(&path, body) {
            warn!(%symbol, error = %error, "raw chart payload write failed");
        }
    }

    fn transport_error(error: crate::http_client::HttpError) -> SourceError {
        if error.retryable() {
            SourceError::unavailable(format!("nse transport error: {}", error.message()))
        } else {
            SourceError::internal(format!("nse transport error: {}", error.message()))
        }
    }
}

impl MarketDataSource for NseAdapter {
    fn prime<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send + 'a>> {
        Box::pin(async move {
            // The landing page hands out the session cookies the JSON
            // endpoints require.
            self.http_client
                .execute(self.request("/", LANDING_TIMEOUT_MS))
                .await
                .map_err(Self::transport_error)?;
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Ok(())
        })
    }

    fn chart<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> Pin<Box<dyn Future<Output = Result<ChartSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.visit_quote_page(&instrument.symbol).await;

            let path = format!(
                "/api/chart-databyindex?index={}",
                urlencoding::encode(&instrument.identifier)
            );
            let response = self
                .http_client
                .execute(self.request(&path, API_TIMEOUT_MS))
                .await
                .map_err(Self::transport_error)?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "nse chart endpoint returned status {}",
                    response.status
                )));
            }

            self.audit_payload(&instrument.symbol, &response.body);
            Ok(decode_chart(&response.body))
        })
    }

    fn index_constituents<'a>(
        &'a self,
        index: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Instrument>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let path = format!(
                "/api/equity-stockIndices?index={}",
                urlencoding::encode(index)
            );
            let response = self
                .http_client
                .execute(self.request(&path, API_TIMEOUT_MS))
                .await
                .map_err(Self::transport_error)?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "nse index endpoint returned status {}",
                    response.status
                )));
            }

            let payload: IndexPayload = serde_json::from_str(&response.body)
                .map_err(|error| SourceError::decode(format!("nse index payload: {error}")))?;

            let mut instruments = Vec::with_capacity(payload.data.len());
            for row in payload.data {
                match row_to_instrument(row) {
                    Some(instrument) => instruments.push(instrument),
                    None => debug!("skipping index row without a usable symbol"),
                }
            }
            Ok(instruments)
        })
    }
}

/// Chart payload shape. `grapthData` is the upstream's own spelling.
#[derive(Debug, Deserialize)]
struct ChartPayload {
    #[serde(default, rename = "grapthData")]
    grapth_data: Vec<(i64, f64)>,
}

/// Decodes a chart body into a series. An absent or malformed structure is an
/// empty series, not an error.
fn decode_chart(body: &str) -> ChartSeries {
    let Ok(payload) = serde_json::from_str::<ChartPayload>(body) else {
        return ChartSeries::empty();
    };

    let points = payload
        .grapth_data
        .into_iter()
        .filter_map(|(millis, value)| {
            UtcDateTime::from_unix_millis(millis)
                .ok()
                .map(|ts| SeriesPoint::new(ts, value))
        })
        .collect();
    ChartSeries::new(points)
}

#[derive(Debug, Deserialize)]
struct IndexPayload {
    #[serde(default)]
    data: Vec<IndexRow>,
}

#[derive(Debug, Deserialize)]
struct IndexRow {
    symbol: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry_type: Option<String>,
}

fn row_to_instrument(row: IndexRow) -> Option<Instrument> {
    let symbol = Symbol::parse(row.symbol.as_deref()?).ok()?;
    let sector = [row.industry, row.sector, row.industry_type]
        .into_iter()
        .flatten()
        .find(|label| !label.trim().is_empty())
        .unwrap_or_default();
    Some(Instrument::with_default_identifier(symbol, sector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_chart_pairs_into_series() {
        // 1717386300000 ms = 2024-06-03T03:45:00Z.
        let body = r#"{"identifier":"RELIANCEEQN","grapthData":[[1717386300000,2950.5],[1717386360000,2951.0]]}"#;

        let series = decode_chart(body);
        assert_eq!(series.points.len(), 2);
        assert_eq!(
            series.points[0].ts.format_rfc3339(),
            "2024-06-03T03:45:00Z"
        );
        assert_eq!(series.points[0].value, 2950.5);
    }

    #[test]
    fn missing_chart_field_is_an_empty_series() {
        assert!(decode_chart(r#"{"identifier":"X"}"#).is_empty());
    }

    #[test]
    fn malformed_body_is_an_empty_series() {
        assert!(decode_chart("<html>blocked</html>").is_empty());
        assert!(decode_chart(r#"{"grapthData":"not-a-list"}"#).is_empty());
    }

    #[test]
    fn index_rows_map_to_instruments_with_default_identifier() {
        let row = IndexRow {
            symbol: Some(String::from("RELIANCE")),
            industry: Some(String::from("Oil Gas & Consumable Fuels")),
            sector: None,
            industry_type: None,
        };

        let instrument = row_to_instrument(row).expect("must map");
        assert_eq!(instrument.symbol.as_str(), "RELIANCE");
        assert_eq!(instrument.sector, "Oil Gas & Consumable Fuels");
        assert_eq!(instrument.identifier, "RELIANCEEQN");
    }

    #[test]
    fn index_row_sector_falls_back_across_fields() {
        let row = IndexRow {
            symbol: Some(String::from("INFY")),
            industry: Some(String::new()),
            sector: Some(String::from("Information Technology")),
            industry_type: None,
        };

        let instrument = row_to_instrument(row).expect("must map");
        assert_eq!(instrument.sector, "Information Technology");
    }

    #[test]
    fn index_self_row_is_skipped() {
        let row = IndexRow {
            symbol: Some(String::from("NIFTY 500")),
            industry: None,
            sector: None,
            industry_type: None,
        };

        assert!(row_to_instrument(row).is_none());
    }
}
