use crate::domain::errors::LoadError;
use crate::domain::features::DAY_FIRST_FORMAT;
use crate::domain::ports::PriceHistorySource;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::infrastructure::html;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// IPEADATA's Brent crude oil series page (daily, USD per barrel).
pub const SOURCE_URL: &str =
    "http://www.ipeadata.gov.br/ExibeSerie.aspx?module=m&serid=1650971490&oper=view";

/// The data table sits third in the page's table collection.
const PRICE_TABLE_INDEX: usize = 2;

/// Fetches and cleans the Brent price history from IPEADATA.
pub struct IpeadataClient {
    client: Client,
    url: String,
}

impl IpeadataClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_url(SOURCE_URL, timeout)
    }

    /// Alternate source location, for tests against a local fixture server.
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl PriceHistorySource for IpeadataClient {
    async fn fetch_series(&self) -> Result<PriceSeries, LoadError> {
        info!("Fetching Brent price history from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        // The page is served as latin-1; the non-ASCII bytes only occur in
        // header cells that cleaning drops anyway, so a lossy decode is safe.
        let page = String::from_utf8_lossy(&bytes);

        let found = html::table_count(&page);
        let table = match html::extract_table(&page, PRICE_TABLE_INDEX) {
            Some(rows) => rows,
            None => {
                warn!(
                    "Price table missing: wanted index {}, page has {} tables",
                    PRICE_TABLE_INDEX, found
                );
                return Err(LoadError::TableNotFound {
                    index: PRICE_TABLE_INDEX,
                    found,
                });
            }
        };

        let series = PriceSeries::from_points(clean_rows(&table));
        if series.is_empty() {
            warn!("Price table yielded no usable rows after cleaning");
            return Err(LoadError::EmptyAfterCleaning);
        }

        info!(
            "Loaded {} price points ({} to {})",
            series.len(),
            series.first().map(|p| p.date).unwrap_or_default(),
            series.last().map(|p| p.date).unwrap_or_default()
        );
        Ok(series)
    }
}

/// Turns raw table rows into price points.
///
/// A missing price cell inherits the most recent prior non-missing raw
/// value before coercion (forward fill). Rows whose date does not parse
/// day-first, or whose price does not coerce, are dropped; this is what
/// discards header and footer rows.
pub(crate) fn clean_rows(rows: &[Vec<String>]) -> Vec<PricePoint> {
    let mut points = Vec::with_capacity(rows.len());
    let mut last_price_text: Option<String> = None;

    for row in rows {
        let date_text = row.first().map(String::as_str).unwrap_or("");
        let price_text = match row.get(1).map(String::as_str) {
            Some(text) if !text.trim().is_empty() => {
                last_price_text = Some(text.to_string());
                text
            }
            _ => match &last_price_text {
                Some(previous) => previous.as_str(),
                None => continue,
            },
        };

        let Ok(date) = NaiveDate::parse_from_str(date_text.trim(), DAY_FIRST_FORMAT) else {
            continue;
        };
        let Some(price) = parse_price(price_text) else {
            continue;
        };
        points.push(PricePoint::new(date, price));
    }

    points
}

/// Coerces a price cell to `f64`, accepting both `78.90` and the
/// Brazilian `78,90` / `1.234,56` notations.
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace('\u{a0}', "");
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(value) = cleaned.parse::<f64>() {
        return Some(value);
    }
    if cleaned.contains(',') {
        let normalized = cleaned.replace('.', "").replace(',', ".");
        return normalized.parse::<f64>().ok();
    }
    None
}
