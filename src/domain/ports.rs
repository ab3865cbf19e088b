use crate::domain::errors::LoadError;
use crate::domain::series::PriceSeries;
use async_trait::async_trait;

/// Provider of the historical price record.
///
/// Every call refetches from scratch; implementations hold no series
/// state between invocations.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    async fn fetch_series(&self) -> Result<PriceSeries, LoadError>;
}
