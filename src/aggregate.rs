//! Temperature aggregation across all winters
//!
//! Collects every year's observations from 2001 up to the current year and
//! averages them per winter definition.

use chrono::{Datelike, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::data::{
    into_observations, yearly_key, DailyObservation, DailyRecord, MeteostatClient,
    TemperaturePayload, YearlyFetcher,
};
use crate::winter;

/// First year included in the aggregation
pub const START_YEAR: i32 = 2001;

/// Errors that can occur while aggregating
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The year range is empty or inverted
    #[error("Invalid year range: startYear={start}, endYear={end}")]
    InvalidYearRange { start: i32, end: i32 },

    /// No observations could be found for any year
    #[error("No data available")]
    NoData,

    /// The winter table could not be turned into windows
    #[error("Winter table contains an invalid date")]
    InvalidWinterTable,
}

/// Builds the `/api/temperature` payload
#[derive(Debug, Clone)]
pub struct Aggregator {
    store: CacheStore,
    fetcher: YearlyFetcher,
    start_year: i32,
}

impl Aggregator {
    /// Creates an aggregator starting at [`START_YEAR`]
    pub fn new(store: CacheStore, fetcher: YearlyFetcher) -> Self {
        Self {
            store,
            fetcher,
            start_year: START_YEAR,
        }
    }

    /// Wires the cache store, upstream client and fetcher from configuration
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::from_config(config);
        let fetcher = YearlyFetcher::new(MeteostatClient::new(config), store.clone());
        Self::new(store, fetcher)
    }

    /// Overrides the first aggregated year
    pub fn with_start_year(mut self, start_year: i32) -> Self {
        self.start_year = start_year;
        self
    }

    /// Collects observations for every year from the start year through
    /// `now`'s year, oldest first
    ///
    /// The cache store is consulted once per year before falling back to the
    /// fetcher. Years that yield nothing are skipped.
    pub async fn collect(&self, now: NaiveDateTime) -> Result<Vec<DailyObservation>, AggregateError> {
        let start = self.start_year;
        let end = now.year();
        if end < start {
            return Err(AggregateError::InvalidYearRange { start, end });
        }

        let mut daily = Vec::new();
        for year in start..=end {
            if let Some(records) = self.store.read::<Vec<DailyRecord>>(&yearly_key(year)).await {
                debug!(year, "using cached year");
                daily.extend(into_observations(records));
                continue;
            }

            let observations = self.fetcher.fetch_after_store_miss(year, now).await;
            daily.extend(observations);
        }

        Ok(daily)
    }

    /// Builds the full payload as of `now`
    pub async fn payload(&self, now: NaiveDateTime) -> Result<TemperaturePayload, AggregateError> {
        let daily_data = self.collect(now).await?;
        if daily_data.is_empty() {
            return Err(AggregateError::NoData);
        }

        let payload = summarize(daily_data, now)?;
        info!(
            observations = payload.daily_data.len(),
            meteorological = payload.meteorological.len(),
            astronomical = payload.astronomical.len(),
            "temperature payload built"
        );
        Ok(payload)
    }
}

/// Averages `daily_data` over every table winter that has started by `now`
pub fn summarize(
    daily_data: Vec<DailyObservation>,
    now: NaiveDateTime,
) -> Result<TemperaturePayload, AggregateError> {
    let winters = winter::all_winters().ok_or(AggregateError::InvalidWinterTable)?;
    let (meteorological, astronomical) = winter::winter_averages(&winters, &daily_data, now);
    Ok(TemperaturePayload {
        meteorological,
        astronomical,
        daily_data,
    })
}
