//! Core data models for the winter temperature tracker
//!
//! This module contains the observation types shared by the cache, the
//! upstream client, the aggregator and the terminal viewer.

pub mod fetcher;
pub mod meteostat;
pub mod payload_client;

pub use fetcher::{YearlyFetcher, FRESHNESS_WINDOW_SECS, MIN_YEAR};
pub use meteostat::{MeteostatClient, MeteostatError};
pub use payload_client::{PayloadClient, PayloadError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single day's average temperature at the station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Daily average temperature in Celsius
    pub tavg: f64,
}

/// A daily row as delivered by the provider or stored in a cache file
///
/// The provider sends many more columns (`tmin`, `tmax`, `prcp`, ...); they
/// are ignored. `tavg` is null for days the station did not report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub tavg: Option<f64>,
}

/// Converts provider rows into observations, dropping days without an average
pub fn into_observations(records: Vec<DailyRecord>) -> Vec<DailyObservation> {
    records
        .into_iter()
        .filter_map(|record| {
            record.tavg.map(|tavg| DailyObservation {
                date: record.date,
                tavg,
            })
        })
        .collect()
}

/// Per-year winter averages keyed by the year the winter ends in
pub type WinterAverages = BTreeMap<i32, f64>;

/// Body of `GET /api/temperature`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperaturePayload {
    /// Averages over Dec 1 - Feb 28
    pub meteorological: WinterAverages,
    /// Averages over solstice - equinox
    pub astronomical: WinterAverages,
    /// Every observation that went into the averages, oldest first
    pub daily_data: Vec<DailyObservation>,
}

/// Cache key for a calendar year's observations
pub fn yearly_key(year: i32) -> String {
    format!("yearly-{}", year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_extra_provider_fields() {
        let json = r#"{
            "date": "2019-01-03",
            "tavg": -4.2,
            "tmin": -8.0,
            "tmax": -1.1,
            "prcp": 0.0,
            "snow": 120,
            "wdir": null,
            "wspd": 14.4,
            "wpgt": null,
            "pres": 1021.3,
            "tsun": null
        }"#;

        let record: DailyRecord = serde_json::from_str(json).expect("Failed to parse record");

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2019, 1, 3).unwrap());
        assert_eq!(record.tavg, Some(-4.2));
    }

    #[test]
    fn test_into_observations_drops_missing_averages() {
        let records = vec![
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                tavg: Some(-2.0),
            },
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
                tavg: None,
            },
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2019, 1, 3).unwrap(),
                tavg: Some(1.5),
            },
        ];

        let observations = into_observations(records);

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].tavg, -2.0);
        assert_eq!(observations[1].date, NaiveDate::from_ymd_opt(2019, 1, 3).unwrap());
    }

    #[test]
    fn test_payload_uses_camel_case_and_string_year_keys() {
        let mut payload = TemperaturePayload::default();
        payload.meteorological.insert(2025, -4.0);
        payload.daily_data.push(DailyObservation {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            tavg: -5.0,
        });

        let json = serde_json::to_string(&payload).expect("Failed to serialize payload");

        assert_eq!(
            json,
            r#"{"meteorological":{"2025":-4.0},"astronomical":{},"dailyData":[{"date":"2025-01-15","tavg":-5.0}]}"#
        );

        let parsed: TemperaturePayload =
            serde_json::from_str(&json).expect("Failed to parse payload");
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_yearly_key() {
        assert_eq!(yearly_key(2019), "yearly-2019");
    }
}
