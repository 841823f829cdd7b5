//! Yearly observation fetcher
//!
//! Decides, per calendar year, whether observations come from memory, the
//! cache store, or the upstream API. Historical years are written to the
//! cache store once and never fetched again; the current and previous year
//! are held in memory and refetched once the freshness window has passed.

use chrono::{Datelike, Duration, Local, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{into_observations, yearly_key, DailyObservation, DailyRecord, MeteostatClient};
use crate::cache::{CacheStore, FreshnessCache};

/// Earliest year the fetcher will serve
pub const MIN_YEAR: i32 = 2000;

/// Maximum age, in seconds, of in-memory data for the current and previous year
pub const FRESHNESS_WINDOW_SECS: i64 = 60 * 60;

/// Returns observations for a calendar year from the cheapest available source
#[derive(Debug, Clone)]
pub struct YearlyFetcher {
    client: MeteostatClient,
    store: CacheStore,
    recent: Arc<FreshnessCache<Vec<DailyObservation>>>,
}

impl YearlyFetcher {
    /// Creates a fetcher with an empty in-memory cache
    pub fn new(client: MeteostatClient, store: CacheStore) -> Self {
        Self::with_window(client, store, Duration::seconds(FRESHNESS_WINDOW_SECS))
    }

    /// Creates a fetcher with a custom freshness window
    pub fn with_window(client: MeteostatClient, store: CacheStore, window: Duration) -> Self {
        Self {
            client,
            store,
            recent: Arc::new(FreshnessCache::new(window)),
        }
    }

    /// Fetches observations for `year` as of the local wall clock
    pub async fn fetch(&self, year: i32) -> Vec<DailyObservation> {
        self.fetch_at(year, Local::now().naive_local()).await
    }

    /// Fetches observations for `year` as of `now`
    ///
    /// Never fails: out-of-range years and upstream failures yield an empty
    /// sequence.
    pub async fn fetch_at(&self, year: i32, now: NaiveDateTime) -> Vec<DailyObservation> {
        self.fetch_inner(year, now, true).await
    }

    /// Like [`fetch_at`](Self::fetch_at), for callers that already missed
    /// the cache store for `year`
    ///
    /// Historical years go straight to the upstream API and are persisted on
    /// success.
    pub async fn fetch_after_store_miss(
        &self,
        year: i32,
        now: NaiveDateTime,
    ) -> Vec<DailyObservation> {
        self.fetch_inner(year, now, false).await
    }

    async fn fetch_inner(
        &self,
        year: i32,
        now: NaiveDateTime,
        check_store: bool,
    ) -> Vec<DailyObservation> {
        let current_year = now.year();
        if !(MIN_YEAR..=current_year).contains(&year) {
            error!(year, "invalid year");
            return Vec::new();
        }

        let is_recent = year >= current_year - 1;

        if is_recent {
            if let Some(observations) = self.recent.get(year, now).await {
                debug!(year, "using in-memory data");
                return observations;
            }
        } else if check_store {
            if let Some(records) = self.store.read::<Vec<DailyRecord>>(&yearly_key(year)).await {
                debug!(year, "cache hit");
                return into_observations(records);
            }
        }

        info!(year, station = self.client.station(), "making API call");
        let observations = match self.client.fetch_year(year).await {
            Ok(observations) => observations,
            Err(e) => {
                error!(year, error = %e, "API call failed");
                return Vec::new();
            }
        };

        if is_recent {
            debug!(year, "storing data in memory");
            self.recent
                .retain_years(&[current_year, current_year - 1])
                .await;
            self.recent.put(year, observations.clone(), now).await;
        } else {
            let _ = self.store.write(&yearly_key(year), &observations);
        }

        observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn body_for(year: i32, tavg: f64) -> serde_json::Value {
        serde_json::json!({
            "data": [
                {"date": format!("{}-01-01", year), "tavg": tavg, "tmin": null},
                {"date": format!("{}-01-02", year), "tavg": tavg + 1.0, "tmin": null}
            ]
        })
    }

    async fn mock_year(server: &MockServer, year: i32, tavg: f64, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/stations/daily"))
            .and(query_param("start", format!("{}-01-01", year)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body_for(year, tavg)))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    struct Fixture {
        fetcher: YearlyFetcher,
        static_dir: TempDir,
        dynamic_dir: TempDir,
    }

    fn fixture(server: &MockServer) -> Fixture {
        let static_dir = TempDir::new().expect("Failed to create temp directory");
        let dynamic_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::with_dirs(
            static_dir.path().to_path_buf(),
            dynamic_dir.path().to_path_buf(),
        );
        let fetcher = YearlyFetcher::new(MeteostatClient::with_base_url(server.uri()), store);
        Fixture {
            fetcher,
            static_dir,
            dynamic_dir,
        }
    }

    #[tokio::test]
    async fn test_out_of_range_years_are_empty_without_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body_for(1999, 0.0)))
            .expect(0)
            .mount(&server)
            .await;
        let fx = fixture(&server);
        let now = at(2025, 1, 20, 12, 0);

        assert!(fx.fetcher.fetch_at(1999, now).await.is_empty());
        assert!(fx.fetcher.fetch_at(2026, now).await.is_empty());
        assert!(fx.fetcher.fetch_at(-5, now).await.is_empty());
    }

    #[tokio::test]
    async fn test_cached_historical_year_skips_api() {
        let server = MockServer::start().await;
        mock_year(&server, 2019, 0.0, 0).await;
        let fx = fixture(&server);
        fs::write(
            fx.static_dir.path().join("yearly-2019.json"),
            r#"[{"date": "2019-02-01", "tavg": -7.5}, {"date": "2019-02-02", "tavg": null}]"#,
        )
        .unwrap();

        let observations = fx.fetcher.fetch_at(2019, at(2025, 1, 20, 12, 0)).await;

        assert_eq!(
            observations,
            vec![DailyObservation {
                date: NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
                tavg: -7.5,
            }]
        );
    }

    #[tokio::test]
    async fn test_historical_miss_fetches_once_and_persists() {
        let server = MockServer::start().await;
        mock_year(&server, 2018, -3.0, 1).await;
        let fx = fixture(&server);
        let now = at(2025, 1, 20, 12, 0);

        let first = fx.fetcher.fetch_at(2018, now).await;
        let second = fx.fetcher.fetch_at(2018, at(2025, 6, 1, 0, 0)).await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert!(fx.dynamic_dir.path().join("yearly-2018.json").exists());
        assert!(!fx.static_dir.path().join("yearly-2018.json").exists());
    }

    #[tokio::test]
    async fn test_current_year_served_from_memory_within_window() {
        let server = MockServer::start().await;
        mock_year(&server, 2025, -2.0, 1).await;
        let fx = fixture(&server);

        let first = fx.fetcher.fetch_at(2025, at(2025, 1, 20, 12, 0)).await;
        let second = fx.fetcher.fetch_at(2025, at(2025, 1, 20, 12, 59)).await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_current_year_refetched_after_window() {
        let server = MockServer::start().await;
        mock_year(&server, 2025, -2.0, 2).await;
        let fx = fixture(&server);

        fx.fetcher.fetch_at(2025, at(2025, 1, 20, 12, 0)).await;
        fx.fetcher.fetch_at(2025, at(2025, 1, 20, 12, 30)).await;
        fx.fetcher.fetch_at(2025, at(2025, 1, 20, 13, 1)).await;
    }

    #[tokio::test]
    async fn test_recent_years_never_touch_cache_store() {
        let server = MockServer::start().await;
        mock_year(&server, 2024, 1.0, 1).await;
        let fx = fixture(&server);
        fs::write(
            fx.static_dir.path().join("yearly-2024.json"),
            r#"[{"date": "2024-02-01", "tavg": 99.0}]"#,
        )
        .unwrap();

        let observations = fx.fetcher.fetch_at(2024, at(2025, 1, 20, 12, 0)).await;

        assert_eq!(observations.len(), 2);
        assert!(observations.iter().all(|o| o.tavg < 50.0));
        assert!(!fx.dynamic_dir.path().join("yearly-2024.json").exists());
    }

    #[tokio::test]
    async fn test_current_and_previous_year_are_kept_apart() {
        let server = MockServer::start().await;
        mock_year(&server, 2025, -2.0, 1).await;
        mock_year(&server, 2024, 4.0, 1).await;
        let fx = fixture(&server);
        let now = at(2025, 1, 20, 12, 0);

        let current = fx.fetcher.fetch_at(2025, now).await;
        let previous = fx.fetcher.fetch_at(2024, now).await;
        let current_again = fx.fetcher.fetch_at(2025, now).await;
        let previous_again = fx.fetcher.fetch_at(2024, now).await;

        assert_eq!(current[0].tavg, -2.0);
        assert_eq!(previous[0].tavg, 4.0);
        assert_eq!(current, current_again);
        assert_eq!(previous, previous_again);
    }

    #[tokio::test]
    async fn test_api_failure_returns_empty_and_caches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stations/daily"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        let fx = fixture(&server);
        let now = at(2025, 1, 20, 12, 0);

        assert!(fx.fetcher.fetch_at(2015, now).await.is_empty());
        assert!(fx.fetcher.fetch_at(2025, now).await.is_empty());
        assert!(!fx.dynamic_dir.path().join("yearly-2015.json").exists());
    }

    #[tokio::test]
    async fn test_fetch_after_store_miss_ignores_seeded_file() {
        let server = MockServer::start().await;
        mock_year(&server, 2017, -1.0, 1).await;
        let fx = fixture(&server);
        fs::write(
            fx.static_dir.path().join("yearly-2017.json"),
            r#"[{"date": "2017-02-01", "tavg": -9.0}]"#,
        )
        .unwrap();

        let observations = fx
            .fetcher
            .fetch_after_store_miss(2017, at(2025, 1, 20, 12, 0))
            .await;

        assert_eq!(observations[0].tavg, -1.0);
        assert!(fx.dynamic_dir.path().join("yearly-2017.json").exists());
    }
}
