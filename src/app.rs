//! Application state management for the winter temperature viewer
//!
//! This module contains the viewer state, keyboard handling, and the
//! transition from loading to the chart views.

use chrono::{Local, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent};

use crate::chart_data::{default_focus_year, Overlay, SeasonSeries};
use crate::cli::StartupConfig;
use crate::data::{PayloadClient, TemperaturePayload};
use crate::winter;

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Year-over-year averages for both definitions
    Seasons,
    /// Daily temperatures of two winters on a shared season axis
    Overlay,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Last payload loaded from the server
    pub payload: Option<TemperaturePayload>,
    /// Message shown when the last load failed
    pub error: Option<String>,
    /// Winter shown in the overlay and daily sparkline
    pub focus_year: Option<i32>,
    /// Latest winter that had started when data was loaded
    pub latest_year: Option<i32>,
    /// Local time of the last successful load
    pub last_refresh: Option<NaiveDateTime>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a reload has been requested
    pub reload_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    pub warm_label: String,
    pub cold_label: String,
    client: PayloadClient,
}

impl App {
    /// Creates a viewer loading from `client`
    pub fn new(client: PayloadClient, startup: StartupConfig) -> Self {
        Self {
            state: AppState::Loading,
            payload: None,
            error: None,
            focus_year: startup.focus_year,
            latest_year: None,
            last_refresh: None,
            should_quit: false,
            reload_requested: false,
            show_help: false,
            warm_label: startup.warm_label,
            cold_label: startup.cold_label,
            client,
        }
    }

    /// Base URL the viewer loads from
    pub fn source(&self) -> &str {
        self.client.base_url()
    }

    /// Loads the payload from the server
    ///
    /// Transitions out of Loading whether or not the load succeeds; a failed
    /// reload keeps the previous payload on screen.
    pub async fn load(&mut self) {
        self.reload_requested = false;
        match self.client.fetch().await {
            Ok(payload) => self.apply_payload(payload, Local::now().naive_local()),
            Err(e) => {
                self.error = Some(format!("Failed to load temperature data: {}", e));
                if self.state == AppState::Loading {
                    self.state = AppState::Seasons;
                }
            }
        }
    }

    /// Stores a freshly loaded payload as of `now`
    pub fn apply_payload(&mut self, payload: TemperaturePayload, now: NaiveDateTime) {
        self.latest_year = default_focus_year(now);
        if self.focus_year.is_none() {
            self.focus_year = self.latest_year;
        }
        self.payload = Some(payload);
        self.error = None;
        self.last_refresh = Some(now);
        if self.state == AppState::Loading {
            self.state = AppState::Seasons;
        }
    }

    /// Series for the seasons chart
    pub fn season_series(&self) -> SeasonSeries {
        self.payload
            .as_ref()
            .map(SeasonSeries::from_payload)
            .unwrap_or_default()
    }

    /// Overlay for the focus winter, if data and a focus year are available
    pub fn overlay(&self) -> Option<Overlay> {
        let payload = self.payload.as_ref()?;
        let now = self.last_refresh?;
        Overlay::build(payload, self.focus_year?, now)
    }

    /// Average for the most recent started winter under each definition
    ///
    /// Drives the winner panel, which ignores the focus winter.
    pub fn latest_averages(&self) -> (Option<f64>, Option<f64>) {
        let (Some(payload), Some(year)) = (self.payload.as_ref(), self.latest_year) else {
            return (None, None);
        };
        (
            payload.meteorological.get(&year).copied(),
            payload.astronomical.get(&year).copied(),
        )
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Tab`: Switch between the seasons and overlay views
    /// - `1` / `2`: Seasons / overlay view
    /// - `Left`/`h`, `Right`/`l`: Previous / next focus winter
    /// - `r`: Reload data
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.state == AppState::Loading {
            // Only quit is allowed during loading
            if key_event.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.state = match self.state {
                    AppState::Seasons => AppState::Overlay,
                    _ => AppState::Seasons,
                };
            }
            KeyCode::Char('1') => {
                self.state = AppState::Seasons;
            }
            KeyCode::Char('2') => {
                self.state = AppState::Overlay;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.shift_focus(-1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.shift_focus(1);
            }
            KeyCode::Char('r') => {
                self.reload_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Moves the focus winter, staying within the table and never past the
    /// latest started winter
    fn shift_focus(&mut self, delta: i32) {
        let Some(year) = self.focus_year else {
            return;
        };
        let first = winter::table_years().next().unwrap_or(year);
        let last = self
            .latest_year
            .or_else(|| winter::table_years().last())
            .unwrap_or(year);
        self.focus_year = Some((year + delta).clamp(first, last.max(first)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn startup() -> StartupConfig {
        StartupConfig {
            focus_year: None,
            warm_label: "neomonk".to_string(),
            cold_label: "pajaro".to_string(),
        }
    }

    fn app() -> App {
        App::new(PayloadClient::new("http://127.0.0.1:9"), startup())
    }

    fn loaded_app() -> App {
        let mut app = app();
        let mut payload = TemperaturePayload::default();
        payload.meteorological.insert(2025, -4.0);
        payload.astronomical.insert(2025, 0.3);
        app.apply_payload(payload, at(2025, 1, 20));
        app
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = app();
        assert_eq!(app.state, AppState::Loading);
        assert!(app.payload.is_none());
        assert!(!app.should_quit);
        assert!(!app.show_help);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = app();

        app.handle_key(key_event(KeyCode::Tab));
        app.handle_key(key_event(KeyCode::Char('2')));
        app.handle_key(key_event(KeyCode::Char('?')));

        assert_eq!(app.state, AppState::Loading);
        assert!(!app.show_help);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_apply_payload_transitions_and_sets_focus() {
        let app = loaded_app();

        assert_eq!(app.state, AppState::Seasons);
        assert_eq!(app.focus_year, Some(2025));
        assert_eq!(app.latest_year, Some(2025));
        assert_eq!(app.latest_averages(), (Some(-4.0), Some(0.3)));
        assert_eq!(app.last_refresh, Some(at(2025, 1, 20)));
    }

    #[test]
    fn test_startup_focus_year_is_kept() {
        let mut app = App::new(
            PayloadClient::new("http://127.0.0.1:9"),
            StartupConfig {
                focus_year: Some(2019),
                ..startup()
            },
        );

        app.apply_payload(TemperaturePayload::default(), at(2025, 1, 20));

        assert_eq!(app.focus_year, Some(2019));
        assert_eq!(app.overlay().unwrap().focus.year, 2019);
    }

    #[test]
    fn test_tab_switches_views() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.state, AppState::Overlay);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.state, AppState::Seasons);
    }

    #[test]
    fn test_number_keys_select_views() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Char('2')));
        assert_eq!(app.state, AppState::Overlay);

        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.state, AppState::Seasons);
    }

    #[test]
    fn test_focus_moves_within_bounds() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.focus_year, Some(2025));

        app.handle_key(key_event(KeyCode::Left));
        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.focus_year, Some(2023));

        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.focus_year, Some(2024));

        app.focus_year = Some(2001);
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.focus_year, Some(2001));
    }

    #[test]
    fn test_latest_averages_ignore_focus_shift() {
        let mut app = loaded_app();
        app.payload
            .as_mut()
            .unwrap()
            .astronomical
            .insert(2024, 2.0);

        app.handle_key(key_event(KeyCode::Left));

        assert_eq!(app.focus_year, Some(2024));
        assert_eq!(app.latest_averages(), (Some(-4.0), Some(0.3)));
    }

    #[test]
    fn test_r_requests_reload() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.reload_requested);
    }

    #[test]
    fn test_help_intercepts_keys() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.state, AppState::Seasons);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_q_and_esc_quit() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);

        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_season_series_empty_without_payload() {
        let app = app();
        assert!(app.season_series().is_empty());
        assert!(app.overlay().is_none());
        assert_eq!(app.latest_averages(), (None, None));
    }

    #[tokio::test]
    async fn test_load_fetches_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temperature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meteorological": {"2024": -3.5},
                "astronomical": {"2024": -2.0},
                "dailyData": [{"date": "2024-01-15", "tavg": -5.0}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut app = App::new(PayloadClient::new(server.uri()), startup());
        app.reload_requested = true;

        app.load().await;

        assert_eq!(app.state, AppState::Seasons);
        assert!(app.error.is_none());
        assert!(!app.reload_requested);
        let payload = app.payload.as_ref().unwrap();
        assert_eq!(payload.meteorological.get(&2024), Some(&-3.5));
        assert_eq!(payload.daily_data.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temperature"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "No data available"})),
            )
            .mount(&server)
            .await;
        let mut app = App::new(PayloadClient::new(server.uri()), startup());
        let mut payload = TemperaturePayload::default();
        payload.meteorological.insert(2025, -4.0);
        app.apply_payload(payload, at(2025, 1, 20));
        app.state = AppState::Overlay;

        app.load().await;

        assert_eq!(app.state, AppState::Overlay);
        assert!(app.payload.is_some());
        assert!(app.error.as_ref().unwrap().contains("No data available"));
    }
}
