//! Chart series derived from the temperature payload
//!
//! Turns the payload into plain `(x, y)` points for the terminal charts so
//! that rendering code never has to reason about dates.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::data::{TemperaturePayload, WinterAverages};
use crate::winter::{self, Winter, WinterDefinition};

/// Last day shown on the overlay x axis (Mar 25 on the reference season)
pub const OVERLAY_LAST_DAY: f64 = 114.0;

/// Returns the reference-season date for an observation
///
/// December maps onto 2000, January through March onto 2001. Feb 29 has no
/// counterpart in 2001 and lands on Mar 1. Other months are outside any
/// winter and yield `None`.
pub fn normalize_day(date: NaiveDate) -> Option<NaiveDate> {
    match date.month() {
        12 => NaiveDate::from_ymd_opt(2000, 12, date.day()),
        1..=3 => NaiveDate::from_ymd_opt(2001, date.month(), date.day())
            .or_else(|| NaiveDate::from_ymd_opt(2001, 3, 1)),
        _ => None,
    }
}

/// Days since Dec 1 of the reference season
pub fn day_offset(date: NaiveDate) -> Option<f64> {
    let reference = NaiveDate::from_ymd_opt(2000, 12, 1)?;
    let normalized = normalize_day(date)?;
    Some((normalized - reference).num_days() as f64)
}

/// Rounds to one decimal place, as the averages are displayed
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Year-over-year averages for the seasons chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonSeries {
    pub meteorological: Vec<(f64, f64)>,
    pub astronomical: Vec<(f64, f64)>,
}

impl SeasonSeries {
    pub fn from_payload(payload: &TemperaturePayload) -> Self {
        Self {
            meteorological: points(&payload.meteorological),
            astronomical: points(&payload.astronomical),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meteorological.is_empty() && self.astronomical.is_empty()
    }

    /// Smallest and largest year across both series
    pub fn year_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.all_points().map(|(x, _)| x))
    }

    /// Smallest and largest temperature across both series
    pub fn temperature_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.all_points().map(|(_, y)| y))
    }

    fn all_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.meteorological
            .iter()
            .chain(self.astronomical.iter())
            .copied()
    }
}

fn points(averages: &WinterAverages) -> Vec<(f64, f64)> {
    averages
        .iter()
        .map(|(year, avg)| (*year as f64, *avg))
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// One winter's daily temperatures on the reference season
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinterSeries {
    pub year: i32,
    /// Days up to and including today
    pub actual: Vec<(f64, f64)>,
    /// Days after today
    pub forecast: Vec<(f64, f64)>,
}

impl WinterSeries {
    /// Collects the observations between meteorological start and
    /// astronomical end, split at `now`
    ///
    /// Days without an observation are left out.
    pub fn build(payload: &TemperaturePayload, winter: &Winter, now: NaiveDateTime) -> Self {
        let start = winter.meteorological.start;
        let end = winter.astronomical.end;
        let mut series = WinterSeries {
            year: winter.year,
            ..Default::default()
        };

        for observation in &payload.daily_data {
            let at = observation.date.and_time(NaiveTime::MIN);
            if at < start || at > end {
                continue;
            }
            let Some(x) = day_offset(observation.date) else {
                continue;
            };
            if at <= now {
                series.actual.push((x, observation.tavg));
            } else {
                series.forecast.push((x, observation.tavg));
            }
        }

        series
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty() && self.forecast.is_empty()
    }

    /// The focus winter's daily temperatures in date order
    pub fn temperatures(&self) -> Vec<f64> {
        self.actual
            .iter()
            .chain(self.forecast.iter())
            .map(|(_, y)| *y)
            .collect()
    }
}

/// Vertical marker on the overlay chart
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub x: f64,
}

/// Two winters laid over each other on the reference season
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub focus: WinterSeries,
    pub previous: Option<WinterSeries>,
    /// Focus winter's meteorological average
    pub average: Option<f64>,
    pub markers: Vec<Marker>,
}

impl Overlay {
    /// Builds the overlay for `focus_year` and the winter before it
    ///
    /// Returns `None` when the year has no table entry.
    pub fn build(payload: &TemperaturePayload, focus_year: i32, now: NaiveDateTime) -> Option<Self> {
        let focus = winter::winter(focus_year)?;
        let previous = winter::winter(focus_year - 1)
            .map(|w| WinterSeries::build(payload, &w, now));

        let markers = [
            ("Met Start", focus.meteorological.start),
            ("Astro Start", focus.astronomical.start),
            ("Astro End", focus.astronomical.end),
        ]
        .into_iter()
        .filter_map(|(name, at)| {
            Some(Marker {
                label: format!("{} {}", focus_year, name),
                x: day_offset(at.date())?,
            })
        })
        .collect();

        Some(Self {
            focus: WinterSeries::build(payload, &focus, now),
            previous,
            average: payload.meteorological.get(&focus_year).copied(),
            markers,
        })
    }

    /// Smallest and largest temperature drawn, including the average line
    pub fn temperature_bounds(&self) -> Option<(f64, f64)> {
        let series = std::iter::once(&self.focus).chain(self.previous.iter());
        let values = series
            .flat_map(|s| s.actual.iter().chain(s.forecast.iter()))
            .map(|(_, y)| *y)
            .chain(self.average);
        bounds(values)
    }
}

/// Default focus winter: the latest table winter that has started
pub fn default_focus_year(now: NaiveDateTime) -> Option<i32> {
    winter::latest_started(now).map(|w| w.year)
}

/// Human-readable description of a winter window, e.g.
/// `Dec 1, 2024 - Feb 28, 2025`
pub fn describe_window(winter: &Winter, definition: WinterDefinition) -> String {
    let window = winter.window(definition);
    let start = match definition {
        WinterDefinition::Meteorological => window.start.format("%b %-d, %Y").to_string(),
        WinterDefinition::Astronomical => window.start.format("%b %-d, %Y %H:%M").to_string(),
    };
    format!("{} - {}", start, window.end.format("%b %-d, %Y"))
}

/// Winner for one definition's average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// Average at or above freezing
    Warm,
    /// Average below freezing
    Cold,
    /// No average yet
    Undetermined,
}

impl Winner {
    /// Decides on the average as displayed, so `-0.04` counts as warm
    pub fn from_average(average: Option<f64>) -> Self {
        match average.map(round_tenth) {
            Some(avg) if avg >= 0.0 => Winner::Warm,
            Some(_) => Winner::Cold,
            None => Winner::Undetermined,
        }
    }

    pub fn label<'a>(&self, warm: &'a str, cold: &'a str) -> &'a str {
        match self {
            Winner::Warm => warm,
            Winner::Cold => cold,
            Winner::Undetermined => "Not yet determined",
        }
    }
}

/// Formats an average the way the panels show it
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}°C", avg),
        None => "N/A".to_string(),
    }
}

/// Labels for the x axis of the overlay chart
pub fn overlay_axis_labels() -> Vec<String> {
    let Some(reference) = NaiveDate::from_ymd_opt(2000, 12, 1) else {
        return Vec::new();
    };
    [0, 31, 62, 90, OVERLAY_LAST_DAY as i64]
        .iter()
        .map(|days| (reference + Duration::days(*days)).format("%b %-d").to_string())
        .collect()
}
