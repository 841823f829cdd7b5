//! Winter definitions and per-winter averaging
//!
//! A winter is labelled by the year it ends in: winter 2025 runs from
//! December 2024 into early 2025. Two definitions are compared:
//!
//! - meteorological: Dec 1 of the previous year through Feb 28
//! - astronomical: December solstice through March equinox, taken from a
//!   precomputed table of local timestamps
//!
//! Observations are positioned at midnight of their date when compared
//! against window bounds.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::data::{DailyObservation, WinterAverages};

/// Solstice and equinox timestamps (station local time) for each winter
///
/// The table stops at 2025; later winters are not reported.
const ASTRONOMICAL_WINTERS: [(i32, &str, &str); 25] = [
    (2001, "2000-12-21 08:37", "2001-03-20 02:35"),
    (2002, "2001-12-21 14:21", "2002-03-20 08:31"),
    (2003, "2002-12-21 20:14", "2003-03-20 14:16"),
    (2004, "2003-12-22 02:04", "2004-03-20 20:00"),
    (2005, "2004-12-21 07:42", "2005-03-20 01:49"),
    (2006, "2005-12-21 13:35", "2006-03-20 07:34"),
    (2007, "2006-12-21 19:22", "2007-03-20 13:26"),
    (2008, "2007-12-22 01:08", "2008-03-20 19:07"),
    (2009, "2008-12-21 07:04", "2009-03-20 01:48"),
    (2010, "2009-12-21 12:47", "2010-03-20 07:44"),
    (2011, "2010-12-21 18:38", "2011-03-20 13:32"),
    (2012, "2011-12-22 00:30", "2012-03-20 19:21"),
    (2013, "2012-12-21 06:12", "2013-03-20 01:14"),
    (2014, "2013-12-21 12:11", "2014-03-20 07:02"),
    (2015, "2014-12-21 18:03", "2015-03-20 12:57"),
    (2016, "2015-12-22 00:48", "2016-03-20 18:45"),
    (2017, "2016-12-21 05:44", "2017-03-20 00:30"),
    (2018, "2017-12-21 11:28", "2018-03-20 06:28"),
    (2019, "2018-12-21 17:23", "2019-03-20 12:15"),
    (2020, "2019-12-21 23:19", "2020-03-20 18:58"),
    (2021, "2020-12-21 05:02", "2021-03-19 23:50"),
    (2022, "2021-12-21 10:59", "2022-03-20 05:37"),
    (2023, "2022-12-21 16:48", "2023-03-20 11:33"),
    (2024, "2023-12-21 22:27", "2024-03-20 17:24"),
    (2025, "2024-12-21 04:12", "2025-03-20 13:16"),
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The two competing definitions of winter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinterDefinition {
    /// Fixed Dec 1 - Feb 28 window
    Meteorological,
    /// Solstice to equinox
    Astronomical,
}

impl WinterDefinition {
    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            WinterDefinition::Meteorological => "Meteorological",
            WinterDefinition::Astronomical => "Astronomical",
        }
    }
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinterWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WinterWindow {
    /// Whether an observation dated `date` falls inside the window and not after `now`
    pub fn contains(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        let at = date.and_time(NaiveTime::MIN);
        at >= self.start && at <= self.end && at <= now
    }

    /// Mean `tavg` of the observations inside the window, if any
    pub fn average(&self, observations: &[DailyObservation], now: NaiveDateTime) -> Option<f64> {
        let (sum, count) = observations
            .iter()
            .filter(|o| self.contains(o.date, now))
            .fold((0.0, 0usize), |(sum, count), o| (sum + o.tavg, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

/// Both windows for one winter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winter {
    /// The year the winter ends in
    pub year: i32,
    pub meteorological: WinterWindow,
    pub astronomical: WinterWindow,
}

impl Winter {
    /// Window for the given definition
    pub fn window(&self, definition: WinterDefinition) -> WinterWindow {
        match definition {
            WinterDefinition::Meteorological => self.meteorological,
            WinterDefinition::Astronomical => self.astronomical,
        }
    }

    /// Whether the winter has begun by `now`
    pub fn has_started(&self, now: NaiveDateTime) -> bool {
        self.meteorological.start <= now
    }
}

/// Dec 1 of the previous year through Feb 28, both at midnight
pub fn meteorological_window(year: i32) -> Option<WinterWindow> {
    Some(WinterWindow {
        start: NaiveDate::from_ymd_opt(year - 1, 12, 1)?.and_time(NaiveTime::MIN),
        end: NaiveDate::from_ymd_opt(year, 2, 28)?.and_time(NaiveTime::MIN),
    })
}

/// Looks up the solstice/equinox pair for a winter
pub fn astronomical_window(year: i32) -> Option<WinterWindow> {
    let (_, start, end) = ASTRONOMICAL_WINTERS.iter().find(|(y, _, _)| *y == year)?;
    Some(WinterWindow {
        start: NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT).ok()?,
        end: NaiveDateTime::parse_from_str(end, TIMESTAMP_FORMAT).ok()?,
    })
}

/// Both windows for a winter in the table
pub fn winter(year: i32) -> Option<Winter> {
    Some(Winter {
        year,
        meteorological: meteorological_window(year)?,
        astronomical: astronomical_window(year)?,
    })
}

/// Every year with an astronomical table entry, oldest first
pub fn table_years() -> impl Iterator<Item = i32> {
    ASTRONOMICAL_WINTERS.iter().map(|(year, _, _)| *year)
}

/// Every winter in the table, oldest first
///
/// Returns `None` if a table entry cannot be turned into a window.
pub fn all_winters() -> Option<Vec<Winter>> {
    table_years().map(winter).collect()
}

/// The most recent table winter that has started by `now`
pub fn latest_started(now: NaiveDateTime) -> Option<Winter> {
    all_winters()?
        .into_iter()
        .filter(|w| w.has_started(now))
        .last()
}

/// Per-definition averages over all winters that have started by `now`
///
/// Winters without any matching observation are left out of the maps.
pub fn winter_averages(
    winters: &[Winter],
    observations: &[DailyObservation],
    now: NaiveDateTime,
) -> (WinterAverages, WinterAverages) {
    let mut meteorological = WinterAverages::new();
    let mut astronomical = WinterAverages::new();

    for winter in winters.iter().filter(|w| w.has_started(now)) {
        if let Some(avg) = winter.meteorological.average(observations, now) {
            meteorological.insert(winter.year, avg);
        }
        if let Some(avg) = winter.astronomical.average(observations, now) {
            astronomical.insert(winter.year, avg);
        }
    }

    (meteorological, astronomical)
}
