//! Domain models for flight departure records and derived on-time features.
//!
//! This module provides the core data structures that represent flight
//! departures, recurring high-season calendar ranges, and time-of-day buckets,
//! together with the pure per-row functions that derive each feature. The
//! DataFrame layer only vectorizes these functions; no behavior depends on
//! row ordering.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Delay threshold in whole minutes above which a departure counts as delayed.
pub const DELAY_THRESHOLD_MIN: i64 = 15;

/// A calendar month/day pair with no year attached.
///
/// Ordering is lexicographic on (month, day), so `MonthDay` values compare
/// the way they appear within a single calendar year.
///
/// # Examples
///
/// ```
/// use flights_rust::core::domain::MonthDay;
///
/// let christmas = MonthDay::new(12, 25);
/// let new_year = MonthDay::new(1, 1);
/// assert!(new_year < christmas);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Creates a new month/day pair.
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Extracts the month/day pair of a calendar date, dropping the year.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

/// An inclusive, year-agnostic calendar date interval.
///
/// A range whose start sorts after its end wraps the year boundary, e.g.
/// Dec 15 - Mar 3 covers late December and the following January through
/// early March of any year.
///
/// # Examples
///
/// ```
/// use flights_rust::core::domain::{MonthDay, SeasonRange};
///
/// let winter = SeasonRange::new(MonthDay::new(12, 15), MonthDay::new(3, 3));
/// assert!(winter.contains(MonthDay::new(12, 25)));
/// assert!(winter.contains(MonthDay::new(1, 10)));
/// assert!(!winter.contains(MonthDay::new(5, 1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRange {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SeasonRange {
    /// Creates a new inclusive date range.
    pub const fn new(start: MonthDay, end: MonthDay) -> Self {
        Self { start, end }
    }

    /// Inclusive membership test, wrap-aware.
    pub fn contains(&self, day: MonthDay) -> bool {
        if self.start <= self.end {
            self.start <= day && day <= self.end
        } else {
            day >= self.start || day <= self.end
        }
    }
}

/// The fixed recurring high-travel periods, inclusive on both ends.
pub const HIGH_SEASON: [SeasonRange; 3] = [
    SeasonRange::new(MonthDay::new(12, 15), MonthDay::new(3, 3)),
    SeasonRange::new(MonthDay::new(7, 15), MonthDay::new(7, 31)),
    SeasonRange::new(MonthDay::new(9, 11), MonthDay::new(9, 30)),
];

/// Time-of-day bucket derived from the scheduled departure clock time.
///
/// The three buckets partition the 24-hour clock with no gaps or overlaps:
/// morning [05:00, 12:00), afternoon [12:00, 19:00), night [19:00, 05:00)
/// (wraps midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Night,
}

impl DayPeriod {
    /// Label used in exported feature tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Night => "night",
        }
    }
}

impl std::fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DayPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(DayPeriod::Morning),
            "afternoon" => Ok(DayPeriod::Afternoon),
            "night" => Ok(DayPeriod::Night),
            _ => Err(format!(
                "Invalid day period: {}. Must be 'morning', 'afternoon', or 'night'",
                s
            )),
        }
    }
}

/// Returns true when `date`'s month/day falls inside any high-season range.
///
/// Membership depends only on the calendar month and day; the year is ignored.
pub fn is_high_season(date: NaiveDate) -> bool {
    let day = MonthDay::from_date(date);
    HIGH_SEASON.iter().any(|range| range.contains(day))
}

/// Signed difference in whole minutes between actual and scheduled departure.
///
/// Truncates toward zero; negative values mean the flight left early.
pub fn delay_minutes(scheduled: NaiveDateTime, actual: NaiveDateTime) -> i64 {
    (actual - scheduled).num_minutes()
}

/// Whether a delay of `minutes` counts as a 15-minute delay (`> 15`).
pub fn is_delayed_15(minutes: i64) -> bool {
    minutes > DELAY_THRESHOLD_MIN
}

/// Classifies a clock time into its day period.
///
/// The comparison chain is exhaustive over the 24-hour clock: any time not in
/// the morning or afternoon interval is night, so no unset category exists.
pub fn day_period(time: NaiveTime) -> DayPeriod {
    let hour = time.hour();
    if (5..12).contains(&hour) {
        DayPeriod::Morning
    } else if (12..19).contains(&hour) {
        DayPeriod::Afternoon
    } else {
        DayPeriod::Night
    }
}

/// A single flight departure with its derived on-time features.
///
/// Records are loaded from the raw table, derived in place by the feature
/// steps, and exported as a reduced feature table. Derived fields are `None`
/// until the corresponding generation step has run.
///
/// # Fields
///
/// * `scheduled_departure` - Planned departure timestamp (`Fecha-I`)
/// * `actual_departure` - Observed departure timestamp (`Fecha-O`)
/// * `high_season` - Scheduled date falls in a high-travel period
/// * `delay_minutes` - Signed whole minutes between actual and scheduled
/// * `delayed_15` - Delay exceeds 15 minutes
/// * `day_period` - Time-of-day bucket of the scheduled departure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub scheduled_departure: NaiveDateTime,
    pub actual_departure: NaiveDateTime,
    pub high_season: Option<bool>,
    pub delay_minutes: Option<i64>,
    pub delayed_15: Option<bool>,
    pub day_period: Option<DayPeriod>,
}

impl FlightRecord {
    /// Creates a record with no derived features yet.
    pub fn new(scheduled_departure: NaiveDateTime, actual_departure: NaiveDateTime) -> Self {
        Self {
            scheduled_departure,
            actual_departure,
            high_season: None,
            delay_minutes: None,
            delayed_15: None,
            day_period: None,
        }
    }

    /// Derives all four features from the two timestamps.
    ///
    /// `delayed_15` is recomputed from `delay_minutes` here, so the two can
    /// never disagree.
    pub fn with_features(mut self) -> Self {
        let minutes = delay_minutes(self.scheduled_departure, self.actual_departure);
        self.high_season = Some(is_high_season(self.scheduled_departure.date()));
        self.delay_minutes = Some(minutes);
        self.delayed_15 = Some(is_delayed_15(minutes));
        self.day_period = Some(day_period(self.scheduled_departure.time()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_high_season_christmas_any_year() {
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 12, 25).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(1999, 12, 25).unwrap()));
    }

    #[test]
    fn test_high_season_range_boundaries_inclusive() {
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 12, 15).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 3, 3).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 7, 15).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 7, 31).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 9, 11).unwrap()));
        assert!(is_high_season(NaiveDate::from_ymd_opt(2017, 9, 30).unwrap()));
        assert!(!is_high_season(NaiveDate::from_ymd_opt(2017, 3, 4).unwrap()));
        assert!(!is_high_season(NaiveDate::from_ymd_opt(2017, 12, 14).unwrap()));
    }

    #[test]
    fn test_high_season_may_first_is_low() {
        assert!(!is_high_season(NaiveDate::from_ymd_opt(2017, 5, 1).unwrap()));
    }

    #[test]
    fn test_day_period_boundaries() {
        assert_eq!(day_period(hm(4, 59)), DayPeriod::Night);
        assert_eq!(day_period(hm(5, 0)), DayPeriod::Morning);
        assert_eq!(day_period(hm(11, 59)), DayPeriod::Morning);
        assert_eq!(day_period(hm(12, 0)), DayPeriod::Afternoon);
        assert_eq!(day_period(hm(18, 59)), DayPeriod::Afternoon);
        assert_eq!(day_period(hm(19, 0)), DayPeriod::Night);
        assert_eq!(day_period(hm(23, 59)), DayPeriod::Night);
        assert_eq!(day_period(hm(0, 0)), DayPeriod::Night);
    }

    #[test]
    fn test_delay_minutes_sign() {
        let scheduled = dt("2017-01-02 23:30:00");
        assert_eq!(delay_minutes(scheduled, dt("2017-01-02 23:47:00")), 17);
        assert_eq!(delay_minutes(scheduled, dt("2017-01-02 23:30:00")), 0);
        assert_eq!(delay_minutes(scheduled, dt("2017-01-02 23:25:00")), -5);
    }

    #[test]
    fn test_delay_minutes_truncates_toward_zero() {
        let scheduled = dt("2017-01-02 23:30:00");
        assert_eq!(delay_minutes(scheduled, dt("2017-01-02 23:31:30")), 1);
        assert_eq!(delay_minutes(scheduled, dt("2017-01-02 23:28:30")), -1);
    }

    #[test]
    fn test_delay_threshold_is_strict() {
        assert!(!is_delayed_15(15));
        assert!(is_delayed_15(16));
        assert!(!is_delayed_15(-20));
    }

    #[test]
    fn test_day_period_round_trips_through_labels() {
        for period in [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Night] {
            assert_eq!(period.as_str().parse::<DayPeriod>().unwrap(), period);
        }
        assert!("midnight".parse::<DayPeriod>().is_err());
    }

    #[test]
    fn test_with_features_derives_consistent_values() {
        let record =
            FlightRecord::new(dt("2017-12-25 20:00:00"), dt("2017-12-25 20:20:00")).with_features();

        assert_eq!(record.high_season, Some(true));
        assert_eq!(record.delay_minutes, Some(20));
        assert_eq!(record.delayed_15, Some(true));
        assert_eq!(record.day_period, Some(DayPeriod::Night));
    }

    /// Wrap-aware interval membership written independently of `day_period`:
    /// for [start, end) with start > end, a minute belongs iff it is >= start
    /// or < end.
    fn in_bucket(minute: u32, start: u32, end: u32) -> bool {
        if start <= end {
            minute >= start && minute < end
        } else {
            minute >= start || minute < end
        }
    }

    proptest! {
        #[test]
        fn day_periods_partition_the_clock(minute_of_day in 0u32..1440) {
            let time = hm(minute_of_day / 60, minute_of_day % 60);
            let period = day_period(time);

            let morning = in_bucket(minute_of_day, 5 * 60, 12 * 60);
            let afternoon = in_bucket(minute_of_day, 12 * 60, 19 * 60);
            let night = in_bucket(minute_of_day, 19 * 60, 5 * 60);

            // Collectively exhaustive and mutually exclusive.
            let matched = [morning, afternoon, night].iter().filter(|&&m| m).count();
            prop_assert_eq!(matched, 1);

            let expected = if morning {
                DayPeriod::Morning
            } else if afternoon {
                DayPeriod::Afternoon
            } else {
                DayPeriod::Night
            };
            prop_assert_eq!(period, expected);
        }

        #[test]
        fn delay_flag_matches_threshold(minutes in -600i64..600) {
            prop_assert_eq!(is_delayed_15(minutes), minutes > 15);
        }
    }
}
