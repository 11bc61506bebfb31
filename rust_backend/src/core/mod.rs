pub mod domain;

pub use domain::{
    day_period, delay_minutes, is_delayed_15, is_high_season, DayPeriod, FlightRecord, MonthDay,
    SeasonRange, HIGH_SEASON,
};
