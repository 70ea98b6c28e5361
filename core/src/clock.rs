//! Wall clock access: calendar timestamps and the clock source seam.
//!
//! RULE: Nothing in the core reads the system time directly.
//! Every clock read goes through a ClockSource so tests and the
//! runner can substitute a manual clock.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// The calendar fields the watch face cares about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub hour:    u32, // 0..23
    pub minute:  u32, // 0..59
    pub second:  u32, // 0..59
    pub weekday: u32, // 0 = Sunday
    pub day:     u32, // 1..31
    pub month:   u32, // 0..11
}

impl Timestamp {
    pub fn new(hour: u32, minute: u32, second: u32, weekday: u32, day: u32, month: u32) -> Self {
        Self { hour, minute, second, weekday, day, month }
    }

    /// Extract the watch fields from any chrono date-time.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        Self {
            hour:    dt.hour(),
            minute:  dt.minute(),
            second:  dt.second(),
            weekday: dt.weekday().num_days_from_sunday(),
            day:     dt.day(),
            month:   dt.month0(),
        }
    }
}

/// Source of "now". The host's clock in production, a manual clock in tests.
pub trait ClockSource {
    fn now(&self) -> Timestamp;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(&chrono::Local::now())
    }
}

/// How often the tick timer fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TickGranularity {
    PerMinute,
    PerSecond,
}

/// Which units changed on a tick. A per-second subscription delivers
/// `minute: true` together with `second: true` on the minute boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimeUnits {
    pub second: bool,
    pub minute: bool,
}

impl TimeUnits {
    pub const SECOND: Self = Self { second: true,  minute: false };
    pub const MINUTE: Self = Self { second: false, minute: true  };

    /// Units the host reports for a tick at `ts` under `granularity`.
    /// None means the tick is not delivered at all.
    pub fn for_tick(granularity: TickGranularity, ts: &Timestamp) -> Option<Self> {
        let minute = ts.second == 0;
        match granularity {
            TickGranularity::PerSecond => Some(Self { second: true, minute }),
            TickGranularity::PerMinute if minute => Some(Self::MINUTE),
            TickGranularity::PerMinute => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn from_datetime_uses_sunday_based_weekday_and_zero_based_month() {
        // 2026-10-14 is a Wednesday.
        let dt = NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(10, 5, 30)
            .unwrap();
        let ts = Timestamp::from_datetime(&dt);
        assert_eq!(ts, Timestamp::new(10, 5, 30, 3, 14, 9));
    }

    #[test]
    fn per_minute_ticks_only_on_second_zero() {
        let at = |s| Timestamp::new(8, 0, s, 1, 1, 0);
        assert_eq!(TimeUnits::for_tick(TickGranularity::PerMinute, &at(0)), Some(TimeUnits::MINUTE));
        assert_eq!(TimeUnits::for_tick(TickGranularity::PerMinute, &at(1)), None);
        assert_eq!(
            TimeUnits::for_tick(TickGranularity::PerSecond, &at(0)),
            Some(TimeUnits { second: true, minute: true })
        );
    }
}
