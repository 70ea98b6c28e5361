//! Calendar time → dial angles.
//!
//! Pure functions only. No clock reads, no settings reads: callers pass
//! the timestamp, the day table and the battery-saver window in.

use crate::{
    clock::Timestamp,
    clock_state::ClockState,
    types::Angle,
};
use serde::{Deserialize, Serialize};

pub const DEGREES_PER_MINUTE: Angle = 6;
pub const DEGREES_PER_SECOND: Angle = 6;
pub const DEGREES_PER_HOUR:   Angle = 30;
pub const DEGREES_PER_MONTH:  Angle = 30;

/// Hour-hand creep between whole hours, in tenths of a degree per minute.
pub const HOUR_CREEP_TENTHS_PER_MINUTE: Angle = 8;

/// Classic creep: 8% of the minute angle, in hundredths of a degree per minute.
pub const HOUR_CREEP_CLASSIC_HUNDREDTHS_PER_MINUTE: Angle = 48;

/// Night hours in window order. Battery-saver indices point into this.
pub const NIGHT_HOURS: [u32; 15] = [19, 20, 21, 22, 23, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Weekday (0 = Sunday) → day-hand angle. The day dial is not uniform:
/// the weekend arc is wider than the weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAngleTable {
    pub angles: [Angle; 7],
}

impl DayAngleTable {
    pub const CURRENT: Self = Self { angles: [327, 30, 76, 127, 168, 220, 270] };
    pub const CLASSIC: Self = Self { angles: [330, 30, 76, 127, 165, 220, 270] };

    pub fn sunday(&self) -> Angle {
        self.angles[0]
    }
}

/// Which day table the face uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayTableChoice {
    #[default]
    Current,
    Classic,
}

impl DayTableChoice {
    pub fn table(&self) -> DayAngleTable {
        match self {
            Self::Current => DayAngleTable::CURRENT,
            Self::Classic => DayAngleTable::CLASSIC,
        }
    }
}

/// How far the hour hand advances between whole hours.
///
/// `Tenths` moves 0.8°/minute and overshoots the next hour mark from about
/// :38 on, snapping back on the hour. `Classic` moves 0.48°/minute and
/// stays inside the hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HourCreep {
    #[default]
    Tenths,
    Classic,
}

impl HourCreep {
    pub fn degrees(&self, minute: u32) -> Angle {
        let minute = minute as Angle;
        match self {
            Self::Tenths  => minute * HOUR_CREEP_TENTHS_PER_MINUTE / 10,
            Self::Classic => minute * HOUR_CREEP_CLASSIC_HUNDREDTHS_PER_MINUTE / 100,
        }
    }
}

pub fn day_angle_for(weekday: u32, table: &DayAngleTable) -> Angle {
    table.angles.get(weekday as usize).copied().unwrap_or(0)
}

pub fn hour_angle_for(hour: u32, minute: u32) -> Angle {
    hour_angle_with(hour, minute, HourCreep::default())
}

pub fn hour_angle_with(hour: u32, minute: u32, creep: HourCreep) -> Angle {
    (hour % 12) as Angle * DEGREES_PER_HOUR + creep.degrees(minute)
}

pub fn angles_for(now: &Timestamp, table: &DayAngleTable) -> ClockState {
    angles_with(now, table, HourCreep::default())
}

pub fn angles_with(now: &Timestamp, table: &DayAngleTable, creep: HourCreep) -> ClockState {
    let month = now.month as Angle;
    ClockState {
        minute_angle:     now.minute as Angle * DEGREES_PER_MINUTE,
        hour_angle:       hour_angle_with(now.hour, now.minute, creep),
        day_angle:        day_angle_for(now.weekday, table),
        second_angle:     now.second as Angle * DEGREES_PER_SECOND,
        month_angle:      month * DEGREES_PER_MONTH,
        tick_month_angle: month * DEGREES_PER_MONTH + DEGREES_PER_MONTH,
        date:             now.day as i32,
        month,
        hour:             now.hour,
    }
}

// ── Battery saver ───────────────────────────────────────────────────

/// Index range into NIGHT_HOURS, start inclusive, stop exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatterySaverWindow {
    pub start_index: usize,
    pub stop_index:  usize,
}

impl BatterySaverWindow {
    /// Parse the two stored boundary strings. Anything that is not an
    /// index into NIGHT_HOURS yields None, which disables the saver.
    pub fn parse(start: &str, stop: &str) -> Option<Self> {
        let parse_index = |raw: &str| -> Option<usize> {
            raw.trim().parse::<usize>().ok().filter(|i| *i < NIGHT_HOURS.len())
        };
        match (parse_index(start), parse_index(stop)) {
            (Some(start_index), Some(stop_index)) => Some(Self { start_index, stop_index }),
            _ => {
                log::warn!("battery saver: ignoring malformed window start={start:?} stop={stop:?}");
                None
            }
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        battery_saver_active(hour, true, self.start_index, self.stop_index)
    }
}

/// True when `hour` sits inside the night window [start_index, stop_index).
/// Hours outside NIGHT_HOURS are never in the window, and an inverted or
/// empty index range matches nothing.
pub fn battery_saver_active(hour: u32, enabled: bool, start_index: usize, stop_index: usize) -> bool {
    if !enabled {
        return false;
    }
    NIGHT_HOURS
        .iter()
        .position(|h| *h == hour)
        .is_some_and(|i| start_index <= i && i < stop_index)
}
