//! The clock state: every dial position the face draws.

use crate::types::Angle;
use serde::{Deserialize, Serialize};

/// Angles plus the raw calendar fields the renderer and the
/// battery-saver test need. Replaced wholesale, never patched by two
/// writers in one turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct ClockState {
    pub minute_angle:     Angle,
    pub hour_angle:       Angle,
    pub day_angle:        Angle,
    pub second_angle:     Angle,
    pub month_angle:      Angle,
    pub tick_month_angle: Angle,
    /// Day of month, 1..31. Zero until the first sync.
    pub date:             i32,
    /// 0..11
    pub month:            i32,
    /// 0..23, taken verbatim from the latest sync.
    pub hour:             u32,
}

impl ClockState {
    /// The state the intro animation starts from.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Copy with every angle reduced into [0, 360). Render-time only.
    pub fn normalized(&self) -> Self {
        Self {
            minute_angle:     self.minute_angle.rem_euclid(360),
            hour_angle:       self.hour_angle.rem_euclid(360),
            day_angle:        self.day_angle.rem_euclid(360),
            second_angle:     self.second_angle.rem_euclid(360),
            month_angle:      self.month_angle.rem_euclid(360),
            tick_month_angle: self.tick_month_angle.rem_euclid(360),
            ..*self
        }
    }

    /// Apply `f` to each of the six angle fields.
    pub fn map_angles(&self, mut f: impl FnMut(Angle) -> Angle) -> Self {
        Self {
            minute_angle:     f(self.minute_angle),
            hour_angle:       f(self.hour_angle),
            day_angle:        f(self.day_angle),
            second_angle:     f(self.second_angle),
            month_angle:      f(self.month_angle),
            tick_month_angle: f(self.tick_month_angle),
            ..*self
        }
    }
}
