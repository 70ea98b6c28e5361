//! Interpolation between two clock states.

use crate::{
    clock_state::ClockState,
    types::{Progress, NORM_MAX},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCurve {
    Linear,
    #[default]
    EaseInOut,
}

/// Map raw driver progress onto the curve. Both endpoints are exact.
pub fn ease(curve: AnimationCurve, progress: Progress) -> Progress {
    let t = progress.min(NORM_MAX) as u64;
    let max = NORM_MAX as u64;
    let eased = match curve {
        AnimationCurve::Linear => t,
        AnimationCurve::EaseInOut if 2 * t <= max => 2 * t * t / max,
        AnimationCurve::EaseInOut => {
            let rest = max - t;
            max - 2 * rest * rest / max
        }
    };
    eased as Progress
}

/// Integer linear interpolation. Widened to i64 so multi-turn
/// differences cannot overflow the product.
pub fn lerp_int(from: i32, to: i32, progress: Progress) -> i32 {
    let p = progress.min(NORM_MAX) as i64;
    let from = from as i64;
    let to = to as i64;
    (from + p * (to - from) / NORM_MAX as i64) as i32
}

/// Field-wise interpolation. `hour` is discrete and always comes from `end`.
pub fn interpolate(start: &ClockState, end: &ClockState, progress: Progress) -> ClockState {
    ClockState {
        minute_angle:     lerp_int(start.minute_angle, end.minute_angle, progress),
        hour_angle:       lerp_int(start.hour_angle, end.hour_angle, progress),
        day_angle:        lerp_int(start.day_angle, end.day_angle, progress),
        second_angle:     lerp_int(start.second_angle, end.second_angle, progress),
        month_angle:      lerp_int(start.month_angle, end.month_angle, progress),
        tick_month_angle: lerp_int(start.tick_month_angle, end.tick_month_angle, progress),
        date:             lerp_int(start.date, end.date, progress),
        month:            lerp_int(start.month, end.month, progress),
        hour:             end.hour,
    }
}
