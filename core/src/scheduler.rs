//! Animation scheduler: the at-most-one running transition.
//!
//! STATES: Idle → Running → (Completed | Superseded) → Idle
//!
//! RULES:
//!   - At most one AnimationContext is alive at any time.
//!   - Every begin() is matched by exactly one stop record, either from
//!     stop() or from supersede(). Late driver callbacks for an id that
//!     is no longer running are ignored.
//!   - The scheduler never reads the clock or publishes anything. The
//!     model feeds it states and forwards what it returns.

use crate::{
    angle_mapper::{angles_with, DayAngleTable, HourCreep, DEGREES_PER_MINUTE, DEGREES_PER_SECOND},
    clock::Timestamp,
    clock_state::ClockState,
    event::AnimationKind,
    interpolator::{ease, interpolate, AnimationCurve},
    rng::FaceRng,
    types::{Angle, AnimationId, DurationMs, Progress},
};
use serde::{Deserialize, Serialize};

pub const CLOCK_ANIMATION_DELAY:   DurationMs = 0;
pub const MINUTE_ANIMATION_LENGTH: DurationMs = 200;
pub const TAP_ANIMATION_LENGTH:    DurationMs = 2500;

/// Offset applied to every field at the start of a flourish.
pub const FLOURISH_OFFSET: Angle = 360;

/// Highest minute angle before the hand wraps back to 0.
pub const MINUTE_WRAP_ANGLE: Angle = 59 * DEGREES_PER_MINUTE;

/// The two endpoints of one running animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimationContext {
    pub start: ClockState,
    pub end:   ClockState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveAnimation {
    pub id:       AnimationId,
    pub kind:     AnimationKind,
    pub duration: DurationMs,
    pub curve:    AnimationCurve,
    pub context:  AnimationContext,
}

/// Record of an animation leaving the Running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedAnimation {
    pub id:         AnimationId,
    pub kind:       AnimationKind,
    pub finished:   bool,
    pub superseded: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimationStats {
    pub begun:      u64,
    pub completed:  u64,
    pub superseded: u64,
}

impl AnimationStats {
    /// Contexts created minus contexts released.
    pub fn outstanding(&self) -> u64 {
        self.begun - self.completed - self.superseded
    }
}

#[derive(Debug, Default)]
pub struct AnimationScheduler {
    active:  Option<ActiveAnimation>,
    next_id: AnimationId,
    stats:   AnimationStats,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveAnimation> {
        self.active.as_ref()
    }

    pub fn live_contexts(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn stats(&self) -> AnimationStats {
        self.stats
    }

    /// Install a new animation. The caller supersedes any running one
    /// first so its stop handling runs before this one starts; if it
    /// did not, the old context is released here.
    pub fn begin(
        &mut self,
        kind: AnimationKind,
        duration: DurationMs,
        curve: AnimationCurve,
        context: AnimationContext,
    ) -> ActiveAnimation {
        if let Some(stale) = self.supersede() {
            log::warn!("animation {} ({:?}) replaced without stop handling", stale.id, stale.kind);
        }
        self.next_id += 1;
        let animation = ActiveAnimation {
            id: self.next_id,
            kind,
            duration,
            curve,
            context,
        };
        self.stats.begun += 1;
        self.active = Some(animation);
        log::debug!("animation {} begin kind={kind:?} duration={duration}ms", animation.id);
        animation
    }

    /// Interpolated state for a driver frame, or None if `id` is not running.
    pub fn frame(&self, id: AnimationId, raw_progress: Progress) -> Option<ClockState> {
        let active = self.active.as_ref().filter(|a| a.id == id)?;
        let progress = ease(active.curve, raw_progress);
        Some(interpolate(&active.context.start, &active.context.end, progress))
    }

    /// Driver reports the animation stopped. Releases its context.
    pub fn stop(&mut self, id: AnimationId, finished: bool) -> Option<StoppedAnimation> {
        if self.active.map(|a| a.id) != Some(id) {
            log::debug!("animation {id} stop ignored: not running");
            return None;
        }
        let active = self.active.take()?;
        self.stats.completed += 1;
        Some(StoppedAnimation {
            id:         active.id,
            kind:       active.kind,
            finished,
            superseded: false,
        })
    }

    /// Tear down the running animation, if any, ahead of a new one.
    pub fn supersede(&mut self) -> Option<StoppedAnimation> {
        let active = self.active.take()?;
        self.stats.superseded += 1;
        log::debug!("animation {} superseded", active.id);
        Some(StoppedAnimation {
            id:         active.id,
            kind:       active.kind,
            finished:   false,
            superseded: true,
        })
    }
}

// ── Start/end state construction ────────────────────────────────────

/// Target state for an animation that starts now and plays for
/// `duration` ms: the second hand is projected forward by the playback
/// time so it lands on the true second when the animation ends.
pub fn projected_end(
    now: &Timestamp,
    table: &DayAngleTable,
    creep: HourCreep,
    duration: DurationMs,
) -> ClockState {
    let mut end = angles_with(now, table, creep);
    end.second_angle += second_travel(duration);
    end
}

/// Second-hand travel over `duration` ms. Any u32 duration fits in an Angle
/// once divided.
fn second_travel(duration: DurationMs) -> Angle {
    let travel = i64::from(duration) * i64::from(DEGREES_PER_SECOND) / 1000;
    Angle::try_from(travel).unwrap_or(Angle::MAX)
}

/// Start state for a minute animation towards `target`. Hands that are
/// about to cross their 0° mark are moved to the negative equivalent so
/// the animation sweeps forward instead of unwinding a full turn.
pub fn minute_start(current: &ClockState, target: &Timestamp, table: &DayAngleTable) -> ClockState {
    let mut start = *current;
    if start.minute_angle != MINUTE_WRAP_ANGLE {
        return start;
    }
    start.minute_angle -= 360;
    if target.minute == 0 && target.hour % 12 == 0 && start.hour_angle > 0 {
        start.hour_angle -= 360;
    }
    // The day hand wraps from Sunday back to Monday at midnight.
    if target.weekday == 1 && target.hour == 0 && start.day_angle == table.sunday() {
        start.day_angle -= 360;
    }
    start
}

/// Start state for the tap flourish: every angle one full turn away,
/// each direction drawn independently.
pub fn flourish_start(current: &ClockState, rng: &mut FaceRng) -> ClockState {
    current.map_angles(|angle| angle + rng.next_sign() * FLOURISH_OFFSET)
}
