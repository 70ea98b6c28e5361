//! The event log: everything the model decided, in order.
//!
//! RULE: Every externally visible decision of the model is recorded
//! here. Tests and the runner observe the model through this log.
//! Variants are appended, never removed or reordered.

use crate::{
    clock::TickGranularity,
    clock_state::ClockState,
    interpolator::AnimationCurve,
    settings::FontChoice,
    types::{AnimationId, DurationMs},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Intro,
    Minute,
    Flourish,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatchEvent {
    // ── Display ────────────────────────────────────
    StatePublished {
        state: ClockState,
    },
    RedrawForced,
    FontReloaded {
        font: FontChoice,
    },

    // ── Animation ──────────────────────────────────
    AnimationStarted {
        id:       AnimationId,
        kind:     AnimationKind,
        duration: DurationMs,
        curve:    AnimationCurve,
        start:    ClockState,
        end:      ClockState,
    },
    AnimationStopped {
        id:       AnimationId,
        kind:     AnimationKind,
        finished: bool,
    },
    /// Intro requested while disabled or in battery saver.
    IntroSkipped,

    // ── Subscriptions ──────────────────────────────
    SubscriptionsChanged {
        tick: Option<TickGranularity>,
        tap:  bool,
    },
    TapIgnored,

    // ── Lifecycle ──────────────────────────────────
    FocusRegained,
    SettingsReloaded,
}

impl WatchEvent {
    /// Stable name for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            WatchEvent::StatePublished { .. }       => "state_published",
            WatchEvent::RedrawForced                => "redraw_forced",
            WatchEvent::FontReloaded { .. }         => "font_reloaded",
            WatchEvent::AnimationStarted { .. }     => "animation_started",
            WatchEvent::AnimationStopped { .. }     => "animation_stopped",
            WatchEvent::IntroSkipped                => "intro_skipped",
            WatchEvent::SubscriptionsChanged { .. } => "subscriptions_changed",
            WatchEvent::TapIgnored                  => "tap_ignored",
            WatchEvent::FocusRegained               => "focus_regained",
            WatchEvent::SettingsReloaded            => "settings_reloaded",
        }
    }
}
