//! User settings: the read-only configuration snapshot.
//!
//! RULE: Components never read settings lazily from ambient state.
//! The model holds one Settings snapshot and replaces it on every
//! settings-changed event.

use crate::{
    angle_mapper::{battery_saver_active, BatterySaverWindow, DayTableChoice, HourCreep},
    error::{WatchError, WatchResult},
    types::DurationMs,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTRO_DURATION: DurationMs = 2500;
pub const MAX_INTRO_DURATION:     DurationMs = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub animate_minutes:       bool,
    pub display_seconds:       bool,
    pub tap_to_animate:        bool,
    pub intro_enabled:         bool,
    pub intro_duration:        DurationMs,
    pub battery_saver_enabled: bool,
    /// Index into NIGHT_HOURS, stored as entered on the phone.
    pub battery_saver_start:   String,
    pub battery_saver_stop:    String,
    pub day_table:             DayTableChoice,
    pub hour_creep:            HourCreep,
    pub style:                 FaceStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animate_minutes:       true,
            display_seconds:       false,
            tap_to_animate:        true,
            intro_enabled:         true,
            intro_duration:        DEFAULT_INTRO_DURATION,
            battery_saver_enabled: false,
            battery_saver_start:   "0".into(),  // 19:00
            battery_saver_stop:    "12".into(), // 07:00
            day_table:             DayTableChoice::Current,
            hour_creep:            HourCreep::Tenths,
            style:                 FaceStyle::default(),
        }
    }
}

impl Settings {
    /// Load from a JSON settings file. Missing keys take their defaults.
    pub fn load(path: &str) -> WatchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content).map_err(|e| WatchError::InvalidSettings {
            path:   path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(settings.clamped())
    }

    /// Pull numeric fields back into their supported range.
    pub fn clamped(mut self) -> Self {
        if self.intro_duration > MAX_INTRO_DURATION {
            log::warn!(
                "settings: intro_duration {}ms clamped to {MAX_INTRO_DURATION}ms",
                self.intro_duration
            );
            self.intro_duration = MAX_INTRO_DURATION;
        }
        self
    }

    /// Settings with every optional behavior off except the ones tests
    /// opt into explicitly.
    pub fn default_test() -> Self {
        Self {
            animate_minutes: false,
            display_seconds: false,
            tap_to_animate:  false,
            intro_enabled:   false,
            ..Self::default()
        }
    }

    /// None when the saver is off or the stored boundaries are malformed.
    pub fn battery_saver_window(&self) -> Option<BatterySaverWindow> {
        if !self.battery_saver_enabled {
            return None;
        }
        BatterySaverWindow::parse(&self.battery_saver_start, &self.battery_saver_stop)
    }

    pub fn battery_saver_active(&self, hour: u32) -> bool {
        match self.battery_saver_window() {
            Some(w) => battery_saver_active(hour, true, w.start_index, w.stop_index),
            None => false,
        }
    }
}

// ── Style (consumed only by the renderer) ───────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    #[default]
    Small,
    Large,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceStyle {
    pub screen_color:            String,
    pub clock_bg_color:          String,
    pub clock_fg_color:          String,
    pub hour_hand_color:         String,
    pub minute_hand_color:       String,
    pub subdial_highlight_color: String,
    pub font:                    FontChoice,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            screen_color:            "#000000".into(),
            clock_bg_color:          "#FFFFFF".into(),
            clock_fg_color:          "#000000".into(),
            hour_hand_color:         "#000000".into(),
            minute_hand_color:       "#FF0000".into(),
            subdial_highlight_color: "#FF5500".into(),
            font:                    FontChoice::Small,
        }
    }
}
