//! Host capabilities: every collaborator the core consumes.
//!
//! RULE: The core never reaches the device directly. Each service
//! is a trait object injected at construction, so the same model runs
//! on the watch, in the runner, and under test doubles.

use crate::{
    clock::{ClockSource, TickGranularity},
    clock_state::ClockState,
    interpolator::AnimationCurve,
    settings::{FontChoice, Settings},
    types::{AnimationId, DurationMs},
};
use serde::{Deserialize, Serialize};

/// Redraw sink. Cheap and idempotent.
pub trait Renderer {
    fn publish(&mut self, state: &ClockState);
    fn redraw(&mut self);
    fn reload_font(&mut self, font: FontChoice);
}

/// What the model hands to the animation driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimationRequest {
    pub id:       AnimationId,
    pub duration: DurationMs,
    pub delay:    DurationMs,
    pub curve:    AnimationCurve,
}

/// Fire-and-forget animation timing. After `schedule`, the host calls
/// `WatchModel::on_animation_frame` repeatedly and then
/// `WatchModel::on_animation_stopped` exactly once for that id.
pub trait AnimationDriver {
    fn schedule(&mut self, request: &AnimationRequest);
    fn cancel(&mut self, id: AnimationId);
}

/// Subscribing replaces any previous subscription.
pub trait TickTimer {
    fn subscribe(&mut self, granularity: TickGranularity);
    fn unsubscribe(&mut self);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TapAxis {
    X,
    Y,
    Z,
}

pub trait TapSensor {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// One-shot "app regained focus" signal.
pub trait FocusSignal {
    fn unsubscribe(&mut self);
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn subscribe_changes(&mut self);
    fn unsubscribe_changes(&mut self);
}

/// Settings read from a JSON file on every load.
pub struct JsonSettingsStore {
    path:       String,
    subscribed: bool,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), subscribed: false }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Settings {
        match Settings::load(&self.path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("settings: falling back to defaults: {e}");
                Settings::default()
            }
        }
    }

    fn subscribe_changes(&mut self)   { self.subscribed = true;  }
    fn unsubscribe_changes(&mut self) { self.subscribed = false; }
}

/// Everything the model needs from the host, bundled for construction.
pub struct Capabilities {
    pub clock:    Box<dyn ClockSource>,
    pub renderer: Box<dyn Renderer>,
    pub driver:   Box<dyn AnimationDriver>,
    pub timer:    Box<dyn TickTimer>,
    pub tap:      Box<dyn TapSensor>,
    pub focus:    Box<dyn FocusSignal>,
    pub settings: Box<dyn SettingsStore>,
}
