//! Subscription policy: which timers and sensors are live.
//!
//! RULE: refresh() always resolves both subscriptions completely before
//! returning. Calling it twice with the same inputs leaves the host with
//! the same single tick subscription and the same tap state.

use crate::{
    clock::TickGranularity,
    host::{TapSensor, TickTimer},
    settings::Settings,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionState {
    pub tick: Option<TickGranularity>,
    pub tap:  bool,
}

#[derive(Debug, Default)]
pub struct SubscriptionManager {
    state: SubscriptionState,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn tap_subscribed(&self) -> bool {
        self.state.tap
    }

    /// What the subscriptions should be at `hour` under `settings`.
    pub fn decide(settings: &Settings, hour: u32) -> SubscriptionState {
        let saver = settings.battery_saver_active(hour);
        let tick = if settings.display_seconds && !saver {
            TickGranularity::PerSecond
        } else {
            TickGranularity::PerMinute
        };
        SubscriptionState {
            tick: Some(tick),
            tap:  settings.tap_to_animate && !saver,
        }
    }

    /// Re-derive and reinstall both subscriptions for `hour`.
    pub fn refresh(
        &mut self,
        settings: &Settings,
        hour: u32,
        timer: &mut dyn TickTimer,
        tap: &mut dyn TapSensor,
    ) -> SubscriptionState {
        let wanted = Self::decide(settings, hour);
        match wanted.tick {
            Some(granularity) => timer.subscribe(granularity),
            None => timer.unsubscribe(),
        }
        if wanted.tap {
            tap.subscribe();
        } else {
            tap.unsubscribe();
        }
        log::debug!("subscriptions hour={hour} tick={:?} tap={}", wanted.tick, wanted.tap);
        self.state = wanted;
        wanted
    }

    /// Drop both subscriptions for the length of a flourish.
    pub fn suspend(&mut self, timer: &mut dyn TickTimer, tap: &mut dyn TapSensor) -> SubscriptionState {
        timer.unsubscribe();
        tap.unsubscribe();
        self.state = SubscriptionState::default();
        self.state
    }
}
