//! The watch model: the single owner of the live clock state.
//!
//! Every host event enters through one of the on_* methods below.
//! The model holds no timing logic of its own: it reads the clock,
//! asks the angle mapper, the scheduler and the subscription manager
//! what to do, forwards the result to the host, and records it.
//!
//! EVENT CONTRACT:
//!   on_focus_regained     once, starts the intro
//!   on_config_changed     after every settings save
//!   on_tick               from the tick timer (per-minute or per-second)
//!   on_tap                from the tap sensor, only while subscribed
//!   on_animation_frame    from the animation driver, any number of times
//!   on_animation_stopped  from the animation driver, once per animation

use crate::{
    angle_mapper::{angles_with, DayAngleTable, DEGREES_PER_SECOND},
    clock::{ClockSource, TimeUnits, Timestamp},
    clock_state::ClockState,
    event::{AnimationKind, WatchEvent},
    host::{
        AnimationDriver, AnimationRequest, Capabilities, FocusSignal, Renderer, SettingsStore,
        TapAxis, TapSensor, TickTimer,
    },
    interpolator::AnimationCurve,
    rng::{FaceRng, RngStream},
    scheduler::{
        flourish_start, minute_start, projected_end, ActiveAnimation, AnimationContext,
        AnimationScheduler, AnimationStats, StoppedAnimation, CLOCK_ANIMATION_DELAY,
        MINUTE_ANIMATION_LENGTH, TAP_ANIMATION_LENGTH,
    },
    settings::Settings,
    snapshot::ModelSnapshot,
    subscription::{SubscriptionManager, SubscriptionState},
    types::{Angle, AnimationId, DurationMs, Progress},
};
use std::collections::VecDeque;

/// Most events the model keeps between drains. Older entries are dropped.
pub const EVENT_LOG_CAPACITY: usize = 4096;

pub struct WatchModel {
    clock:          Box<dyn ClockSource>,
    renderer:       Box<dyn Renderer>,
    driver:         Box<dyn AnimationDriver>,
    timer:          Box<dyn TickTimer>,
    tap:            Box<dyn TapSensor>,
    focus:          Box<dyn FocusSignal>,
    settings_store: Box<dyn SettingsStore>,
    settings:       Settings,
    state:          ClockState,
    scheduler:      AnimationScheduler,
    subscriptions:  SubscriptionManager,
    rng:            FaceRng,
    focused:        bool,
    events:         VecDeque<WatchEvent>,
    events_dropped: u64,
}

impl WatchModel {
    /// Create the model at window load. The live state starts all-zero,
    /// which is where the intro animates from.
    pub fn new(caps: Capabilities, seed: u64) -> Self {
        let settings = caps.settings.load().clamped();
        Self {
            clock:          caps.clock,
            renderer:       caps.renderer,
            driver:         caps.driver,
            timer:          caps.timer,
            tap:            caps.tap,
            focus:          caps.focus,
            settings_store: caps.settings,
            settings,
            state:          ClockState::zero(),
            scheduler:      AnimationScheduler::new(),
            subscriptions:  SubscriptionManager::new(),
            rng:            FaceRng::new(seed, RngStream::Flourish),
            focused:        false,
            events:         VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            events_dropped: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────

    pub fn current_state(&self) -> ClockState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscriptions(&self) -> SubscriptionState {
        self.subscriptions.state()
    }

    pub fn active_animation(&self) -> Option<&ActiveAnimation> {
        self.scheduler.active()
    }

    pub fn animation_stats(&self) -> AnimationStats {
        self.scheduler.stats()
    }

    pub fn live_animation_contexts(&self) -> usize {
        self.scheduler.live_contexts()
    }

    /// Take every event recorded since the last drain, oldest first.
    /// At most EVENT_LOG_CAPACITY are kept.
    pub fn drain_events(&mut self) -> Vec<WatchEvent> {
        self.events.drain(..).collect()
    }

    /// Events discarded because the log was full, since construction.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            state:         self.state,
            settings:      self.settings.clone(),
            animation:     self.scheduler.active().copied(),
            subscriptions: self.subscriptions.state(),
            stats:         self.scheduler.stats(),
        }
    }

    // ── Host events ───────────────────────────────────────────────────

    pub fn on_focus_regained(&mut self) {
        if self.focused {
            log::debug!("focus: already handled");
            return;
        }
        self.focused = true;
        self.focus.unsubscribe();
        self.settings_store.subscribe_changes();
        self.record(WatchEvent::FocusRegained);
        log::info!("focus regained, starting intro");
        self.start_intro();
    }

    pub fn on_config_changed(&mut self) {
        let previous_font = self.settings.style.font;
        self.settings = self.settings_store.load().clamped();
        self.record(WatchEvent::SettingsReloaded);

        // A flourish keeps both subscriptions down until it stops.
        let flourishing = self
            .scheduler
            .active()
            .is_some_and(|a| a.kind == AnimationKind::Flourish);
        if !flourishing {
            let hour = self.clock.now().hour;
            self.refresh_subscriptions(hour);
        }

        self.renderer.redraw();
        self.record(WatchEvent::RedrawForced);

        let font = self.settings.style.font;
        if font != previous_font {
            self.renderer.reload_font(font);
            self.record(WatchEvent::FontReloaded { font });
        }
        log::info!("settings reloaded");
    }

    /// Combined tick handler: seconds first, then minutes.
    pub fn on_tick(&mut self, tick_time: &Timestamp, units: TimeUnits) {
        if units.second {
            self.on_second_tick(tick_time);
        }
        if units.minute {
            self.on_minute_tick(tick_time);
        }
    }

    pub fn on_minute_tick(&mut self, tick_time: &Timestamp) {
        let hour_changed = tick_time.hour != self.state.hour;

        if self.settings.animate_minutes && !self.settings.battery_saver_active(tick_time.hour) {
            self.supersede_running();
            let start = minute_start(&self.state, tick_time, &self.day_table());
            self.begin_animation(AnimationKind::Minute, MINUTE_ANIMATION_LENGTH, start);
            return;
        }

        self.state = self.angles(tick_time);
        self.publish();
        // The saver window may have opened or closed with the new hour.
        if hour_changed {
            self.refresh_subscriptions(tick_time.hour);
        }
    }

    pub fn on_second_tick(&mut self, tick_time: &Timestamp) {
        self.state.second_angle = tick_time.second as Angle * DEGREES_PER_SECOND;
        self.publish();
    }

    /// Axis and direction are accepted but do not steer the flourish.
    pub fn on_tap(&mut self, axis: TapAxis, direction: i32) {
        if !self.subscriptions.tap_subscribed() {
            log::debug!("tap {axis:?}/{direction} ignored: sensor not subscribed");
            self.record(WatchEvent::TapIgnored);
            return;
        }
        self.supersede_running();
        let state = self.subscriptions.suspend(self.timer.as_mut(), self.tap.as_mut());
        self.record(WatchEvent::SubscriptionsChanged { tick: state.tick, tap: state.tap });

        let start = flourish_start(&self.state, &mut self.rng);
        self.begin_animation(AnimationKind::Flourish, TAP_ANIMATION_LENGTH, start);
    }

    pub fn on_animation_frame(&mut self, id: AnimationId, progress: Progress) {
        if let Some(state) = self.scheduler.frame(id, progress) {
            self.state = state;
            self.publish();
        }
    }

    pub fn on_animation_stopped(&mut self, id: AnimationId, finished: bool) {
        if let Some(stopped) = self.scheduler.stop(id, finished) {
            self.finish_animation(Some(stopped));
        }
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn day_table(&self) -> DayAngleTable {
        self.settings.day_table.table()
    }

    fn angles(&self, now: &Timestamp) -> ClockState {
        angles_with(now, &self.day_table(), self.settings.hour_creep)
    }

    fn record(&mut self, event: WatchEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
            if self.events_dropped == 0 {
                log::debug!("event log full, dropping oldest entries");
            }
            self.events_dropped += 1;
        }
        self.events.push_back(event);
    }

    fn start_intro(&mut self) {
        let hour = self.clock.now().hour;
        if !self.settings.intro_enabled || self.settings.battery_saver_active(hour) {
            log::debug!("intro skipped");
            self.record(WatchEvent::IntroSkipped);
            self.finish_animation(None);
            return;
        }
        self.supersede_running();
        let start = self.state;
        self.begin_animation(AnimationKind::Intro, self.settings.intro_duration, start);
    }

    /// Tear down the running animation and run its stop handling before
    /// anything else is scheduled.
    fn supersede_running(&mut self) {
        if let Some(stopped) = self.scheduler.supersede() {
            self.driver.cancel(stopped.id);
            self.finish_animation(Some(stopped));
        }
    }

    fn begin_animation(&mut self, kind: AnimationKind, duration: DurationMs, start: ClockState) {
        // The target is read at call time, not when the trigger fired.
        let now = self.clock.now();
        let end = projected_end(&now, &self.day_table(), self.settings.hour_creep, duration);
        let curve = AnimationCurve::EaseInOut;
        let animation = self
            .scheduler
            .begin(kind, duration, curve, AnimationContext { start, end });
        self.driver.schedule(&AnimationRequest {
            id:    animation.id,
            duration,
            delay: CLOCK_ANIMATION_DELAY,
            curve,
        });
        self.record(WatchEvent::AnimationStarted {
            id: animation.id,
            kind,
            duration,
            curve,
            start,
            end,
        });
    }

    /// Stop handling, run once per animation and for a skipped intro:
    /// re-sync from the clock and re-derive subscriptions for the hour
    /// it is now, since both may have moved while animating.
    fn finish_animation(&mut self, stopped: Option<StoppedAnimation>) {
        if let Some(stopped) = stopped {
            log::debug!(
                "animation {} stopped kind={:?} finished={} superseded={}",
                stopped.id, stopped.kind, stopped.finished, stopped.superseded
            );
            self.record(WatchEvent::AnimationStopped {
                id:       stopped.id,
                kind:     stopped.kind,
                finished: stopped.finished,
            });
        }
        let now = self.clock.now();
        self.state = self.angles(&now);
        self.publish();
        self.refresh_subscriptions(now.hour);
    }

    fn refresh_subscriptions(&mut self, hour: u32) {
        let state = self.subscriptions.refresh(
            &self.settings,
            hour,
            self.timer.as_mut(),
            self.tap.as_mut(),
        );
        self.record(WatchEvent::SubscriptionsChanged { tick: state.tick, tap: state.tap });
    }

    fn publish(&mut self) {
        self.renderer.publish(&self.state);
        self.record(WatchEvent::StatePublished { state: self.state });
    }
}

impl Drop for WatchModel {
    fn drop(&mut self) {
        if self.focused {
            self.settings_store.unsubscribe_changes();
        }
    }
}
