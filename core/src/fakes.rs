//! Deterministic in-memory host for tests and the headless runner.
//!
//! Each fake is a cheap handle over shared state: one clone goes into
//! the model's Capabilities, the other stays with the caller to drive
//! and inspect it. Single-threaded, like the device.

use crate::{
    clock::{ClockSource, TickGranularity, Timestamp},
    clock_state::ClockState,
    host::{
        AnimationDriver, AnimationRequest, Capabilities, FocusSignal, Renderer, SettingsStore,
        TapSensor, TickTimer,
    },
    model::WatchModel,
    settings::{FontChoice, Settings},
    types::{AnimationId, NORM_MAX},
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

// ── Clock ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

// ── Renderer ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RenderLog {
    pub published:    Vec<ClockState>,
    pub redraws:      usize,
    pub font_reloads: Vec<FontChoice>,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
}

impl RecordingRenderer {
    pub fn last_published(&self) -> Option<ClockState> {
        self.log.borrow().published.last().copied()
    }

    pub fn published(&self) -> Vec<ClockState> {
        self.log.borrow().published.clone()
    }

    pub fn redraws(&self) -> usize {
        self.log.borrow().redraws
    }

    pub fn font_reloads(&self) -> Vec<FontChoice> {
        self.log.borrow().font_reloads.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn publish(&mut self, state: &ClockState) {
        self.log.borrow_mut().published.push(*state);
    }

    fn redraw(&mut self) {
        self.log.borrow_mut().redraws += 1;
    }

    fn reload_font(&mut self, font: FontChoice) {
        self.log.borrow_mut().font_reloads.push(font);
    }
}

// ── Animation driver ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DriverLog {
    pub scheduled: Vec<AnimationRequest>,
    pub cancelled: Vec<AnimationId>,
    pending:       VecDeque<AnimationRequest>,
}

/// Queues scheduled animations until the caller plays them.
#[derive(Clone, Default)]
pub struct SteppingDriver {
    log: Rc<RefCell<DriverLog>>,
}

impl SteppingDriver {
    pub fn scheduled(&self) -> Vec<AnimationRequest> {
        self.log.borrow().scheduled.clone()
    }

    pub fn cancelled(&self) -> Vec<AnimationId> {
        self.log.borrow().cancelled.clone()
    }

    pub fn pending(&self) -> usize {
        self.log.borrow().pending.len()
    }

    pub fn next_pending(&self) -> Option<AnimationRequest> {
        self.log.borrow_mut().pending.pop_front()
    }

    /// Play every queued animation to completion in `frames` evenly
    /// spaced steps. Returns how many animations were played.
    pub fn play_pending(&self, model: &mut WatchModel, frames: u32) -> usize {
        let frames = frames.max(1);
        let mut played = 0;
        while let Some(request) = self.next_pending() {
            for step in 1..=frames {
                let progress = (step as u64 * NORM_MAX as u64 / frames as u64) as u32;
                model.on_animation_frame(request.id, progress);
            }
            model.on_animation_stopped(request.id, true);
            played += 1;
        }
        played
    }
}

impl AnimationDriver for SteppingDriver {
    fn schedule(&mut self, request: &AnimationRequest) {
        let mut log = self.log.borrow_mut();
        log.scheduled.push(*request);
        log.pending.push_back(*request);
    }

    fn cancel(&mut self, id: AnimationId) {
        let mut log = self.log.borrow_mut();
        log.cancelled.push(id);
        log.pending.retain(|r| r.id != id);
    }
}

// ── Tick timer and tap sensor ───────────────────────────────────────

#[derive(Debug, Default)]
pub struct TimerLog {
    pub active:       Option<TickGranularity>,
    pub subscribes:   usize,
    pub unsubscribes: usize,
}

#[derive(Clone, Default)]
pub struct RecordingTimer {
    log: Rc<RefCell<TimerLog>>,
}

impl RecordingTimer {
    pub fn active(&self) -> Option<TickGranularity> {
        self.log.borrow().active
    }

    pub fn subscribes(&self) -> usize {
        self.log.borrow().subscribes
    }

    pub fn unsubscribes(&self) -> usize {
        self.log.borrow().unsubscribes
    }
}

impl TickTimer for RecordingTimer {
    fn subscribe(&mut self, granularity: TickGranularity) {
        let mut log = self.log.borrow_mut();
        log.active = Some(granularity);
        log.subscribes += 1;
    }

    fn unsubscribe(&mut self) {
        let mut log = self.log.borrow_mut();
        log.active = None;
        log.unsubscribes += 1;
    }
}

#[derive(Clone, Default)]
pub struct RecordingTapSensor {
    subscribed: Rc<Cell<bool>>,
}

impl RecordingTapSensor {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }
}

impl TapSensor for RecordingTapSensor {
    fn subscribe(&mut self)   { self.subscribed.set(true);  }
    fn unsubscribe(&mut self) { self.subscribed.set(false); }
}

// ── Focus and settings ──────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingFocus {
    unsubscribes: Rc<Cell<usize>>,
}

impl RecordingFocus {
    pub fn unsubscribes(&self) -> usize {
        self.unsubscribes.get()
    }
}

impl FocusSignal for RecordingFocus {
    fn unsubscribe(&mut self) {
        self.unsubscribes.set(self.unsubscribes.get() + 1);
    }
}

#[derive(Clone)]
pub struct MemorySettings {
    settings:   Rc<RefCell<Settings>>,
    subscribed: Rc<Cell<bool>>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings:   Rc::new(RefCell::new(settings)),
            subscribed: Rc::new(Cell::new(false)),
        }
    }

    /// Replace the stored settings. The caller still delivers the
    /// change event to the model, like the phone app does.
    pub fn store(&self, settings: Settings) {
        *self.settings.borrow_mut() = settings;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Settings {
        self.settings.borrow().clone()
    }

    fn subscribe_changes(&mut self)   { self.subscribed.set(true);  }
    fn unsubscribe_changes(&mut self) { self.subscribed.set(false); }
}

// ── Bundle ──────────────────────────────────────────────────────────

/// Caller-side handles for every fake in one model.
#[derive(Clone)]
pub struct FakeHost {
    pub clock:    ManualClock,
    pub renderer: RecordingRenderer,
    pub driver:   SteppingDriver,
    pub timer:    RecordingTimer,
    pub tap:      RecordingTapSensor,
    pub focus:    RecordingFocus,
    pub settings: MemorySettings,
}

impl FakeHost {
    pub fn new(now: Timestamp, settings: Settings) -> Self {
        Self {
            clock:    ManualClock::new(now),
            renderer: RecordingRenderer::default(),
            driver:   SteppingDriver::default(),
            timer:    RecordingTimer::default(),
            tap:      RecordingTapSensor::default(),
            focus:    RecordingFocus::default(),
            settings: MemorySettings::new(settings),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            clock:    Box::new(self.clock.clone()),
            renderer: Box::new(self.renderer.clone()),
            driver:   Box::new(self.driver.clone()),
            timer:    Box::new(self.timer.clone()),
            tap:      Box::new(self.tap.clone()),
            focus:    Box::new(self.focus.clone()),
            settings: Box::new(self.settings.clone()),
        }
    }

    pub fn build_model(&self, seed: u64) -> WatchModel {
        WatchModel::new(self.capabilities(), seed)
    }
}
