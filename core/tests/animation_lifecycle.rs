use watchface_core::{
    angle_mapper::{angles_for, DayAngleTable, DayTableChoice},
    clock::{TickGranularity, Timestamp},
    clock_state::ClockState,
    event::{AnimationKind, WatchEvent},
    fakes::FakeHost,
    host::TapAxis,
    interpolator::AnimationCurve,
    model::WatchModel,
    settings::{Settings, MAX_INTRO_DURATION},
    types::NORM_MAX,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup(now: Timestamp, settings: Settings) -> (FakeHost, WatchModel) {
    init_logging();
    let host = FakeHost::new(now, settings);
    let model = host.build_model(42);
    (host, model)
}

fn started(events: &[WatchEvent]) -> Vec<(AnimationKind, ClockState, ClockState)> {
    events
        .iter()
        .filter_map(|e| match e {
            WatchEvent::AnimationStarted { kind, start, end, .. } => Some((*kind, *start, *end)),
            _ => None,
        })
        .collect()
}

fn stopped_ids(events: &[WatchEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            WatchEvent::AnimationStopped { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

fn minute_animator() -> Settings {
    Settings { animate_minutes: true, ..Settings::default_test() }
}

// ── Intro ────────────────────────────────────────────────────────────────────

/// An out-of-range intro length from the settings store is clamped
/// before it reaches the scheduler.
#[test]
fn oversized_intro_duration_is_clamped() {
    let now = Timestamp::new(10, 5, 30, 3, 14, 9);
    let settings = Settings {
        intro_enabled:  true,
        intro_duration: 400_000_000,
        ..Settings::default_test()
    };
    let (host, mut model) = setup(now, settings);

    model.on_focus_regained();

    let scheduled = host.driver.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].duration, MAX_INTRO_DURATION);
    let (_, _, end) = started(&model.drain_events())[0];
    assert_eq!(end.second_angle, 180 + 360);
}

/// The intro sweeps from the all-zero state to now and only installs
/// subscriptions once it stops.
#[test]
fn intro_runs_from_zero_then_subscribes() {
    let now = Timestamp::new(10, 5, 30, 3, 14, 9);
    let settings = Settings {
        intro_enabled:  true,
        intro_duration: 2500,
        tap_to_animate: true,
        ..Settings::default_test()
    };
    let (host, mut model) = setup(now, settings);

    model.on_focus_regained();
    let events = model.drain_events();
    let intro = started(&events);
    assert_eq!(intro.len(), 1);
    let (kind, start, end) = intro[0];
    assert_eq!(kind, AnimationKind::Intro);
    assert_eq!(start, ClockState::zero());
    assert_eq!(end.second_angle, 180 + 15);
    assert_eq!(end.minute_angle, 30);

    let scheduled = host.driver.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].duration, 2500);
    assert_eq!(scheduled[0].delay, 0);
    assert_eq!(scheduled[0].curve, AnimationCurve::EaseInOut);
    assert_eq!(host.timer.active(), None, "no ticks while the intro plays");

    assert_eq!(host.driver.play_pending(&mut model, 8), 1);

    assert_eq!(host.timer.active(), Some(TickGranularity::PerMinute));
    assert!(host.tap.is_subscribed());
    assert_eq!(
        host.renderer.last_published(),
        Some(angles_for(&now, &DayAngleTable::CURRENT))
    );
    assert!(host.settings.is_subscribed());
    assert_eq!(host.focus.unsubscribes(), 1);
}

#[test]
fn focus_is_single_shot() {
    let now = Timestamp::new(10, 5, 30, 3, 14, 9);
    let settings = Settings { intro_enabled: true, ..Settings::default_test() };
    let (host, mut model) = setup(now, settings);

    model.on_focus_regained();
    model.on_focus_regained();

    assert_eq!(host.driver.scheduled().len(), 1);
    assert_eq!(host.focus.unsubscribes(), 1);
}

/// A disabled intro short-circuits straight to the stop handling.
#[test]
fn disabled_intro_syncs_without_animating() {
    let now = Timestamp::new(7, 45, 10, 1, 12, 9);
    let (host, mut model) = setup(now, Settings::default_test());

    model.on_focus_regained();
    let events = model.drain_events();

    assert!(events.contains(&WatchEvent::IntroSkipped));
    assert!(started(&events).is_empty());
    assert!(host.driver.scheduled().is_empty());
    assert_eq!(model.current_state(), angles_for(&now, &DayAngleTable::CURRENT));
    assert_eq!(host.timer.active(), Some(TickGranularity::PerMinute));
}

#[test]
fn battery_saver_suppresses_intro() {
    let now = Timestamp::new(23, 15, 0, 5, 16, 9);
    let settings = Settings {
        intro_enabled:         true,
        battery_saver_enabled: true,
        battery_saver_start:   "0".into(),
        battery_saver_stop:    "14".into(),
        ..Settings::default_test()
    };
    let (host, mut model) = setup(now, settings);

    model.on_focus_regained();

    assert!(host.driver.scheduled().is_empty());
    assert!(model.drain_events().contains(&WatchEvent::IntroSkipped));
    assert_eq!(model.current_state().minute_angle, 90);
}

// ── Minute animation ─────────────────────────────────────────────────────────

/// 354° → 0° is animated as 354 → -6 → 0, never backwards round the dial.
#[test]
fn minute_wraparound_starts_from_negative_six() {
    let before = Timestamp::new(10, 59, 0, 3, 14, 9);
    let (host, mut model) = setup(before, minute_animator());
    model.on_focus_regained();
    assert_eq!(model.current_state().minute_angle, 354);
    model.drain_events();

    let tick = Timestamp::new(11, 0, 0, 3, 14, 9);
    host.clock.set(tick);
    model.on_minute_tick(&tick);

    let events = model.drain_events();
    let anims = started(&events);
    assert_eq!(anims.len(), 1);
    let (kind, start, end) = anims[0];
    assert_eq!(kind, AnimationKind::Minute);
    assert_eq!(start.minute_angle, -6);
    assert_eq!(end.minute_angle, 0);
    assert_eq!(start.hour_angle, 300 + 47, "hour hand does not cross 12 here");
    assert_eq!(end.second_angle, 1, "200 ms of playback is one degree");

    host.driver.play_pending(&mut model, 16);
    let minutes: Vec<i32> = host
        .renderer
        .published()
        .iter()
        .rev()
        .take(17)
        .map(|s| s.minute_angle)
        .collect();
    assert!(minutes.iter().all(|m| (-6..=0).contains(m)), "swept outside -6..0: {minutes:?}");
    assert_eq!(model.current_state(), angles_for(&tick, &DayAngleTable::CURRENT));
}

/// At midnight Sunday → Monday the hour and day hands wrap with the minute.
#[test]
fn midnight_wraps_hour_and_day_hands() {
    let before = Timestamp::new(23, 59, 0, 0, 18, 9);
    let (host, mut model) = setup(before, minute_animator());
    model.on_focus_regained();
    model.drain_events();

    let tick = Timestamp::new(0, 0, 0, 1, 19, 9);
    host.clock.set(tick);
    model.on_minute_tick(&tick);

    let (_, start, end) = started(&model.drain_events())[0];
    assert_eq!(start.minute_angle, -6);
    assert_eq!(start.hour_angle, 330 + 47 - 360);
    assert_eq!(start.day_angle, 327 - 360);
    assert_eq!(end.hour_angle, 0);
    assert_eq!(end.day_angle, 30);
}

#[test]
fn classic_table_wraps_from_its_own_sunday() {
    let before = Timestamp::new(23, 59, 0, 0, 18, 9);
    let settings = Settings { day_table: DayTableChoice::Classic, ..minute_animator() };
    let (host, mut model) = setup(before, settings);
    model.on_focus_regained();
    model.drain_events();

    let tick = Timestamp::new(0, 0, 0, 1, 19, 9);
    host.clock.set(tick);
    model.on_minute_tick(&tick);

    let (_, start, _) = started(&model.drain_events())[0];
    assert_eq!(start.day_angle, -30);
}

/// Mid-hour ticks need no correction.
#[test]
fn ordinary_minute_starts_from_displayed_state() {
    let before = Timestamp::new(10, 5, 0, 3, 14, 9);
    let (host, mut model) = setup(before, minute_animator());
    model.on_focus_regained();
    let shown = model.current_state();
    model.drain_events();

    let tick = Timestamp::new(10, 6, 0, 3, 14, 9);
    host.clock.set(tick);
    model.on_minute_tick(&tick);

    let (_, start, end) = started(&model.drain_events())[0];
    assert_eq!(start, shown);
    assert_eq!(end.minute_angle, 36);
}

#[test]
fn battery_saver_skips_minute_animation() {
    let now = Timestamp::new(22, 10, 0, 2, 13, 9);
    let settings = Settings {
        battery_saver_enabled: true,
        battery_saver_start:   "0".into(),
        battery_saver_stop:    "14".into(),
        ..minute_animator()
    };
    let (host, mut model) = setup(now, settings);
    model.on_focus_regained();

    let tick = Timestamp::new(22, 11, 0, 2, 13, 9);
    host.clock.set(tick);
    model.on_minute_tick(&tick);

    assert!(host.driver.scheduled().is_empty());
    assert_eq!(host.renderer.last_published().map(|s| s.minute_angle), Some(66));
}

// ── Supersession ─────────────────────────────────────────────────────────────

/// Starting a second animation tears down exactly one context, runs
/// the first one's stop handling once, and ignores its late callback.
#[test]
fn superseding_releases_exactly_one_context() {
    let (host, mut model) = setup(Timestamp::new(10, 5, 0, 3, 14, 9), minute_animator());
    model.on_focus_regained();
    model.drain_events();

    let first = Timestamp::new(10, 6, 0, 3, 14, 9);
    host.clock.set(first);
    model.on_minute_tick(&first);
    let first_id = host.driver.scheduled()[0].id;

    let second = Timestamp::new(10, 7, 0, 3, 14, 9);
    host.clock.set(second);
    model.on_minute_tick(&second);

    let stats = model.animation_stats();
    assert_eq!(stats.begun, 2);
    assert_eq!(stats.superseded, 1);
    assert_eq!(stats.completed, 0);
    assert_eq!(model.live_animation_contexts(), 1);
    assert_eq!(host.driver.cancelled(), vec![first_id]);
    assert_eq!(host.driver.pending(), 1);

    // The driver reports the cancelled one late; nothing happens.
    model.on_animation_stopped(first_id, false);
    model.on_animation_frame(first_id, NORM_MAX / 2);

    host.driver.play_pending(&mut model, 4);
    let stats = model.animation_stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.outstanding(), 0);
    assert_eq!(model.live_animation_contexts(), 0);

    let events = model.drain_events();
    let stops = stopped_ids(&events);
    assert_eq!(stops.len(), 2, "one stop per begin: {stops:?}");
    assert_eq!(stops[0], first_id);

    // The first animation's stop precedes the second's start.
    let stop_at = events
        .iter()
        .position(|e| matches!(e, WatchEvent::AnimationStopped { id, .. } if *id == first_id))
        .unwrap();
    let second_start_at = events
        .iter()
        .rposition(|e| matches!(e, WatchEvent::AnimationStarted { .. }))
        .unwrap();
    assert!(stop_at < second_start_at);
}

#[test]
fn frames_for_unknown_ids_publish_nothing() {
    let (host, mut model) = setup(Timestamp::new(10, 5, 0, 3, 14, 9), Settings::default_test());
    model.on_focus_regained();
    let published = host.renderer.published().len();

    model.on_animation_frame(99, NORM_MAX / 2);
    model.on_animation_stopped(99, true);

    assert_eq!(host.renderer.published().len(), published);
}

// ── Flourish ─────────────────────────────────────────────────────────────────

/// A tap spins every hand a full turn, with ticks and taps muted until
/// the flourish stops.
#[test]
fn flourish_suspends_then_restores_subscriptions() {
    let now = Timestamp::new(14, 20, 10, 4, 15, 9);
    let settings = Settings {
        tap_to_animate:  true,
        display_seconds: true,
        ..Settings::default_test()
    };
    let (host, mut model) = setup(now, settings);
    model.on_focus_regained();
    let before = model.current_state();
    model.drain_events();

    model.on_tap(TapAxis::Z, 1);

    assert_eq!(host.timer.active(), None);
    assert!(!host.tap.is_subscribed());
    let events = model.drain_events();
    let (kind, start, end) = started(&events)[0];
    assert_eq!(kind, AnimationKind::Flourish);
    assert_eq!((start.minute_angle - before.minute_angle).abs(), 360);
    assert_eq!((start.hour_angle - before.hour_angle).abs(), 360);
    assert_eq!((start.day_angle - before.day_angle).abs(), 360);
    assert_eq!(end.second_angle, before.second_angle + 15);

    // Muted: a second tap is dropped at the subscription layer.
    model.on_tap(TapAxis::X, -1);
    assert!(model.drain_events().contains(&WatchEvent::TapIgnored));
    assert_eq!(host.driver.scheduled().len(), 1);

    host.driver.play_pending(&mut model, 10);

    assert_eq!(host.timer.active(), Some(TickGranularity::PerSecond));
    assert!(host.tap.is_subscribed());
    assert_eq!(model.current_state(), before);
}

/// Settings saved mid-flourish do not unmute the timers early.
#[test]
fn config_change_during_flourish_keeps_subscriptions_down() {
    let settings = Settings { tap_to_animate: true, ..Settings::default_test() };
    let (host, mut model) = setup(Timestamp::new(14, 20, 10, 4, 15, 9), settings.clone());
    model.on_focus_regained();
    model.on_tap(TapAxis::Y, 1);

    host.settings.store(Settings { display_seconds: true, ..settings });
    model.on_config_changed();
    assert_eq!(host.timer.active(), None);

    host.driver.play_pending(&mut model, 2);
    assert_eq!(host.timer.active(), Some(TickGranularity::PerSecond));
}
