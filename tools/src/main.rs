//! face-runner: headless driver for the watch-face engine.
//!
//! Usage:
//!   face-runner --seed 12345 --start 2026-10-15T10:04:58 --seconds 180
//!   face-runner --settings face.json --tap-at 30 --tap-at 95 --frames 12
//!   face-runner --seed 12345 --ipc-mode

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use std::env;
use std::io::{self, BufRead, Write};
use watchface_core::{
    clock::{TimeUnits, Timestamp},
    event::WatchEvent,
    fakes::FakeHost,
    host::{JsonSettingsStore, TapAxis},
    model::WatchModel,
    settings::Settings,
};

const START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Advance {
        seconds: u64,
    },
    Tap {
        axis: TapAxis,
    },
    ConfigChanged {
        settings: Option<Settings>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct EventLine<'a> {
    at:    String,
    event: &'a WatchEvent,
}

/// Simulated device: fakes plus the wall-clock time they agree on.
struct Session {
    host:       FakeHost,
    model:      WatchModel,
    now:        NaiveDateTime,
    frames:     u32,
    elapsed:    u64,
    file_store: bool,
}

impl Session {
    fn new(seed: u64, start: NaiveDateTime, frames: u32, settings_path: Option<&str>) -> Result<Self> {
        let settings = match settings_path {
            Some(path) => Settings::load(path).with_context(|| format!("loading {path}"))?,
            None => Settings::default(),
        };
        let host = FakeHost::new(Timestamp::from_datetime(&start), settings);
        let mut caps = host.capabilities();
        if let Some(path) = settings_path {
            caps.settings = Box::new(JsonSettingsStore::new(path));
        }
        let model = WatchModel::new(caps, seed);
        Ok(Self {
            host,
            model,
            now: start,
            frames,
            elapsed: 0,
            file_store: settings_path.is_some(),
        })
    }

    /// Advance the clock one second and deliver whatever the current
    /// subscription would deliver.
    fn step(&mut self) {
        self.now += Duration::seconds(1);
        self.elapsed += 1;
        let ts = Timestamp::from_datetime(&self.now);
        self.host.clock.set(ts);
        if let Some(units) = self
            .host
            .timer
            .active()
            .and_then(|granularity| TimeUnits::for_tick(granularity, &ts))
        {
            self.model.on_tick(&ts, units);
        }
        self.settle();
    }

    fn settle(&mut self) {
        let played = self.host.driver.play_pending(&mut self.model, self.frames);
        if played > 0 {
            log::debug!("t+{}s played {played} animation(s)", self.elapsed);
        }
    }

    fn flush(&mut self, out: &mut impl Write) -> Result<()> {
        let at = self.now.format("%H:%M:%S").to_string();
        for event in self.model.drain_events() {
            log::trace!("{at} {}", event.type_name());
            let line = EventLine { at: at.clone(), event: &event };
            writeln!(out, "{}", serde_json::to_string(&line)?)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 180u64);
    let frames = parse_arg(&args, "--frames", 12u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let settings_path = args
        .windows(2)
        .find(|w| w[0] == "--settings")
        .map(|w| w[1].as_str());
    let start = match args.windows(2).find(|w| w[0] == "--start") {
        Some(w) => NaiveDateTime::parse_from_str(&w[1], START_FORMAT)
            .with_context(|| format!("--start must look like {START_FORMAT}"))?,
        None => chrono::Local::now().naive_local(),
    };
    let taps: Vec<u64> = args
        .windows(2)
        .filter(|w| w[0] == "--tap-at")
        .filter_map(|w| w[1].parse().ok())
        .collect();

    let mut session = Session::new(seed, start, frames, settings_path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !ipc_mode {
        log::info!("face-runner seed={seed} start={start} seconds={seconds} frames={frames}");
    }

    session.model.on_focus_regained();
    session.settle();
    session.flush(&mut out)?;

    if ipc_mode {
        run_ipc_loop(&mut session, &mut out)?;
    } else {
        for _ in 0..seconds {
            session.step();
            if taps.contains(&session.elapsed) {
                session.model.on_tap(TapAxis::Z, 1);
                session.settle();
            }
            session.flush(&mut out)?;
        }
        writeln!(out, "{}", serde_json::to_string(&session.model.snapshot())?)?;
    }

    Ok(())
}

fn run_ipc_loop(session: &mut Session, out: &mut impl Write) -> Result<()> {
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(out, "{}", err_json)?;
                out.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Advance { seconds } => {
                for _ in 0..seconds {
                    session.step();
                    session.flush(out)?;
                }
            }
            IpcCommand::Tap { axis } => {
                session.model.on_tap(axis, 1);
                session.settle();
                session.flush(out)?;
            }
            IpcCommand::ConfigChanged { settings } => {
                match settings {
                    Some(_) if session.file_store => {
                        log::warn!("inline settings ignored: runner reads its settings file");
                    }
                    Some(settings) => session.host.settings.store(settings),
                    None => {}
                }
                session.model.on_config_changed();
                session.settle();
                session.flush(out)?;
            }
        }
        writeln!(out, "{}", serde_json::to_string(&session.model.snapshot())?)?;
        out.flush()?;
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
