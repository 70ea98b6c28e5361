//! watchface-core: clock-state timing and animation engine for an
//! analog watch face.
//!
//! MODULE ORDER (leaves first):
//!   angle_mapper → clock_state → interpolator → scheduler
//!   → subscription → model
//!
//! The host (device, runner, or tests) owns the event loop and calls
//! into `model::WatchModel`. Everything the core needs from the host
//! comes in through the traits in `host` and `clock`.

pub mod angle_mapper;
pub mod clock;
pub mod clock_state;
pub mod error;
pub mod event;
pub mod fakes;
pub mod host;
pub mod interpolator;
pub mod model;
pub mod rng;
pub mod scheduler;
pub mod settings;
pub mod snapshot;
pub mod subscription;
pub mod types;
