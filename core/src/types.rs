//! Shared primitive types used across the whole watch face.

/// A dial position in degrees. Unbounded: animations push it below 0
/// or past 360, and only rendering reduces it.
pub type Angle = i32;

/// Normalized animation progress in [0, NORM_MAX].
pub type Progress = u32;

/// Upper bound of animation progress (host's normalized maximum).
pub const NORM_MAX: Progress = 65_535;

/// Animation length in milliseconds.
pub type DurationMs = u32;

/// Identifier handed to the animation driver for one scheduled animation.
pub type AnimationId = u64;
