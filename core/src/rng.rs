//! Deterministic random number generation.
//!
//! RULE: Nothing in the watch face may call any platform RNG.
//! All randomness flows through a FaceRng derived from the master
//! seed handed to the model at construction.
//!
//! Each consumer gets its own stream, seeded from
//! (master_seed XOR stream_index * golden ratio), so adding a stream
//! never shifts the draws of an existing one.

use crate::types::Angle;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stable stream assignments. Append only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngStream {
    Flourish = 0,
}

impl RngStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flourish => "flourish",
        }
    }
}

pub struct FaceRng {
    pub name: &'static str,
    inner:    Pcg64Mcg,
}

impl FaceRng {
    pub fn new(master_seed: u64, stream: RngStream) -> Self {
        let derived_seed = master_seed ^ (stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name:  stream.name(),
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Fair coin.
    pub fn next_bool(&mut self) -> bool {
        self.inner.next_u64() >> 63 == 1
    }

    /// +1 or -1 with equal probability.
    pub fn next_sign(&mut self) -> Angle {
        if self.next_bool() { 1 } else { -1 }
    }
}
