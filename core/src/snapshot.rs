//! Snapshot: a serializable view of the whole model.
//!
//! Diagnostic only: the face never restores from a snapshot. State is
//! always recomputed from the clock at startup.

use crate::{
    clock_state::ClockState,
    scheduler::{ActiveAnimation, AnimationStats},
    settings::Settings,
    subscription::SubscriptionState,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSnapshot {
    pub state:         ClockState,
    pub settings:      Settings,
    pub animation:     Option<ActiveAnimation>,
    pub subscriptions: SubscriptionState,
    pub stats:         AnimationStats,
}
