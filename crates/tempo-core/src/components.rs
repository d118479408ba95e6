//! ECS components for hecs entities.
//!
//! Components are plain data structs with no logic. Markers opt an
//! entity into rewind, snapshot, or bubble handling.

use serde::{Deserialize, Serialize};

use crate::enums::BubbleMode;
use crate::types::BubbleId;

/// Entity participates in global rewind (guarded and snapshotted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewindable;

/// Entity is captured by world snapshots without being guarded during playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInclude;

/// Added to rewindable entities for the duration of a rewind.
/// Gameplay systems must not mutate entities carrying it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackGuard;

/// Entity opts into time bubble effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAffectable;

/// Entity is inside a stasis bubble; every delta consumer must treat its delta as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InStasis;

/// Resolved bubble membership. Derived data, rewritten every tick by the bubble manager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBubbleMembership {
    pub bubble_id: BubbleId,
    pub local_mode: BubbleMode,
    pub local_scale: f32,
    /// Tick the entity entered its current bubble.
    pub member_since_tick: u64,
    /// Whether the entity already had a membership on the previous tick.
    pub previous_frame_flag: bool,
    pub priority: u8,
}

/// Per-entity local time accumulated from its effective delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalClock {
    /// Local elapsed seconds (may decrease inside rewind bubbles).
    pub elapsed: f32,
    /// Ticks during which the entity received a non-zero delta.
    pub active_ticks: u64,
}
