//! Time bubble records and the one-shot requests that create/destroy them.

use glam::Vec3;

use crate::enums::BubbleMode;
use crate::types::{BubbleId, BubbleVolume};

/// A spatial volume imposing a local time mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBubble {
    pub id: BubbleId,
    pub mode: BubbleMode,
    /// Delta multiplier for `Scale` and `Rewind` modes.
    pub scale: f32,
    /// Higher priority wins when bubbles overlap.
    pub priority: u8,
    pub volume: BubbleVolume,
    /// Lifetime in ticks; 0 means infinite.
    pub duration_ticks: u32,
    pub created_at_tick: u64,
    pub is_active: bool,
    /// Entity that owns the bubble. The volume follows its transform.
    pub source_entity: Option<hecs::Entity>,
}

impl TimeBubble {
    /// Materialize a request that was assigned `id`.
    pub fn from_request(id: BubbleId, request: &CreateBubbleRequest, tick: u64) -> Self {
        Self {
            id,
            mode: request.mode,
            scale: request.scale,
            priority: request.priority,
            volume: request.volume,
            duration_ticks: request.duration_ticks,
            created_at_tick: tick,
            is_active: true,
            source_entity: request.source_entity,
        }
    }

    /// Finite bubbles expire once `duration_ticks` have elapsed since creation.
    pub fn is_expired(&self, tick: u64) -> bool {
        self.duration_ticks != 0
            && tick.saturating_sub(self.created_at_tick) >= u64::from(self.duration_ticks)
    }
}

/// Request to create a bubble; consumed on the next bubble pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateBubbleRequest {
    pub volume: BubbleVolume,
    pub mode: BubbleMode,
    pub scale: f32,
    pub priority: u8,
    pub duration_ticks: u32,
    pub source_entity: Option<hecs::Entity>,
}

impl CreateBubbleRequest {
    pub fn new(volume: BubbleVolume, mode: BubbleMode) -> Self {
        Self {
            volume,
            mode,
            scale: 1.0,
            priority: 0,
            duration_ticks: 0,
            source_entity: None,
        }
    }

    pub fn sphere(center: Vec3, radius: f32, mode: BubbleMode) -> Self {
        Self::new(BubbleVolume::sphere(center, radius), mode)
    }

    pub fn aabb(center: Vec3, half_extents: Vec3, mode: BubbleMode) -> Self {
        Self::new(BubbleVolume::aabb(center, half_extents), mode)
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, duration_ticks: u32) -> Self {
        self.duration_ticks = duration_ticks;
        self
    }

    pub fn with_source(mut self, entity: hecs::Entity) -> Self {
        self.source_entity = Some(entity);
        self
    }
}

/// Request to remove a bubble; consumed on the next bubble pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveBubbleRequest {
    pub bubble_id: BubbleId,
}
