//! Membership resolution: which bubble, if any, owns a point.

use glam::Vec3;

use tempo_core::bubble::TimeBubble;
use tempo_core::components::TimeBubbleMembership;

use crate::volume::contains;

/// Pick the bubble governing `point`.
///
/// Only active bubbles are considered. Highest priority wins; equal
/// priorities fall back to the lowest bubble id, so the result does not
/// depend on the order of `bubbles`.
pub fn resolve(point: Vec3, bubbles: &[TimeBubble]) -> Option<&TimeBubble> {
    bubbles
        .iter()
        .filter(|bubble| bubble.is_active && contains(&bubble.volume, point))
        .min_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)))
}

/// Build the membership record for an entity resolved into `bubble`.
///
/// `previous` is the entity's membership from the last tick; staying in the
/// same bubble keeps the first `member_since_tick`.
pub fn membership_for(
    bubble: &TimeBubble,
    previous: Option<&TimeBubbleMembership>,
    tick: u64,
) -> TimeBubbleMembership {
    let member_since_tick = match previous {
        Some(prev) if prev.bubble_id == bubble.id => prev.member_since_tick,
        _ => tick,
    };
    TimeBubbleMembership {
        bubble_id: bubble.id,
        local_mode: bubble.mode,
        local_scale: bubble.scale,
        member_since_tick,
        previous_frame_flag: previous.is_some(),
        priority: bubble.priority,
    }
}
