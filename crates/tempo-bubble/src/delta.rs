//! Effective-delta rule shared by every delta-time consumer.

use tempo_core::clock::TimeView;
use tempo_core::components::TimeBubbleMembership;
use tempo_core::enums::BubbleMode;

/// Delta an entity should integrate this tick.
///
/// Entities outside any bubble follow the global clock. Bubble members
/// follow their bubble's own rate, but only on ticks where the global clock
/// advanced: a paused or held clock gives every entity 0. Frozen modes
/// give 0, `Scale` gives `fixed_delta * scale` and `Rewind` the same
/// magnitude negated.
pub fn effective_delta(
    view: &TimeView,
    membership: Option<&TimeBubbleMembership>,
    in_stasis: bool,
) -> f32 {
    if in_stasis {
        return 0.0;
    }
    let Some(membership) = membership else {
        return view.delta;
    };
    if view.delta == 0.0 {
        return 0.0;
    }
    match membership.local_mode {
        BubbleMode::Pause | BubbleMode::Stasis => 0.0,
        BubbleMode::Scale => view.fixed_delta * membership.local_scale.max(0.0),
        BubbleMode::Rewind => -(view.fixed_delta * membership.local_scale.abs()),
    }
}
