//! Reference delta consumers.
//!
//! Integrates Transform from Velocity and advances per-entity local clocks,
//! both using the entity's effective delta. Nothing here runs outside
//! Record, and guarded entities are never touched.

use hecs::World;

use tempo_bubble::delta::effective_delta;
use tempo_core::clock::TimeView;
use tempo_core::components::{InStasis, LocalClock, PlaybackGuard, TimeBubbleMembership};
use tempo_core::types::{Transform, Velocity};

/// Run kinematic integration: position += velocity * effective delta.
pub fn run(world: &mut World, view: &TimeView) {
    if !view.is_recording() {
        return;
    }

    for (_entity, (transform, velocity, membership, stasis, guard)) in world.query_mut::<(
        &mut Transform,
        &Velocity,
        Option<&TimeBubbleMembership>,
        Option<&InStasis>,
        Option<&PlaybackGuard>,
    )>() {
        if guard.is_some() {
            continue;
        }
        let dt = effective_delta(view, membership, stasis.is_some());
        transform.position += velocity.linear * dt;
    }
}

/// Accumulate local elapsed time for every entity carrying a `LocalClock`.
pub fn advance_local_clocks(world: &mut World, view: &TimeView) {
    if !view.is_recording() {
        return;
    }

    for (_entity, (clock, membership, stasis, guard)) in world.query_mut::<(
        &mut LocalClock,
        Option<&TimeBubbleMembership>,
        Option<&InStasis>,
        Option<&PlaybackGuard>,
    )>() {
        if guard.is_some() {
            continue;
        }
        let dt = effective_delta(view, membership, stasis.is_some());
        if dt != 0.0 {
            clock.elapsed += dt;
            clock.active_ticks += 1;
        }
    }
}
