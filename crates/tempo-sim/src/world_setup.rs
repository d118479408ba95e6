//! Entity spawn factories for populating the world.
//!
//! Creates rewindable and time-affectable entities with the component
//! bundles the time systems look for.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tempo_core::components::{LocalClock, Rewindable, SnapshotInclude, TimeAffectable};
use tempo_core::types::{Transform, Velocity};

/// Spawn an entity that is guarded and snapshotted during rewinds, and
/// subject to time bubbles.
pub fn spawn_rewindable(world: &mut World, position: Vec3, velocity: Velocity) -> Entity {
    world.spawn((
        Rewindable,
        TimeAffectable,
        Transform::from_position(position),
        velocity,
        LocalClock::default(),
    ))
}

/// Spawn an entity subject to time bubbles only.
pub fn spawn_affectable(world: &mut World, position: Vec3, velocity: Velocity) -> Entity {
    world.spawn((
        TimeAffectable,
        Transform::from_position(position),
        velocity,
        LocalClock::default(),
    ))
}

/// Spawn a static prop that is captured by snapshots but never guarded.
pub fn spawn_snapshot_prop(world: &mut World, position: Vec3) -> Entity {
    world.spawn((SnapshotInclude, Transform::from_position(position)))
}

/// Scatter `count` rewindable entities uniformly in a cube of half-size
/// `extent` around the origin, with small random velocities.
pub fn scatter_rewindables(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    count: usize,
    extent: f32,
) -> Vec<Entity> {
    let extent = extent.abs().max(f32::EPSILON);
    (0..count)
        .map(|_| {
            let position = Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            );
            let velocity = Velocity::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            spawn_rewindable(world, position, velocity)
        })
        .collect()
}
