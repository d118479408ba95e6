//! Point containment for bubble volumes.

use glam::Vec3;

use tempo_core::types::BubbleVolume;

/// Whether `point` lies inside `volume`. Boundaries count as inside.
pub fn contains(volume: &BubbleVolume, point: Vec3) -> bool {
    match *volume {
        BubbleVolume::Sphere { center, radius } => center.distance_squared(point) <= radius * radius,
        BubbleVolume::Box {
            center,
            half_extents,
        } => {
            let offset = (point - center).abs();
            offset.cmple(half_extents).all()
        }
    }
}
