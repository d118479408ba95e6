//! Fundamental geometric and identity types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform of an entity. This is the state snapshots capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Identity rotation and unit scale at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Linear velocity (units per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
        }
    }
}

/// Unique, monotonically allocated time bubble identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bubble#{}", self.0)
    }
}

/// Spatial extent of a time bubble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum BubbleVolume {
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box described by its half extents.
    Box { center: Vec3, half_extents: Vec3 },
}

impl BubbleVolume {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        BubbleVolume::Sphere {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn aabb(center: Vec3, half_extents: Vec3) -> Self {
        BubbleVolume::Box {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn center(&self) -> Vec3 {
        match *self {
            BubbleVolume::Sphere { center, .. } | BubbleVolume::Box { center, .. } => center,
        }
    }

    /// Move the volume without changing its shape.
    pub fn recenter(&mut self, new_center: Vec3) {
        match self {
            BubbleVolume::Sphere { center, .. } | BubbleVolume::Box { center, .. } => {
                *center = new_center;
            }
        }
    }
}
