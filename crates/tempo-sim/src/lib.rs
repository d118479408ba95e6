//! Time-control engine for Tempo.
//!
//! Owns the hecs ECS world, runs the time systems in a fixed order each
//! tick, and produces `TimeDiagnostics` for telemetry.

pub mod engine;
pub mod systems;
pub mod world_setup;

pub use engine::TimeEngine;
pub use tempo_core as core;
