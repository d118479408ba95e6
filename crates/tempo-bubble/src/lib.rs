//! Time bubble logic for Tempo.
//!
//! Pure functions for volume containment, priority resolution, and the
//! effective-delta rule. No ECS world; everything operates on plain data.

pub mod delta;
pub mod resolve;
pub mod volume;

pub use tempo_core as core;

#[cfg(test)]
mod tests;
