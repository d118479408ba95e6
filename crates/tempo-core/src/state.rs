//! Diagnostics view of the engine, produced after each tick.
//!
//! Not part of the correctness contract; exported for telemetry.

use serde::{Deserialize, Serialize};

use crate::enums::RewindMode;

/// Observable engine state after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDiagnostics {
    pub mode: RewindMode,
    pub tick: u64,
    /// Replay position while rewinding or catching up.
    pub playback_tick: Option<u64>,
    pub speed_multiplier: f32,
    pub is_paused: bool,
    pub bubble_count: usize,
    pub member_count: usize,
    pub snapshot_count: usize,
    pub snapshot_bytes: usize,
    pub commands_logged: usize,
}

impl TimeDiagnostics {
    /// Flatten into named numeric metrics.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        let mode = match self.mode {
            RewindMode::Record => 0.0,
            RewindMode::Rewind => 1.0,
            RewindMode::CatchUp => 2.0,
        };
        vec![
            ("time.mode", mode),
            ("time.tick", self.tick as f64),
            (
                "time.playback_tick",
                self.playback_tick.unwrap_or(self.tick) as f64,
            ),
            ("time.speed_multiplier", f64::from(self.speed_multiplier)),
            ("time.paused", if self.is_paused { 1.0 } else { 0.0 }),
            ("bubbles.active", self.bubble_count as f64),
            ("bubbles.members", self.member_count as f64),
            ("snapshots.count", self.snapshot_count as f64),
            ("snapshots.bytes", self.snapshot_bytes as f64),
            ("commands.logged", self.commands_logged as f64),
        ]
    }
}
