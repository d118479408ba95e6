//! Time-control commands queued by clients of the engine.
//!
//! Commands are plain value objects. They are journaled and applied
//! at the next tick boundary, in queue order.

use serde::{Deserialize, Serialize};

use crate::enums::{CommandKind, CommandScope};

/// A queued time-control request.
///
/// `float_param` and `uint_param` are interpreted per kind:
/// `SetSpeed` reads the float, `StepTicks`/`StartRewind` read the uint,
/// `ScrubTo` reads the uint as target tick and a positive float as scrub speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeControlCommand {
    pub kind: CommandKind,
    #[serde(default)]
    pub float_param: f32,
    #[serde(default)]
    pub uint_param: u64,
    #[serde(default)]
    pub scope: CommandScope,
}

impl TimeControlCommand {
    pub fn new(kind: CommandKind, float_param: f32, uint_param: u64) -> Self {
        Self {
            kind,
            float_param,
            uint_param,
            scope: CommandScope::Global,
        }
    }

    pub fn pause() -> Self {
        Self::new(CommandKind::Pause, 0.0, 0)
    }

    pub fn resume() -> Self {
        Self::new(CommandKind::Resume, 0.0, 0)
    }

    pub fn set_speed(multiplier: f32) -> Self {
        Self::new(CommandKind::SetSpeed, multiplier, 0)
    }

    /// Advance `ticks` ticks while otherwise paused (0 is treated as 1).
    pub fn step_ticks(ticks: u64) -> Self {
        Self::new(CommandKind::StepTicks, 0.0, ticks)
    }

    pub fn start_rewind(target_tick: u64) -> Self {
        Self::new(CommandKind::StartRewind, 0.0, target_tick)
    }

    pub fn stop_rewind() -> Self {
        Self::new(CommandKind::StopRewind, 0.0, 0)
    }

    /// Retarget an active rewind. A non-positive `speed` keeps the current scrub speed.
    pub fn scrub_to(target_tick: u64, speed: f32) -> Self {
        Self::new(CommandKind::ScrubTo, speed, target_tick)
    }

    pub fn with_scope(mut self, scope: CommandScope) -> Self {
        self.scope = scope;
        self
    }
}
