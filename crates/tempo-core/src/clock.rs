//! Tick clock and rewind state: the two engine-owned time records.
//!
//! Both are plain data. The command processor and the rewind state
//! machine in `tempo-sim` are their only writers.

use serde::{Deserialize, Serialize};

use crate::enums::{RewindMode, ScrubDirection};

/// Canonical simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    /// Current simulation tick.
    pub tick: u64,
    /// Seconds per tick.
    pub fixed_delta: f32,
    /// Global speed multiplier applied to the delta of unaffected entities.
    pub speed_multiplier: f32,
    pub is_paused: bool,
    pub is_playing: bool,
    /// Tick the clock is allowed to advance to while paused (step target).
    /// During a rewind this is the playback target instead.
    pub target_tick: u64,
    /// Global delta applied for the current tick; zero when the clock held.
    pub delta: f32,
}

impl TickClock {
    pub fn new(fixed_delta: f32, speed_multiplier: f32) -> Self {
        Self {
            tick: 0,
            fixed_delta,
            speed_multiplier,
            is_paused: false,
            is_playing: true,
            target_tick: 0,
            delta: 0.0,
        }
    }

    /// Ticks per second implied by the fixed delta.
    pub fn tick_rate(&self) -> f32 {
        1.0 / self.fixed_delta
    }

    /// Paused, but with step ticks still owed.
    pub fn is_stepping(&self) -> bool {
        self.is_paused && self.target_tick > self.tick
    }

    /// Delta for one forward tick at the current speed.
    pub fn scaled_delta(&self) -> f32 {
        self.fixed_delta * self.speed_multiplier
    }

    /// Read-only view handed to gameplay systems.
    pub fn view(&self, mode: RewindMode) -> TimeView {
        TimeView {
            tick: self.tick,
            fixed_delta: self.fixed_delta,
            speed_multiplier: self.speed_multiplier,
            is_paused: self.is_paused,
            mode,
            delta: self.delta,
        }
    }
}

/// Consistent (mode, tick) pair observed by every reader within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeView {
    pub tick: u64,
    pub fixed_delta: f32,
    pub speed_multiplier: f32,
    pub is_paused: bool,
    pub mode: RewindMode,
    /// Global delta for this tick.
    pub delta: f32,
}

impl TimeView {
    /// Gameplay systems only mutate state while recording.
    pub fn is_recording(&self) -> bool {
        self.mode == RewindMode::Record
    }
}

/// Cursor of an in-flight rewind (seek backward / scrub).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackCursor {
    /// Tick the rewind was entered from.
    pub start_tick: u64,
    pub target_tick: u64,
    pub playback_tick: u64,
    /// Wall-clock seconds not yet converted into playback steps.
    pub accumulator: f32,
}

impl PlaybackCursor {
    pub fn direction(&self) -> ScrubDirection {
        match self.target_tick.cmp(&self.playback_tick) {
            std::cmp::Ordering::Less => ScrubDirection::Backward,
            std::cmp::Ordering::Greater => ScrubDirection::Forward,
            std::cmp::Ordering::Equal => ScrubDirection::Hold,
        }
    }
}

/// Cursor of the catch-up phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchUpCursor {
    /// Tick the rewind was entered from; catch-up ends here.
    pub start_tick: u64,
    /// Current replay position.
    pub tick: u64,
}

/// Per-phase data of the rewind state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum RewindPhase {
    #[default]
    Record,
    Rewind(PlaybackCursor),
    CatchUp(CatchUpCursor),
}

/// The rewind state machine record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewindState {
    pub phase: RewindPhase,
    pub playback_ticks_per_second: f32,
    /// Multiplier on playback pace set by `ScrubTo`.
    pub scrub_speed: f32,
}

impl RewindState {
    pub fn new(playback_ticks_per_second: f32) -> Self {
        Self {
            phase: RewindPhase::Record,
            playback_ticks_per_second,
            scrub_speed: 1.0,
        }
    }

    pub fn mode(&self) -> RewindMode {
        match self.phase {
            RewindPhase::Record => RewindMode::Record,
            RewindPhase::Rewind(_) => RewindMode::Rewind,
            RewindPhase::CatchUp(_) => RewindMode::CatchUp,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.phase, RewindPhase::Record)
    }

    pub fn start_tick(&self) -> Option<u64> {
        match self.phase {
            RewindPhase::Record => None,
            RewindPhase::Rewind(cursor) => Some(cursor.start_tick),
            RewindPhase::CatchUp(cursor) => Some(cursor.start_tick),
        }
    }

    /// Tick the current phase is moving toward.
    pub fn target_tick(&self) -> Option<u64> {
        match self.phase {
            RewindPhase::Record => None,
            RewindPhase::Rewind(cursor) => Some(cursor.target_tick),
            RewindPhase::CatchUp(cursor) => Some(cursor.start_tick),
        }
    }

    /// Tick being replayed, distinct from the live tick.
    pub fn playback_tick(&self) -> Option<u64> {
        match self.phase {
            RewindPhase::Record => None,
            RewindPhase::Rewind(cursor) => Some(cursor.playback_tick),
            RewindPhase::CatchUp(cursor) => Some(cursor.tick),
        }
    }

    pub fn scrub_direction(&self) -> ScrubDirection {
        match self.phase {
            RewindPhase::Record => ScrubDirection::Hold,
            RewindPhase::Rewind(cursor) => cursor.direction(),
            RewindPhase::CatchUp(_) => ScrubDirection::Forward,
        }
    }

    /// Wall-clock seconds per playback step.
    pub fn step_interval(&self) -> f32 {
        1.0 / (self.playback_ticks_per_second * self.scrub_speed).max(f32::EPSILON)
    }
}
