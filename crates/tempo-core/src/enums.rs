//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Top-level mode of the rewind state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewindMode {
    /// Normal forward simulation. Gameplay writes are allowed.
    #[default]
    Record,
    /// Read-only playback seeking toward a past target tick.
    Rewind,
    /// Fast-forward back to the tick the rewind was entered from.
    CatchUp,
}

/// Direction the playback cursor is currently moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrubDirection {
    /// Cursor has reached its target (or no playback is active).
    #[default]
    Hold,
    Backward,
    Forward,
}

/// Local time behavior imposed by a time bubble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleMode {
    /// Contained entities receive zero delta.
    Pause,
    /// Contained entities receive `fixed_delta * scale`.
    #[default]
    Scale,
    /// Contained entities receive a negative delta and play backward locally.
    Rewind,
    /// Fully frozen. Entities are tagged `InStasis`.
    Stasis,
}

impl BubbleMode {
    /// Whether contained entities are frozen (zero delta).
    pub fn is_frozen(self) -> bool {
        matches!(self, BubbleMode::Pause | BubbleMode::Stasis)
    }
}

/// Kind of a queued time-control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Pause,
    Resume,
    SetSpeed,
    StepTicks,
    StartRewind,
    StopRewind,
    ScrubTo,
}

/// Authority scope a command (or snapshot) belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandScope {
    #[default]
    Global,
    /// Per-player scope. Coerced to `Global` in single-authority mode.
    Player,
}

/// What the command processor did with a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// Journaled but not yet processed.
    #[default]
    Pending,
    /// Applied as requested.
    Applied,
    /// Applied after clamping an out-of-range parameter.
    Clamped,
    /// Illegal in the current state; nothing changed.
    Ignored,
}

/// Encoding of a stored snapshot payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotCompression {
    #[default]
    None,
    /// LZ4 block with the uncompressed size prepended.
    Lz4,
}
