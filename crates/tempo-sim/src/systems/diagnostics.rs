//! Diagnostics builder. Read-only over every engine record.

use tempo_core::clock::{RewindState, TickClock};
use tempo_core::state::TimeDiagnostics;

use crate::systems::bubbles::BubbleManager;
use crate::systems::command_processor::CommandLog;
use crate::systems::snapshot::SnapshotStore;

pub fn build(
    clock: &TickClock,
    rewind: &RewindState,
    bubbles: &BubbleManager,
    snapshots: &SnapshotStore,
    log: &CommandLog,
) -> TimeDiagnostics {
    TimeDiagnostics {
        mode: rewind.mode(),
        tick: clock.tick,
        playback_tick: rewind.playback_tick(),
        speed_multiplier: clock.speed_multiplier,
        is_paused: clock.is_paused,
        bubble_count: bubbles.active_count(),
        member_count: bubbles.member_count(),
        snapshot_count: snapshots.len(),
        snapshot_bytes: snapshots.used_bytes(),
        commands_logged: log.len(),
    }
}
