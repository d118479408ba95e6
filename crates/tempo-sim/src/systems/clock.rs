//! Tick clock sync.
//!
//! Runs after the rewind state machine so every later reader in the tick
//! sees one consistent (mode, tick) pair.

use tracing::trace;

use tempo_core::clock::{RewindState, TickClock};

/// Bring the clock in line with the rewind state for this tick.
///
/// In Record the clock advances one tick when playing, or when paused with
/// step ticks owed. While rewinding or catching up it mirrors the replay
/// cursor. `hold` keeps the clock where it is (used on the tick that
/// returns to Record, so that tick reads as the rewind's start tick).
pub fn sync(clock: &mut TickClock, rewind: &RewindState, hold: bool) {
    if let (Some(playback_tick), Some(target_tick)) = (rewind.playback_tick(), rewind.target_tick())
    {
        clock.tick = playback_tick;
        clock.target_tick = target_tick;
        clock.delta = 0.0;
        return;
    }

    if hold {
        clock.delta = 0.0;
        return;
    }

    if !clock.is_paused || clock.is_stepping() {
        clock.tick += 1;
        clock.delta = clock.scaled_delta();
    } else {
        clock.delta = 0.0;
    }
    clock.target_tick = clock.target_tick.max(clock.tick);
    trace!(tick = clock.tick, delta = clock.delta, "clock sync");
}
