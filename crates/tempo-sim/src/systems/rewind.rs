//! Rewind state machine: Record → Rewind → CatchUp → Record.
//!
//! Rewind seeks the playback cursor toward a past target at a smooth,
//! wall-clock-paced rate. CatchUp then replays forward in bounded bursts
//! until the tick the rewind was entered from. Illegal requests are no-ops.

use hecs::{CommandBuffer, Entity, World};
use tracing::{debug, info};

use tempo_core::clock::{CatchUpCursor, PlaybackCursor, RewindPhase, RewindState, TickClock};
use tempo_core::components::{PlaybackGuard, Rewindable};
use tempo_core::enums::RewindMode;

/// Phase change produced by one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    EnteredCatchUp,
    ReturnedToRecord,
}

/// Enter Rewind from Record. `target_tick` must already be clamped.
/// Returns false (and changes nothing) outside Record.
pub fn start(state: &mut RewindState, clock: &TickClock, world: &mut World, target_tick: u64) -> bool {
    if !state.is_recording() {
        return false;
    }
    let guarded = apply_guards(world);
    state.scrub_speed = 1.0;
    state.phase = RewindPhase::Rewind(PlaybackCursor {
        start_tick: clock.tick,
        target_tick,
        playback_tick: clock.tick,
        accumulator: 0.0,
    });
    info!(
        start_tick = clock.tick,
        target_tick, guarded, "entering rewind"
    );
    true
}

/// Cooperative cancellation of an active rewind.
///
/// Goes to CatchUp when playback is behind the start tick, otherwise straight
/// back to Record. Returns the new mode, or `None` when not rewinding.
pub fn stop(state: &mut RewindState, clock: &mut TickClock, world: &mut World) -> Option<RewindMode> {
    let RewindPhase::Rewind(cursor) = state.phase else {
        return None;
    };
    if cursor.playback_tick < cursor.start_tick {
        state.phase = RewindPhase::CatchUp(CatchUpCursor {
            start_tick: cursor.start_tick,
            tick: cursor.playback_tick,
        });
        info!(
            from = cursor.playback_tick,
            to = cursor.start_tick,
            "rewind stopped, catching up"
        );
        Some(RewindMode::CatchUp)
    } else {
        finish(state, clock, world, cursor.start_tick);
        Some(RewindMode::Record)
    }
}

/// Retarget an active rewind. `target_tick` must already be clamped.
/// A positive finite `speed` replaces the scrub speed.
pub fn scrub(state: &mut RewindState, target_tick: u64, speed: f32) -> bool {
    let RewindPhase::Rewind(ref mut cursor) = state.phase else {
        return false;
    };
    cursor.target_tick = target_tick;
    if speed.is_finite() && speed > 0.0 {
        state.scrub_speed = speed;
    }
    debug!(target_tick, scrub_speed = state.scrub_speed, "scrub retarget");
    true
}

/// Drive the state machine by one frame of wall-clock time.
pub fn advance(
    state: &mut RewindState,
    clock: &mut TickClock,
    world: &mut World,
    frame_dt: f32,
    catch_up_ticks_per_frame: u64,
) -> Transition {
    match state.phase {
        RewindPhase::Record => Transition::None,
        RewindPhase::Rewind(mut cursor) => {
            let interval = state.step_interval();
            cursor.accumulator += frame_dt;
            while cursor.accumulator >= interval && cursor.playback_tick != cursor.target_tick {
                cursor.accumulator -= interval;
                if cursor.target_tick < cursor.playback_tick {
                    cursor.playback_tick -= 1;
                } else {
                    cursor.playback_tick += 1;
                }
            }

            if cursor.playback_tick == cursor.target_tick {
                state.phase = RewindPhase::CatchUp(CatchUpCursor {
                    start_tick: cursor.start_tick,
                    tick: cursor.playback_tick,
                });
                info!(
                    reached = cursor.target_tick,
                    start_tick = cursor.start_tick,
                    "rewind target reached, catching up"
                );
                Transition::EnteredCatchUp
            } else {
                state.phase = RewindPhase::Rewind(cursor);
                Transition::None
            }
        }
        RewindPhase::CatchUp(mut cursor) => {
            cursor.tick = cursor
                .tick
                .saturating_add(catch_up_ticks_per_frame)
                .min(cursor.start_tick);
            if cursor.tick >= cursor.start_tick {
                finish(state, clock, world, cursor.start_tick);
                Transition::ReturnedToRecord
            } else {
                state.phase = RewindPhase::CatchUp(cursor);
                Transition::None
            }
        }
    }
}

/// Return to Record at `start_tick` and lift every playback guard.
fn finish(state: &mut RewindState, clock: &mut TickClock, world: &mut World, start_tick: u64) {
    state.phase = RewindPhase::Record;
    state.scrub_speed = 1.0;
    clock.tick = start_tick;
    clock.target_tick = start_tick;
    clock.is_paused = false;
    clock.is_playing = true;
    let released = clear_guards(world);
    info!(tick = start_tick, released, "back to record");
}

/// Tag every rewindable entity with `PlaybackGuard`. Returns the number tagged.
fn apply_guards(world: &mut World) -> usize {
    let targets: Vec<Entity> = world
        .query_mut::<(&Rewindable, Option<&PlaybackGuard>)>()
        .into_iter()
        .filter(|(_, (_, guard))| guard.is_none())
        .map(|(entity, _)| entity)
        .collect();

    let mut cmd = CommandBuffer::new();
    for &entity in &targets {
        cmd.insert_one(entity, PlaybackGuard);
    }
    cmd.run_on(world);
    targets.len()
}

/// Remove every `PlaybackGuard`. Returns the number removed.
fn clear_guards(world: &mut World) -> usize {
    let guarded: Vec<Entity> = world
        .query_mut::<&PlaybackGuard>()
        .into_iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut cmd = CommandBuffer::new();
    for &entity in &guarded {
        cmd.remove_one::<PlaybackGuard>(entity);
    }
    cmd.run_on(world);
    guarded.len()
}
