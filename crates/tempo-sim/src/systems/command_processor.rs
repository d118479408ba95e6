//! Command processor: drains the time-control queue once per tick.
//!
//! Every command is journaled with its issue tick before it is applied,
//! whatever the outcome. Out-of-range parameters are clamped and illegal
//! transitions ignored; nothing here fails.

use std::collections::VecDeque;

use hecs::World;
use serde::Serialize;
use tracing::debug;

use tempo_core::clock::{RewindPhase, RewindState, TickClock};
use tempo_core::commands::TimeControlCommand;
use tempo_core::config::TimeConfig;
use tempo_core::enums::{CommandKind, CommandOutcome, CommandScope};

use crate::systems::rewind;

/// One journaled command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommandLogEntry {
    pub issued_tick: u64,
    pub command: TimeControlCommand,
    pub outcome: CommandOutcome,
}

/// Append-only, capacity-bounded command journal.
///
/// When full, the oldest entry is dropped to make room and counted in `dropped`.
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: VecDeque<CommandLogEntry>,
    capacity: usize,
    dropped: u64,
}

impl CommandLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Journal a command as `Pending`.
    pub fn record(&mut self, issued_tick: u64, command: TimeControlCommand) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(CommandLogEntry {
            issued_tick,
            command,
            outcome: CommandOutcome::Pending,
        });
    }

    /// Fill in the outcome of the most recent entry.
    fn resolve_last(&mut self, outcome: CommandOutcome) {
        if let Some(entry) = self.entries.back_mut() {
            entry.outcome = outcome;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandLogEntry> {
        self.entries.iter()
    }

    /// Commands issued on `tick`, in application order.
    pub fn issued_at(&self, tick: u64) -> impl Iterator<Item = &CommandLogEntry> {
        self.entries.iter().filter(move |entry| entry.issued_tick == tick)
    }

    pub fn last(&self) -> Option<&CommandLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted because the journal was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Export the retained journal for audit.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}

/// Apply every queued command in FIFO order, then leave the queue empty.
pub fn run(
    queue: &mut VecDeque<TimeControlCommand>,
    log: &mut CommandLog,
    clock: &mut TickClock,
    state: &mut RewindState,
    world: &mut World,
    config: &TimeConfig,
) {
    while let Some(command) = queue.pop_front() {
        let command = coerce_scope(command, config);
        log.record(clock.tick, command);
        let outcome = apply(command, clock, state, world, config);
        if outcome == CommandOutcome::Ignored {
            debug!(kind = ?command.kind, tick = clock.tick, mode = ?state.mode(), "command ignored");
        }
        log.resolve_last(outcome);
    }
}

fn apply(
    command: TimeControlCommand,
    clock: &mut TickClock,
    state: &mut RewindState,
    world: &mut World,
    config: &TimeConfig,
) -> CommandOutcome {
    // Player scope only survives coercion in networked sessions, which have
    // no per-player time authority yet.
    if command.scope == CommandScope::Player {
        return CommandOutcome::Ignored;
    }

    match command.kind {
        CommandKind::Pause => {
            clock.is_paused = true;
            clock.is_playing = false;
            CommandOutcome::Applied
        }
        CommandKind::Resume => {
            clock.is_paused = false;
            clock.is_playing = true;
            CommandOutcome::Applied
        }
        CommandKind::SetSpeed => {
            let speed = config.clamp_speed(command.float_param);
            clock.speed_multiplier = speed;
            clamped_if(speed != command.float_param)
        }
        // Stepping only advances the live tick, so it is ignored while the
        // clock mirrors a replay cursor.
        CommandKind::StepTicks => {
            if !state.is_recording() {
                return CommandOutcome::Ignored;
            }
            let ticks = command.uint_param.max(1);
            clock.target_tick = clock.target_tick.max(clock.tick.saturating_add(ticks));
            clock.is_paused = true;
            clock.is_playing = false;
            CommandOutcome::Applied
        }
        CommandKind::StartRewind => {
            if !state.is_recording() {
                return CommandOutcome::Ignored;
            }
            let target = clamp_into_window(command.uint_param, clock.tick, config.rewind_horizon());
            rewind::start(state, clock, world, target);
            clamped_if(target != command.uint_param)
        }
        CommandKind::StopRewind => match rewind::stop(state, clock, world) {
            Some(_) => CommandOutcome::Applied,
            None => CommandOutcome::Ignored,
        },
        CommandKind::ScrubTo => {
            let RewindPhase::Rewind(cursor) = state.phase else {
                return CommandOutcome::Ignored;
            };
            let target =
                clamp_into_window(command.uint_param, cursor.start_tick, config.rewind_horizon());
            rewind::scrub(state, target, command.float_param);
            clamped_if(target != command.uint_param)
        }
    }
}

/// In single-authority mode the player scope is the global scope.
fn coerce_scope(command: TimeControlCommand, config: &TimeConfig) -> TimeControlCommand {
    if config.network_authoritative {
        command
    } else {
        command.with_scope(CommandScope::Global)
    }
}

/// Clamp `target` into `[anchor - horizon, anchor]`, saturating at tick 0.
///
/// The horizon formula is authoritative: a far-past target from tick 200
/// with the default horizon of 182 resolves to 18, not 0.
pub fn clamp_into_window(target: u64, anchor: u64, horizon: u64) -> u64 {
    target.clamp(anchor.saturating_sub(horizon), anchor)
}

fn clamped_if(clamped: bool) -> CommandOutcome {
    if clamped {
        CommandOutcome::Clamped
    } else {
        CommandOutcome::Applied
    }
}
