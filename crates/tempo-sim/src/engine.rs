//! Time engine: the single driver of every time record.
//!
//! `TimeEngine` owns the hecs ECS world, the tick clock, the rewind state,
//! the bubble registry, and the snapshot ring. Each `tick` runs the systems
//! in a fixed order and returns `TimeDiagnostics`. Completely headless.

use std::collections::VecDeque;

use hecs::{Entity, World};
use tracing::trace;

use tempo_bubble::delta::effective_delta;
use tempo_core::bubble::CreateBubbleRequest;
use tempo_core::clock::{RewindState, TickClock, TimeView};
use tempo_core::commands::TimeControlCommand;
use tempo_core::components::{InStasis, TimeBubbleMembership};
use tempo_core::config::{ConfigError, TimeConfig};
use tempo_core::enums::RewindMode;
use tempo_core::state::TimeDiagnostics;
use tempo_core::types::BubbleId;

use crate::systems;
use crate::systems::bubbles::BubbleManager;
use crate::systems::command_processor::CommandLog;
use crate::systems::rewind::Transition;
use crate::systems::snapshot::playback::PlaybackState;
use crate::systems::snapshot::SnapshotStore;

/// The time engine. Owns the ECS world and all time state.
pub struct TimeEngine {
    config: TimeConfig,
    world: World,
    clock: TickClock,
    rewind: RewindState,
    bubbles: BubbleManager,
    snapshots: SnapshotStore,
    playback: PlaybackState,
    command_queue: VecDeque<TimeControlCommand>,
    command_log: CommandLog,
    diagnostics: TimeDiagnostics,
}

impl TimeEngine {
    /// Create an engine with an empty world. Fails only on invalid configuration.
    pub fn new(config: TimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = TickClock::new(config.fixed_delta, config.default_speed);
        let rewind = RewindState::new(config.playback_ticks_per_second);
        Ok(Self {
            world: World::new(),
            clock,
            rewind,
            bubbles: BubbleManager::new(config.parallel_membership_threshold),
            snapshots: SnapshotStore::from_config(&config),
            playback: PlaybackState::new(),
            command_queue: VecDeque::new(),
            command_log: CommandLog::new(config.command_log_capacity),
            diagnostics: TimeDiagnostics::default(),
            config,
        })
    }

    /// Queue a time-control command for the next tick boundary.
    pub fn queue_command(&mut self, command: TimeControlCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = TimeControlCommand>) {
        self.command_queue.extend(commands);
    }

    /// Request a bubble. The id is usable at once; the bubble applies from the next tick.
    pub fn create_bubble(&mut self, request: CreateBubbleRequest) -> BubbleId {
        self.bubbles.create_bubble(request)
    }

    /// Request removal of a bubble on the next tick.
    pub fn remove_bubble(&mut self, bubble_id: BubbleId) {
        self.bubbles.remove_bubble(bubble_id);
    }

    /// Advance one tick, driven by `frame_dt` seconds of wall-clock time.
    pub fn tick(&mut self, frame_dt: f32) -> TimeDiagnostics {
        self.tick_with(frame_dt, |_, _| {})
    }

    /// Advance one tick, running `gameplay` in the gameplay slot after the
    /// built-in consumers. `gameplay` sees the same view as every other system.
    pub fn tick_with<F>(&mut self, frame_dt: f32, mut gameplay: F) -> TimeDiagnostics
    where
        F: FnMut(&mut World, &TimeView),
    {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        let mode_before = self.rewind.mode();

        systems::command_processor::run(
            &mut self.command_queue,
            &mut self.command_log,
            &mut self.clock,
            &mut self.rewind,
            &mut self.world,
            &self.config,
        );
        if mode_before == RewindMode::Record && !self.rewind.is_recording() {
            self.playback.capture_anchor(&self.world);
        }

        let transition = systems::rewind::advance(
            &mut self.rewind,
            &mut self.clock,
            &mut self.world,
            frame_dt,
            self.config.catch_up_ticks_per_frame,
        );
        let returned = transition == Transition::ReturnedToRecord
            || (mode_before != RewindMode::Record && self.rewind.is_recording());
        systems::clock::sync(&mut self.clock, &self.rewind, returned);

        if self.rewind.is_recording() {
            if self.playback.has_anchor() {
                self.playback.restore_anchor(&mut self.world);
            }
        } else {
            self.playback
                .sync(&self.snapshots, &mut self.world, self.clock.tick);
        }

        self.bubbles.run(&mut self.world, self.clock.tick);

        let view = self.view();
        systems::movement::run(&mut self.world, &view);
        systems::movement::advance_local_clocks(&mut self.world, &view);
        gameplay(&mut self.world, &view);

        systems::snapshot::run(&mut self.snapshots, &self.world, &view, &self.config);

        self.diagnostics = systems::diagnostics::build(
            &self.clock,
            &self.rewind,
            &self.bubbles,
            &self.snapshots,
            &self.command_log,
        );
        trace!(tick = view.tick, mode = ?view.mode, delta = view.delta, "tick complete");
        self.diagnostics
    }

    /// The (mode, tick) view every system reads this tick.
    pub fn view(&self) -> TimeView {
        self.clock.view(self.rewind.mode())
    }

    pub fn config(&self) -> &TimeConfig {
        &self.config
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn rewind_state(&self) -> &RewindState {
        &self.rewind
    }

    pub fn mode(&self) -> RewindMode {
        self.rewind.mode()
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick
    }

    pub fn bubbles(&self) -> &BubbleManager {
        &self.bubbles
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.command_log
    }

    /// Diagnostics produced by the last tick.
    pub fn diagnostics(&self) -> TimeDiagnostics {
        self.diagnostics
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for spawning and despawning between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Delta `entity` would receive under the current view. `None` if it does not exist.
    pub fn effective_delta_for(&self, entity: Entity) -> Option<f32> {
        if !self.world.contains(entity) {
            return None;
        }
        let membership = self
            .world
            .get::<&TimeBubbleMembership>(entity)
            .ok()
            .map(|membership| *membership);
        let in_stasis = self.world.get::<&InStasis>(entity).is_ok();
        Some(effective_delta(&self.view(), membership.as_ref(), in_stasis))
    }

    #[cfg(test)]
    pub(crate) fn snapshots_mut(&mut self) -> &mut SnapshotStore {
        &mut self.snapshots
    }
}
