//! Default tuning parameters for the time-control engine.
//!
//! Every value here is only a default; `TimeConfig` carries the live values.

/// Default simulation tick rate (Hz).
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Default seconds per tick.
pub const DEFAULT_FIXED_DELTA: f32 = 1.0 / DEFAULT_TICK_RATE as f32;

// --- Speed ---

/// Default global speed multiplier.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Lowest speed multiplier `SetSpeed` will accept before clamping.
pub const MIN_SPEED: f32 = 0.1;

/// Highest speed multiplier `SetSpeed` will accept before clamping.
pub const MAX_SPEED: f32 = 8.0;

// --- Rewind ---

/// Playback pace while seeking backward (ticks per wall-clock second).
pub const DEFAULT_PLAYBACK_TICKS_PER_SECOND: f32 = 120.0;

/// Length of the rewind window in seconds before the multiplier is applied.
pub const REWIND_WINDOW_SECS: f32 = 3.0;

/// Extra ticks added on top of the rewind window.
pub const REWIND_SAFETY_MARGIN_TICKS: u64 = 2;

/// Maximum ticks the catch-up phase advances per frame.
pub const CATCH_UP_TICKS_PER_FRAME: u64 = 6;

// --- Snapshots ---

/// Ticks between world snapshot captures.
pub const SNAPSHOT_INTERVAL_TICKS: u64 = 10;

/// Memory budget for the snapshot arena (4 MiB).
pub const SNAPSHOT_MEMORY_BUDGET_BYTES: usize = 4 * 1024 * 1024;

/// Number of slots in the snapshot ring.
pub const MAX_SNAPSHOTS: usize = 256;

/// Size of the entity-count prefix of a snapshot payload.
pub const SNAPSHOT_HEADER_BYTES: usize = 4;

/// Size of one serialized entity: index + generation + position + rotation + scale.
pub const SNAPSHOT_RECORD_BYTES: usize = 4 + 4 + 3 * 4 + 4 * 4 + 3 * 4;

// --- Commands ---

/// Number of entries the command journal retains.
pub const COMMAND_LOG_CAPACITY: usize = 1024;

// --- Bubbles ---

/// Affectable entity count above which containment tests are sharded across threads.
pub const PARALLEL_MEMBERSHIP_THRESHOLD: usize = 512;
