//! Engine configuration.
//!
//! `TimeConfig` is supplied by the host's config loader, usually as JSON.
//! Missing fields fall back to the defaults in `constants`.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::SnapshotCompression;

/// Errors raised while loading or validating a `TimeConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse time config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixed_delta must be a positive finite number of seconds, got {0}")]
    InvalidFixedDelta(f32),

    #[error("speed range is invalid: min {min}, default {default}, max {max}")]
    InvalidSpeedRange { min: f32, default: f32, max: f32 },

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Tunables for the time-control engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Seconds per tick.
    pub fixed_delta: f32,
    pub default_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Default seek pace during rewind.
    pub playback_ticks_per_second: f32,
    pub snapshot_interval_ticks: u64,
    pub snapshot_memory_budget_bytes: usize,
    pub max_snapshots: usize,
    /// Runtime scalar on the rewind window.
    pub rewind_window_multiplier: f32,
    pub rewind_window_secs: f32,
    pub rewind_safety_margin_ticks: u64,
    pub catch_up_ticks_per_frame: u64,
    pub command_log_capacity: usize,
    pub snapshot_compression: SnapshotCompression,
    /// Affectable entity count at which membership tests run on the rayon pool.
    pub parallel_membership_threshold: usize,
    pub snapshots_enabled: bool,
    /// Reserved for networked sessions. Disables snapshots and player-scoped commands.
    pub network_authoritative: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_delta: DEFAULT_FIXED_DELTA,
            default_speed: DEFAULT_SPEED,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            playback_ticks_per_second: DEFAULT_PLAYBACK_TICKS_PER_SECOND,
            snapshot_interval_ticks: SNAPSHOT_INTERVAL_TICKS,
            snapshot_memory_budget_bytes: SNAPSHOT_MEMORY_BUDGET_BYTES,
            max_snapshots: MAX_SNAPSHOTS,
            rewind_window_multiplier: 1.0,
            rewind_window_secs: REWIND_WINDOW_SECS,
            rewind_safety_margin_ticks: REWIND_SAFETY_MARGIN_TICKS,
            catch_up_ticks_per_frame: CATCH_UP_TICKS_PER_FRAME,
            command_log_capacity: COMMAND_LOG_CAPACITY,
            snapshot_compression: SnapshotCompression::None,
            parallel_membership_threshold: PARALLEL_MEMBERSHIP_THRESHOLD,
            snapshots_enabled: true,
            network_authoritative: false,
        }
    }
}

impl TimeConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_delta.is_finite() && self.fixed_delta > 0.0) {
            return Err(ConfigError::InvalidFixedDelta(self.fixed_delta));
        }
        let speeds_ok = self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed > 0.0
            && self.min_speed <= self.max_speed
            && (self.min_speed..=self.max_speed).contains(&self.default_speed);
        if !speeds_ok {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.min_speed,
                default: self.default_speed,
                max: self.max_speed,
            });
        }
        if !(self.playback_ticks_per_second.is_finite() && self.playback_ticks_per_second > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "playback_ticks_per_second",
                value: self.playback_ticks_per_second,
            });
        }
        if !(self.rewind_window_secs.is_finite() && self.rewind_window_secs > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "rewind_window_secs",
                value: self.rewind_window_secs,
            });
        }
        if !(self.rewind_window_multiplier.is_finite() && self.rewind_window_multiplier >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "rewind_window_multiplier",
                value: self.rewind_window_multiplier,
            });
        }
        let counts = [
            ("snapshot_interval_ticks", self.snapshot_interval_ticks as usize),
            ("max_snapshots", self.max_snapshots),
            ("catch_up_ticks_per_frame", self.catch_up_ticks_per_frame as usize),
            ("command_log_capacity", self.command_log_capacity),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigError::ZeroCount { field });
            }
        }
        Ok(())
    }

    /// Ticks per second implied by `fixed_delta`, rounded.
    pub fn tick_rate(&self) -> f32 {
        (1.0 / self.fixed_delta).round()
    }

    /// Maximum number of ticks a rewind may reach into the past.
    ///
    /// `tick_rate * window_secs * multiplier`, at least one tick, plus the safety margin.
    pub fn rewind_horizon(&self) -> u64 {
        let window = (self.tick_rate() * self.rewind_window_secs * self.rewind_window_multiplier)
            .round()
            .max(0.0) as u64;
        window.max(1) + self.rewind_safety_margin_ticks
    }

    /// Clamp a requested speed into the configured range. NaN maps to the default.
    pub fn clamp_speed(&self, requested: f32) -> f32 {
        if requested.is_nan() {
            return self.default_speed;
        }
        requested.clamp(self.min_speed, self.max_speed)
    }
}
