//! World snapshot store: capture, storage, and rewind playback.
//!
//! Capture is read-only on the world. Failures never leave this module as
//! anything but a skipped capture and a log line.

pub mod codec;
pub mod playback;
pub mod store;

use hecs::World;
use tracing::{trace, warn};

use tempo_core::clock::TimeView;
use tempo_core::config::TimeConfig;

pub use store::{CaptureOutcome, SnapshotFrame, SnapshotStore, WorldSnapshotMeta};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot payload truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("snapshot slot {0} does not exist")]
    UnknownSlot(usize),

    #[error("snapshot slot {0} holds no snapshot")]
    EmptySlot(usize),

    #[error("snapshot slot {slot} checksum mismatch: expected {expected:#018x}, got {actual:#018x}")]
    ChecksumMismatch { slot: usize, expected: u64, actual: u64 },

    #[error("snapshot decompression failed: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    #[error("snapshot I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Capture a snapshot when the interval has elapsed.
///
/// Only runs in Record, with snapshots enabled, outside network-authoritative
/// sessions. Returns the store's outcome when a capture was attempted.
pub fn run(
    store: &mut SnapshotStore,
    world: &World,
    view: &TimeView,
    config: &TimeConfig,
) -> Option<CaptureOutcome> {
    if !view.is_recording() || !config.snapshots_enabled || config.network_authoritative {
        return None;
    }
    if !store.should_capture(view.tick) {
        return None;
    }

    let records = codec::collect(world);
    match store.capture(view.tick, &records) {
        Ok(outcome) => {
            trace!(
                tick = view.tick,
                entities = records.len(),
                used = store.used_bytes(),
                ?outcome,
                "snapshot captured"
            );
            Some(outcome)
        }
        Err(err) => {
            warn!(tick = view.tick, %err, "snapshot capture skipped");
            None
        }
    }
}
