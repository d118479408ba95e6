//! Applies stored snapshots to the world while rewinding.
//!
//! Present state is encoded as a resume anchor when a rewind starts and
//! written back on return to Record, so a round trip is lossless.

use hecs::World;
use tracing::{debug, warn};

use tempo_core::types::Transform;

use super::codec::{self, EntityRecord};
use super::store::SnapshotStore;

#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    /// Encoded transforms of the tick the rewind was entered from.
    anchor: Option<Vec<u8>>,
    /// Tick of the snapshot currently applied to the world.
    applied_tick: Option<u64>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn applied_tick(&self) -> Option<u64> {
        self.applied_tick
    }

    /// Remember present state before playback starts overwriting it.
    pub fn capture_anchor(&mut self, world: &World) {
        match codec::encode(&codec::collect(world)) {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "rewind anchor captured");
                self.anchor = Some(bytes);
            }
            Err(err) => warn!(%err, "rewind anchor not captured"),
        }
        self.applied_tick = None;
    }

    /// Show the newest snapshot at or before `tick`. No-op when it is
    /// already applied or nothing that old is retained.
    pub fn sync(&mut self, store: &SnapshotStore, world: &mut World, tick: u64) {
        let Some(slot) = store.latest_at_or_before(tick) else {
            return;
        };
        let snapshot_tick = store.slot(slot).map(|meta| meta.tick);
        if snapshot_tick == self.applied_tick {
            return;
        }

        match store.read(slot) {
            Ok(frame) => {
                let applied = apply_records(world, &frame.records);
                self.applied_tick = Some(frame.tick);
                debug!(tick, snapshot = frame.tick, applied, "snapshot applied");
            }
            Err(err) => warn!(slot, tick, %err, "snapshot unreadable, playback frame skipped"),
        }
    }

    /// Write the anchor back and forget it.
    pub fn restore_anchor(&mut self, world: &mut World) {
        self.applied_tick = None;
        let Some(bytes) = self.anchor.take() else {
            return;
        };
        match codec::decode(&bytes) {
            Ok(records) => {
                let applied = apply_records(world, &records);
                debug!(applied, "rewind anchor restored");
            }
            Err(err) => warn!(%err, "rewind anchor unreadable"),
        }
    }
}

/// Overwrite transforms of entities that still exist. Returns how many were written.
pub fn apply_records(world: &mut World, records: &[EntityRecord]) -> usize {
    let mut applied = 0;
    for record in records {
        let Some(entity) = record.entity() else {
            continue;
        };
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            *transform = record.transform;
            applied += 1;
        }
    }
    applied
}
