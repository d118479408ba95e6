//! Memory-bounded snapshot ring.
//!
//! Slot metadata lives in a fixed ring of `max_snapshots` entries; payloads
//! share one contiguous byte arena that never grows past the memory budget.
//! Eviction is oldest-by-tick, independent of slot position.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tempo_core::config::TimeConfig;
use tempo_core::enums::{CommandScope, SnapshotCompression};

use super::codec::{self, EntityRecord};
use super::SnapshotError;

/// Metadata for one ring slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshotMeta {
    pub tick: u64,
    pub is_valid: bool,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub entity_count: u32,
    pub compression: SnapshotCompression,
    /// xxh3-64 of the stored bytes.
    pub checksum: u64,
    pub owner_scope: CommandScope,
}

/// A decoded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFrame {
    pub tick: u64,
    pub records: Vec<EntityRecord>,
}

/// Result of one insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Payload retained in `slot`; `evicted` older slots were released to make room.
    Stored { slot: usize, evicted: usize },
    /// Payload larger than the whole budget. Nothing retained.
    Dropped { evicted: usize },
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    slots: Vec<WorldSnapshotMeta>,
    arena: Vec<u8>,
    next_snapshot_index: usize,
    memory_budget: usize,
    used_bytes: usize,
    last_capture_tick: Option<u64>,
    interval: u64,
    compression: SnapshotCompression,
}

impl SnapshotStore {
    pub fn new(
        max_snapshots: usize,
        memory_budget: usize,
        interval: u64,
        compression: SnapshotCompression,
    ) -> Self {
        Self {
            slots: vec![WorldSnapshotMeta::default(); max_snapshots.max(1)],
            arena: Vec::new(),
            next_snapshot_index: 0,
            memory_budget,
            used_bytes: 0,
            last_capture_tick: None,
            interval: interval.max(1),
            compression,
        }
    }

    pub fn from_config(config: &TimeConfig) -> Self {
        Self::new(
            config.max_snapshots,
            config.snapshot_memory_budget_bytes,
            config.snapshot_interval_ticks,
            config.snapshot_compression,
        )
    }

    /// True when at least `interval` ticks have passed since the last capture.
    pub fn should_capture(&self, tick: u64) -> bool {
        match self.last_capture_tick {
            None => true,
            Some(last) => tick >= last.saturating_add(self.interval),
        }
    }

    /// Encode `records` and store them as the snapshot of `tick`.
    pub fn capture(
        &mut self,
        tick: u64,
        records: &[EntityRecord],
    ) -> Result<CaptureOutcome, SnapshotError> {
        let raw = codec::encode(records)?;
        let stored = codec::compress(raw, self.compression);
        Ok(self.insert(tick, &stored, records.len() as u32, self.compression))
    }

    /// Store already-encoded bytes. The budget invariant holds on return.
    pub fn insert(
        &mut self,
        tick: u64,
        stored: &[u8],
        entity_count: u32,
        compression: SnapshotCompression,
    ) -> CaptureOutcome {
        self.last_capture_tick = Some(tick);
        let len = stored.len();
        let mut evicted = 0;

        let slot = self.next_snapshot_index;
        if self.slots[slot].is_valid {
            self.release(slot);
            evicted += 1;
        }

        while self.used_bytes + len > self.memory_budget {
            let Some(oldest) = self.oldest_slot() else {
                break;
            };
            self.release(oldest);
            evicted += 1;
        }

        if self.used_bytes + len > self.memory_budget {
            debug!(
                tick,
                bytes = len,
                budget = self.memory_budget,
                evicted,
                "snapshot larger than budget, dropped"
            );
            return CaptureOutcome::Dropped { evicted };
        }

        let offset = self.allocate(len);
        self.arena[offset..offset + len].copy_from_slice(stored);
        self.slots[slot] = WorldSnapshotMeta {
            tick,
            is_valid: true,
            byte_offset: offset,
            byte_length: len,
            entity_count,
            compression,
            checksum: codec::checksum(stored),
            owner_scope: CommandScope::Global,
        };
        self.used_bytes += len;
        self.next_snapshot_index = (slot + 1) % self.slots.len();

        if evicted > 0 {
            debug!(tick, slot, evicted, used = self.used_bytes, "snapshot evictions");
        }
        CaptureOutcome::Stored { slot, evicted }
    }

    /// Decode the snapshot in `slot`, verifying its checksum first.
    pub fn read(&self, slot: usize) -> Result<SnapshotFrame, SnapshotError> {
        let meta = self.slots.get(slot).ok_or(SnapshotError::UnknownSlot(slot))?;
        if !meta.is_valid {
            return Err(SnapshotError::EmptySlot(slot));
        }

        let stored = &self.arena[meta.byte_offset..meta.byte_offset + meta.byte_length];
        let actual = codec::checksum(stored);
        if actual != meta.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                slot,
                expected: meta.checksum,
                actual,
            });
        }

        let raw = codec::decompress(stored, meta.compression)?;
        Ok(SnapshotFrame {
            tick: meta.tick,
            records: codec::decode(&raw)?,
        })
    }

    /// Slot of the newest valid snapshot taken at or before `tick`.
    pub fn latest_at_or_before(&self, tick: u64) -> Option<usize> {
        self.valid_slots()
            .filter(|(_, meta)| meta.tick <= tick)
            .max_by_key(|(_, meta)| meta.tick)
            .map(|(slot, _)| slot)
    }

    /// Ticks of all retained snapshots, ascending.
    pub fn ticks(&self) -> Vec<u64> {
        let mut ticks: Vec<u64> = self.valid_slots().map(|(_, meta)| meta.tick).collect();
        ticks.sort_unstable();
        ticks
    }

    pub fn slot(&self, slot: usize) -> Option<&WorldSnapshotMeta> {
        self.slots.get(slot)
    }

    /// Number of valid snapshots.
    pub fn len(&self) -> usize {
        self.valid_slots().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn memory_budget(&self) -> usize {
        self.memory_budget
    }

    pub fn next_snapshot_index(&self) -> usize {
        self.next_snapshot_index
    }

    /// Raw arena access for corruption tests.
    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut [u8] {
        &mut self.arena
    }

    fn valid_slots(&self) -> impl Iterator<Item = (usize, &WorldSnapshotMeta)> {
        self.slots.iter().enumerate().filter(|(_, meta)| meta.is_valid)
    }

    /// Oldest valid slot by tick; ties go to the lower slot index.
    fn oldest_slot(&self) -> Option<usize> {
        self.valid_slots()
            .min_by_key(|(slot, meta)| (meta.tick, *slot))
            .map(|(slot, _)| slot)
    }

    fn release(&mut self, slot: usize) {
        let meta = &mut self.slots[slot];
        self.used_bytes -= meta.byte_length;
        debug!(slot, tick = meta.tick, bytes = meta.byte_length, "snapshot evicted");
        *meta = WorldSnapshotMeta::default();
    }

    /// Find `len` free bytes in the arena: first fit between live payloads,
    /// then the tail, compacting live payloads to the front when fragmented.
    /// Callers guarantee `used_bytes + len <= memory_budget`.
    fn allocate(&mut self, len: usize) -> usize {
        let mut live: Vec<usize> = self.valid_slots().map(|(slot, _)| slot).collect();
        live.sort_by_key(|&slot| self.slots[slot].byte_offset);

        let mut cursor = 0;
        for &slot in &live {
            let meta = &self.slots[slot];
            if meta.byte_offset - cursor >= len {
                return cursor;
            }
            cursor = meta.byte_offset + meta.byte_length;
        }

        if cursor + len > self.memory_budget {
            cursor = 0;
            for &slot in &live {
                let meta = &mut self.slots[slot];
                if meta.byte_offset != cursor {
                    self.arena
                        .copy_within(meta.byte_offset..meta.byte_offset + meta.byte_length, cursor);
                    meta.byte_offset = cursor;
                }
                cursor += meta.byte_length;
            }
            debug!(live = live.len(), used = cursor, "snapshot arena compacted");
        }

        if self.arena.len() < cursor + len {
            self.arena.resize(cursor + len, 0);
        }
        cursor
    }
}
