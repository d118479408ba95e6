//! Flat binary layout of a world snapshot.
//!
//! Little-endian: a `u32` entity count, then one fixed-size record per
//! entity (index, generation, position, rotation, scale). Records are
//! sorted by entity id so identical worlds encode to identical bytes.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Quat, Vec3};
use hecs::{Entity, World};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use xxhash_rust::xxh3::xxh3_64;

use tempo_core::components::{Rewindable, SnapshotInclude};
use tempo_core::constants::{SNAPSHOT_HEADER_BYTES, SNAPSHOT_RECORD_BYTES};
use tempo_core::enums::SnapshotCompression;
use tempo_core::types::Transform;

use super::SnapshotError;

/// One captured entity: identity plus transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    pub index: u32,
    pub generation: u32,
    pub transform: Transform,
}

impl EntityRecord {
    pub fn from_entity(entity: Entity, transform: Transform) -> Self {
        let bits = entity.to_bits().get();
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
            transform,
        }
    }

    /// The handle this record was captured from. `None` for a corrupt identity.
    pub fn entity(&self) -> Option<Entity> {
        Entity::from_bits((u64::from(self.generation) << 32) | u64::from(self.index))
    }

    fn sort_key(&self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

/// Gather every snapshot-eligible entity, sorted by id.
pub fn collect(world: &World) -> Vec<EntityRecord> {
    let mut records: Vec<EntityRecord> = world
        .query::<(&Transform, Option<&Rewindable>, Option<&SnapshotInclude>)>()
        .iter()
        .filter(|(_, (_, rewindable, include))| rewindable.is_some() || include.is_some())
        .map(|(entity, (transform, _, _))| EntityRecord::from_entity(entity, *transform))
        .collect();
    records.sort_by_key(EntityRecord::sort_key);
    records
}

/// Encoded size of `count` records.
pub fn encoded_len(count: usize) -> usize {
    SNAPSHOT_HEADER_BYTES + count * SNAPSHOT_RECORD_BYTES
}

pub fn encode(records: &[EntityRecord]) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::with_capacity(encoded_len(records.len()));
    buf.write_u32::<LittleEndian>(records.len() as u32)?;
    for record in records {
        buf.write_u32::<LittleEndian>(record.index)?;
        buf.write_u32::<LittleEndian>(record.generation)?;
        write_vec3(&mut buf, record.transform.position)?;
        let rotation = record.transform.rotation;
        for component in [rotation.x, rotation.y, rotation.z, rotation.w] {
            buf.write_f32::<LittleEndian>(component)?;
        }
        write_vec3(&mut buf, record.transform.scale)?;
    }
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<EntityRecord>, SnapshotError> {
    if bytes.len() < SNAPSHOT_HEADER_BYTES {
        return Err(SnapshotError::Truncated {
            expected: SNAPSHOT_HEADER_BYTES,
            actual: bytes.len(),
        });
    }

    let mut reader = Cursor::new(bytes);
    let count = reader.read_u32::<LittleEndian>()? as usize;
    let expected = encoded_len(count);
    if bytes.len() < expected {
        return Err(SnapshotError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let index = reader.read_u32::<LittleEndian>()?;
        let generation = reader.read_u32::<LittleEndian>()?;
        let position = read_vec3(&mut reader)?;
        let rotation = Quat::from_xyzw(
            reader.read_f32::<LittleEndian>()?,
            reader.read_f32::<LittleEndian>()?,
            reader.read_f32::<LittleEndian>()?,
            reader.read_f32::<LittleEndian>()?,
        );
        let scale = read_vec3(&mut reader)?;
        records.push(EntityRecord {
            index,
            generation,
            transform: Transform::new(position, rotation, scale),
        });
    }
    Ok(records)
}

/// Bytes as stored in the arena for the given compression.
pub fn compress(raw: Vec<u8>, compression: SnapshotCompression) -> Vec<u8> {
    match compression {
        SnapshotCompression::None => raw,
        SnapshotCompression::Lz4 => compress_prepend_size(&raw),
    }
}

pub fn decompress(stored: &[u8], compression: SnapshotCompression) -> Result<Vec<u8>, SnapshotError> {
    match compression {
        SnapshotCompression::None => Ok(stored.to_vec()),
        SnapshotCompression::Lz4 => Ok(decompress_size_prepended(stored)?),
    }
}

pub fn checksum(stored: &[u8]) -> u64 {
    xxh3_64(stored)
}

fn write_vec3(buf: &mut Vec<u8>, v: Vec3) -> std::io::Result<()> {
    buf.write_f32::<LittleEndian>(v.x)?;
    buf.write_f32::<LittleEndian>(v.y)?;
    buf.write_f32::<LittleEndian>(v.z)
}

fn read_vec3<R: Read>(reader: &mut R) -> std::io::Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ))
}
