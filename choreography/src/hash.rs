use constants::procedural_shader::{EMPTY_HASH, HASH_PRIMES};
use glam::{IVec3, Vec3};

use crate::formation::FormationSlot;

pub fn cell_of(position: Vec3, cell_size: f32) -> IVec3 {
    (position / cell_size).floor().as_ivec3()
}

/// Spatial hash of a grid cell, wrapping like 32-bit shader integer math.
pub fn cell_hash(cell: IVec3) -> u32 {
    let [px, py, pz] = HASH_PRIMES;
    (cell.x.wrapping_mul(px) ^ cell.y.wrapping_mul(py) ^ cell.z.wrapping_mul(pz)) as u32
}

/// Sort key of one drone. Orders by cell hash, then by drone id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey {
    pub hash: u32,
    pub id: u32,
}

impl HashKey {
    pub fn empty(id: u32) -> Self {
        Self {
            hash: EMPTY_HASH,
            id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hash == EMPTY_HASH
    }
}

/// One key per slot, padded with empty keys up to `sort_len`.
pub fn hash_keys(slots: &[FormationSlot], cell_size: f32, sort_len: usize) -> Vec<HashKey> {
    (0..sort_len.max(slots.len()))
        .map(|i| match slots.get(i) {
            Some(slot) if slot.is_used() => HashKey {
                hash: cell_hash(cell_of(slot.position, cell_size)),
                id: i as u32,
            },
            _ => HashKey::empty(i as u32),
        })
        .collect()
}

/// Length of the longest run of equal hashes in a sorted key list.
pub fn max_cell_occupancy(sorted: &[HashKey]) -> usize {
    sorted
        .chunk_by(|a, b| a.hash == b.hash)
        .filter(|run| !run[0].is_empty())
        .map(<[HashKey]>::len)
        .max()
        .unwrap_or(0)
}

/// Position of each drone id in the sorted key list.
pub fn ranks(sorted: &[HashKey]) -> Vec<u32> {
    let mut rank = vec![0; sorted.len()];
    for (position, key) in sorted.iter().enumerate() {
        if let Some(slot) = rank.get_mut(key.id as usize) {
            *slot = position as u32;
        }
    }
    rank
}
