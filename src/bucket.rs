//! The stored unit: one cell's rooms, bincode-encoded.

use rustc_hash::FxHashMap;
use s2::cellid::CellID;
use serde::{Deserialize, Serialize};

use crate::error::{CellStoreError, Result};
use crate::types::Room;

/// All rooms assigned to one leaf cell, tagged with the owning cell id.
///
/// A bucket is created on the first write into its cell and rewritten whole
/// on every update. Buckets are never deleted, even when a relocation leaves
/// them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellBucket {
    /// Raw identifier of the owning leaf cell.
    pub cell: u64,
    /// Rooms keyed by room id.
    pub rooms: FxHashMap<u64, Room>,
}

impl CellBucket {
    /// Empty bucket owned by `cell`.
    pub fn new(cell: CellID) -> Self {
        Self {
            cell: cell.0,
            rooms: FxHashMap::default(),
        }
    }

    /// The owning cell.
    pub fn cell_id(&self) -> CellID {
        CellID(self.cell)
    }

    /// Inserts or overwrites a room keyed by its id.
    pub fn insert(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    /// Removes a room by id, returning it when present.
    pub fn remove(&mut self, id: u64) -> Option<Room> {
        self.rooms.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Encodes a bucket for storage.
pub fn encode_bucket(bucket: &CellBucket) -> Result<Vec<u8>> {
    bincode::serialize(bucket).map_err(|e| {
        CellStoreError::Serialization(format!(
            "failed to encode bucket for cell {}: {}",
            bucket.cell, e
        ))
    })
}

/// Decodes a stored bucket payload.
pub fn decode_bucket(bytes: &[u8]) -> Result<CellBucket> {
    bincode::deserialize(bytes)
        .map_err(|e| CellStoreError::CorruptPayload(format!("failed to decode bucket: {}", e)))
}
