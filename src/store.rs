//! The POI store: cell-bucketed persistence and region queries.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use geo::{Distance, Haversine, Point};
use parking_lot::Mutex;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use s2::cellid::CellID;

use crate::bucket::{self, CellBucket};
use crate::cache::BucketCache;
use crate::cell;
use crate::error::{CellStoreError, Result};
use crate::region::{Covering, Region};
use crate::types::{Config, Room, StoreStats};

/// Bucket payloads keyed by 8-byte big-endian cell id.
static BUCKETS: TableDefinition<'static, &'static [u8], Vec<u8>> = TableDefinition::new("buckets");

/// Room id to owning leaf cell, for relocation cleanup.
static ROOM_CELLS: TableDefinition<'static, u64, u64> = TableDefinition::new("room_cells");

/// Embedded point-of-interest store.
///
/// Rooms are grouped into buckets keyed by their level-30 cell, so a region
/// query becomes a handful of key range scans. Each [`store`](PoiStore::store)
/// call runs in its own write transaction and each query in its own read
/// transaction; decoded buckets are served from a bounded LRU cache.
///
/// The engine is single-writer, multiple-reader: writers serialize, readers
/// run in parallel against consistent snapshots. The store is `Send + Sync`
/// and can be shared across threads behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use cellstore::{PoiStore, Room};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let store = PoiStore::open(dir.path().join("poi.redb"))?;
///
/// let room = Room::new(1, "EUR", "Rotterdam", 51.9244, 4.4777);
/// store.store(room, 51.9244, 4.4777)?;
///
/// let matches = store.find_in_radius(51.9244, 4.4777, 1000.0)?;
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].1.id, 1);
/// # Ok(())
/// # }
/// ```
pub struct PoiStore {
    db: Database,
    cache: BucketCache,
    config: Config,
    /// Held across commit and cache refresh so refreshes apply in commit
    /// order.
    write_gate: Mutex<()>,
}

impl fmt::Debug for PoiStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoiStore")
            .field("config", &self.config)
            .field("cached_buckets", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl PoiStore {
    /// Open (or create) a store at `path` with the default configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Open (or create) a store at `path` with a custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        if let Err(e) = config.validate() {
            return Err(CellStoreError::InvalidInput(e));
        }

        let db = Database::create(path)?;

        // Create both tables up front so read transactions never observe a
        // missing table on a fresh file.
        let init = db.begin_write()?;
        {
            init.open_table(BUCKETS)?;
            init.open_table(ROOM_CELLS)?;
        }
        init.commit()?;

        let cache = BucketCache::new(config.cache_capacity);
        Ok(Self {
            db,
            cache,
            config,
            write_gate: Mutex::new(()),
        })
    }

    /// The configuration the store was opened with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert or overwrite a room, assigning it to the leaf cell of
    /// `(lat, lng)`. The room's own `lat`/`lng` fields are overwritten with
    /// the given coordinates, so a stored record always carries the position
    /// it is indexed under.
    ///
    /// Runs as one write transaction: the bucket for the target cell is
    /// loaded (or initialized), updated, and written back, and the
    /// room-to-cell index is maintained. When the room moved to a different
    /// cell, it is also removed from its previous bucket in the same
    /// transaction. The decode cache is refreshed only after the commit
    /// succeeds; a failed write leaves the cache untouched.
    pub fn store(&self, room: Room, lat: f64, lng: f64) -> Result<()> {
        let cell = cell::cell_id_from_lat_lng(lat, lng)?;
        let key = cell::encode_key(cell);
        let room = Room { lat, lng, ..room };
        let room_id = room.id;

        let _gate = self.write_gate.lock();
        let wtx = self.db.begin_write()?;
        let (bucket, relocated) = {
            let mut buckets = wtx.open_table(BUCKETS)?;
            let mut room_cells = wtx.open_table(ROOM_CELLS)?;

            let previous = room_cells.get(room_id)?.map(|g| g.value());
            let relocated = match previous {
                Some(prev) if prev != cell.0 => {
                    Self::remove_from_bucket(&mut buckets, CellID(prev), room_id)?
                }
                _ => None,
            };

            let existing = buckets.get(key.as_slice())?.map(|g| g.value());
            let mut bucket = match existing {
                Some(payload) => bucket::decode_bucket(&payload)?,
                None => CellBucket::new(cell),
            };
            bucket.insert(room);
            buckets.insert(key.as_slice(), bucket::encode_bucket(&bucket)?)?;
            room_cells.insert(room_id, cell.0)?;
            (bucket, relocated)
        };
        wtx.commit()?;

        if let Some(old) = relocated {
            log::debug!(
                "room {} relocated from cell {} to cell {}",
                room_id,
                old.cell,
                cell.0
            );
            self.cache.put(Arc::new(old));
        }
        self.cache.put(Arc::new(bucket));
        Ok(())
    }

    /// Removes `room_id` from the bucket at `cell`, writing the bucket back.
    /// Returns the rewritten bucket when the room was present. The bucket is
    /// kept even when this empties it.
    fn remove_from_bucket(
        buckets: &mut redb::Table<'_, &'static [u8], Vec<u8>>,
        cell: CellID,
        room_id: u64,
    ) -> Result<Option<CellBucket>> {
        let key = cell::encode_key(cell);
        let payload = match buckets.get(key.as_slice())? {
            Some(guard) => guard.value(),
            None => return Ok(None),
        };
        let mut bucket = bucket::decode_bucket(&payload)?;
        if bucket.remove(room_id).is_none() {
            return Ok(None);
        }
        buckets.insert(key.as_slice(), bucket::encode_bucket(&bucket)?)?;
        Ok(Some(bucket))
    }

    /// Rooms in every bucket intersecting the covering of `region`.
    ///
    /// The covering over-approximates the region: results may include rooms
    /// outside it, but no room inside the region is missed. Each room is
    /// tagged with the cell of the bucket it was scanned from. Results carry
    /// no ordering or distance guarantee; callers needing exact boundaries or
    /// nearest-first ordering post-filter, or use
    /// [`find_nearest`](PoiStore::find_nearest).
    pub fn find_region(&self, region: &Region) -> Result<Vec<(CellID, Room)>> {
        let covering = region.covering_cells(&self.config.lookup_coverer)?;
        self.scan_covering(&covering)
    }

    /// Rooms in every bucket intersecting a disc of `radius_m` meters around
    /// `(lat, lng)`. See [`find_region`](PoiStore::find_region) for the
    /// over-approximation contract.
    pub fn find_in_radius(&self, lat: f64, lng: f64, radius_m: f64) -> Result<Vec<(CellID, Room)>> {
        self.find_region(&Region::circle(lat, lng, radius_m))
    }

    /// Rooms in every bucket intersecting the rectangle spanning `corner1`
    /// and `corner2` (each `(lat, lng)`, in either order).
    pub fn find_in_rect(
        &self,
        corner1: (f64, f64),
        corner2: (f64, f64),
    ) -> Result<Vec<(CellID, Room)>> {
        self.find_region(&Region::rect(corner1.0, corner1.1, corner2.0, corner2.1))
    }

    /// Rooms from [`find_in_radius`](PoiStore::find_in_radius) sorted by
    /// geodesic distance from the center, truncated to `limit`.
    ///
    /// Candidates the covering picked up beyond the exact radius sort last,
    /// so they only surface when `limit` exceeds the number of genuine
    /// matches.
    pub fn find_nearest(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<(CellID, Room)>> {
        let mut matches = self.find_in_radius(lat, lng, radius_m)?;
        let center = Point::new(lng, lat);
        matches.sort_by(|a, b| {
            let dist_a = Haversine.distance(center, Point::new(a.1.lng, a.1.lat));
            let dist_b = Haversine.distance(center, Point::new(b.1.lng, b.1.lat));
            dist_a.partial_cmp(&dist_b).unwrap_or(Ordering::Equal)
        });
        matches.truncate(limit);
        Ok(matches)
    }

    /// Every room in the store, decoding each bucket in key order.
    ///
    /// Bulk export; bypasses the decode cache so a full scan cannot evict
    /// the hot working set.
    pub fn find_all(&self) -> Result<Vec<Room>> {
        let rtx = self.db.begin_read()?;
        let buckets = rtx.open_table(BUCKETS)?;
        let mut rooms = Vec::new();
        for entry in buckets.iter()? {
            let (_, value) = entry?;
            let decoded = bucket::decode_bucket(&value.value())?;
            rooms.extend(decoded.rooms.into_values());
        }
        Ok(rooms)
    }

    /// Covering of `region` computed with the coarse display parameters,
    /// suitable for rendering as an area overlay.
    pub fn display_covering(&self, region: &Region) -> Result<Covering> {
        region.covering_cells(&self.config.display_coverer)
    }

    /// Size counters for the store and its cache.
    pub fn stats(&self) -> Result<StoreStats> {
        let rtx = self.db.begin_read()?;
        let buckets = rtx.open_table(BUCKETS)?.len()?;
        let rooms = rtx.open_table(ROOM_CELLS)?.len()?;
        Ok(StoreStats {
            buckets,
            rooms,
            cached_buckets: self.cache.len(),
        })
    }

    /// Drop every cached bucket. Queries repopulate the cache lazily.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// One read transaction; every covering cell becomes an inclusive range
    /// scan over its descendant keys, decoding buckets cache-first.
    fn scan_covering(&self, covering: &Covering) -> Result<Vec<(CellID, Room)>> {
        let rtx = self.db.begin_read()?;
        let buckets = rtx.open_table(BUCKETS)?;
        let mut matches = Vec::new();
        for cell in covering {
            let lo = cell::range_min_key(*cell);
            let hi = cell::range_max_key(*cell);
            for entry in buckets.range(lo.as_slice()..=hi.as_slice())? {
                let (key, value) = entry?;
                let scanned = cell::decode_key(key.value())?;
                let bucket = match self.cache.get(scanned) {
                    Some(hit) => hit,
                    None => {
                        let decoded = Arc::new(bucket::decode_bucket(&value.value())?);
                        // A reader on an older snapshot may reinsert a bucket
                        // a newer commit already replaced; the next write or
                        // eviction repairs it.
                        self.cache.put(Arc::clone(&decoded));
                        decoded
                    }
                };
                for room in bucket.rooms.values() {
                    matches.push((scanned, room.clone()));
                }
            }
        }
        log::debug!(
            "scanned {} covering cells into {} matches",
            covering.len(),
            matches.len()
        );
        Ok(matches)
    }
}
