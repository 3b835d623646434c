//! Embedded point-of-interest store with hierarchical cell indexing and range-scan region queries.
//!
//! ```rust
//! use cellstore::{PoiStore, Room};
//!
//! let dir = tempfile::tempdir()?;
//! let store = PoiStore::open(dir.path().join("poi.redb"))?;
//!
//! store.store(Room::new(1, "EUR", "Rotterdam", 51.9244, 4.4777), 51.9244, 4.4777)?;
//! let matches = store.find_in_radius(51.9244, 4.4777, 1000.0)?;
//! assert_eq!(matches.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bucket;
pub mod cache;
pub mod cell;
pub mod error;
pub mod geojson;
pub mod region;
pub mod store;
pub mod types;

pub use error::{CellStoreError, Result};
pub use store::PoiStore;

pub use s2::cellid::CellID;

pub use bucket::CellBucket;
pub use cache::BucketCache;

pub use region::{Covering, Region};

pub use types::{Config, CovererParams, Room, StoreStats};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{CellID, CellStoreError, PoiStore, Result, Room};

    pub use crate::{Config, CovererParams, Covering, Region};
}
