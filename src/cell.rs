//! Leaf-cell assignment and the sortable key codec.
//!
//! A coordinate pair maps onto the level-30 cell of the S2 hierarchy that
//! contains it. The 64-bit cell identifier doubles as the storage key once
//! big-endian encoded, because the numeric order of identifiers equals the
//! byte-lexicographic order of their encodings. All descendants of a cell at
//! a coarser level occupy the contiguous identifier interval
//! `[range_min, range_max]`, which is what turns a covering cell into a
//! single key range scan.

use s2::cellid::CellID;
use s2::latlng::LatLng;

use crate::error::{CellStoreError, Result};

/// Deepest subdivision level of the cell hierarchy.
pub const MAX_LEVEL: u8 = 30;

/// Width of an encoded cell key in bytes.
pub const KEY_LEN: usize = 8;

/// Checks that a latitude/longitude pair is finite and in range.
pub fn validate_lat_lng(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !lng.is_finite() {
        log::warn!("Rejecting coordinates with non-finite components");
        return Err(CellStoreError::InvalidInput(format!(
            "coordinates must be finite, got ({}, {})",
            lat, lng
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CellStoreError::InvalidInput(format!(
            "latitude {} outside [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CellStoreError::InvalidInput(format!(
            "longitude {} outside [-180, 180]",
            lng
        )));
    }
    Ok(())
}

/// Maps a coordinate pair onto the finest-level cell containing it.
///
/// Pure: the same input always yields the same cell. Out-of-range or
/// non-finite coordinates are rejected instead of panicking.
///
/// # Examples
///
/// ```rust
/// let cell = cellstore::cell::cell_id_from_lat_lng(51.9244, 4.4777).unwrap();
/// assert!(cell.is_leaf());
/// assert!(cellstore::cell::cell_id_from_lat_lng(91.0, 0.0).is_err());
/// ```
pub fn cell_id_from_lat_lng(lat: f64, lng: f64) -> Result<CellID> {
    validate_lat_lng(lat, lng)?;
    Ok(CellID::from(LatLng::from_degrees(lat, lng)))
}

/// Encodes a cell identifier as its fixed-width big-endian storage key.
pub fn encode_key(cell: CellID) -> [u8; KEY_LEN] {
    cell.0.to_be_bytes()
}

/// Decodes a storage key back into a cell identifier.
///
/// Exact round-trip of [`encode_key`]; anything but exactly 8 bytes is a
/// corrupt-payload error.
pub fn decode_key(bytes: &[u8]) -> Result<CellID> {
    let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
        CellStoreError::CorruptPayload(format!(
            "cell key must be exactly {} bytes, got {}",
            KEY_LEN,
            bytes.len()
        ))
    })?;
    Ok(CellID(u64::from_be_bytes(raw)))
}

/// Encoded scan lower bound: the key of the cell's first finest-level
/// descendant.
pub fn range_min_key(cell: CellID) -> [u8; KEY_LEN] {
    encode_key(cell.range_min())
}

/// Encoded scan upper bound: the key of the cell's last finest-level
/// descendant.
pub fn range_max_key(cell: CellID) -> [u8; KEY_LEN] {
    encode_key(cell.range_max())
}
