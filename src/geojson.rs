//! GeoJSON export for query matches and cell coverings.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use s2::cell::Cell;
use s2::cellid::CellID;
use s2::latlng::LatLng;
use serde_json::{Map, Value as JsonValue};

use crate::error::{CellStoreError, Result};
use crate::types::Room;

/// Renders query matches as a GeoJSON `FeatureCollection` of points.
///
/// Coordinates follow the GeoJSON axis order `[lng, lat]`. Each feature
/// carries the room's id, currency, and address plus the token of the bucket
/// cell it was scanned from.
pub fn matches_to_feature_collection(matches: &[(CellID, Room)]) -> Result<String> {
    let features: Vec<Feature> = matches
        .iter()
        .map(|(cell, room)| room_feature(*cell, room))
        .collect();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_string(&collection)
        .map_err(|e| CellStoreError::Serialization(format!("failed to encode GeoJSON: {}", e)))
}

/// Renders a covering as a GeoJSON `FeatureCollection` of cell polygons,
/// one quadrilateral per cell.
pub fn cells_to_feature_collection(cells: &[CellID]) -> Result<String> {
    let features: Vec<Feature> = cells.iter().map(|cell| cell_feature(*cell)).collect();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_string(&collection)
        .map_err(|e| CellStoreError::Serialization(format!("failed to encode GeoJSON: {}", e)))
}

fn room_feature(cell: CellID, room: &Room) -> Feature {
    let mut properties = Map::new();
    properties.insert("id".to_string(), JsonValue::from(room.id));
    properties.insert("currency".to_string(), JsonValue::from(room.currency.clone()));
    properties.insert("address".to_string(), JsonValue::from(room.address.clone()));
    properties.insert("cell".to_string(), JsonValue::from(cell.to_token()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![room.lng, room.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn cell_feature(cell_id: CellID) -> Feature {
    let cell = Cell::from(&cell_id);
    let mut ring = Vec::with_capacity(5);
    for k in 0..4 {
        let vertex = LatLng::from(&cell.vertex(k));
        ring.push(vec![vertex.lng.deg(), vertex.lat.deg()]);
    }
    ring.push(ring[0].clone());

    let mut properties = Map::new();
    properties.insert("cell".to_string(), JsonValue::from(cell_id.to_token()));
    properties.insert("level".to_string(), JsonValue::from(cell_id.level()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::cell_id_from_lat_lng;

    #[test]
    fn test_matches_collection_contains_room_properties() {
        let cell = cell_id_from_lat_lng(51.9244, 4.4777).unwrap();
        let room = Room::new(1, "EUR", "Rotterdam", 51.9244, 4.4777);
        let json = matches_to_feature_collection(&[(cell, room)]).unwrap();

        assert!(json.contains("FeatureCollection"));
        assert!(json.contains("\"Rotterdam\""));
        assert!(json.contains("\"EUR\""));
        assert!(json.contains(&cell.to_token()));
    }

    #[test]
    fn test_matches_coordinates_are_lng_lat() {
        let cell = cell_id_from_lat_lng(51.9244, 4.4777).unwrap();
        let room = Room::new(1, "EUR", "Rotterdam", 51.9244, 4.4777);
        let json = matches_to_feature_collection(&[(cell, room)]).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let coords = &parsed["features"][0]["geometry"]["coordinates"];
        assert!((coords[0].as_f64().unwrap() - 4.4777).abs() < 1e-9);
        assert!((coords[1].as_f64().unwrap() - 51.9244).abs() < 1e-9);
    }

    #[test]
    fn test_empty_matches_produce_empty_collection() {
        let json = matches_to_feature_collection(&[]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["features"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_cells_collection_contains_closed_polygons() {
        let cell = cell_id_from_lat_lng(39.578967, 3.098145).unwrap().parent(10);
        let json = cells_to_feature_collection(&[cell]).unwrap();

        assert!(json.contains("Polygon"));
        assert!(json.contains(&cell.to_token()));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ring = &parsed["features"][0]["geometry"]["coordinates"][0];
        let ring = ring.as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }
}
