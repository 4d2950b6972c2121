//! GeoJSON interchange for point sets and visible items.
//!
//! Input features must have Point geometry. The feature id (string or number)
//! becomes the point id, falling back to the feature's position; a boolean
//! `cluster` property of `false` marks the point as non-clusterable; the
//! properties object is kept as the JSON-encoded payload.
//!
//! Output clusters carry the conventional `cluster`, `cluster_id`,
//! `point_count` and `point_count_abbreviated` properties.

use crate::error::{ClusterError, Result};
use crate::item::{Point, VisibleItem};
use bytes::Bytes;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

/// Parses a FeatureCollection (or a single Feature) of points.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geojson::points_from_geojson;
///
/// let text = r#"{
///   "type": "FeatureCollection",
///   "features": [
///     {"type": "Feature", "id": "nyc",
///      "geometry": {"type": "Point", "coordinates": [-74.006, 40.7128]},
///      "properties": {"name": "New York"}},
///     {"type": "Feature",
///      "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
///      "properties": {"cluster": false}}
///   ]
/// }"#;
/// let points = points_from_geojson(text).unwrap();
/// assert_eq!(points[0].id, "nyc");
/// assert_eq!(points[1].id, "1");
/// assert!(!points[1].clusterable);
/// ```
pub fn points_from_geojson(text: &str) -> Result<Vec<Point>> {
    let parsed: GeoJson = text
        .parse()
        .map_err(|e| ClusterError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    let features = match parsed {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(ClusterError::InvalidInput(
                "Expected a Feature or FeatureCollection, got a bare geometry".to_string(),
            ));
        }
    };

    features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| point_from_feature(idx, feature))
        .collect()
}

fn point_from_feature(idx: usize, feature: Feature) -> Result<Point> {
    let coords = match feature.geometry.map(|g| g.value) {
        Some(Value::Point(coords)) => coords,
        Some(_) => {
            return Err(ClusterError::InvalidInput(format!(
                "Feature {}: geometry is not a Point",
                idx
            )));
        }
        None => {
            return Err(ClusterError::InvalidInput(format!(
                "Feature {}: missing geometry",
                idx
            )));
        }
    };

    if coords.len() < 2 {
        return Err(ClusterError::InvalidInput(format!(
            "Feature {}: Point must have at least 2 coordinates",
            idx
        )));
    }

    let id = match feature.id {
        Some(Id::String(id)) => id,
        Some(Id::Number(n)) => n.to_string(),
        None => idx.to_string(),
    };

    let clusterable = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("cluster"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(true);

    let payload = match feature.properties {
        Some(props) => Bytes::from(serde_json::to_vec(&props)?),
        None => Bytes::new(),
    };

    Ok(Point::new(id, coords[0], coords[1], payload).with_clusterable(clusterable))
}

/// Converts a visible set into a FeatureCollection.
///
/// Point payloads that hold a JSON object are restored as the feature's
/// properties; other payloads are left out.
pub fn to_feature_collection(items: &[VisibleItem]) -> FeatureCollection {
    let features = items.iter().map(item_to_feature).collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serializes a visible set as a GeoJSON string.
pub fn to_geojson_string(items: &[VisibleItem]) -> Result<String> {
    Ok(serde_json::to_string(&to_feature_collection(items))?)
}

fn item_to_feature(item: &VisibleItem) -> Feature {
    let geometry = Geometry::new(Value::Point(vec![item.longitude(), item.latitude()]));

    let (id, properties) = match item {
        VisibleItem::Point(point) => (
            Id::String(point.id.clone()),
            serde_json::from_slice::<JsonObject>(&point.payload).ok(),
        ),
        VisibleItem::Cluster(cluster) => {
            let mut props = JsonObject::new();
            props.insert("cluster".to_string(), json!(true));
            props.insert("cluster_id".to_string(), json!(cluster.id));
            props.insert("point_count".to_string(), json!(cluster.point_count));
            props.insert(
                "point_count_abbreviated".to_string(),
                json!(cluster.abbreviated_count()),
            );
            (Id::Number(cluster.id.into()), Some(props))
        }
    };

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(id),
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Cluster;

    #[test]
    fn test_single_feature_and_numeric_id() {
        let text = r#"{"type": "Feature", "id": 42,
            "geometry": {"type": "Point", "coordinates": [1.5, 2.5]},
            "properties": null}"#;
        let points = points_from_geojson(text).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "42");
        assert_eq!((points[0].longitude, points[0].latitude), (1.5, 2.5));
        assert!(points[0].payload.is_empty());
        assert!(points[0].clusterable);
    }

    #[test]
    fn test_non_point_geometry_is_rejected() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}]}"#;
        assert!(matches!(
            points_from_geojson(text),
            Err(ClusterError::InvalidInput(_))
        ));
        assert!(points_from_geojson("not json").is_err());
        assert!(points_from_geojson(r#"{"type": "Point", "coordinates": [0, 0]}"#).is_err());
    }

    #[test]
    fn test_payload_roundtrip_to_properties() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "a", "properties": {"name": "A"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}]}"#;
        let points = points_from_geojson(text).unwrap();
        let items: Vec<VisibleItem> = points.into_iter().map(VisibleItem::Point).collect();

        let collection = to_feature_collection(&items);
        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props.get("name"), Some(&json!("A")));
    }

    #[test]
    fn test_cluster_properties() {
        let items = vec![VisibleItem::Cluster(Cluster {
            id: 77,
            longitude: 10.0,
            latitude: 20.0,
            point_count: 12_345,
            representative: Bytes::new(),
        })];
        let text = to_geojson_string(&items).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let props = &value["features"][0]["properties"];

        assert_eq!(props["cluster"], json!(true));
        assert_eq!(props["cluster_id"], json!(77));
        assert_eq!(props["point_count"], json!(12_345));
        assert_eq!(props["point_count_abbreviated"], json!("12k"));
        assert_eq!(value["features"][0]["id"], json!(77));
    }
}
