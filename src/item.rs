//! Points fed into the engine and the items a query hands back.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identifier of a cluster within one index generation.
///
/// Ids encode the level node the cluster grew from, so they are only
/// meaningful against the generation that produced them.
pub type ClusterId = u64;

/// A geo-located annotation supplied by the host.
///
/// The payload is opaque to the engine; it is handed back untouched when the
/// point is visible on its own, and one member's payload is used as the
/// representative of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub payload: Bytes,
    /// Points with `clusterable == false` are never indexed and are always
    /// rendered individually.
    #[serde(default = "Point::default_clusterable")]
    pub clusterable: bool,
}

impl Point {
    /// Create a clusterable point.
    pub fn new(id: impl Into<String>, longitude: f64, latitude: f64, payload: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            longitude,
            latitude,
            payload: payload.into(),
            clusterable: true,
        }
    }

    /// Create a point that is always drawn on its own.
    pub fn standalone(
        id: impl Into<String>,
        longitude: f64,
        latitude: f64,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self::new(id, longitude, latitude, payload).with_clusterable(false)
    }

    pub fn with_clusterable(mut self, clusterable: bool) -> Self {
        self.clusterable = clusterable;
        self
    }

    pub fn coordinate(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    const fn default_clusterable() -> bool {
        true
    }
}

/// An aggregate of two or more points at one zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    /// Weighted centroid of the members, in degrees.
    pub longitude: f64,
    pub latitude: f64,
    pub point_count: u32,
    /// Payload of one member, for hosts that draw a sample marker.
    pub representative: Bytes,
}

impl Cluster {
    /// Short label for the member count: `42`, `1.3k`, `12k`.
    pub fn abbreviated_count(&self) -> String {
        abbreviate_count(self.point_count)
    }

    pub fn coordinate(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

pub(crate) fn abbreviate_count(count: u32) -> String {
    if count >= 10_000 {
        format!("{}k", (f64::from(count) / 1000.0).round())
    } else if count >= 1000 {
        format!("{}k", (f64::from(count) / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}

/// One drawable unit of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibleItem {
    /// An original point, drawn with its own marker.
    Point(Point),
    /// An aggregate badge.
    Cluster(Cluster),
}

impl VisibleItem {
    /// Number of underlying points; 1 for a bare point.
    pub fn point_count(&self) -> u32 {
        match self {
            VisibleItem::Point(_) => 1,
            VisibleItem::Cluster(cluster) => cluster.point_count,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, VisibleItem::Cluster(_))
    }

    pub fn longitude(&self) -> f64 {
        match self {
            VisibleItem::Point(point) => point.longitude,
            VisibleItem::Cluster(cluster) => cluster.longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            VisibleItem::Point(point) => point.latitude,
            VisibleItem::Cluster(cluster) => cluster.latitude,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            VisibleItem::Point(point) => Some(point),
            VisibleItem::Cluster(_) => None,
        }
    }

    pub fn as_cluster(&self) -> Option<&Cluster> {
        match self {
            VisibleItem::Point(_) => None,
            VisibleItem::Cluster(cluster) => Some(cluster),
        }
    }
}

impl From<Point> for VisibleItem {
    fn from(point: Point) -> Self {
        VisibleItem::Point(point)
    }
}

impl From<Cluster> for VisibleItem {
    fn from(cluster: Cluster) -> Self {
        VisibleItem::Cluster(cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_defaults_to_clusterable() {
        let point = Point::new("a", 1.0, 2.0, "payload");
        assert!(point.clusterable);
        assert!(!Point::standalone("b", 1.0, 2.0, Bytes::new()).clusterable);
    }

    #[test]
    fn test_bare_point_counts_as_one() {
        let item = VisibleItem::from(Point::new("a", 0.0, 0.0, Bytes::new()));
        assert_eq!(item.point_count(), 1);
        assert!(!item.is_cluster());
    }

    #[test]
    fn test_abbreviated_count() {
        assert_eq!(abbreviate_count(999), "999");
        assert_eq!(abbreviate_count(1250), "1.3k");
        assert_eq!(abbreviate_count(12_400), "12k");
    }

    #[test]
    fn test_point_deserializes_with_defaults() {
        let point: Point =
            serde_json::from_str(r#"{"id":"x","longitude":3.0,"latitude":4.0}"#).unwrap();
        assert!(point.clusterable);
        assert!(point.payload.is_empty());
    }
}
