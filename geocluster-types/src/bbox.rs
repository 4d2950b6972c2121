use geo::Rect;
use serde::{Deserialize, Serialize};

/// A geographic extent in `[west, south, east, north]` order.
///
/// Unlike `geo::Rect`, the corners are kept exactly as given: a box whose
/// `west` is greater than its `east` describes an extent crossing the
/// antimeridian, and longitudes beyond ±180 are preserved until the index
/// wraps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum longitude
    pub west: f64,
    /// Minimum latitude
    pub south: f64,
    /// Maximum longitude
    pub east: f64,
    /// Maximum latitude
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::bbox::BoundingBox;
    ///
    /// let manhattan = BoundingBox::new(-74.0479, 40.6829, -73.9067, 40.8820);
    /// assert!(manhattan.contains(-74.0, 40.75));
    /// ```
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The whole world, `[-180, -90, 180, 90]`.
    pub const fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// The extent as a `[west, south, east, north]` array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a coordinate lies inside the box (edges inclusive).
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        longitude >= self.west
            && longitude <= self.east
            && latitude >= self.south
            && latitude <= self.north
    }

    /// Convert to a `geo::Rect`. The rect normalizes its corners, so a box
    /// crossing the antimeridian loses that meaning.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(value: [f64; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}
