use crate::bbox::BoundingBox;
use serde::{Deserialize, Serialize};

/// The visible area of a map: a center coordinate plus half-spans.
///
/// The deltas are the distance from the center to each edge, so the region
/// covers `center_lon ± lon_delta` by `center_lat ± lat_delta`.
///
/// # Examples
///
/// ```
/// use geocluster_types::region::Region;
///
/// let region = Region::new(0.0, 0.0, 10.0, 10.0);
/// assert_eq!(region.bounding_box().to_array(), [-10.0, -10.0, 10.0, 10.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center_lon: f64,
    pub center_lat: f64,
    pub lon_delta: f64,
    pub lat_delta: f64,
}

impl Region {
    pub const fn new(center_lon: f64, center_lat: f64, lon_delta: f64, lat_delta: f64) -> Self {
        Self {
            center_lon,
            center_lat,
            lon_delta,
            lat_delta,
        }
    }

    /// `[lon - lon_delta, lat - lat_delta, lon + lon_delta, lat + lat_delta]`.
    ///
    /// Delta signs are not checked here.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.center_lon - self.lon_delta,
            self.center_lat - self.lat_delta,
            self.center_lon + self.lon_delta,
            self.center_lat + self.lat_delta,
        )
    }

    /// True when both deltas are finite and strictly positive.
    pub fn has_positive_extent(&self) -> bool {
        self.lon_delta.is_finite()
            && self.lat_delta.is_finite()
            && self.lon_delta > 0.0
            && self.lat_delta > 0.0
    }
}
