//! Region, bounding box and zoom-level math in the slippy-map scheme.
//!
//! Projection helpers map longitude/latitude into normalized Web-Mercator
//! space, where the whole world is the unit square `[0, 1] x [0, 1]` with `y`
//! growing southwards. A zoom level `z` renders that square as
//! `TILE_SIZE * 2^z` pixels.

use crate::compute::validation::{validate_bbox, validate_region, validate_viewport};
use crate::error::Result;
use geocluster_types::bbox::BoundingBox;
use geocluster_types::region::Region;
use geocluster_types::viewport::Viewport;
use std::f64::consts::PI;

/// Pixel size of one slippy-map tile.
pub const TILE_SIZE: f64 = 256.0;

/// Highest zoom level the math and the index will produce.
pub const MAX_SUPPORTED_ZOOM: u32 = 20;

/// Longitude span at or above which a region is treated as a world view.
pub const WORLD_VIEW_LON_DELTA: f64 = 40.0;

/// Latitude limit of the Web-Mercator projection.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Longitude to normalized x.
#[inline]
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude to normalized y, clamped to `[0, 1]`.
#[inline]
pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Normalized x back to longitude.
#[inline]
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Normalized y back to latitude.
#[inline]
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Bounding box of a region: `[lon - dLon, lat - dLat, lon + dLon, lat + dLat]`.
///
/// No validation is done; callers pass positive deltas.
pub fn bounding_box_of(region: &Region) -> BoundingBox {
    region.bounding_box()
}

/// Integer zoom at which `bbox` fills `viewport`, floored and clamped to
/// `[0, MAX_SUPPORTED_ZOOM]`.
///
/// Latitudes are clamped to the Mercator limit before projecting. An axis
/// that collapses after clamping (a box entirely beyond the limit) does not
/// constrain the zoom. Longitudes are not clamped to the world extent, so a
/// box wider than 360 degrees measures wider than one zoom-0 tile.
///
/// # Examples
///
/// ```
/// use geocluster::compute::geomath::zoom_level_of;
/// use geocluster_types::bbox::BoundingBox;
/// use geocluster_types::viewport::Viewport;
///
/// // The whole world in a single 256px tile is zoom 0.
/// let zoom = zoom_level_of(&BoundingBox::world(), Viewport::new(256, 256)).unwrap();
/// assert_eq!(zoom, 0);
/// ```
pub fn zoom_level_of(bbox: &BoundingBox, viewport: Viewport) -> Result<u32> {
    validate_bbox(bbox)?;
    validate_viewport(&viewport)?;

    let width = (lng_x(bbox.east) - lng_x(bbox.west)) * TILE_SIZE;
    let north = bbox.north.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let south = bbox.south.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let height = (lat_y(south) - lat_y(north)) * TILE_SIZE;

    // log2 of the scale that makes each axis fit; a zero span yields +inf.
    let fit_x = (f64::from(viewport.width) / width).log2();
    let fit_y = (f64::from(viewport.height) / height).log2();
    let zoom = fit_x.min(fit_y).floor();

    Ok(zoom.clamp(0.0, f64::from(MAX_SUPPORTED_ZOOM)) as u32)
}

/// Zoom for a whole region, applying the world-view rule: a longitude delta
/// of `WORLD_VIEW_LON_DELTA` or more is zoom 0 without any viewport math.
pub fn zoom_for_region(region: &Region, viewport: Viewport) -> Result<u32> {
    validate_region(region)?;
    if region.lon_delta >= WORLD_VIEW_LON_DELTA {
        return Ok(0);
    }
    zoom_level_of(&bounding_box_of(region), viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_projection_roundtrip_center() {
        assert!(approx(lng_x(0.0), 0.5));
        assert!(approx(lat_y(0.0), 0.5));
        assert!(approx(x_lng(lng_x(-74.006)), -74.006));
        assert!(approx(y_lat(lat_y(40.7128)), 40.7128));
    }

    #[test]
    fn test_lat_y_clamps_at_poles() {
        assert_eq!(lat_y(90.0), 0.0);
        assert_eq!(lat_y(-90.0), 1.0);
    }

    #[test]
    fn test_bounding_box_of() {
        let bbox = bounding_box_of(&Region::new(10.0, 20.0, 2.0, 1.0));
        assert_eq!(bbox.to_array(), [8.0, 19.0, 12.0, 21.0]);
    }

    #[test]
    fn test_zoom_level_world_in_one_tile() {
        assert_eq!(
            zoom_level_of(&BoundingBox::world(), Viewport::new(256, 256)).unwrap(),
            0
        );
        // Twice the pixels in both directions fits one more level.
        assert_eq!(
            zoom_level_of(&BoundingBox::new(-180.0, -85.0, 180.0, 85.0), Viewport::new(512, 512))
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_zoom_level_small_box() {
        // 360/1024 degrees of longitude is one 256px tile at zoom 10. The
        // viewport is tall so that only the width constrains the fit.
        let half = 360.0 / 1024.0 / 2.0;
        let bbox = BoundingBox::new(-half, -half, half, half);
        assert_eq!(zoom_level_of(&bbox, Viewport::new(256, 512)).unwrap(), 10);
        assert_eq!(zoom_level_of(&bbox, Viewport::new(255, 512)).unwrap(), 9);
    }

    #[test]
    fn test_zoom_level_is_clamped() {
        let bbox = BoundingBox::new(0.0, 0.0, 1e-9, 1e-9);
        assert_eq!(
            zoom_level_of(&bbox, Viewport::new(1000, 1000)).unwrap(),
            MAX_SUPPORTED_ZOOM
        );
    }

    #[test]
    fn test_zoom_level_wider_than_world() {
        // Two world widths: 512px at zoom 0.
        let bbox = BoundingBox::new(-360.0, -10.0, 360.0, 10.0);
        assert_eq!(zoom_level_of(&bbox, Viewport::new(256, 4096)).unwrap(), 0);
        assert_eq!(zoom_level_of(&bbox, Viewport::new(1024, 4096)).unwrap(), 1);
    }

    #[test]
    fn test_zoom_level_is_deterministic() {
        let bbox = BoundingBox::new(-74.1, 40.6, -73.8, 40.9);
        let a = zoom_level_of(&bbox, Viewport::new(390, 844)).unwrap();
        let b = zoom_level_of(&bbox, Viewport::new(390, 844)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zoom_level_rejects_degenerate_input() {
        let flat = BoundingBox::new(0.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            zoom_level_of(&flat, Viewport::new(100, 100)),
            Err(ClusterError::DegenerateRegion(_))
        ));
        assert!(matches!(
            zoom_level_of(&BoundingBox::world(), Viewport::new(100, 0)),
            Err(ClusterError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn test_world_view_forces_zoom_zero() {
        for viewport in [Viewport::new(1, 1), Viewport::new(4096, 4096)] {
            let region = Region::new(12.0, 30.0, 45.0, 20.0);
            assert_eq!(zoom_for_region(&region, viewport).unwrap(), 0);
        }
    }

    #[test]
    fn test_zoom_for_region_rejects_negative_delta() {
        let region = Region::new(0.0, 0.0, -1.0, 1.0);
        assert!(zoom_for_region(&region, Viewport::default()).is_err());
    }
}
