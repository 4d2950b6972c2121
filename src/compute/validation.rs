//! Validation for geographic coordinates and map regions.

use crate::error::{ClusterError, Result};
use geocluster_types::bbox::BoundingBox;
use geocluster_types::region::Region;
use geocluster_types::viewport::Viewport;

/// Validates a longitude/latitude pair for the point `id`.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate("nyc", -74.0060, 40.7128).is_ok());
/// assert!(validate_coordinate("bad", 200.0, 40.0).is_err());
/// assert!(validate_coordinate("nan", f64::NAN, 0.0).is_err());
/// ```
pub fn validate_coordinate(id: &str, longitude: f64, latitude: f64) -> Result<()> {
    let invalid = |reason: String| ClusterError::InvalidCoordinate {
        id: id.to_string(),
        reason,
    };

    if !longitude.is_finite() {
        return Err(invalid(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !latitude.is_finite() {
        return Err(invalid(format!("Latitude must be finite, got: {}", latitude)));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(invalid(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    Ok(())
}

/// Validates that a region has a finite center and strictly positive deltas.
pub fn validate_region(region: &Region) -> Result<()> {
    if !region.center_lon.is_finite() || !region.center_lat.is_finite() {
        return Err(ClusterError::DegenerateRegion(format!(
            "Region center must be finite, got: ({}, {})",
            region.center_lon, region.center_lat
        )));
    }

    if !region.has_positive_extent() {
        return Err(ClusterError::DegenerateRegion(format!(
            "Region deltas must be positive, got: lon_delta={}, lat_delta={}",
            region.lon_delta, region.lat_delta
        )));
    }

    Ok(())
}

/// Validates that a bounding box is finite and spans a positive area.
pub fn validate_bbox(bbox: &BoundingBox) -> Result<()> {
    if !bbox.to_array().iter().all(|v| v.is_finite()) {
        return Err(ClusterError::DegenerateRegion(format!(
            "Bounding box must be finite, got: {:?}",
            bbox.to_array()
        )));
    }

    if bbox.east <= bbox.west || bbox.north <= bbox.south {
        return Err(ClusterError::DegenerateRegion(format!(
            "Bounding box has no area: {:?}",
            bbox.to_array()
        )));
    }

    Ok(())
}

pub fn validate_viewport(viewport: &Viewport) -> Result<()> {
    if viewport.is_empty() {
        return Err(ClusterError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}
