//! Geographic math, validation and GeoJSON conversion.

#[cfg(feature = "geojson")]
pub mod geojson;
pub mod geomath;
pub mod validation;
