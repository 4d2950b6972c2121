//! Configuration for the cluster index, the viewport controller and the
//! presentation adapter.
//!
//! This module also re-exports the geographic value types from the
//! `geocluster-types` crate for convenience.
use serde::de::Error;

use crate::compute::geomath::MAX_SUPPORTED_ZOOM;

pub use geocluster_types::bbox::BoundingBox;
pub use geocluster_types::region::Region;
pub use geocluster_types::viewport::Viewport;

/// Parameters of one index build.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexOptions {
    /// Merge distance in pixels at each zoom level.
    #[serde(default = "IndexOptions::default_radius")]
    pub radius: f64,

    /// Tile extent the radius is measured against.
    #[serde(default = "IndexOptions::default_extent")]
    pub extent: f64,

    #[serde(default)]
    pub min_zoom: u32,

    /// Finest precomputed level; above it every point is shown on its own.
    #[serde(default = "IndexOptions::default_max_zoom")]
    pub max_zoom: u32,

    /// Smallest group that forms a cluster.
    #[serde(default = "IndexOptions::default_min_points")]
    pub min_points: u32,
}

impl IndexOptions {
    const fn default_radius() -> f64 {
        40.0
    }

    const fn default_extent() -> f64 {
        512.0
    }

    const fn default_max_zoom() -> u32 {
        10
    }

    const fn default_min_points() -> u32 {
        2
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_min_zoom(mut self, min_zoom: u32) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u32) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: u32) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(format!("Radius must be positive, got: {}", self.radius));
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(format!("Extent must be positive, got: {}", self.extent));
        }

        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "Min zoom {} exceeds max zoom {}",
                self.min_zoom, self.max_zoom
            ));
        }

        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!(
                "Max zoom {} exceeds the supported maximum {}",
                self.max_zoom, MAX_SUPPORTED_ZOOM
            ));
        }

        if self.min_points < 2 {
            return Err("Min points must be at least 2".to_string());
        }

        Ok(())
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            extent: Self::default_extent(),
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
        }
    }
}

/// Thresholds that decide whether a region change is worth a recompute.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HysteresisConfig {
    /// Regions wider than this longitude delta never trigger a recompute.
    #[serde(default = "HysteresisConfig::default_max_lon_delta")]
    pub max_lon_delta: f64,

    /// A latitude delta change above `settled / zoom_divisor` triggers.
    #[serde(default = "HysteresisConfig::default_zoom_divisor")]
    pub zoom_divisor: f64,

    /// A center shift of at least `settled delta / pan_divisor` triggers.
    #[serde(default = "HysteresisConfig::default_pan_divisor")]
    pub pan_divisor: f64,
}

impl HysteresisConfig {
    const fn default_max_lon_delta() -> f64 {
        80.0
    }

    const fn default_zoom_divisor() -> f64 {
        7.0
    }

    const fn default_pan_divisor() -> f64 {
        4.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_lon_delta.is_nan() || self.max_lon_delta <= 0.0 {
            return Err(format!(
                "Max longitude delta must be positive, got: {}",
                self.max_lon_delta
            ));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.zoom_divisor) || !positive(self.pan_divisor) {
            return Err("Hysteresis divisors must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            max_lon_delta: Self::default_max_lon_delta(),
            zoom_divisor: Self::default_zoom_divisor(),
            pan_divisor: Self::default_pan_divisor(),
        }
    }
}

/// Cluster badge styling. Only the presentation adapter reads this.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterStyle {
    #[serde(default = "ClusterStyle::default_color")]
    pub color: String,

    #[serde(default = "ClusterStyle::default_accent")]
    pub text_color: String,

    #[serde(default = "ClusterStyle::default_accent")]
    pub border_color: String,

    #[serde(default = "ClusterStyle::default_border_width")]
    pub border_width: f32,

    /// `None` lets the host pick a size.
    #[serde(default)]
    pub text_size: Option<f32>,
}

impl ClusterStyle {
    fn default_color() -> String {
        "#F5F5F5".to_string()
    }

    fn default_accent() -> String {
        "#FF5252".to_string()
    }

    const fn default_border_width() -> f32 {
        1.0
    }
}

impl Default for ClusterStyle {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            text_color: Self::default_accent(),
            border_color: Self::default_accent(),
            border_width: Self::default_border_width(),
            text_size: None,
        }
    }
}

/// Top-level configuration of a clustered map view.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub index: IndexOptions,

    #[serde(default = "Config::default_clustering_enabled")]
    pub clustering_enabled: bool,

    #[serde(default)]
    pub viewport: Viewport,

    #[serde(default)]
    pub hysteresis: HysteresisConfig,

    #[serde(default)]
    pub style: ClusterStyle,
}

impl Config {
    const fn default_clustering_enabled() -> bool {
        true
    }

    pub fn with_index(mut self, index: IndexOptions) -> Self {
        self.index = index;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.index.radius = radius;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u32) -> Self {
        self.index.max_zoom = max_zoom;
        self
    }

    pub fn with_clustering(mut self, enabled: bool) -> Self {
        self.clustering_enabled = enabled;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        if viewport.is_empty() {
            log::warn!(
                "Viewport {}x{} has no area; zoom computation will fail until it is resized",
                viewport.width,
                viewport.height
            );
        }
        self.viewport = viewport;
        self
    }

    pub fn with_hysteresis(mut self, hysteresis: HysteresisConfig) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    pub fn with_style(mut self, style: ClusterStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.index.validate()?;
        self.hysteresis.validate()?;

        if self.viewport.is_empty() {
            return Err(format!(
                "Viewport must have a non-zero size, got: {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: IndexOptions::default(),
            clustering_enabled: Self::default_clustering_enabled(),
            viewport: Viewport::default(),
            hysteresis: HysteresisConfig::default(),
            style: ClusterStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.index.radius, 40.0);
        assert_eq!(config.index.max_zoom, 10);
        assert_eq!(config.index.min_points, 2);
        assert!(config.clustering_enabled);
        assert_eq!(config.hysteresis.max_lon_delta, 80.0);
        assert_eq!(config.style.color, "#F5F5F5");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_radius(60.0)
            .with_max_zoom(14)
            .with_clustering(false);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"index": {"radius": 80}}"#).unwrap();
        assert_eq!(config.index.radius, 80.0);
        assert_eq!(config.index.max_zoom, 10);
        assert!(config.clustering_enabled);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"radius": 80}"#).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(IndexOptions::default().with_radius(0.0).validate().is_err());
        assert!(IndexOptions::default().with_min_points(1).validate().is_err());
        assert!(
            IndexOptions::default()
                .with_min_zoom(5)
                .with_max_zoom(4)
                .validate()
                .is_err()
        );
        assert!(
            IndexOptions::default()
                .with_max_zoom(MAX_SUPPORTED_ZOOM + 1)
                .validate()
                .is_err()
        );
        assert!(Config::from_json(r#"{"viewport": {"width": 0, "height": 10}}"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default().with_radius(25.0);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
