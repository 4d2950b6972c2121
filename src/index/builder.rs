//! Builder for cluster indexes with validated options.

use crate::config::IndexOptions;
use crate::error::{ClusterError, Result};
use crate::index::ClusterIndex;
use crate::item::Point;

/// Fluent configuration of a [`ClusterIndex`] build.
///
/// ```rust
/// use geocluster::{ClusterIndex, Point};
///
/// let index = ClusterIndex::builder()
///     .radius(60.0)
///     .max_zoom(14)
///     .build(&[Point::new("a", 2.35, 48.85, "Paris")])
///     .unwrap();
/// assert_eq!(index.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterIndexBuilder {
    options: IndexOptions,
}

impl ClusterIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }

    /// Merge radius in pixels.
    pub fn radius(mut self, radius: f64) -> Self {
        self.options.radius = radius;
        self
    }

    pub fn extent(mut self, extent: f64) -> Self {
        self.options.extent = extent;
        self
    }

    pub fn min_zoom(mut self, min_zoom: u32) -> Self {
        self.options.min_zoom = min_zoom;
        self
    }

    pub fn max_zoom(mut self, max_zoom: u32) -> Self {
        self.options.max_zoom = max_zoom;
        self
    }

    pub fn min_points(mut self, min_points: u32) -> Self {
        self.options.min_points = min_points;
        self
    }

    /// Validate the options and build. Invalid points never fail the build;
    /// they end up in [`ClusterIndex::rejected`].
    pub fn build(self, points: &[Point]) -> Result<ClusterIndex> {
        self.options
            .validate()
            .map_err(ClusterError::InvalidConfig)?;
        Ok(ClusterIndex::build(points, &self.options))
    }
}
