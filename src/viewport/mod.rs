//! Viewport controller: region state, the recompute gate and the glue
//! between the geographic math and the cluster index.
//!
//! The host issues two calls: [`ViewportController::initial_visible_set`]
//! when the map appears or its point set changes, and
//! [`ViewportController::on_region_change`] on every settled viewport
//! update. Both return the items to draw; `on_region_change` returns `None`
//! when the change is too small to matter.
//!
//! ```rust
//! use geocluster::{Config, Point, Region, ViewportController};
//!
//! let mut controller = ViewportController::new(Config::default())?;
//! let points = vec![
//!     Point::new("a", 0.0, 0.0, "A"),
//!     Point::new("b", 0.0001, 0.0001, "B"),
//! ];
//! let items = controller.initial_visible_set(Region::new(0.0, 0.0, 1.0, 1.0), points)?;
//! assert_eq!(items.len(), 1);
//!
//! // A tiny pan is ignored.
//! assert!(controller.on_region_change(Region::new(0.05, 0.0, 1.0, 1.0))?.is_none());
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

mod hysteresis;

pub use hysteresis::should_recompute;

use crate::compute::geomath::{bounding_box_of, zoom_for_region};
use crate::compute::validation::validate_region;
use crate::config::{Config, Region, Viewport};
use crate::error::{ClusterError, Result};
use crate::index::{ClusterIndex, IndexSlot};
use crate::item::{Point, VisibleItem};
use std::sync::Arc;

/// Owns the region state and the index generation of one map view.
#[derive(Debug)]
pub struct ViewportController {
    config: Config,
    current_region: Option<Region>,
    last_settled_region: Option<Region>,
    clustering_enabled: bool,
    index: IndexSlot,
    /// Points drawn on their own regardless of clustering.
    standalone: Vec<Point>,
}

impl ViewportController {
    /// Create a controller with an empty point set.
    pub fn new(config: Config) -> Result<Self> {
        config.validate().map_err(ClusterError::InvalidConfig)?;
        Ok(Self {
            index: IndexSlot::new(&config.index),
            clustering_enabled: config.clustering_enabled,
            current_region: None,
            last_settled_region: None,
            standalone: Vec::new(),
            config,
        })
    }

    /// Replace the point set and compute the visible items for `region`
    /// unconditionally.
    ///
    /// A new index generation is built and published; `region` becomes both
    /// the current and the settled region.
    pub fn initial_visible_set(&mut self, region: Region, points: Vec<Point>) -> Result<Vec<VisibleItem>> {
        validate_region(&region)?;

        let (clusterable, standalone): (Vec<Point>, Vec<Point>) =
            points.into_iter().partition(|point| point.clusterable);
        self.standalone = standalone;
        let index = self.index.rebuild(&clusterable, &self.config.index);

        log::debug!(
            "Loaded {} clusterable and {} standalone points into generation {}",
            index.len(),
            self.standalone.len(),
            index.generation()
        );

        self.current_region = Some(region);
        self.last_settled_region = Some(region);
        self.visible_items(&index, &region)
    }

    /// Handle a settled region change from the host map.
    ///
    /// Returns `Ok(None)` when the change is below the hysteresis thresholds
    /// or the region is too wide to recompute. A region without positive
    /// extent is a caller bug and is returned as `DegenerateRegion`.
    pub fn on_region_change(&mut self, region: Region) -> Result<Option<Vec<VisibleItem>>> {
        validate_region(&region)?;
        self.current_region = Some(region);

        if !should_recompute(
            &self.config.hysteresis,
            self.last_settled_region.as_ref(),
            &region,
        ) {
            return Ok(None);
        }

        self.last_settled_region = Some(region);
        let index = self.index.current();
        self.visible_items(&index, &region).map(Some)
    }

    /// Recompute for the current region, bypassing the hysteresis gate.
    ///
    /// Returns `None` before any region is known.
    pub fn recompute(&mut self) -> Result<Option<Vec<VisibleItem>>> {
        let Some(region) = self.current_region else {
            return Ok(None);
        };
        self.last_settled_region = Some(region);
        let index = self.index.current();
        self.visible_items(&index, &region).map(Some)
    }

    pub fn set_clustering_enabled(&mut self, enabled: bool) {
        self.clustering_enabled = enabled;
    }

    pub fn clustering_enabled(&self) -> bool {
        self.clustering_enabled
    }

    /// Update the pixel size used for zoom computation.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if viewport.is_empty() {
            return Err(ClusterError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.config.viewport = viewport;
        Ok(())
    }

    pub fn current_region(&self) -> Option<Region> {
        self.current_region
    }

    pub fn last_settled_region(&self) -> Option<Region> {
        self.last_settled_region
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The published index generation.
    pub fn index(&self) -> Arc<ClusterIndex> {
        self.index.current()
    }

    /// A shareable handle to the generation slot, for building on another
    /// thread.
    pub fn index_slot(&self) -> IndexSlot {
        self.index.clone()
    }

    /// Visible items for `region` against the current generation, without
    /// touching controller state.
    pub fn visible_for(&self, region: &Region) -> Result<Vec<VisibleItem>> {
        validate_region(region)?;
        self.visible_items(&self.index.current(), region)
    }

    /// Ids of points the current generation refused.
    pub fn rejected_points(&self) -> Vec<String> {
        self.index
            .current()
            .rejected()
            .iter()
            .map(|rejected| rejected.id.clone())
            .collect()
    }

    fn visible_items(&self, index: &ClusterIndex, region: &Region) -> Result<Vec<VisibleItem>> {
        let mut items = if self.clustering_enabled {
            let bbox = bounding_box_of(region);
            let zoom = zoom_for_region(region, self.config.viewport)?;
            let items = index.query(&bbox, zoom);
            log::debug!(
                "Recomputed {} items at zoom {} for bbox {:?}",
                items.len(),
                zoom,
                bbox.to_array()
            );
            items
        } else {
            index.points().iter().cloned().map(VisibleItem::Point).collect()
        };

        items.extend(self.standalone.iter().cloned().map(VisibleItem::Point));
        Ok(items)
    }
}
