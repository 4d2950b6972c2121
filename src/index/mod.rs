//! Hierarchical greedy clustering over per-zoom R*-trees.
//!
//! The finest level (`max_zoom + 1`) holds every accepted point. Each coarser
//! level is built from the one below it: nodes are visited in order and every
//! unvisited neighbour within `radius / (extent * 2^z)` is merged into a
//! weighted-centroid cluster when the group reaches `min_points`.
//!
//! # Example
//!
//! ```rust
//! use geocluster::{BoundingBox, ClusterIndex, IndexOptions, Point};
//!
//! let points = vec![
//!     Point::new("a", 0.0, 0.0, "A"),
//!     Point::new("b", 0.0001, 0.0001, "B"),
//!     Point::new("c", 50.0, 50.0, "C"),
//! ];
//! let index = ClusterIndex::build(&points, &IndexOptions::default());
//!
//! let items = index.query(&BoundingBox::new(-1.0, -1.0, 51.0, 51.0), 10);
//! assert_eq!(items.len(), 2);
//! ```

mod builder;
pub mod generation;
mod node;

pub use builder::ClusterIndexBuilder;
pub use generation::IndexSlot;

use crate::compute::geomath::{MAX_SUPPORTED_ZOOM, lat_y, lng_x, x_lng, y_lat};
use crate::compute::validation::validate_coordinate;
use crate::config::{BoundingBox, IndexOptions};
use crate::error::{ClusterError, Result};
use crate::item::{Cluster, ClusterId, Point, VisibleItem};
use node::{Level, Node};
use rustc_hash::FxHashSet;

/// Bits of a cluster id reserved for its origin zoom.
const ZOOM_BITS: u32 = 5;

/// A point the index refused, with the reason.
#[derive(Debug)]
pub struct RejectedPoint {
    pub index: usize,
    pub id: String,
    pub error: ClusterError,
}

/// One immutable generation of the clustering index.
pub struct ClusterIndex {
    options: IndexOptions,
    points: Vec<Point>,
    /// `levels[z - min_zoom]` for `z` in `min_zoom..=max_zoom + 1`.
    levels: Vec<Level>,
    rejected: Vec<RejectedPoint>,
    generation: u64,
}

impl ClusterIndex {
    /// Start a builder with default options.
    pub fn builder() -> ClusterIndexBuilder {
        ClusterIndexBuilder::new()
    }

    /// Build an index over the clusterable points of `points`.
    ///
    /// Non-clusterable points are ignored. Points with invalid coordinates are
    /// skipped and reported through [`ClusterIndex::rejected`]. Options that
    /// fail [`IndexOptions::validate`] are corrected with a warning instead of
    /// failing the build; use the builder to reject them.
    pub fn build(points: &[Point], options: &IndexOptions) -> Self {
        let options = &sanitize_options(options);
        let mut accepted = Vec::with_capacity(points.len());
        let mut rejected = Vec::new();

        for (index, point) in points.iter().enumerate() {
            if !point.clusterable {
                continue;
            }
            match validate_coordinate(&point.id, point.longitude, point.latitude) {
                Ok(()) => accepted.push(point.clone()),
                Err(error) => {
                    log::warn!("Skipping point at index {}: {}", index, error);
                    rejected.push(RejectedPoint {
                        index,
                        id: point.id.clone(),
                        error,
                    });
                }
            }
        }

        let leaves: Vec<Node> = accepted
            .iter()
            .enumerate()
            .map(|(i, p)| Node::leaf(lng_x(p.longitude), lat_y(p.latitude), i))
            .collect();

        let level_count = (options.max_zoom - options.min_zoom + 2) as usize;
        let mut levels: Vec<Level> = Vec::with_capacity(level_count);
        let mut finer = Level::new(leaves);

        for zoom in (options.min_zoom..=options.max_zoom).rev() {
            let coarser = Level::new(cluster_level(&mut finer, zoom, options, accepted.len()));
            levels.push(std::mem::replace(&mut finer, coarser));
        }
        levels.push(finer);
        levels.reverse();

        log::debug!(
            "Built cluster index: {} points ({} rejected), zoom {}..={}, {} nodes at zoom {}",
            accepted.len(),
            rejected.len(),
            options.min_zoom,
            options.max_zoom,
            levels.first().map_or(0, Level::len),
            options.min_zoom
        );

        Self {
            options: options.clone(),
            points: accepted,
            levels,
            rejected,
            generation: 0,
        }
    }

    /// Clusters and points whose position falls within `bbox` at `zoom`.
    ///
    /// Longitudes are wrapped into `[-180, 180]` and latitudes clamped; a box
    /// crossing the antimeridian is answered as its eastern then western part,
    /// each node at most once.
    /// The search envelope is padded by the clustering radius at that zoom so
    /// items right outside the edges do not pop in late. Output order follows
    /// node order within the level and is stable for a given generation.
    pub fn query(&self, bbox: &BoundingBox, zoom: u32) -> Vec<VisibleItem> {
        let min_lat = bbox.south.clamp(-90.0, 90.0);
        let max_lat = bbox.north.clamp(-90.0, 90.0);

        let level = self.level(zoom);
        let pad = self.radius_at(zoom);
        let top = (lat_y(max_lat) - pad).max(0.0);
        let bottom = (lat_y(min_lat) + pad).min(1.0);

        let spans = lng_spans(bbox);
        if let [(west, east)] = spans[..] {
            let left = (lng_x(west) - pad).max(0.0);
            let right = (lng_x(east) + pad).min(1.0);
            return level
                .range(left, top, right, bottom)
                .into_iter()
                .map(|slot| self.item_for(&level.nodes[slot]))
                .collect();
        }

        // Padded halves of a nearly world-wide box can overlap.
        let mut seen = FxHashSet::default();
        let mut items = Vec::new();
        for (west, east) in spans {
            let left = (lng_x(west) - pad).max(0.0);
            let right = (lng_x(east) + pad).min(1.0);
            for slot in level.range(left, top, right, bottom) {
                if seen.insert(slot) {
                    items.push(self.item_for(&level.nodes[slot]));
                }
            }
        }
        items
    }

    /// Direct children of a cluster at the zoom level it splits into.
    pub fn children(&self, cluster_id: ClusterId) -> Result<Vec<VisibleItem>> {
        Ok(self
            .child_nodes(cluster_id)?
            .into_iter()
            .map(|node| self.item_for(node))
            .collect())
    }

    /// Original points under a cluster, paginated in child order.
    pub fn leaves(&self, cluster_id: ClusterId, limit: usize, offset: usize) -> Result<Vec<&Point>> {
        let mut leaves = Vec::new();
        let mut skipped = 0;
        self.append_leaves(cluster_id, limit, offset, &mut skipped, &mut leaves)?;
        Ok(leaves)
    }

    /// Ids of every point under a cluster.
    pub fn member_ids(&self, cluster_id: ClusterId) -> Result<Vec<String>> {
        Ok(self
            .leaves(cluster_id, usize::MAX, 0)?
            .into_iter()
            .map(|point| point.id.clone())
            .collect())
    }

    /// Lowest zoom at which the cluster splits into more than one item.
    pub fn expansion_zoom(&self, cluster_id: ClusterId) -> Result<u32> {
        let (_, origin_zoom) = self.decode(cluster_id)?;
        let mut expansion_zoom = origin_zoom - 1;
        let mut current = cluster_id;

        while expansion_zoom <= self.options.max_zoom {
            let children = self.children(current)?;
            expansion_zoom += 1;
            match children.as_slice() {
                [VisibleItem::Cluster(only)] => current = only.id,
                _ => break,
            }
        }
        Ok(expansion_zoom)
    }

    /// Points skipped at build time.
    pub fn rejected(&self) -> &[RejectedPoint] {
        &self.rejected
    }

    /// Indexed (accepted, clusterable) points in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Generation number assigned on publication; 0 for unpublished indexes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// An index over no points.
    pub fn empty(options: &IndexOptions) -> Self {
        Self::build(&[], options)
    }

    fn child_nodes(&self, cluster_id: ClusterId) -> Result<Vec<&Node>> {
        let (origin_slot, origin_zoom) = self.decode(cluster_id)?;
        let level = self.level(origin_zoom);
        let origin = level
            .nodes
            .get(origin_slot)
            .ok_or(ClusterError::UnknownCluster(cluster_id))?;

        let radius = self.radius_at(origin_zoom - 1);
        let children: Vec<&Node> = level
            .within(origin.x, origin.y, radius)
            .into_iter()
            .map(|slot| &level.nodes[slot])
            .filter(|node| node.parent_id == Some(cluster_id))
            .collect();

        if children.is_empty() {
            return Err(ClusterError::UnknownCluster(cluster_id));
        }
        Ok(children)
    }

    fn append_leaves<'a>(
        &'a self,
        cluster_id: ClusterId,
        limit: usize,
        offset: usize,
        skipped: &mut usize,
        leaves: &mut Vec<&'a Point>,
    ) -> Result<()> {
        for child in self.child_nodes(cluster_id)? {
            if leaves.len() >= limit {
                break;
            }
            if child.is_cluster() {
                let count = child.num_points as usize;
                if *skipped + count <= offset {
                    *skipped += count;
                } else {
                    self.append_leaves(child.id, limit, offset, skipped, leaves)?;
                }
            } else if *skipped < offset {
                *skipped += 1;
            } else {
                leaves.push(&self.points[child.id as usize]);
            }
        }
        Ok(())
    }

    fn item_for(&self, node: &Node) -> VisibleItem {
        if node.is_cluster() {
            VisibleItem::Cluster(Cluster {
                id: node.id,
                longitude: x_lng(node.x),
                latitude: y_lat(node.y),
                point_count: node.num_points,
                representative: self.points[node.representative].payload.clone(),
            })
        } else {
            VisibleItem::Point(self.points[node.id as usize].clone())
        }
    }

    fn level(&self, zoom: u32) -> &Level {
        let limited = zoom.clamp(self.options.min_zoom, self.options.max_zoom + 1);
        &self.levels[(limited - self.options.min_zoom) as usize]
    }

    /// Clustering radius at `zoom` in normalized units.
    fn radius_at(&self, zoom: u32) -> f64 {
        radius_at(&self.options, zoom)
    }

    /// Splits a cluster id into its origin slot and origin zoom.
    fn decode(&self, cluster_id: ClusterId) -> Result<(usize, u32)> {
        let unknown = || ClusterError::UnknownCluster(cluster_id);
        let n = self.points.len() as u64;
        let encoded = cluster_id.checked_sub(n).ok_or_else(unknown)?;
        let origin_zoom = (encoded % (1 << ZOOM_BITS)) as u32;
        let origin_slot = (encoded >> ZOOM_BITS) as usize;

        if origin_zoom <= self.options.min_zoom || origin_zoom > self.options.max_zoom + 1 {
            return Err(unknown());
        }
        Ok((origin_slot, origin_zoom))
    }
}

impl std::fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("generation", &self.generation)
            .field("points", &self.points.len())
            .field("rejected", &self.rejected.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Bring `options` into the range the level layout and the cluster id
/// encoding rely on.
fn sanitize_options(options: &IndexOptions) -> IndexOptions {
    let defaults = IndexOptions::default();
    let mut sane = options.clone();

    if !sane.radius.is_finite() || sane.radius <= 0.0 {
        sane.radius = defaults.radius;
    }
    if !sane.extent.is_finite() || sane.extent <= 0.0 {
        sane.extent = defaults.extent;
    }
    sane.max_zoom = sane.max_zoom.min(MAX_SUPPORTED_ZOOM);
    sane.min_zoom = sane.min_zoom.min(sane.max_zoom);
    sane.min_points = sane.min_points.max(2);

    if &sane != options {
        log::warn!("Adjusted invalid index options {:?} to {:?}", options, sane);
    }
    sane
}

fn radius_at(options: &IndexOptions, zoom: u32) -> f64 {
    options.radius / (options.extent * f64::from(zoom).exp2())
}

fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

/// Longitude spans covered by `bbox` within `[-180, 180]`, split in two when
/// the box crosses the antimeridian.
fn lng_spans(bbox: &BoundingBox) -> Vec<(f64, f64)> {
    if bbox.east - bbox.west >= 360.0 {
        return vec![(-180.0, 180.0)];
    }

    let west = wrap_lng(bbox.west);
    let east = if bbox.east == 180.0 {
        180.0
    } else {
        wrap_lng(bbox.east)
    };

    if west > east {
        vec![(west, 180.0), (-180.0, east)]
    } else {
        vec![(west, east)]
    }
}

/// One clustering pass: consumes the nodes of the level below `zoom` and
/// returns the nodes of level `zoom`.
fn cluster_level(finer: &mut Level, zoom: u32, options: &IndexOptions, num_points: usize) -> Vec<Node> {
    let radius = radius_at(options, zoom);
    let mut next = Vec::new();

    for slot in 0..finer.nodes.len() {
        if finer.nodes[slot].zoom <= zoom {
            continue;
        }
        finer.nodes[slot].zoom = zoom;

        let seed = finer.nodes[slot].clone();
        let neighbors = finer.within(seed.x, seed.y, radius);

        let origin_count = seed.num_points;
        let total: u32 = origin_count
            + neighbors
                .iter()
                .map(|&n| &finer.nodes[n])
                .filter(|node| node.zoom > zoom)
                .map(|node| node.num_points)
                .sum::<u32>();

        if total > origin_count && total >= options.min_points {
            let id = ((slot as u64) << ZOOM_BITS) + u64::from(zoom + 1) + num_points as u64;
            let mut wx = seed.x * f64::from(origin_count);
            let mut wy = seed.y * f64::from(origin_count);

            for &n in &neighbors {
                let node = &mut finer.nodes[n];
                if node.zoom <= zoom {
                    continue;
                }
                node.zoom = zoom;
                wx += node.x * f64::from(node.num_points);
                wy += node.y * f64::from(node.num_points);
                node.parent_id = Some(id);
            }

            finer.nodes[slot].parent_id = Some(id);
            next.push(Node::cluster(
                wx / f64::from(total),
                wy / f64::from(total),
                id,
                total,
                seed.representative,
            ));
        } else {
            next.push(seed);
            if total > 1 {
                for &n in &neighbors {
                    let node = &mut finer.nodes[n];
                    if node.zoom <= zoom {
                        continue;
                    }
                    node.zoom = zoom;
                    next.push(node.clone());
                }
            }
        }
    }

    next
}
