//! Per-level node storage and the R*-tree over it.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

/// Zoom marker for nodes no clustering pass has visited yet.
pub(crate) const NOT_VISITED: u32 = u32::MAX;

/// A point or cluster at one zoom level, in normalized Mercator space.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub x: f64,
    pub y: f64,
    /// Last zoom whose clustering pass consumed this node.
    pub zoom: u32,
    /// Point index for single points, encoded cluster id otherwise.
    pub id: u64,
    pub parent_id: Option<u64>,
    pub num_points: u32,
    /// Index of the point whose payload represents this node.
    pub representative: usize,
}

impl Node {
    pub fn leaf(x: f64, y: f64, point_index: usize) -> Self {
        Self {
            x,
            y,
            zoom: NOT_VISITED,
            id: point_index as u64,
            parent_id: None,
            num_points: 1,
            representative: point_index,
        }
    }

    pub fn cluster(x: f64, y: f64, id: u64, num_points: u32, representative: usize) -> Self {
        Self {
            x,
            y,
            zoom: NOT_VISITED,
            id,
            parent_id: None,
            num_points,
            representative,
        }
    }

    #[inline]
    pub fn is_cluster(&self) -> bool {
        self.num_points > 1
    }
}

/// Tree entry: a position tagged with the node's slot in its level.
pub(crate) type Entry = GeomWithData<[f64; 2], usize>;

/// All nodes of one zoom level plus the tree that indexes them.
pub(crate) struct Level {
    pub nodes: Vec<Node>,
    tree: RTree<Entry>,
}

impl Level {
    pub fn new(nodes: Vec<Node>) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| Entry::new([node.x, node.y], slot))
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Slots within `radius` of `(x, y)`, ascending.
    pub fn within(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance([x, y], radius * radius)
            .map(|entry| entry.data)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Slots inside the envelope (edges inclusive), ascending.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
