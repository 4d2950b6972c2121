//! Publication of index generations.
//!
//! Readers take a cheap `Arc` clone of the current generation and query it
//! without holding any lock. Builds run outside the lock and are installed
//! with a single pointer swap; a build that was overtaken by a newer one is
//! dropped on publish.

use crate::config::IndexOptions;
use crate::index::ClusterIndex;
use crate::item::Point;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct SlotInner {
    current: RwLock<Arc<ClusterIndex>>,
    /// Last ticket handed out by `begin_build`.
    requested: AtomicU64,
}

/// Shared handle to the current index generation.
///
/// Cloning the slot shares it, so a worker thread can build and publish while
/// the owner keeps querying the previous generation.
#[derive(Clone)]
pub struct IndexSlot {
    inner: Arc<SlotInner>,
}

impl IndexSlot {
    /// A slot holding an empty generation 0.
    pub fn new(options: &IndexOptions) -> Self {
        Self {
            inner: Arc::new(SlotInner {
                current: RwLock::new(Arc::new(ClusterIndex::empty(options))),
                requested: AtomicU64::new(0),
            }),
        }
    }

    /// The published generation.
    pub fn current(&self) -> Arc<ClusterIndex> {
        Arc::clone(&self.inner.current.read())
    }

    pub fn generation(&self) -> u64 {
        self.inner.current.read().generation()
    }

    /// Reserve the next generation number for a build about to start.
    pub fn begin_build(&self) -> u64 {
        self.inner.requested.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Install `index` as generation `ticket`.
    ///
    /// Returns `false` and drops the index when a newer build has been
    /// started since `ticket` was issued, or a newer generation is already
    /// published.
    pub fn publish(&self, ticket: u64, mut index: ClusterIndex) -> bool {
        if ticket < self.inner.requested.load(Ordering::Acquire) {
            log::debug!("Discarding stale index generation {}", ticket);
            return false;
        }

        let mut current = self.inner.current.write();
        if ticket <= current.generation() {
            log::debug!(
                "Discarding index generation {}: generation {} already published",
                ticket,
                current.generation()
            );
            return false;
        }

        index.set_generation(ticket);
        *current = Arc::new(index);
        true
    }

    /// Build from `points` and publish, returning the generation readers see
    /// afterwards (the new one unless a newer build overtook it).
    pub fn rebuild(&self, points: &[Point], options: &IndexOptions) -> Arc<ClusterIndex> {
        let ticket = self.begin_build();
        let index = ClusterIndex::build(points, options);
        self.publish(ticket, index);
        self.current()
    }
}

impl std::fmt::Debug for IndexSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexSlot")
            .field("generation", &self.generation())
            .field("requested", &self.inner.requested.load(Ordering::Relaxed))
            .finish()
    }
}
