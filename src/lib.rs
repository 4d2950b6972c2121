//! Zoom-aware clustering of geo-located map annotations.
//!
//! - **Cluster index**: one R*-tree per zoom level, built once per point set
//! - **Viewport controller**: turns map regions into a bounding box and a zoom
//!   level, and skips recomputes for small pans and zooms
//! - **Presentation boundary**: maps the visible set to host annotations
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
//! let items = index.query(&BoundingBox::new(-1.0, -1.0, 51.0, 51.0), 10);
//!
//! assert_eq!(items.len(), 2);
//! assert_eq!(items.iter().map(|i| i.point_count()).sum::<u32>(), 3);
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod item;
pub mod presentation;
pub mod viewport;

pub use error::{ClusterError, Result};

pub use config::{
    BoundingBox, ClusterStyle, Config, HysteresisConfig, IndexOptions, Region, Viewport,
};

pub use index::{ClusterIndex, ClusterIndexBuilder, IndexSlot, RejectedPoint};
pub use item::{Cluster, ClusterId, Point, VisibleItem};
pub use presentation::{Annotation, AnnotationAdapter, Presenter};
pub use viewport::ViewportController;

pub use compute::geomath::{bounding_box_of, zoom_for_region, zoom_level_of};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterError, Result};

    pub use crate::{BoundingBox, Region, Viewport};

    pub use crate::{ClusterIndex, IndexOptions, IndexSlot, ViewportController};

    pub use crate::{Cluster, Point, VisibleItem};

    pub use crate::{Annotation, AnnotationAdapter, ClusterStyle, Config, Presenter};
}
