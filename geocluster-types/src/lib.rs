//! # geocluster-types
//!
//! Plain geographic value types shared by the geocluster engine:
//!
//! - **Region**: the visible map area as a center plus longitude/latitude deltas
//! - **BoundingBox**: a `[west, south, east, north]` extent
//! - **Viewport**: the pixel size of the map view
//!
//! All types are serializable with Serde and convert to the `geo` crate's
//! primitives where a matching one exists.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::region::Region;
//!
//! let region = Region::new(10.0, 40.0, 0.5, 0.25);
//! let bbox = region.bounding_box();
//! assert_eq!(bbox.west, 9.5);
//! assert!(bbox.contains(10.2, 40.1));
//! ```

pub mod bbox;
pub mod region;
pub mod viewport;
