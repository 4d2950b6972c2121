//! Error types for geocluster.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// A point with a non-finite or out-of-range coordinate. Recovered at
    /// build time: the point is skipped and kept in the index's reject list.
    #[error("Invalid coordinate for point '{id}': {reason}")]
    InvalidCoordinate { id: String, reason: String },

    /// A region or bounding box without positive extent.
    #[error("Degenerate region: {0}")]
    DegenerateRegion(String),

    #[error("Invalid viewport {width}x{height}: both sides must be non-zero")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No cluster with id {0} in this index generation")]
    UnknownCluster(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClusterError {
    /// True for errors that are recovered per point rather than returned.
    pub fn is_point_level(&self) -> bool {
        matches!(self, ClusterError::InvalidCoordinate { .. })
    }
}
