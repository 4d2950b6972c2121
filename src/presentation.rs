//! Boundary between the clustering core and the host UI.
//!
//! The core never draws. A [`Presenter`] turns the visible items of one
//! recompute into whatever the host needs; [`AnnotationAdapter`] is the
//! stock implementation producing plain annotation descriptions with the
//! configured cluster styling attached.

use crate::config::ClusterStyle;
use crate::item::{ClusterId, VisibleItem};
use bytes::Bytes;

/// Maps a visible set to host-side drawables.
pub trait Presenter {
    type Output;

    fn present(&self, items: &[VisibleItem]) -> Vec<Self::Output>;
}

/// A drawable annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Draw the host's own marker for this point.
    Marker {
        key: String,
        longitude: f64,
        latitude: f64,
        payload: Bytes,
    },
    /// Draw a count badge.
    ClusterBadge {
        cluster_id: ClusterId,
        longitude: f64,
        latitude: f64,
        label: String,
        point_count: u32,
        representative: Bytes,
        style: ClusterStyle,
    },
}

impl Annotation {
    pub fn is_badge(&self) -> bool {
        matches!(self, Annotation::ClusterBadge { .. })
    }
}

/// Presenter that attaches `style` to every cluster badge.
#[derive(Debug, Clone, Default)]
pub struct AnnotationAdapter {
    style: ClusterStyle,
}

impl AnnotationAdapter {
    pub fn new(style: ClusterStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ClusterStyle {
        &self.style
    }
}

impl Presenter for AnnotationAdapter {
    type Output = Annotation;

    fn present(&self, items: &[VisibleItem]) -> Vec<Annotation> {
        items
            .iter()
            .map(|item| match item {
                VisibleItem::Point(point) => Annotation::Marker {
                    key: point.id.clone(),
                    longitude: point.longitude,
                    latitude: point.latitude,
                    payload: point.payload.clone(),
                },
                VisibleItem::Cluster(cluster) => Annotation::ClusterBadge {
                    cluster_id: cluster.id,
                    longitude: cluster.longitude,
                    latitude: cluster.latitude,
                    label: cluster.abbreviated_count(),
                    point_count: cluster.point_count,
                    representative: cluster.representative.clone(),
                    style: self.style.clone(),
                },
            })
            .collect()
    }
}
