//! Capabilities the editor needs from the host map.
//!
//! Actions never touch the host directly: they go through these traits,
//! implemented by the browser adapter (`imu-wasm`) and by [`MemoryHost`]
//! for headless use.
//!
//! [`MemoryHost`]: crate::memory::MemoryHost

use imu_core::{FeatureId, Geometry, IgnStyle, LayerId, Point};
use serde::Serialize;

/// How a set of features gets selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// The plain hand-selection tool.
    Hand,
    /// The transform interaction (move/rotate/scale handles).
    Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Vector,
    Other,
}

/// A layer as listed in the host's layer collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
}

impl LayerInfo {
    pub fn is_vector(&self) -> bool {
        self.kind == LayerKind::Vector
    }
}

/// Access to the current selection.
pub trait SelectionProvider {
    /// Features selected by the hand tool, else by the transform tool.
    fn selected(&self) -> Vec<FeatureId>;

    fn clear_selection(&mut self);

    /// Replace the selection with `ids` using the given interaction.
    fn select(&mut self, ids: &[FeatureId], mode: SelectMode);
}

/// Access to layers and their feature membership.
pub trait LayerSource {
    /// Every layer, in the host's order.
    fn layers(&self) -> Vec<LayerInfo>;

    /// The layer new drawings go to.
    fn active_layer(&self) -> Option<LayerId>;

    fn layer_features(&self, layer: LayerId) -> Vec<FeatureId>;

    fn add_to_layer(&mut self, layer: LayerId, feature: FeatureId);

    /// Returns `true` if the feature was in the layer.
    fn remove_from_layer(&mut self, layer: LayerId, feature: FeatureId) -> bool;

    /// Vector layers currently holding `feature`. Normally at most one, but
    /// nothing in the host prevents a feature from sitting in several.
    fn layers_containing(&self, feature: FeatureId) -> Vec<LayerId> {
        self.layers()
            .into_iter()
            .filter(|l| l.is_vector() && self.layer_features(l.id).contains(&feature))
            .map(|l| l.id)
            .collect()
    }
}

/// Per-feature geometry and style access.
pub trait FeatureAccess {
    fn geometry(&self, feature: FeatureId) -> Option<Geometry>;

    fn set_geometry(&mut self, feature: FeatureId, geometry: Geometry);

    fn style(&self, feature: FeatureId) -> Option<IgnStyle>;

    fn set_style(&mut self, feature: FeatureId, style: IgnStyle);

    /// Host-side clone of a feature, not attached to any layer.
    /// The clone may share the original's style object.
    fn clone_feature(&mut self, feature: FeatureId) -> Option<FeatureId>;

    /// A new detached feature.
    fn create_feature(&mut self, geometry: Geometry) -> FeatureId;

    /// Ask the host to re-render the feature.
    fn changed(&mut self, _feature: FeatureId) {}

    /// Drop the handle of a detached feature nothing will use again.
    fn release(&mut self, _feature: FeatureId) {}
}

/// The map view.
pub trait Viewport {
    fn center(&self) -> Point;

    /// View rotation in radians.
    fn rotation(&self) -> f64;

    fn set_rotation(&mut self, radians: f64);

    /// Real-world length in metres of a polyline given in view coordinates.
    fn geodesic_length(&self, line: &[Point]) -> f64 {
        imu_core::sphere::line_length(line)
    }
}

/// Transient user-facing messages.
pub trait Notifier {
    /// Show `text` for `duration_ms`, or the host default when `None`.
    fn message(&mut self, text: &str, duration_ms: Option<u32>);
}

/// Everything an action may use.
pub trait Host: SelectionProvider + LayerSource + FeatureAccess + Viewport + Notifier {}

impl<T> Host for T where T: SelectionProvider + LayerSource + FeatureAccess + Viewport + Notifier {}
