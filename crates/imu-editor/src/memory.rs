//! Headless host backed by plain collections.
//!
//! Mirrors how the browser map behaves where it matters to the actions:
//! a cloned feature shares its style object with the original until
//! someone calls `set_style` on it.

use crate::host::{
    FeatureAccess, LayerInfo, LayerKind, LayerSource, Notifier, SelectMode, SelectionProvider,
    Viewport,
};
use imu_core::{FeatureId, Geometry, IgnStyle, LayerId, Point};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// How [`MemoryHost`] turns view lengths into metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Geodesy {
    /// View units are metres.
    Planar,
    /// View units are Web Mercator metres.
    #[default]
    Spherical,
}

#[derive(Debug, Clone)]
struct StoredFeature {
    geometry: Geometry,
    style: Rc<RefCell<IgnStyle>>,
}

#[derive(Debug, Clone)]
struct StoredLayer {
    info: LayerInfo,
    features: Vec<FeatureId>,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    features: HashMap<FeatureId, StoredFeature>,
    layers: Vec<StoredLayer>,
    active: Option<LayerId>,
    selection: Vec<FeatureId>,
    select_mode: Option<SelectMode>,
    center: Point,
    rotation: f64,
    geodesy: Geodesy,
    messages: Vec<(String, Option<u32>)>,
    changed: Vec<FeatureId>,
    unreadable_styles: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose view units are metres.
    pub fn planar() -> Self {
        Self {
            geodesy: Geodesy::Planar,
            ..Self::default()
        }
    }

    /// Append a layer. The first vector layer becomes active.
    pub fn add_layer(&mut self, name: &str, kind: LayerKind) -> LayerId {
        let id = LayerId::intern(name);
        self.layers.push(StoredLayer {
            info: LayerInfo {
                id,
                name: name.to_string(),
                kind,
            },
            features: Vec::new(),
        });
        if self.active.is_none() && kind == LayerKind::Vector {
            self.active = Some(id);
        }
        id
    }

    pub fn set_active_layer(&mut self, layer: Option<LayerId>) {
        self.active = layer;
    }

    /// Create a feature inside `layer`.
    pub fn insert(&mut self, layer: LayerId, geometry: Geometry, style: IgnStyle) -> FeatureId {
        let id = FeatureId::fresh();
        self.features.insert(
            id,
            StoredFeature {
                geometry,
                style: Rc::new(RefCell::new(style)),
            },
        );
        self.add_to_layer(layer, id);
        id
    }

    /// Select as the user would with the hand tool.
    pub fn set_selection(&mut self, ids: &[FeatureId]) {
        self.selection = ids.to_vec();
        self.select_mode = Some(SelectMode::Hand);
    }

    /// Mutate a feature's style object in place, as the host's style
    /// editor does. Every feature sharing the object sees the edit.
    pub fn edit_style(&mut self, feature: FeatureId, f: impl FnOnce(&mut IgnStyle)) {
        if let Some(stored) = self.features.get(&feature) {
            f(&mut stored.style.borrow_mut());
        }
    }

    /// Make `style` fail like a host whose style objects can't be read.
    pub fn set_styles_unreadable(&mut self, unreadable: bool) {
        self.unreadable_styles = unreadable;
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn select_mode(&self) -> Option<SelectMode> {
        self.select_mode
    }

    pub fn messages(&self) -> &[(String, Option<u32>)] {
        &self.messages
    }

    pub fn changed_features(&self) -> &[FeatureId] {
        &self.changed
    }

    /// Number of features the host knows, attached or not.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn layer_mut(&mut self, layer: LayerId) -> Option<&mut StoredLayer> {
        self.layers.iter_mut().find(|l| l.info.id == layer)
    }
}

impl SelectionProvider for MemoryHost {
    fn selected(&self) -> Vec<FeatureId> {
        self.selection.clone()
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn select(&mut self, ids: &[FeatureId], mode: SelectMode) {
        self.selection = ids.to_vec();
        self.select_mode = Some(mode);
    }
}

impl LayerSource for MemoryHost {
    fn layers(&self) -> Vec<LayerInfo> {
        self.layers.iter().map(|l| l.info.clone()).collect()
    }

    fn active_layer(&self) -> Option<LayerId> {
        self.active
    }

    fn layer_features(&self, layer: LayerId) -> Vec<FeatureId> {
        self.layers
            .iter()
            .find(|l| l.info.id == layer)
            .map(|l| l.features.clone())
            .unwrap_or_default()
    }

    fn add_to_layer(&mut self, layer: LayerId, feature: FeatureId) {
        match self.layer_mut(layer) {
            Some(l) if !l.features.contains(&feature) => l.features.push(feature),
            Some(_) => {}
            None => log::warn!("add_to_layer: unknown layer {layer}"),
        }
    }

    fn remove_from_layer(&mut self, layer: LayerId, feature: FeatureId) -> bool {
        let Some(l) = self.layer_mut(layer) else {
            return false;
        };
        let before = l.features.len();
        l.features.retain(|f| *f != feature);
        l.features.len() != before
    }
}

impl FeatureAccess for MemoryHost {
    fn geometry(&self, feature: FeatureId) -> Option<Geometry> {
        self.features.get(&feature).map(|f| f.geometry.clone())
    }

    fn set_geometry(&mut self, feature: FeatureId, geometry: Geometry) {
        if let Some(f) = self.features.get_mut(&feature) {
            f.geometry = geometry;
        }
    }

    fn style(&self, feature: FeatureId) -> Option<IgnStyle> {
        if self.unreadable_styles {
            return None;
        }
        self.features.get(&feature).map(|f| f.style.borrow().clone())
    }

    fn set_style(&mut self, feature: FeatureId, style: IgnStyle) {
        if let Some(f) = self.features.get_mut(&feature) {
            f.style = Rc::new(RefCell::new(style));
        }
    }

    fn clone_feature(&mut self, feature: FeatureId) -> Option<FeatureId> {
        let stored = self.features.get(&feature)?.clone();
        let id = FeatureId::fresh();
        self.features.insert(id, stored);
        Some(id)
    }

    fn create_feature(&mut self, geometry: Geometry) -> FeatureId {
        let id = FeatureId::fresh();
        self.features.insert(
            id,
            StoredFeature {
                geometry,
                style: Rc::default(),
            },
        );
        id
    }

    fn changed(&mut self, feature: FeatureId) {
        self.changed.push(feature);
    }

    fn release(&mut self, feature: FeatureId) {
        if self.layers.iter().any(|l| l.features.contains(&feature)) {
            log::warn!("release: {feature} is still in a layer, keeping it");
            return;
        }
        self.features.remove(&feature);
    }
}

impl Viewport for MemoryHost {
    fn center(&self) -> Point {
        self.center
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }

    fn geodesic_length(&self, line: &[Point]) -> f64 {
        match self.geodesy {
            Geodesy::Planar => imu_core::geometry::edge_lengths(line).iter().sum(),
            Geodesy::Spherical => imu_core::sphere::line_length(line),
        }
    }
}

impl Notifier for MemoryHost {
    fn message(&mut self, text: &str, duration_ms: Option<u32>) {
        log::info!("message: {text}");
        self.messages.push((text.to_string(), duration_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clone_shares_style_until_set() {
        let mut host = MemoryHost::planar();
        let layer = host.add_layer("dessin", LayerKind::Vector);
        let a = host.insert(layer, Geometry::Point(Point::new(1.0, 2.0)), IgnStyle::new());

        let b = host.clone_feature(a).unwrap();
        host.edit_style(a, |s| s.set("fillColor", "red"));
        assert_eq!(host.style(b).unwrap().get("fillColor"), Some(&serde_json::Value::from("red")));

        host.set_style(b, IgnStyle::new());
        host.edit_style(a, |s| s.set("fillColor", "blue"));
        assert_eq!(host.style(b).unwrap().get("fillColor"), None);
    }

    #[test]
    fn clones_are_detached() {
        let mut host = MemoryHost::planar();
        let layer = host.add_layer("dessin", LayerKind::Vector);
        let a = host.insert(layer, Geometry::Point(Point::ORIGIN), IgnStyle::new());
        let b = host.clone_feature(a).unwrap();
        assert_eq!(host.layer_features(layer), vec![a]);
        assert!(host.layers_containing(b).is_empty());
    }

    #[test]
    fn first_vector_layer_is_active() {
        let mut host = MemoryHost::new();
        host.add_layer("fond", LayerKind::Other);
        let dessin = host.add_layer("dessin", LayerKind::Vector);
        host.add_layer("autre", LayerKind::Vector);
        assert_eq!(host.active_layer(), Some(dessin));
    }

    #[test]
    fn planar_length_is_euclidean() {
        let host = MemoryHost::planar();
        let len = host.geodesic_length(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert_eq!(len, 5.0);
    }
}
