//! `MacarteHost`: the editor's capability traits over `window.macarte`.
//!
//! Host objects never cross into the editor. Each feature or layer object
//! gets a handle the first time it is seen. Object to handle is a
//! `WeakMap`; handle to object is a `Map` whose entries go away when the
//! editor releases the handle.

use crate::js;
use imu_core::{FeatureId, Geometry, GeometryKind, IgnStyle, LayerId, Point};
use imu_editor::host::{
    FeatureAccess, LayerInfo, LayerKind, LayerSource, Notifier, SelectMode, SelectionProvider,
    Viewport,
};
use imu_editor::toolbar::mode_name;
use js_sys::{Array, Map, Object, WeakMap};
use wasm_bindgen::{JsCast, JsValue};

const SELECT_INTERACTION: &str = "SelectInteraction";
const TRANSFORM_INTERACTION: &str = "TransformInteraction";

/// Two-way table between host objects and handle strings.
struct Handles {
    by_object: WeakMap,
    by_id: Map,
}

impl Handles {
    fn new() -> Self {
        Self {
            by_object: WeakMap::new(),
            by_id: Map::new(),
        }
    }

    fn lookup(&self, object: &JsValue) -> Option<String> {
        self.by_object.get(object.dyn_ref::<Object>()?).as_string()
    }

    fn insert(&self, object: &JsValue, id: &str) {
        let key = JsValue::from_str(id);
        if let Some(object) = object.dyn_ref::<Object>() {
            self.by_object.set(object, &key);
        }
        self.by_id.set(&key, object);
    }

    fn object(&self, id: &str) -> Option<JsValue> {
        let value = self.by_id.get(&JsValue::from_str(id));
        (!value.is_undefined()).then_some(value)
    }

    fn remove(&self, id: &str) {
        let key = JsValue::from_str(id);
        if let Some(object) = self.by_id.get(&key).dyn_ref::<Object>() {
            self.by_object.delete(object);
        }
        self.by_id.delete(&key);
    }
}

/// Read an `ol.geom.*` object.
pub fn read_geometry(geometry: &JsValue) -> Result<Geometry, JsValue> {
    let name = js::call0(geometry, "getType")?.as_string().unwrap_or_default();
    let kind = GeometryKind::from_name(&name)
        .ok_or_else(|| JsValue::from_str(&format!("unsupported geometry {name}")))?;
    let coords = match kind {
        GeometryKind::Circle => serde_json::json!([
            js::to_json(&js::call0(geometry, "getCenter")?)?,
            js::to_json(&js::call0(geometry, "getRadius")?)?,
        ]),
        _ => js::to_json(&js::call0(geometry, "getCoordinates")?)?,
    };
    Geometry::from_json(kind, &coords)
        .ok_or_else(|| JsValue::from_str(&format!("malformed {name} coordinates")))
}

/// Build the matching `ol.geom.*` object.
pub fn write_geometry(geometry: &Geometry) -> Result<JsValue, JsValue> {
    let ctor = js::path(&js::ol()?, &["geom", geometry.kind().as_str()])?;
    match geometry {
        Geometry::Circle { center, radius } => js::construct(
            &ctor,
            &[
                js::from_json(&serde_json::json!([center.x, center.y]))?,
                JsValue::from_f64(*radius),
            ],
        ),
        _ => js::construct(&ctor, &[js::from_json(&geometry.coordinates_json())?]),
    }
}

fn read_point(value: &JsValue) -> Option<Point> {
    let arr = js::array(value.clone()).ok()?;
    Some(Point::new(arr.get(0).as_f64()?, arr.get(1).as_f64()?))
}

/// The browser-side host.
pub struct MacarteHost {
    macarte: JsValue,
    features: Handles,
    layers: Handles,
    message_duration_ms: u32,
}

impl MacarteHost {
    pub fn new(macarte: JsValue, message_duration_ms: u32) -> Self {
        Self {
            macarte,
            features: Handles::new(),
            layers: Handles::new(),
            message_duration_ms,
        }
    }

    /// `window.macarte`, if the page has created it yet.
    pub fn find() -> Option<JsValue> {
        js::path(&js_sys::global(), &["macarte"]).ok()
    }

    pub fn carte(&self) -> Result<JsValue, JsValue> {
        js::call0(&self.macarte, "getCarte")
    }

    /// The `ol.Map`.
    pub fn map(&self) -> Result<JsValue, JsValue> {
        js::call0(&self.carte()?, "getMap")
    }

    fn view(&self) -> Result<JsValue, JsValue> {
        js::call0(&self.map()?, "getView")
    }

    fn interaction(&self, name: &str) -> Result<Option<JsValue>, JsValue> {
        let found = js::call1(&self.carte()?, "getInteractionByName", &JsValue::from_str(name))?;
        Ok(found.is_truthy().then_some(found))
    }

    /// The MaCarte dialog service.
    pub fn wdialog(&self) -> Result<JsValue, JsValue> {
        js::path(&self.macarte, &["wdialog"])
    }

    // ─── Handles ─────────────────────────────────────────────────────────

    pub fn feature_id(&self, feature: &JsValue) -> FeatureId {
        if let Some(id) = self.features.lookup(feature) {
            return FeatureId::intern(&id);
        }
        let id = FeatureId::fresh();
        self.features.insert(feature, id.as_str());
        id
    }

    pub fn feature(&self, id: FeatureId) -> Option<JsValue> {
        self.features.object(id.as_str())
    }

    pub fn layer_id(&self, layer: &JsValue) -> LayerId {
        if let Some(id) = self.layers.lookup(layer) {
            return LayerId::intern(&id);
        }
        let id = LayerId::fresh();
        self.layers.insert(layer, id.as_str());
        id
    }

    pub fn layer(&self, id: LayerId) -> Option<JsValue> {
        self.layers.object(id.as_str())
    }

    // ─── Fallible host calls ─────────────────────────────────────────────

    fn try_selected(&self) -> Result<Vec<JsValue>, JsValue> {
        if let Some(select) = self.interaction(SELECT_INTERACTION)? {
            let features = js::call0(&js::call0(&select, "getFeatures")?, "getArray")?;
            return Ok(js::array(features)?.to_vec());
        }
        if let Some(transform) = self.interaction(TRANSFORM_INTERACTION)? {
            // Older transform interactions keep the selection in `selection_`.
            let features = js::call0(&transform, "getFeatures")
                .ok()
                .filter(Array::is_array)
                .map_or_else(|| js::get(&transform, "selection_"), Ok)?;
            if let Ok(arr) = js::array(features) {
                return Ok(arr.to_vec());
            }
        }
        Ok(Vec::new())
    }

    fn try_clear_selection(&self) -> Result<(), JsValue> {
        if let Some(select) = self.interaction(SELECT_INTERACTION)? {
            js::call0(&js::call0(&select, "getFeatures")?, "clear")?;
            return Ok(());
        }
        if let Some(transform) = self.interaction(TRANSFORM_INTERACTION)? {
            js::call0(&transform, "select")?;
            js::call0(&transform, "drawSketch_")?;
        }
        Ok(())
    }

    fn try_select(&self, features: &[JsValue], mode: SelectMode) -> Result<(), JsValue> {
        crate::gui::enable_mode(mode_name(mode));
        match mode {
            SelectMode::Transform => {
                let transform = self
                    .interaction(TRANSFORM_INTERACTION)?
                    .ok_or_else(|| JsValue::from_str("no transform interaction"))?;
                for feature in features {
                    js::call2(&transform, "select", feature, &JsValue::TRUE)?;
                }
            }
            SelectMode::Hand => {
                self.try_clear_selection()?;
                let select = self
                    .interaction(SELECT_INTERACTION)?
                    .ok_or_else(|| JsValue::from_str("no select interaction"))?;
                // The select interaction has no public "add" API.
                let source = js::call0(&js::path(&select, &["featureOverlay_"])?, "getSource")?;
                let collection = js::call0(&source, "getFeaturesCollection")?;
                for feature in features {
                    js::call1(&collection, "push", feature)?;
                }
            }
        }
        Ok(())
    }

    fn map_layers(&self) -> Result<Vec<JsValue>, JsValue> {
        let layers = js::call0(&js::call0(&self.map()?, "getLayers")?, "getArray")?;
        Ok(js::array(layers)?.to_vec())
    }

    fn source(&self, layer: LayerId) -> Result<JsValue, JsValue> {
        let layer = self
            .layer(layer)
            .ok_or_else(|| JsValue::from_str(&format!("unknown layer {layer}")))?;
        js::call0(&layer, "getSource")
    }

    fn try_layer_features(&self, layer: LayerId) -> Result<Vec<JsValue>, JsValue> {
        let features = js::call0(&self.source(layer)?, "getFeatures")?;
        Ok(js::array(features)?.to_vec())
    }

    fn try_geometry(&self, feature: FeatureId) -> Result<Geometry, JsValue> {
        let feature = self.require(feature)?;
        read_geometry(&js::call0(&feature, "getGeometry")?)
    }

    fn try_style(&self, feature: FeatureId) -> Result<IgnStyle, JsValue> {
        let style = js::call0(&self.require(feature)?, "getIgnStyle")?;
        if style.is_undefined() || style.is_null() {
            return Ok(IgnStyle::new());
        }
        serde_json::from_value(js::to_json(&style)?).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn try_set_style(&self, feature: FeatureId, style: &IgnStyle) -> Result<(), JsValue> {
        let value = serde_json::to_value(style).map_err(|e| JsValue::from_str(&e.to_string()))?;
        js::call1(&self.require(feature)?, "setIgnStyle", &js::from_json(&value)?)?;
        Ok(())
    }

    fn try_create(&self, geometry: &Geometry) -> Result<JsValue, JsValue> {
        let options = js_sys::Object::new();
        js::set(&options, "geometry", &write_geometry(geometry)?)?;
        js::construct(&js::path(&js::ol()?, &["Feature"])?, &[options.into()])
    }

    fn require(&self, feature: FeatureId) -> Result<JsValue, JsValue> {
        self.feature(feature)
            .ok_or_else(|| JsValue::from_str(&format!("unknown feature {feature}")))
    }

    fn try_center(&self) -> Result<Point, JsValue> {
        read_point(&js::call0(&self.view()?, "getCenter")?)
            .ok_or_else(|| JsValue::from_str("view has no center"))
    }

    fn try_geodesic_length(&self, line: &[Point]) -> Result<f64, JsValue> {
        let geometry = write_geometry(&Geometry::LineString(line.to_vec()))?;
        let sphere = js::path(&js::ol()?, &["sphere"])?;
        js::call1(&sphere, "getLength", &geometry)?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("getLength returned no number"))
    }
}

/// Log a failed host call and fall back to `default`.
fn or_warn<T>(what: &str, result: Result<T, JsValue>, default: T) -> T {
    result.unwrap_or_else(|err| {
        log::warn!("{what} failed: {}", js::describe(&err));
        default
    })
}

impl SelectionProvider for MacarteHost {
    fn selected(&self) -> Vec<FeatureId> {
        or_warn("reading the selection", self.try_selected(), Vec::new())
            .iter()
            .map(|f| self.feature_id(f))
            .collect()
    }

    fn clear_selection(&mut self) {
        or_warn("clearing the selection", self.try_clear_selection(), ());
    }

    fn select(&mut self, ids: &[FeatureId], mode: SelectMode) {
        let features: Vec<JsValue> = ids.iter().filter_map(|id| self.feature(*id)).collect();
        or_warn("selecting", self.try_select(&features, mode), ());
    }
}

impl LayerSource for MacarteHost {
    fn layers(&self) -> Vec<LayerInfo> {
        or_warn("listing layers", self.map_layers(), Vec::new())
            .iter()
            .map(|layer| {
                let vector = js::call0(layer, "getType")
                    .ok()
                    .and_then(|t| t.as_string())
                    .is_some_and(|t| t == "vector");
                let name = js::call1(layer, "get", &JsValue::from_str("name"))
                    .ok()
                    .and_then(|n| n.as_string())
                    .unwrap_or_default();
                LayerInfo {
                    id: self.layer_id(layer),
                    name,
                    kind: if vector { LayerKind::Vector } else { LayerKind::Other },
                }
            })
            .collect()
    }

    fn active_layer(&self) -> Option<LayerId> {
        let layer = self
            .carte()
            .and_then(|carte| js::call0(&carte, "getCurrentLayerDessin"));
        or_warn("reading the drawing layer", layer.map(Some), None)
            .filter(JsValue::is_truthy)
            .map(|l| self.layer_id(&l))
    }

    fn layer_features(&self, layer: LayerId) -> Vec<FeatureId> {
        or_warn("listing layer features", self.try_layer_features(layer), Vec::new())
            .iter()
            .map(|f| self.feature_id(f))
            .collect()
    }

    fn add_to_layer(&mut self, layer: LayerId, feature: FeatureId) {
        let result = self
            .require(feature)
            .and_then(|f| js::call1(&self.source(layer)?, "addFeature", &f));
        or_warn("adding a feature", result.map(drop), ());
    }

    fn remove_from_layer(&mut self, layer: LayerId, feature: FeatureId) -> bool {
        let Some(object) = self.feature(feature) else {
            return false;
        };
        let result = self.try_layer_features(layer).and_then(|features| {
            if !features.iter().any(|f| js_sys::Object::is(f, &object)) {
                return Ok(false);
            }
            js::call1(&self.source(layer)?, "removeFeature", &object)?;
            Ok(true)
        });
        or_warn("removing a feature", result, false)
    }
}

impl FeatureAccess for MacarteHost {
    fn geometry(&self, feature: FeatureId) -> Option<Geometry> {
        self.try_geometry(feature)
            .map_err(|err| log::warn!("reading geometry of {feature}: {}", js::describe(&err)))
            .ok()
    }

    fn set_geometry(&mut self, feature: FeatureId, geometry: Geometry) {
        let result = self.require(feature).and_then(|f| {
            js::call1(&f, "setGeometry", &write_geometry(&geometry)?)?;
            Ok(())
        });
        or_warn("writing geometry", result, ());
    }

    fn style(&self, feature: FeatureId) -> Option<IgnStyle> {
        self.try_style(feature)
            .map_err(|err| log::warn!("reading style of {feature}: {}", js::describe(&err)))
            .ok()
    }

    fn set_style(&mut self, feature: FeatureId, style: IgnStyle) {
        or_warn("writing style", self.try_set_style(feature, &style), ());
    }

    fn clone_feature(&mut self, feature: FeatureId) -> Option<FeatureId> {
        let clone = self
            .require(feature)
            .and_then(|f| js::call0(&f, "clone"))
            .map_err(|err| log::warn!("cloning {feature}: {}", js::describe(&err)))
            .ok()?;
        Some(self.feature_id(&clone))
    }

    fn create_feature(&mut self, geometry: Geometry) -> FeatureId {
        match self.try_create(&geometry) {
            Ok(feature) => self.feature_id(&feature),
            Err(err) => {
                // The id stays unknown to the host; later calls on it are no-ops.
                log::warn!("creating a feature failed: {}", js::describe(&err));
                FeatureId::fresh()
            }
        }
    }

    fn changed(&mut self, feature: FeatureId) {
        let result = self.require(feature).and_then(|f| js::call0(&f, "changed"));
        or_warn("notifying a change", result.map(drop), ());
    }

    fn release(&mut self, feature: FeatureId) {
        self.features.remove(feature.as_str());
    }
}

impl Viewport for MacarteHost {
    fn center(&self) -> Point {
        or_warn("reading the view center", self.try_center(), Point::ORIGIN)
    }

    fn rotation(&self) -> f64 {
        let rotation = self.view().and_then(|v| js::call0(&v, "getRotation"));
        or_warn("reading the view rotation", rotation, JsValue::from_f64(0.0))
            .as_f64()
            .unwrap_or(0.0)
    }

    fn set_rotation(&mut self, radians: f64) {
        let result = self
            .view()
            .and_then(|v| js::call1(&v, "setRotation", &JsValue::from_f64(radians)));
        or_warn("rotating the view", result.map(drop), ());
    }

    fn geodesic_length(&self, line: &[Point]) -> f64 {
        self.try_geodesic_length(line).unwrap_or_else(|err| {
            log::debug!("ol.sphere unavailable ({}), measuring locally", js::describe(&err));
            imu_core::sphere::line_length(line)
        })
    }
}

impl Notifier for MacarteHost {
    fn message(&mut self, text: &str, duration_ms: Option<u32>) {
        let duration = duration_ms.unwrap_or(self.message_duration_ms);
        let result = self.wdialog().and_then(|dialog| {
            js::call3(
                &dialog,
                "msgInfo",
                &JsValue::from_str(text),
                &JsValue::from(duration),
                &JsValue::NULL,
            )
        });
        or_warn("showing a message", result.map(drop), ());
    }
}
