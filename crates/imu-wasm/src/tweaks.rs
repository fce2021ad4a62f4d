//! Adjustments to MaCarte's own layers and interactions.

use crate::{Shared, js};
use imu_core::{Geometry, GeometryKind};
use imu_editor::config::MultiSelectModifier;
use imu_editor::host::LayerSource;
use imu_editor::label::{LabelTransform, PatchRegistry, can_rotate_label};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Call `f` whenever `collection` gains or loses an element.
fn on_length_change(collection: &JsValue, f: impl FnMut() + 'static) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut()>::new(f);
    js::call2(
        collection,
        "addEventListener",
        &JsValue::from_str("change:length"),
        listener.as_ref(),
    )?;
    listener.forget();
    Ok(())
}

/// Run `f` once the current call stack has unwound.
fn defer(f: impl FnOnce() + 'static) {
    let scheduled = web_sys::window().map(|window| {
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            Closure::once_into_js(f).unchecked_ref(),
            0,
        )
    });
    if !matches!(scheduled, Some(Ok(_))) {
        log::warn!("could not schedule a deferred call");
    }
}

// ─── Labels ──────────────────────────────────────────────────────────────

/// Wrap the style function of every vector layer, now and whenever the
/// layer list changes, so labels scale with zoom and follow their shape.
pub fn init_style_tweaking(state: &Shared, ratio: f64) -> Result<(), JsValue> {
    let registry = Rc::new(RefCell::new(PatchRegistry::new()));
    let layers = js::call0(&state.borrow().host.map()?, "getLayers")?;
    {
        let state = state.clone();
        let registry = registry.clone();
        on_length_change(&layers, move || patch_layers(&state, &registry, ratio))?;
    }
    patch_layers(state, &registry, ratio);
    Ok(())
}

fn patch_layers(state: &Shared, registry: &Rc<RefCell<PatchRegistry>>, ratio: f64) {
    let Ok(ext) = state.try_borrow() else {
        // An action is running; catch up once it is done.
        let (state, registry) = (state.clone(), registry.clone());
        defer(move || patch_layers(&state, &registry, ratio));
        return;
    };
    let claimed = registry.borrow_mut().claim(&ext.host.layers());
    for id in claimed {
        let Some(layer) = ext.host.layer(id) else {
            continue;
        };
        match wrap_style(&layer, ratio) {
            Ok(()) => log::debug!("label style installed on layer {id}"),
            Err(err) => log::warn!("layer {id} keeps its style: {}", js::describe(&err)),
        }
    }
}

fn wrap_style(layer: &JsValue, ratio: f64) -> Result<(), JsValue> {
    let vector = js::path(layer, &["layerVector_"])?;
    let original = js::call0(&vector, "getStyle")?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str("style is not a function"))?;

    let wrapped = Closure::<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
        move |feature: JsValue, resolution: JsValue, clustered: JsValue| {
            let styles = original.call3(&JsValue::NULL, &feature, &resolution, &clustered)?;
            let resolution = resolution.as_f64().unwrap_or(1.0);
            apply_label_transform(&feature, &styles, resolution, ratio)?;
            Ok(styles)
        },
    );
    js::call1(&vector, "setStyle", &wrapped.into_js_value())?;
    Ok(())
}

fn apply_label_transform(
    feature: &JsValue,
    styles: &JsValue,
    resolution: f64,
    ratio: f64,
) -> Result<(), JsValue> {
    let geometry = label_geometry(feature);
    let transform = LabelTransform::for_feature(geometry.as_ref(), resolution, ratio);

    let styles = match js::array(styles.clone()) {
        Ok(array) => array.to_vec(),
        Err(_) => vec![styles.clone()],
    };
    for style in styles.iter().filter(|s| s.is_truthy()) {
        let text = js::call0(style, "getText")?;
        if text.is_truthy() {
            js::call1(&text, "setScale", &JsValue::from_f64(transform.scale))?;
            js::call1(&text, "setRotation", &JsValue::from_f64(transform.rotation))?;
        }
    }
    Ok(())
}

/// The feature's geometry, read only when its shape can turn the label.
/// Runs for every feature on every frame, so large shapes are rejected
/// from their type and vertex counts before any conversion.
fn label_geometry(feature: &JsValue) -> Option<Geometry> {
    let geometry = js::call0(feature, "getGeometry").ok().filter(JsValue::is_truthy)?;
    let kind = GeometryKind::from_name(&js::call0(&geometry, "getType").ok()?.as_string()?)?;
    if !matches!(kind, GeometryKind::LineString | GeometryKind::Polygon) {
        return None;
    }
    let coords = js::array(js::call0(&geometry, "getCoordinates").ok()?).ok()?;
    let ring_lengths: Vec<usize> = match kind {
        GeometryKind::Polygon => coords
            .iter()
            .map(|ring| js::array(ring).map_or(0, |r| r.length() as usize))
            .collect(),
        _ => vec![coords.length() as usize],
    };
    if !can_rotate_label(kind, &ring_lengths) {
        return None;
    }
    Geometry::from_json(kind, &js::to_json(&coords).ok()?)
}

// ─── Interactions ────────────────────────────────────────────────────────

/// The `ol.events.condition` the modifier corresponds to.
pub fn condition_name(modifier: MultiSelectModifier) -> Option<&'static str> {
    match modifier {
        MultiSelectModifier::Shift => Some("shiftKeyOnly"),
        MultiSelectModifier::Alt => Some("altKeyOnly"),
        MultiSelectModifier::Platform => Some("platformModifierKeyOnly"),
        MultiSelectModifier::None => None,
    }
}

/// Give every transform interaction the configured add-to-selection
/// condition, now and whenever the interaction list changes.
pub fn init_interaction_tweaking(state: &Shared, modifier: MultiSelectModifier) -> Result<(), JsValue> {
    let Some(name) = condition_name(modifier) else {
        return Ok(());
    };
    let ol = js::ol()?;
    let condition = js::path(&ol, &["events", "condition", name])?;
    let transform = js::path(&ol, &["interaction", "Transform"])?;
    let prototype = js::get(&transform, "prototype")?
        .dyn_into::<js_sys::Object>()
        .map_err(|_| JsValue::from_str("ol.interaction.Transform has no prototype"))?;
    let interactions = js::call0(&state.borrow().host.map()?, "getInteractions")?;

    let tweak = {
        let interactions = interactions.clone();
        move || {
            let result = js::call0(&interactions, "getArray")
                .and_then(js::array)
                .and_then(|all| {
                    for interaction in all.iter().filter(|i| prototype.is_prototype_of(i)) {
                        js::set(&interaction, "addFn_", &condition)?;
                    }
                    Ok(())
                });
            if let Err(err) = result {
                log::warn!("tweaking interactions failed: {}", js::describe(&err));
            }
        }
    };
    tweak();
    on_length_change(&interactions, tweak)?;
    log::debug!("transform add condition set to {name}");
    Ok(())
}
