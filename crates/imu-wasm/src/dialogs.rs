//! Wizard forms and prompts shown through MaCarte's `wdialog`.
//!
//! Forms stay open on invalid input; a successful submit hides them.

use crate::host::MacarteHost;
use crate::{Shared, js, report};
use imu_editor::actions::{DeleteRequest, MoveRequest, delete_selection, move_to_layer};
use imu_editor::info::FeatureReport;
use imu_editor::wizards::{self, RectangleRequest, SegmentRequest};
use imu_core::LayerId;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

/// What to show once an action has validated its preconditions.
pub enum Dialog {
    Rectangle,
    Segment,
    /// Pre-filled with the current rotation, in degrees.
    Orientation(f64),
    ConfirmDelete(DeleteRequest),
    MoveToLayer(MoveRequest),
    Info(FeatureReport),
}

const RECTANGLE_FORM: &str = r#"
<h3>Créer un rectangle</h3>
<form id="addRectangleForm">
    <label>Largeur (m) : <input id="addRectangleWidth" required></input></label><br/>
    <label>Hauteur (m) : <input id="addRectangleHeight" required></input></label><br/>
    <label>Rotation horaire (°) : <input id="addRectangleAngle" value="0" required></input></label><br/>
    <button type="submit" class="bouton">Créer le rectangle</button>
</form>
"#;

const SEGMENT_FORM: &str = r#"
<h3>Créer un segment</h3>
<form id="addSegmentForm">
    <label>Longeur (m) : <input id="addSegmentLength" required></input></label><br/>
    <label>Rotation horaire depuis l'horizontale (°) : <input id="addSegmentAngle" value="0" required></input></label><br/>
    <button type="submit" class="bouton">Créer le segment</button>
</form>
"#;

const ORIENTATION_FORM: &str = r#"
<h3>Changer l'orientation de la carte</h3>
<form id="setMapOrientationForm">
    <label>Orientation de la carte (°) : <input id="setMapOrientationValue" required></input></label><br/>
    <br/>
    <strong>Exemples de valeurs:</strong><br/>
    <ul>
        <li>• 0°: Le nord en haut</li>
        <li>• 45°: Le nord-ouest en haut</li>
        <li>• 90°: L'ouest en haut</li>
        <li>• -90°: L'est en haut</li>
    </ul>
    <button type="submit" class="bouton">Orienter la carte</button>
</form>
"#;

const MOVE_FORM: &str = r#"
<h3>Changer le calque pour les <span id="moveToLayerSelectionLength"></span> objet(s) sélectionnés</h3>
<form id="moveToLayerForm">
    <label>Calque de destination : <select required id="moveToLayerSelect"></select></label><br/>
    <button type="submit" class="bouton">Déplacer vers ce calque</button>
</form>
"#;

pub fn open(state: &Shared, dialog: Dialog) -> Result<(), JsValue> {
    match dialog {
        Dialog::Rectangle => open_rectangle(state),
        Dialog::Segment => open_segment(state),
        Dialog::Orientation(degrees) => open_orientation(state, degrees),
        Dialog::ConfirmDelete(request) => confirm_delete(state, request),
        Dialog::MoveToLayer(request) => open_move_to_layer(state, request),
        Dialog::Info(report) => show_info(state, &report),
    }
}

// ─── wdialog ─────────────────────────────────────────────────────────────

fn show(host: &MacarteHost, html: &str, width: u32) -> Result<(), JsValue> {
    let options = js_sys::Object::new();
    js::set(&options, "modal", &JsValue::FALSE)?;
    js::set(&options, "width", &JsValue::from(width))?;
    js::set(&options, "class", &JsValue::from_str("wizzard"))?;
    js::call2(&host.wdialog()?, "show", &JsValue::from_str(html), &options)?;
    Ok(())
}

fn hide(host: &MacarteHost) {
    if let Err(err) = host.wdialog().and_then(|d| js::call0(&d, "hide")) {
        log::warn!("hiding the dialog failed: {}", js::describe(&err));
    }
}

// ─── DOM helpers ─────────────────────────────────────────────────────────

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element<T: JsCast>(id: &str) -> Result<T, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected type")))
}

fn input_value(id: &str) -> String {
    element::<HtmlInputElement>(id)
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Run `handler` on every submit of form `id`, without navigating away.
fn on_submit(id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let form = element::<HtmlElement>(id)?;
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        handler();
    });
    form.set_onsubmit(Some(callback.as_ref().unchecked_ref()));
    // The form lives as long as the dialog; the host may reopen it later.
    callback.forget();
    Ok(())
}

// ─── Wizards ─────────────────────────────────────────────────────────────

fn open_rectangle(state: &Shared) -> Result<(), JsValue> {
    show(&state.borrow().host, RECTANGLE_FORM, 400)?;
    let state = state.clone();
    on_submit("addRectangleForm", move || {
        let request = RectangleRequest::parse(
            &input_value("addRectangleWidth"),
            &input_value("addRectangleHeight"),
            &input_value("addRectangleAngle"),
        );
        let mut guard = state.borrow_mut();
        let ext = &mut *guard;
        let result = request.and_then(|request| {
            hide(&ext.host);
            wizards::add_rectangle(&ext.session, &mut ext.host, request)
        });
        match result {
            Ok(feature) => log::debug!("rectangle {feature} added"),
            Err(err) => report(&mut ext.host, &err),
        }
    })
}

fn open_segment(state: &Shared) -> Result<(), JsValue> {
    show(&state.borrow().host, SEGMENT_FORM, 400)?;
    let state = state.clone();
    on_submit("addSegmentForm", move || {
        let request = SegmentRequest::parse(
            &input_value("addSegmentLength"),
            &input_value("addSegmentAngle"),
        );
        let mut guard = state.borrow_mut();
        let ext = &mut *guard;
        let result = request.and_then(|request| {
            hide(&ext.host);
            wizards::add_segment(&ext.session, &mut ext.host, request)
        });
        match result {
            Ok(feature) => log::debug!("segment {feature} added"),
            Err(err) => report(&mut ext.host, &err),
        }
    })
}

fn open_orientation(state: &Shared, current_degrees: f64) -> Result<(), JsValue> {
    show(&state.borrow().host, ORIENTATION_FORM, 400)?;
    element::<HtmlInputElement>("setMapOrientationValue")?.set_value(&current_degrees.to_string());
    let state = state.clone();
    on_submit("setMapOrientationForm", move || {
        let raw = input_value("setMapOrientationValue");
        let mut guard = state.borrow_mut();
        let host = &mut guard.host;
        match wizards::set_map_orientation(host, &raw) {
            Ok(degrees) => {
                hide(host);
                log::debug!("map oriented to {degrees}°");
            }
            Err(err) => report(host, &err),
        }
    })
}

// ─── Selection utilities ─────────────────────────────────────────────────

fn confirm_delete(state: &Shared, request: DeleteRequest) -> Result<(), JsValue> {
    let prompt = request.prompt();
    let on_accept = {
        let state = state.clone();
        Closure::once_into_js(move || {
            let mut guard = state.borrow_mut();
            delete_selection(&mut guard.host, &request);
            hide(&guard.host);
        })
    };
    let on_cancel = {
        let state = state.clone();
        Closure::once_into_js(move || hide(&state.borrow().host))
    };
    let dialog = state.borrow().host.wdialog()?;
    js::call3(&dialog, "msgChoice", &JsValue::from_str(&prompt), &on_accept, &on_cancel)?;
    Ok(())
}

fn open_move_to_layer(state: &Shared, request: MoveRequest) -> Result<(), JsValue> {
    show(&state.borrow().host, MOVE_FORM, 600)?;
    element::<HtmlElement>("moveToLayerSelectionLength")?
        .set_inner_text(&request.features.len().to_string());

    let select = element::<HtmlSelectElement>("moveToLayerSelect")?;
    for layer in &request.targets {
        let option = HtmlOptionElement::new_with_text_and_value(&layer.name, layer.id.as_str())?;
        select.add_with_html_option_element(&option)?;
    }

    let state = state.clone();
    on_submit("moveToLayerForm", move || {
        let target = LayerId::intern(&select.value());
        let mut guard = state.borrow_mut();
        let host = &mut guard.host;
        match move_to_layer(host, &request, target) {
            Ok(()) => hide(host),
            Err(err) => report(host, &err),
        }
    })
}

fn show_info(state: &Shared, report: &FeatureReport) -> Result<(), JsValue> {
    let html = format!(
        "<h3>Informations sur l'objet sélectionné</h3><div id=\"showInfoDiv\">{}</div>",
        report.to_html()
    );
    show(&state.borrow().host, &html, 600)
}
