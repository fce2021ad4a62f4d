//! Toolbar buttons and document-level bindings.

use crate::{Shared, dispatch};
use imu_editor::config::Variant;
use imu_editor::host::SelectionProvider;
use imu_editor::shortcuts::{ShortcutAction, ShortcutMap};
use imu_editor::toolbar::{ButtonIcon, ToolbarAction, ToolbarButton, buttons, clipboard_bindings};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

/// MaCarte's drawing toolbox.
pub const TOOLBOX_ID: &str = "drawToolBox";

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// The toolbox's inner container, where tools live.
pub fn toolbox_inner() -> Option<Element> {
    document()?
        .get_element_by_id(TOOLBOX_ID)?
        .first_element_child()
}

/// Switch the host tool by clicking the toolbox entry with `data-mode`.
pub fn enable_mode(mode: &str) {
    let Some(inner) = toolbox_inner() else {
        log::warn!("no #{TOOLBOX_ID}, cannot switch to {mode}");
        return;
    };
    let children = inner.children();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        if child.get_attribute("data-mode").as_deref() == Some(mode) {
            if let Some(tool) = child.dyn_ref::<HtmlElement>() {
                tool.click();
            }
            return;
        }
    }
    log::debug!("toolbox has no {mode} mode");
}

/// Whether the event was aimed at the page body, i.e. at the map rather
/// than at a text field somewhere else.
fn targets_body(event: &Event, document: &Document) -> bool {
    match (event.target(), document.body()) {
        (Some(target), Some(body)) => js_sys::Object::is(&target, &body),
        _ => false,
    }
}

// ─── Toolbar ─────────────────────────────────────────────────────────────

fn tool_element(document: &Document) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element("i")?.dyn_into::<HtmlElement>()?)
}

fn separator(document: &Document) -> Result<HtmlElement, JsValue> {
    let element = tool_element(document)?;
    let style = element.style();
    style.set_property("border-left", "solid black 1px")?;
    style.set_property("padding-right", "0")?;
    style.set_property("padding-left", "0")?;
    style.set_property("margin", "0 4px")?;
    Ok(element)
}

fn button(document: &Document, spec: &ToolbarButton) -> Result<HtmlElement, JsValue> {
    let element = tool_element(document)?;
    element.set_title(spec.title);
    element.style().set_property("min-width", "22px")?;
    element.class_list().add_2("tool", "fa")?;
    match spec.icon {
        ButtonIcon::FontAwesome(class) => element.class_list().add_1(class)?,
        ButtonIcon::Text(glyph) => {
            element.style().set_property("font-weight", "bold")?;
            element.set_inner_text(glyph);
        }
    }
    Ok(element)
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    // Listeners stay for the page lifetime.
    callback.forget();
    Ok(())
}

/// Append the separator and the variant's buttons, then bind the
/// clipboard events they answer to.
pub fn install_toolbar(state: &Shared, variant: Variant) -> Result<(), JsValue> {
    let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
    let inner = toolbox_inner().ok_or_else(|| JsValue::from_str("no toolbox"))?;

    let sep = separator(&document)?;
    inner.append_child(&sep)?;
    for spec in buttons(variant) {
        let element = button(&document, spec)?;
        let state = state.clone();
        let action = spec.action;
        listen(&element, "click", move |_: Event| dispatch(&state, action))?;
        inner.append_child(&element)?;
    }

    for (event, action) in clipboard_bindings(variant) {
        let state = state.clone();
        let doc = document.clone();
        listen(&document, event.event_name(), move |e: Event| {
            if targets_body(&e, &doc) {
                e.prevent_default();
                dispatch(&state, action);
            }
        })?;
    }
    log::debug!("{} toolbar button(s) added", buttons(variant).len());
    Ok(())
}

/// Keyboard shortcuts on the map.
pub fn bind_shortcuts(state: &Shared) -> Result<(), JsValue> {
    let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
    let doc = document.clone();
    let state = state.clone();
    listen(&document, "keydown", move |e: Event| {
        let Some(e) = e.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if !targets_body(e, &doc) {
            return;
        }
        let resolved = ShortcutMap::resolve(&e.key(), e.ctrl_key(), e.shift_key(), e.alt_key(), e.meta_key());
        match resolved {
            Some(ShortcutAction::Delete) => {
                e.prevent_default();
                dispatch(&state, ToolbarAction::Delete);
            }
            Some(ShortcutAction::Deselect) => match state.try_borrow_mut() {
                Ok(mut ext) => ext.host.clear_selection(),
                Err(_) => log::debug!("escape ignored while an action runs"),
            },
            None => {}
        }
    })
}
