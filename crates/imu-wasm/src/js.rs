//! Untyped access to host objects.
//!
//! MaCarte and its OpenLayers build expose no bindings, so everything goes
//! through `Reflect` by property and method name.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

pub fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

pub fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

/// `target[path[0]][path[1]]...`, failing on the first missing step.
pub fn path(target: &JsValue, path: &[&str]) -> Result<JsValue, JsValue> {
    path.iter().try_fold(target.clone(), |value, key| {
        let next = get(&value, key)?;
        if next.is_undefined() || next.is_null() {
            return Err(JsValue::from_str(&format!("missing property {key}")));
        }
        Ok(next)
    })
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    get(target, name)?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("{name} is not a function")))
}

pub fn call0(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    method(target, name)?.call0(target)
}

pub fn call1(target: &JsValue, name: &str, a: &JsValue) -> Result<JsValue, JsValue> {
    method(target, name)?.call1(target, a)
}

pub fn call2(target: &JsValue, name: &str, a: &JsValue, b: &JsValue) -> Result<JsValue, JsValue> {
    method(target, name)?.call2(target, a, b)
}

pub fn call3(
    target: &JsValue,
    name: &str,
    a: &JsValue,
    b: &JsValue,
    c: &JsValue,
) -> Result<JsValue, JsValue> {
    method(target, name)?.call3(target, a, b, c)
}

/// `new ctor(...args)`.
pub fn construct(ctor: &JsValue, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let ctor = ctor
        .dyn_ref::<Function>()
        .ok_or_else(|| JsValue::from_str("not a constructor"))?;
    let args: Array = args.iter().collect();
    Reflect::construct(ctor, &args)
}

/// `value` as an array, or an error when it is not one.
pub fn array(value: JsValue) -> Result<Array, JsValue> {
    if Array::is_array(&value) {
        Ok(value.unchecked_into())
    } else {
        Err(JsValue::from_str("expected an array"))
    }
}

/// Round-trip a plain JS value through JSON.
pub fn to_json(value: &JsValue) -> Result<serde_json::Value, JsValue> {
    let text: String = js_sys::JSON::stringify(value)?.into();
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn from_json(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

/// The `ol` global.
pub fn ol() -> Result<JsValue, JsValue> {
    path(&js_sys::global(), &["ol"])
}

/// Error text for logs.
pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
