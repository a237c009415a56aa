//! WASM bindings for use from a browser console.
//!
//! ```js
//! const tag = (strings, ...values) => printh([...strings], values);
//! console.log(...tag`Hello, <em>${name}</em>`);
//! ```

use wasm_bindgen::prelude::*;

use crate::printh_generate::printh;
use crate::template::STYLESHEET_DIRECTIVE;
use crate::{Stylesheet, Template, Value};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert a tagged template's strings and substitutions into the
/// arguments for `console.log`.
///
/// An object following a leading `%s` string is read as the stylesheet.
#[wasm_bindgen(js_name = printh)]
pub fn printh_js(parts: Vec<JsValue>, values: Vec<JsValue>) -> Vec<JsValue> {
    let parts: Vec<String> = parts
        .iter()
        .map(|part| part.as_string().unwrap_or_default())
        .collect();
    let values = to_values(&parts, &values);

    printh::generate(&Template::new(parts, values))
        .into_vec()
        .into_iter()
        .map(JsValue::from)
        .collect()
}

/// Like `printh`, with a JSON stylesheet in place of the built-in one.
#[wasm_bindgen(js_name = printhWithStylesheet)]
pub fn printh_with_stylesheet(
    stylesheet_json: &str,
    parts: Vec<JsValue>,
    values: Vec<JsValue>,
) -> Result<Vec<JsValue>, JsValue> {
    let sheet =
        Stylesheet::from_json(stylesheet_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let parts: Vec<String> = parts
        .iter()
        .map(|part| part.as_string().unwrap_or_default())
        .collect();
    let values = to_values(&parts, &values);

    let template = Template::new(parts, values).with_stylesheet(sheet);
    Ok(printh::generate(&template)
        .into_vec()
        .into_iter()
        .map(JsValue::from)
        .collect())
}

fn to_values(parts: &[String], values: &[JsValue]) -> Vec<Value> {
    convert_values(parts, values, stylesheet_value, text_value)
}

/// Only the value right after a leading `%s` may be read as a stylesheet;
/// every other value is stringified and escaped like any text.
fn convert_values<T>(
    parts: &[String],
    values: &[T],
    as_stylesheet: impl Fn(&T) -> Option<Stylesheet>,
    as_text: impl Fn(&T) -> String,
) -> Vec<Value> {
    let directive = parts.first().map(String::as_str) == Some(STYLESHEET_DIRECTIVE);
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if directive && index == 0 {
                if let Some(sheet) = as_stylesheet(value) {
                    return Value::Stylesheet(sheet);
                }
            }
            Value::Text(as_text(value))
        })
        .collect()
}

fn stylesheet_value(value: &JsValue) -> Option<Stylesheet> {
    if !value.is_object() {
        return None;
    }
    let json = js_sys::JSON::stringify(value).ok()?.as_string()?;
    Stylesheet::from_json(&json).ok()
}

/// Stringify the way a template literal would: JS decides how numbers,
/// booleans and objects print.
fn text_value(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_null() {
        return "null".to_string();
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    String::from(js_sys::Object::from(value.clone()).to_string())
}
