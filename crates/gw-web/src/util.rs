//! Shared utilities for the browser bindings
//!
//! Console logging plus the JSON plumbing every handle uses at the JS
//! boundary.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Console.log binding for WASM
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Parse handle options from JSON
///
/// An empty string means "all defaults". Missing fields take their defaults.
pub fn parse_options<T: DeserializeOwned + Default>(json: &str) -> Result<T, JsValue> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

/// Serialize a snapshot for JS (`"null"` if it cannot be represented)
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Call a JS callback with one argument, logging a throw instead of propagating it
pub fn invoke(callback: &js_sys::Function, arg: &JsValue) {
    if let Err(e) = callback.call1(&JsValue::NULL, arg) {
        log(&format!("[groundwork] Change callback threw: {:?}", e));
    }
}
