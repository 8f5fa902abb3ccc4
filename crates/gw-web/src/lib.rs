//! Browser bindings for the Groundwork site
//!
//! Provides `WebHal`, the `web-sys` implementation of the ambient signal HAL,
//! and `#[wasm_bindgen]` handles exposing each controller to the React
//! presentational layer. Handles take options as JSON strings, call a JS
//! callback on every change and return snapshots as JSON.

use wasm_bindgen::prelude::*;

pub mod handles;
pub mod hal;
pub mod util;

pub use hal::{shared_hal, WebHal};
pub use handles::*;

/// Module entry point
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    util::log("[groundwork] Motion runtime loaded");
}
