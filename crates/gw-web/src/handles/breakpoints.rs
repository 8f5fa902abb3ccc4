//! Viewport breakpoint handle

use gw_motion::Breakpoint;
use gw_observers::{BreakpointTracker, Lifecycle};
use wasm_bindgen::prelude::*;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, to_json};

#[wasm_bindgen]
pub struct Breakpoints {
    tracker: BreakpointTracker<WebHal>,
}

#[wasm_bindgen]
impl Breakpoints {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            tracker: BreakpointTracker::new(shared_hal()),
        }
    }

    pub fn mount(&mut self) {
        self.tracker.mount();
    }

    pub fn unmount(&mut self) {
        self.tracker.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.tracker.is_mounted()
    }

    /// Current tier name (`"xs"` .. `"2xl"`)
    #[wasm_bindgen(getter)]
    pub fn breakpoint(&self) -> String {
        self.tracker.breakpoint().name().to_string()
    }

    /// Whether the viewport is at least `name`; unknown names are rejected
    #[wasm_bindgen(js_name = isBreakpoint)]
    pub fn is_breakpoint(&self, name: &str) -> Result<bool, JsValue> {
        let bp = Breakpoint::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown breakpoint: {}", name)))?;
        Ok(self.tracker.is_breakpoint(bp))
    }

    #[wasm_bindgen(getter = isMobile)]
    pub fn is_mobile(&self) -> bool {
        self.tracker.is_mobile()
    }

    #[wasm_bindgen(getter = isTablet)]
    pub fn is_tablet(&self) -> bool {
        self.tracker.is_tablet()
    }

    #[wasm_bindgen(getter = isDesktop)]
    pub fn is_desktop(&self) -> bool {
        self.tracker.is_desktop()
    }

    /// `{ "breakpoint", "isMobile", "isTablet", "isDesktop", ... }`
    pub fn snapshot(&self) -> String {
        to_json(&self.tracker.snapshot())
    }

    /// `callback(snapshotJson: string)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.tracker.on_change(move |snapshot| {
            invoke(&callback, &JsValue::from_str(&to_json(snapshot)));
        });
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new()
    }
}
