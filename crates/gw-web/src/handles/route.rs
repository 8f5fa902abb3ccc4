//! Route fade transition handle

use gw_observers::{Lifecycle, RouteTransitionCoordinator};
use wasm_bindgen::prelude::*;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, to_json};

#[wasm_bindgen]
pub struct RouteTransition {
    coordinator: RouteTransitionCoordinator<WebHal>,
}

#[wasm_bindgen]
impl RouteTransition {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            coordinator: RouteTransitionCoordinator::new(shared_hal()),
        }
    }

    /// Starts from `location.pathname` and follows `popstate`
    pub fn mount(&mut self) {
        self.coordinator.mount();
    }

    pub fn unmount(&mut self) {
        self.coordinator.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.coordinator.is_mounted()
    }

    /// Report a client-side navigation the router performed
    #[wasm_bindgen(js_name = setPath)]
    pub fn set_path(&self, path: &str) {
        self.coordinator.set_path(path);
    }

    #[wasm_bindgen(getter)]
    pub fn opacity(&self) -> f32 {
        self.coordinator.opacity()
    }

    /// `{ "phase": "exiting" | "entering" | "visible", ... }` or `null` before the first route
    #[wasm_bindgen(js_name = transitionState)]
    pub fn transition_state(&self) -> String {
        match self.coordinator.state() {
            Some(state) => to_json(&state),
            None => "null".to_string(),
        }
    }

    /// `callback(stateJson: string)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.coordinator.on_change(move |state| {
            invoke(&callback, &JsValue::from_str(&to_json(state)));
        });
    }
}

impl Default for RouteTransition {
    fn default() -> Self {
        Self::new()
    }
}
