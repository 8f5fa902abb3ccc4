//! Reduced-motion preference handle

use gw_observers::{Lifecycle, MotionPreferenceMonitor};
use wasm_bindgen::prelude::*;

use crate::hal::{shared_hal, WebHal};
use crate::util::invoke;

#[wasm_bindgen]
pub struct MotionPreference {
    monitor: MotionPreferenceMonitor<WebHal>,
}

#[wasm_bindgen]
impl MotionPreference {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            monitor: MotionPreferenceMonitor::new(shared_hal()),
        }
    }

    pub fn mount(&mut self) {
        self.monitor.mount();
    }

    pub fn unmount(&mut self) {
        self.monitor.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.monitor.is_mounted()
    }

    /// `true` until the preference has been read
    #[wasm_bindgen(getter = prefersReducedMotion)]
    pub fn prefers_reduced_motion(&self) -> bool {
        self.monitor.prefers_reduced_motion()
    }

    /// `callback(prefersReducedMotion: boolean)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.monitor
            .on_change(move |reduced| invoke(&callback, &JsValue::from_bool(*reduced)));
    }
}

impl Default for MotionPreference {
    fn default() -> Self {
        Self::new()
    }
}
