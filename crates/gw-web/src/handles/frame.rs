//! Animation frame loop handle

use gw_observers::{FrameScheduler, Lifecycle};
use wasm_bindgen::prelude::*;

use crate::hal::{shared_hal, WebHal};
use crate::util::log;

#[wasm_bindgen]
pub struct FrameLoop {
    scheduler: FrameScheduler<WebHal>,
}

#[wasm_bindgen]
impl FrameLoop {
    /// Inactive loop with no callback
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            scheduler: FrameScheduler::new(shared_hal()),
        }
    }

    pub fn mount(&mut self) {
        self.scheduler.mount();
    }

    pub fn unmount(&mut self) {
        self.scheduler.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.scheduler.is_mounted()
    }

    /// `callback(timestamp: number, delta: number)`, replacing any previous one
    #[wasm_bindgen(js_name = setCallback)]
    pub fn set_callback(&self, callback: js_sys::Function) {
        self.scheduler.set_callback(move |tick| {
            let timestamp = JsValue::from_f64(tick.timestamp);
            let delta = JsValue::from_f64(tick.delta);
            if let Err(e) = callback.call2(&JsValue::NULL, &timestamp, &delta) {
                log(&format!("[frame] Frame callback threw: {:?}", e));
            }
        });
    }

    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&self, active: bool) {
        self.scheduler.set_active(active);
    }

    #[wasm_bindgen(getter = isActive)]
    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
