//! Entrance reveal handle

use gw_motion::{RevealOptions, StaggerPlan};
use gw_observers::{Lifecycle, RevealCoordinator};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, parse_options, to_json};

#[wasm_bindgen]
pub struct Reveal {
    coordinator: RevealCoordinator<WebHal>,
}

#[wasm_bindgen]
impl Reveal {
    /// `options_json`: `{ "threshold": 0.2, "rootMargin": "...", "delayMs": 0 }`
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<Reveal, JsValue> {
        let options: RevealOptions = parse_options(options_json)?;
        Ok(Self {
            coordinator: RevealCoordinator::new(shared_hal(), options),
        })
    }

    /// Reveal for child `index` of a staggered group
    pub fn staggered(options_json: &str, plan_json: &str, index: u32) -> Result<Reveal, JsValue> {
        let base: RevealOptions = parse_options(options_json)?;
        let plan: StaggerPlan = parse_options(plan_json)?;
        Ok(Self {
            coordinator: RevealCoordinator::new(shared_hal(), plan.reveal_options(index, &base)),
        })
    }

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

    pub fn bind(&mut self, target: Option<Element>) {
        self.coordinator.bind(target);
    }

    pub fn configure(&mut self, options_json: &str) -> Result<(), JsValue> {
        let options: RevealOptions = parse_options(options_json)?;
        self.coordinator.configure(options);
        Ok(())
    }

    #[wasm_bindgen(getter = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.coordinator.is_visible()
    }

    #[wasm_bindgen(getter = isReady)]
    pub fn is_ready(&self) -> bool {
        self.coordinator.is_ready()
    }

    /// `{ "phase": "hidden" | "pendingVisible" | "visible" | "settled", "isVisible", "isReady" }`
    pub fn snapshot(&self) -> String {
        to_json(&self.coordinator.snapshot())
    }

    /// `callback(snapshotJson: string)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.coordinator.on_change(move |snapshot| {
            invoke(&callback, &JsValue::from_str(&to_json(snapshot)));
        });
    }
}
