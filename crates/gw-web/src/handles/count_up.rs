//! Numeric count-up handle

use gw_motion::CountUpOptions;
use gw_observers::{CountUpAnimator, Lifecycle};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, parse_options, to_json};

#[wasm_bindgen]
pub struct CountUp {
    animator: CountUpAnimator<WebHal>,
}

#[wasm_bindgen]
impl CountUp {
    /// `options_json`: `{ "end": 250, "durationMs": 2000, "suffix": "+", ... }`
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<CountUp, JsValue> {
        let options: CountUpOptions = parse_options(options_json)?;
        Ok(Self {
            animator: CountUpAnimator::new(shared_hal(), options),
        })
    }

    pub fn mount(&mut self) {
        self.animator.mount();
    }

    pub fn unmount(&mut self) {
        self.animator.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.animator.is_mounted()
    }

    pub fn bind(&mut self, target: Option<Element>) {
        self.animator.bind(target);
    }

    pub fn configure(&mut self, options_json: &str) -> Result<(), JsValue> {
        let options: CountUpOptions = parse_options(options_json)?;
        self.animator.configure(options);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> f64 {
        self.animator.value()
    }

    /// Value with prefix, separators, decimals and suffix applied
    #[wasm_bindgen(getter)]
    pub fn formatted(&self) -> String {
        self.animator.formatted()
    }

    #[wasm_bindgen(getter = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Current options as JSON
    pub fn options(&self) -> String {
        to_json(&self.animator.options())
    }

    /// `callback(value: number)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.animator
            .on_change(move |value| invoke(&callback, &JsValue::from_f64(*value)));
    }
}
