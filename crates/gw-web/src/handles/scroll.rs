//! Scroll progress handle

use gw_motion::ScrollIndicatorOptions;
use gw_observers::{Lifecycle, ScrollProgressTracker};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, parse_options, to_json};

#[wasm_bindgen]
pub struct ScrollProgress {
    tracker: ScrollProgressTracker<WebHal>,
}

#[wasm_bindgen]
impl ScrollProgress {
    /// `options_json`: `{ "color": "#F59E0B", "height": 3, "zIndex": 50 }`
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<ScrollProgress, JsValue> {
        let options: ScrollIndicatorOptions = parse_options(options_json)?;
        Ok(Self {
            tracker: ScrollProgressTracker::new(shared_hal(), options),
        })
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

    /// Track `container` instead of the document (`null` = the document)
    #[wasm_bindgen(js_name = setContainer)]
    pub fn set_container(&mut self, container: Option<Element>) {
        self.tracker.set_container(container);
    }

    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options_json: &str) -> Result<(), JsValue> {
        let options: ScrollIndicatorOptions = parse_options(options_json)?;
        self.tracker.set_options(options);
        Ok(())
    }

    /// Progress in [0, 1]
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.tracker.progress()
    }

    /// `{ "scaleX", "color", "height", "zIndex" }`, or `null` under reduced motion
    pub fn indicator(&self) -> String {
        match self.tracker.indicator() {
            Some(indicator) => to_json(&indicator),
            None => "null".to_string(),
        }
    }

    /// `callback(progress: number)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.tracker
            .on_change(move |progress| invoke(&callback, &JsValue::from_f64(*progress)));
    }
}
