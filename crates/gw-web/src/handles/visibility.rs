//! Intersection visibility handle

use gw_motion::IntersectionConfig;
use gw_observers::{Lifecycle, VisibilityObserver};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::hal::{shared_hal, WebHal};
use crate::util::{invoke, parse_options};

#[wasm_bindgen]
pub struct Visibility {
    observer: VisibilityObserver<WebHal>,
}

#[wasm_bindgen]
impl Visibility {
    /// `config_json`: `{ "threshold": 0.1, "rootMargin": "0%", "freezeOnceVisible": true }`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Visibility, JsValue> {
        let config: IntersectionConfig = parse_options(config_json)?;
        Ok(Self {
            observer: VisibilityObserver::new(shared_hal(), config),
        })
    }

    pub fn mount(&mut self) {
        self.observer.mount();
    }

    pub fn unmount(&mut self) {
        self.observer.unmount();
    }

    #[wasm_bindgen(getter = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.observer.is_mounted()
    }

    /// Observe `target` instead of the current one (`null` detaches)
    pub fn bind(&mut self, target: Option<Element>) {
        self.observer.bind(target);
    }

    /// Containment scope (`null` = the viewport)
    #[wasm_bindgen(js_name = setRoot)]
    pub fn set_root(&mut self, root: Option<Element>) {
        self.observer.set_root(root);
    }

    pub fn configure(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config: IntersectionConfig = parse_options(config_json)?;
        self.observer.configure(config);
        Ok(())
    }

    #[wasm_bindgen(getter = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.observer.is_visible()
    }

    #[wasm_bindgen(getter = isIntersecting)]
    pub fn is_intersecting(&self) -> bool {
        self.observer.is_intersecting()
    }

    /// `callback(isVisible: boolean)`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.observer
            .on_change(move |visible| invoke(&callback, &JsValue::from_bool(*visible)));
    }
}
