//! Touch swipe handle
//!
//! Pure gesture tracking; the JS side forwards touch coordinates from its
//! own `touchstart`/`touchmove`/`touchend` handlers.

use std::rc::Rc;

use gw_hal::Hal;
use gw_motion::{SwipeOptions, SwipeTracker};
use wasm_bindgen::prelude::*;

use crate::hal::{shared_hal, WebHal};
use crate::util::{parse_options, to_json};

#[wasm_bindgen]
pub struct Swipe {
    hal: Rc<WebHal>,
    tracker: SwipeTracker,
}

#[wasm_bindgen]
impl Swipe {
    /// `options_json`: `{ "minSwipeDistance": 50, "maxSwipeTimeMs": 300 }`
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<Swipe, JsValue> {
        let options: SwipeOptions = parse_options(options_json)?;
        Ok(Self {
            hal: shared_hal(),
            tracker: SwipeTracker::new(options),
        })
    }

    pub fn start(&mut self, x: f64, y: f64) {
        let now = self.hal.now_ms();
        self.tracker.start(x, y, now);
    }

    /// Gesture JSON after the move, `null` when no touch is in progress
    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&mut self, x: f64, y: f64) -> String {
        let now = self.hal.now_ms();
        match self.tracker.move_to(x, y, now) {
            Some(gesture) => to_json(&gesture),
            None => "null".to_string(),
        }
    }

    /// Swipe direction (`"left"`, `"right"`, `"up"`, `"down"`), or `undefined`
    /// when the touch was too short or too slow
    pub fn end(&mut self) -> Option<String> {
        let now = self.hal.now_ms();
        self.tracker.end(now).map(|direction| direction.name().to_string())
    }

    pub fn cancel(&mut self) {
        self.tracker.cancel();
    }

    /// Current gesture JSON, `null` when idle
    pub fn gesture(&self) -> String {
        match self.tracker.gesture() {
            Some(gesture) => to_json(gesture),
            None => "null".to_string(),
        }
    }
}
