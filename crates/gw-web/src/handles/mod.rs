//! `#[wasm_bindgen]` handles over the lifecycle controllers
//!
//! Every handle owns one controller bound to the shared [`WebHal`]. The JS
//! side calls `mount()` when its component mounts and `unmount()` (or
//! `free()`) when it goes away; options are JSON strings and snapshots are
//! returned as JSON.
//!
//! [`WebHal`]: crate::WebHal

use gw_hal::{Hal, HalError};
use gw_motion::{StaggerPlan, REDUCED_MOTION_QUERY};
use wasm_bindgen::prelude::*;

use crate::hal::shared_hal;
use crate::util::parse_options;

mod breakpoints;
mod count_up;
mod frame;
mod motion;
mod reveal;
mod route;
mod scroll;
mod swipe;
mod visibility;

pub use breakpoints::Breakpoints;
pub use count_up::CountUp;
pub use frame::FrameLoop;
pub use motion::MotionPreference;
pub use reveal::Reveal;
pub use route::RouteTransition;
pub use scroll::ScrollProgress;
pub use swipe::Swipe;
pub use visibility::Visibility;

/// Convert a HAL error for the JS boundary
pub fn hal_error(err: HalError) -> JsValue {
    JsValue::from_str(&format!("HAL error: {:?}", err))
}

/// One-shot read of the reduced-motion preference
///
/// Unlike `MotionPreference`, this reports a missing media query facility
/// as an error instead of assuming reduced motion.
#[wasm_bindgen(js_name = prefersReducedMotion)]
pub fn prefers_reduced_motion() -> Result<bool, JsValue> {
    shared_hal().match_media(REDUCED_MOTION_QUERY).map_err(hal_error)
}

/// Entrance delay (ms) of child `index` in a staggered group
///
/// `plan_json`: `{ "baseDelayMs": 0, "stepMs": 100 }`, empty for defaults
#[wasm_bindgen(js_name = staggerDelay)]
pub fn stagger_delay(plan_json: &str, index: u32) -> Result<u32, JsValue> {
    let plan: StaggerPlan = parse_options(plan_json)?;
    Ok(plan.delay_for(index))
}
