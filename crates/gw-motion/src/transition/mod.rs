//! Transition state machines and easing
//!
//! - `reveal`: Hidden -> PendingVisible -> Visible -> Settled entrance machine
//! - `route`: Exiting -> Entering -> Visible route fade machine
//! - `easing`: Easing curves for frame-driven animations

mod easing;
mod reveal;
mod route;

pub use easing::{ease_in_cubic, ease_in_out, ease_out_cubic, linear, Easing};
pub use reveal::{RevealEvent, RevealMachine, RevealOptions, RevealPhase, RevealSnapshot};
pub use route::{RouteTransition, RouteTransitionState};
