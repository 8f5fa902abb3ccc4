//! Motion and layout state machines for the Groundwork site
//!
//! Everything in this crate is pure: no host access, no timers, no callbacks.
//! Each machine takes the observations its controller receives (a width, an
//! intersection entry, a frame timestamp, an elapsed timer) and returns the
//! derived state the presentational layer reads.
//!
//! - `viewport`: Breakpoint tiers derived from viewport width
//! - `visibility`: Intersection latch with freeze-once-visible
//! - `scroll`: Normalized scroll progress and indicator options
//! - `frame`: Frame clock that drops the first tick after activation
//! - `transition`: Reveal and route transition machines, easing curves
//! - `count_up`: Numeric counter interpolation and formatting
//! - `stagger`: Per-child entrance delays
//! - `input`: Swipe gesture classification

pub mod constants;
pub mod count_up;
pub mod frame;
pub mod input;
pub mod scroll;
pub mod stagger;
pub mod transition;
pub mod viewport;
pub mod visibility;

pub use constants::*;
pub use count_up::{format_number, CountUpOptions};
pub use frame::{FrameClock, FrameTick};
pub use input::{SwipeDirection, SwipeOptions, SwipeTracker, TouchGesture};
pub use scroll::{scroll_progress, ScrollIndicator, ScrollIndicatorOptions};
pub use stagger::StaggerPlan;
pub use transition::{
    Easing, RevealEvent, RevealMachine, RevealOptions, RevealPhase, RevealSnapshot,
    RouteTransition, RouteTransitionState,
};
pub use viewport::{Breakpoint, BreakpointSnapshot, BreakpointState};
pub use visibility::{IntersectionConfig, Threshold, VisibilityState};
