//! Pointer input
//!
//! - `swipe`: Touch swipe tracking and classification

mod swipe;

pub use swipe::{SwipeDirection, SwipeOptions, SwipeTracker, TouchGesture};
