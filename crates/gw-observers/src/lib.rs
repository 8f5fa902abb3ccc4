//! Lifecycle controllers for the Groundwork site
//!
//! Each controller binds one pure machine from `gw-motion` to the ambient
//! signal it depends on, through the `Hal` trait. Controllers own their
//! subscriptions, frames and timers and release every one of them on
//! `unmount` (and on drop), so nothing fires for a controller that is gone.
//!
//! # Controllers
//!
//! - [`MotionPreferenceMonitor`]: reduced-motion preference
//! - [`BreakpointTracker`]: breakpoint tier of the viewport
//! - [`VisibilityObserver`]: intersection visibility of one target
//! - [`ScrollProgressTracker`]: normalized page/container scroll progress
//! - [`FrameScheduler`]: recurring animation frames with a latest-callback cell
//! - [`RevealCoordinator`]: delayed entrance reveal with a settle window
//! - [`RouteTransitionCoordinator`]: route fade transitions
//! - [`CountUpAnimator`]: numeric counter driven by visibility and frames
//!
//! # Callbacks
//!
//! Host callbacks capture `Weak` references to controller state and do
//! nothing once the controller is dropped. Change listeners registered with
//! `on_change` are cloned out of their cell before being called, so a
//! listener may freely read the controller or replace itself.

pub mod breakpoints;
pub mod count_up;
pub mod frame;
pub mod motion;
pub mod reveal;
pub mod route;
pub mod scroll;
pub mod visibility;

use std::cell::RefCell;
use std::rc::Rc;

pub use breakpoints::BreakpointTracker;
pub use count_up::CountUpAnimator;
pub use frame::FrameScheduler;
pub use motion::{MotionPreferenceMonitor, MotionReader};
pub use reveal::RevealCoordinator;
pub use route::RouteTransitionCoordinator;
pub use scroll::ScrollProgressTracker;
pub use visibility::VisibilityObserver;

/// Attach/detach contract shared by every controller
///
/// `mount` acquires subscriptions, `unmount` releases all of them. Both are
/// idempotent; a controller can be mounted again after unmounting.
pub trait Lifecycle {
    fn mount(&mut self);
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;
}

/// Single-slot change listener
pub struct Notifier<T> {
    listener: RefCell<Option<Rc<dyn Fn(&T)>>>,
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self {
            listener: RefCell::new(None),
        }
    }

    /// Replace the listener
    pub fn set(&self, listener: impl Fn(&T) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn clear(&self) {
        self.listener.borrow_mut().take();
    }

    /// Call the listener, if any, without holding the cell borrowed
    pub fn notify(&self, value: &T) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(value);
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notifier_replaces_listener() {
        let notifier = Notifier::<u32>::new();
        let seen = Rc::new(Cell::new(0));

        let sink = Rc::clone(&seen);
        notifier.set(move |v| sink.set(*v));
        notifier.notify(&3);
        assert_eq!(seen.get(), 3);

        let sink = Rc::clone(&seen);
        notifier.set(move |v| sink.set(*v * 10));
        notifier.notify(&4);
        assert_eq!(seen.get(), 40);

        notifier.clear();
        notifier.notify(&5);
        assert_eq!(seen.get(), 40);
    }

    #[test]
    fn test_notifier_listener_may_replace_itself() {
        let notifier = Rc::new(Notifier::<u32>::new());
        let seen = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&notifier);
        let sink = Rc::clone(&seen);
        notifier.set(move |v| {
            sink.set(*v);
            if let Some(notifier) = weak.upgrade() {
                notifier.clear();
            }
        });
        notifier.notify(&1);
        notifier.notify(&2);
        assert_eq!(seen.get(), 1);
    }
}
