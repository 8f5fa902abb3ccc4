//! Viewport breakpoint tracker

use std::cell::Cell;
use std::rc::Rc;

use gw_hal::{Hal, SubscriptionId};
use gw_motion::{Breakpoint, BreakpointSnapshot, BreakpointState};

use crate::{Lifecycle, Notifier};

struct BreakpointShared {
    state: Cell<BreakpointState>,
    on_change: Notifier<BreakpointSnapshot>,
}

impl BreakpointShared {
    fn measure(&self, width: f64) {
        let mut state = self.state.get();
        if state.measure(width) {
            self.state.set(state);
            self.on_change.notify(&state.snapshot());
        }
    }
}

/// Derives the breakpoint tier from the viewport width
///
/// Unmeasured until mounted; every `is_breakpoint` query answers `false`
/// before the first measurement.
pub struct BreakpointTracker<H: Hal> {
    hal: Rc<H>,
    shared: Rc<BreakpointShared>,
    subscription: Option<SubscriptionId>,
    mounted: bool,
}

impl<H: Hal> BreakpointTracker<H> {
    pub fn new(hal: Rc<H>) -> Self {
        Self {
            hal,
            shared: Rc::new(BreakpointShared {
                state: Cell::new(BreakpointState::unmeasured()),
                on_change: Notifier::new(),
            }),
            subscription: None,
            mounted: false,
        }
    }

    pub fn width(&self) -> Option<f64> {
        self.shared.state.get().width()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.shared.state.get().breakpoint()
    }

    pub fn is_breakpoint(&self, bp: Breakpoint) -> bool {
        self.shared.state.get().is_breakpoint(bp)
    }

    pub fn is_mobile(&self) -> bool {
        self.shared.state.get().is_mobile()
    }

    pub fn is_tablet(&self) -> bool {
        self.shared.state.get().is_tablet()
    }

    pub fn is_desktop(&self) -> bool {
        self.shared.state.get().is_desktop()
    }

    pub fn snapshot(&self) -> BreakpointSnapshot {
        self.shared.state.get().snapshot()
    }

    /// Called with a fresh snapshot whenever the width changes
    pub fn on_change(&self, listener: impl Fn(&BreakpointSnapshot) + 'static) {
        self.shared.on_change.set(listener);
    }
}

impl<H: Hal> Lifecycle for BreakpointTracker<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match self.hal.viewport_width() {
            Ok(width) => self.shared.measure(width),
            Err(e) => self
                .hal
                .debug_write(&format!("[breakpoints] Viewport width unavailable: {:?}", e)),
        }

        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |width: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.measure(width);
            }
        });
        match self.hal.watch_resize(listener) {
            Ok(id) => self.subscription = Some(id),
            Err(e) => self
                .hal
                .debug_write(&format!("[breakpoints] Failed to watch resize: {:?}", e)),
        }
    }

    fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.hal.unsubscribe(id);
        }
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Hal> Drop for BreakpointTracker<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
