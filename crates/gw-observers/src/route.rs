//! Route fade transition coordinator

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gw_hal::{Hal, HalError, SubscriptionId, TimerHandle};
use gw_motion::{
    RouteTransition, RouteTransitionState, ROUTE_ENTER_DEBOUNCE_MS, ROUTE_ENTER_DURATION_MS,
};

use crate::{Lifecycle, Notifier};

struct RouteShared {
    machine: RefCell<RouteTransition>,
    timer: Cell<Option<TimerHandle>>,
    mounted: Cell<bool>,
    on_change: Notifier<RouteTransitionState>,
}

impl RouteShared {
    fn notify(&self) {
        let state = self.machine.borrow().state().cloned();
        if let Some(state) = state {
            self.on_change.notify(&state);
        }
    }
}

/// Step of the route machine a timer completes
#[derive(Clone, Copy)]
enum Step {
    Enter,
    Settle,
}

/// Fades the routed subtree in on every path change
///
/// A new path shows the exit style at once, switches to the enter style after
/// a short debounce and settles once the fade has run. A newer path cancels
/// the pending timer; the machine's generation check rejects anything stale.
pub struct RouteTransitionCoordinator<H: Hal> {
    hal: Rc<H>,
    shared: Rc<RouteShared>,
    subscription: Option<SubscriptionId>,
}

fn clear_timer<H: Hal>(hal: &H, shared: &RouteShared) {
    if let Some(handle) = shared.timer.take() {
        hal.clear_timeout(handle);
    }
}

fn complete(shared: &RouteShared, step: Step, generation: u64) -> bool {
    let mut machine = shared.machine.borrow_mut();
    match step {
        Step::Enter => machine.enter(generation),
        Step::Settle => machine.settle(generation),
    }
}

fn schedule<H: Hal>(hal: &Rc<H>, shared: &Rc<RouteShared>, step: Step, generation: u64) {
    let delay_ms = match step {
        Step::Enter => ROUTE_ENTER_DEBOUNCE_MS,
        Step::Settle => ROUTE_ENTER_DURATION_MS,
    };
    let weak_hal: Weak<H> = Rc::downgrade(hal);
    let weak = Rc::downgrade(shared);
    let callback = Box::new(move || {
        let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
            return;
        };
        shared.timer.set(None);
        if !complete(&shared, step, generation) {
            return;
        }
        shared.notify();
        if let Step::Enter = step {
            schedule(&hal, &shared, Step::Settle, generation);
        }
    });
    match hal.set_timeout(delay_ms, callback) {
        Ok(handle) => shared.timer.set(Some(handle)),
        Err(e) => {
            hal.debug_write(&format!(
                "[route] Timer failed ({:?}), showing route immediately",
                e
            ));
            let entered = matches!(step, Step::Enter) && complete(shared, Step::Enter, generation);
            let settled = complete(shared, Step::Settle, generation);
            if entered || settled {
                shared.notify();
            }
        }
    }
}

/// Continue the transition the machine is in
fn resume<H: Hal>(hal: &Rc<H>, shared: &Rc<RouteShared>) {
    let (step, generation) = {
        let machine = shared.machine.borrow();
        match machine.state() {
            Some(RouteTransitionState::Exiting { .. }) => (Step::Enter, machine.generation()),
            Some(RouteTransitionState::Entering { .. }) => (Step::Settle, machine.generation()),
            _ => return,
        }
    };
    schedule(hal, shared, step, generation);
}

fn navigate<H: Hal>(hal: &Rc<H>, shared: &Rc<RouteShared>, path: &str) {
    let generation = shared.machine.borrow_mut().navigate(path);
    let Some(generation) = generation else {
        return;
    };
    clear_timer(&**hal, shared);
    shared.notify();
    if shared.mounted.get() {
        schedule(hal, shared, Step::Enter, generation);
    }
}

impl<H: Hal> RouteTransitionCoordinator<H> {
    pub fn new(hal: Rc<H>) -> Self {
        Self {
            hal,
            shared: Rc::new(RouteShared {
                machine: RefCell::new(RouteTransition::new()),
                timer: Cell::new(None),
                mounted: Cell::new(false),
                on_change: Notifier::new(),
            }),
            subscription: None,
        }
    }

    /// Current transition state (`None` before the first path)
    pub fn state(&self) -> Option<RouteTransitionState> {
        self.shared.machine.borrow().state().cloned()
    }

    pub fn opacity(&self) -> f32 {
        self.shared.machine.borrow().opacity()
    }

    /// Called with the new state on every transition step
    pub fn on_change(&self, listener: impl Fn(&RouteTransitionState) + 'static) {
        self.shared.on_change.set(listener);
    }

    /// Announce the current route path
    ///
    /// Used by routing shells the host cannot observe. Announcing the
    /// current path again does nothing.
    pub fn set_path(&self, path: &str) {
        navigate(&self.hal, &self.shared, path);
    }
}

impl<H: Hal> Lifecycle for RouteTransitionCoordinator<H> {
    fn mount(&mut self) {
        if self.shared.mounted.replace(true) {
            return;
        }

        let before = self.shared.machine.borrow().generation();
        match self.hal.current_path() {
            Ok(path) => navigate(&self.hal, &self.shared, &path),
            Err(e) => self
                .hal
                .debug_write(&format!("[route] Current path unavailable: {:?}", e)),
        }
        if self.shared.machine.borrow().generation() == before {
            resume(&self.hal, &self.shared);
        }

        let weak_hal: Weak<H> = Rc::downgrade(&self.hal);
        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |path: String| {
            if let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) {
                navigate(&hal, &shared, &path);
            }
        });
        match self.hal.watch_route(listener) {
            Ok(id) => self.subscription = Some(id),
            Err(HalError::NotSupported) => self
                .hal
                .debug_write("[route] Route changes not observable, waiting for set_path"),
            Err(e) => self
                .hal
                .debug_write(&format!("[route] Failed to watch route: {:?}", e)),
        }
    }

    fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.hal.unsubscribe(id);
        }
        clear_timer(&*self.hal, &self.shared);
        self.shared.mounted.set(false);
    }

    fn is_mounted(&self) -> bool {
        self.shared.mounted.get()
    }
}

impl<H: Hal> Drop for RouteTransitionCoordinator<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
