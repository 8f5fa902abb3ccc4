//! Entrance reveal coordinator

use std::cell::Cell;
use std::rc::{Rc, Weak};

use gw_hal::{Hal, IntersectionRequest, SubscriptionId, TimerHandle};
use gw_motion::{
    RevealEvent, RevealMachine, RevealOptions, RevealPhase, RevealSnapshot, Threshold,
    REVEAL_SETTLE_MS,
};

use crate::{Lifecycle, Notifier};

struct RevealShared {
    machine: Cell<RevealMachine>,
    observer: Cell<Option<SubscriptionId>>,
    timer: Cell<Option<TimerHandle>>,
    delay_ms: Cell<u32>,
    on_change: Notifier<RevealSnapshot>,
}

impl RevealShared {
    fn apply(&self, event: RevealEvent) -> Option<RevealPhase> {
        let mut machine = self.machine.get();
        let next = machine.apply(event)?;
        self.machine.set(machine);
        self.on_change.notify(&machine.snapshot());
        Some(next)
    }

    fn reset(&self) {
        let fresh = RevealMachine::new();
        if self.machine.replace(fresh) != fresh {
            self.on_change.notify(&fresh.snapshot());
        }
    }
}

/// Drives one element through Hidden, PendingVisible, Visible and Settled
///
/// The intersection observer is released as soon as the element first
/// intersects; from then on only timers advance the machine. Whenever
/// observation or scheduling is impossible the element jumps to Settled.
pub struct RevealCoordinator<H: Hal> {
    hal: Rc<H>,
    shared: Rc<RevealShared>,
    options: RevealOptions,
    target: Option<H::Element>,
    mounted: bool,
}

fn force_settle<H: Hal>(hal: &H, shared: &RevealShared, reason: &str) {
    hal.debug_write(&format!("[reveal] {}, skipping to settled", reason));
    shared.apply(RevealEvent::ForceSettle);
}

fn schedule<H: Hal>(
    hal: &Rc<H>,
    shared: &Rc<RevealShared>,
    delay_ms: u32,
    event: RevealEvent,
) {
    let weak_hal: Weak<H> = Rc::downgrade(hal);
    let weak = Rc::downgrade(shared);
    let callback = Box::new(move || {
        let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
            return;
        };
        shared.timer.set(None);
        if shared.apply(event) == Some(RevealPhase::Visible) {
            schedule(&hal, &shared, REVEAL_SETTLE_MS, RevealEvent::SettleElapsed);
        }
    });
    match hal.set_timeout(delay_ms, callback) {
        Ok(handle) => shared.timer.set(Some(handle)),
        Err(e) => force_settle(&**hal, shared, &format!("Timer failed ({:?})", e)),
    }
}

/// Pick up wherever the machine stopped
fn resume<H: Hal>(hal: &Rc<H>, shared: &Rc<RevealShared>, connect: impl FnOnce()) {
    match shared.machine.get().phase() {
        RevealPhase::Hidden => connect(),
        RevealPhase::PendingVisible => {
            schedule(hal, shared, shared.delay_ms.get(), RevealEvent::DelayElapsed)
        }
        RevealPhase::Visible => schedule(hal, shared, REVEAL_SETTLE_MS, RevealEvent::SettleElapsed),
        RevealPhase::Settled => {}
    }
}

impl<H: Hal> RevealCoordinator<H> {
    pub fn new(hal: Rc<H>, options: RevealOptions) -> Self {
        let shared = Rc::new(RevealShared {
            machine: Cell::new(RevealMachine::new()),
            observer: Cell::new(None),
            timer: Cell::new(None),
            delay_ms: Cell::new(options.delay_ms),
            on_change: Notifier::new(),
        });
        Self {
            hal,
            shared,
            options,
            target: None,
            mounted: false,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.shared.machine.get().phase()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.machine.get().is_visible()
    }

    pub fn is_ready(&self) -> bool {
        self.shared.machine.get().is_ready()
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        self.shared.machine.get().snapshot()
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Called with a fresh snapshot on every phase change
    pub fn on_change(&self, listener: impl Fn(&RevealSnapshot) + 'static) {
        self.shared.on_change.set(listener);
    }

    /// Replace the options
    ///
    /// A new delay applies to the next scheduled delay; observation options
    /// re-attach the observer if the element has not intersected yet.
    pub fn configure(&mut self, options: RevealOptions) {
        if options == self.options {
            return;
        }
        self.shared.delay_ms.set(options.delay_ms);
        self.options = options;
        if self.mounted && self.shared.observer.get().is_some() {
            self.disconnect();
            self.connect();
        }
    }

    /// Bind a new element; a different element starts a fresh machine
    pub fn bind(&mut self, target: Option<H::Element>) {
        if target == self.target {
            return;
        }
        self.release();
        self.target = target;
        self.shared.reset();
        if self.mounted {
            self.resume();
        }
    }

    fn resume(&mut self) {
        let hal = Rc::clone(&self.hal);
        let shared = Rc::clone(&self.shared);
        resume(&hal, &shared, || self.connect());
    }

    fn connect(&mut self) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let thresholds = Threshold::Single(self.options.threshold).ratios();
        let request = IntersectionRequest {
            thresholds: &thresholds,
            root: None,
            root_margin: &self.options.root_margin,
        };

        let weak_hal: Weak<H> = Rc::downgrade(&self.hal);
        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |intersecting: bool| {
            if !intersecting {
                return;
            }
            let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
                return;
            };
            if shared.apply(RevealEvent::Intersected).is_none() {
                return;
            }
            if let Some(id) = shared.observer.take() {
                hal.unsubscribe(id);
            }
            schedule(&hal, &shared, shared.delay_ms.get(), RevealEvent::DelayElapsed);
        });

        match self.hal.observe_intersection(target, request, listener) {
            Ok(id) => self.shared.observer.set(Some(id)),
            Err(e) => force_settle(
                &*self.hal,
                &self.shared,
                &format!("Observer unavailable ({:?})", e),
            ),
        }
    }

    fn disconnect(&self) {
        if let Some(id) = self.shared.observer.take() {
            self.hal.unsubscribe(id);
        }
    }

    fn release(&self) {
        self.disconnect();
        if let Some(handle) = self.shared.timer.take() {
            self.hal.clear_timeout(handle);
        }
    }
}

impl<H: Hal> Lifecycle for RevealCoordinator<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.resume();
    }

    fn unmount(&mut self) {
        self.release();
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Hal> Drop for RevealCoordinator<H> {
    fn drop(&mut self) {
        self.release();
    }
}
