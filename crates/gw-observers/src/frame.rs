//! Recurring animation frame scheduler

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gw_hal::{FrameHandle, Hal};
use gw_motion::{FrameClock, FrameTick};

use crate::Lifecycle;

type TickCallback = Rc<dyn Fn(FrameTick)>;

struct FrameShared {
    /// Latest callback, read on every tick
    callback: RefCell<TickCallback>,
    clock: Cell<FrameClock>,
    pending: Cell<Option<FrameHandle>>,
    active: Cell<bool>,
    mounted: Cell<bool>,
}

impl FrameShared {
    fn running(&self) -> bool {
        self.active.get() && self.mounted.get()
    }
}

/// Runs a callback on every animation frame while active
///
/// The first frame after activation only primes the clock; later frames are
/// forwarded with their delta. Every method takes `&self` so the scheduler
/// can be shared with the callbacks that drive it.
pub struct FrameScheduler<H: Hal> {
    hal: Rc<H>,
    shared: Rc<FrameShared>,
}

fn request<H: Hal>(hal: &Rc<H>, shared: &Rc<FrameShared>) {
    if shared.pending.get().is_some() {
        return;
    }
    let weak_hal: Weak<H> = Rc::downgrade(hal);
    let weak = Rc::downgrade(shared);
    let callback = Box::new(move |timestamp: f64| {
        let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
            return;
        };
        shared.pending.set(None);
        if !shared.running() {
            return;
        }

        let mut clock = shared.clock.get();
        let tick = clock.tick(timestamp);
        shared.clock.set(clock);

        if let Some(tick) = tick {
            let callback = Rc::clone(&*shared.callback.borrow());
            callback(tick);
        }

        // The callback may have deactivated the loop
        if shared.running() {
            request(&hal, &shared);
        }
    });
    match hal.request_frame(callback) {
        Ok(handle) => shared.pending.set(Some(handle)),
        Err(e) => hal.debug_write(&format!("[frame] Frame request failed: {:?}", e)),
    }
}

impl<H: Hal> FrameScheduler<H> {
    pub fn new(hal: Rc<H>) -> Self {
        let noop: TickCallback = Rc::new(|_: FrameTick| {});
        Self {
            hal,
            shared: Rc::new(FrameShared {
                callback: RefCell::new(noop),
                clock: Cell::new(FrameClock::new()),
                pending: Cell::new(None),
                active: Cell::new(false),
                mounted: Cell::new(false),
            }),
        }
    }

    /// Replace the per-frame callback without restarting the loop
    pub fn set_callback(&self, callback: impl Fn(FrameTick) + 'static) {
        *self.shared.callback.borrow_mut() = Rc::new(callback);
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }

    /// Whether a frame is currently requested
    pub fn has_pending_frame(&self) -> bool {
        self.shared.pending.get().is_some()
    }

    /// Start or stop the loop
    ///
    /// Stopping cancels the pending frame and drops the clock baseline.
    pub fn set_active(&self, active: bool) {
        if self.shared.active.replace(active) == active {
            return;
        }
        if active {
            if self.shared.mounted.get() {
                request(&self.hal, &self.shared);
            }
        } else {
            self.halt();
        }
    }

    /// Attach to the host; the loop runs if already active
    pub fn start(&self) {
        if self.shared.mounted.replace(true) {
            return;
        }
        if self.shared.active.get() {
            request(&self.hal, &self.shared);
        }
    }

    /// Detach from the host, cancelling any pending frame
    pub fn stop(&self) {
        self.halt();
        self.shared.mounted.set(false);
    }

    fn halt(&self) {
        if let Some(handle) = self.shared.pending.take() {
            self.hal.cancel_frame(handle);
        }
        self.shared.clock.set(FrameClock::new());
    }
}

impl<H: Hal> Lifecycle for FrameScheduler<H> {
    fn mount(&mut self) {
        self.start();
    }

    fn unmount(&mut self) {
        self.stop();
    }

    fn is_mounted(&self) -> bool {
        self.shared.mounted.get()
    }
}

impl<H: Hal> Drop for FrameScheduler<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
