//! Scroll progress tracker

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gw_hal::{FrameHandle, Hal, SubscriptionId};
use gw_motion::{scroll_progress, ScrollIndicator, ScrollIndicatorOptions};

use crate::motion::{MotionPreferenceMonitor, MotionReader};
use crate::{Lifecycle, Notifier};

struct ScrollShared<E> {
    progress: Cell<f64>,
    pending_frame: Cell<Option<FrameHandle>>,
    container: RefCell<Option<E>>,
    on_change: Notifier<f64>,
}

/// Tracks how far the document (or a container) has been scrolled
///
/// Scroll events only request a frame; the frame reads the live metrics, so
/// bursts of events cost one recomputation and the last value is exact.
pub struct ScrollProgressTracker<H: Hal> {
    hal: Rc<H>,
    motion: MotionPreferenceMonitor<H>,
    reduced: MotionReader,
    options: ScrollIndicatorOptions,
    shared: Rc<ScrollShared<H::Element>>,
    subscription: Option<SubscriptionId>,
    mounted: bool,
}

fn recompute<H: Hal>(hal: &H, shared: &ScrollShared<H::Element>) {
    let metrics = {
        let container = shared.container.borrow();
        hal.scroll_metrics(container.as_ref())
    };
    match metrics {
        Ok(m) => {
            let progress = scroll_progress(m.scroll_top, m.scroll_height, m.client_height);
            if shared.progress.replace(progress) != progress {
                shared.on_change.notify(&progress);
            }
        }
        Err(e) => hal.debug_write(&format!("[scroll] Failed to read metrics: {:?}", e)),
    }
}

fn schedule_recompute<H: Hal>(hal: &Rc<H>, shared: &Rc<ScrollShared<H::Element>>) {
    if shared.pending_frame.get().is_some() {
        return;
    }
    let weak_hal: Weak<H> = Rc::downgrade(hal);
    let weak = Rc::downgrade(shared);
    let callback = Box::new(move |_timestamp: f64| {
        let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
            return;
        };
        shared.pending_frame.set(None);
        recompute(&*hal, &shared);
    });
    match hal.request_frame(callback) {
        Ok(handle) => shared.pending_frame.set(Some(handle)),
        Err(e) => {
            hal.debug_write(&format!(
                "[scroll] Frame request failed ({:?}), recomputing now",
                e
            ));
            recompute(&**hal, shared);
        }
    }
}

impl<H: Hal> ScrollProgressTracker<H> {
    pub fn new(hal: Rc<H>, options: ScrollIndicatorOptions) -> Self {
        let motion = MotionPreferenceMonitor::new(Rc::clone(&hal));
        let reduced = motion.reader();
        let shared = Rc::new(ScrollShared {
            progress: Cell::new(0.0),
            pending_frame: Cell::new(None),
            container: RefCell::new(None),
            on_change: Notifier::new(),
        });

        // A preference flip changes whether the indicator renders
        let weak = Rc::downgrade(&shared);
        motion.on_change(move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.on_change.notify(&shared.progress.get());
            }
        });

        Self {
            hal,
            motion,
            reduced,
            options,
            shared,
            subscription: None,
            mounted: false,
        }
    }

    /// Current progress in [0, 1]
    pub fn progress(&self) -> f64 {
        self.shared.progress.get()
    }

    /// Progress bar render instructions, `None` under reduced motion
    pub fn indicator(&self) -> Option<ScrollIndicator> {
        if self.reduced.prefers_reduced_motion() {
            return None;
        }
        Some(ScrollIndicator::new(self.progress(), &self.options))
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced.prefers_reduced_motion()
    }

    /// Replace the indicator style, notifying listeners if it changed
    pub fn set_options(&mut self, options: ScrollIndicatorOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.shared.on_change.notify(&self.shared.progress.get());
    }

    /// Called with the progress whenever it, the indicator visibility or its style changes
    pub fn on_change(&self, listener: impl Fn(&f64) + 'static) {
        self.shared.on_change.set(listener);
    }

    /// Track a scroll container instead of the document (`None` = document)
    pub fn set_container(&mut self, container: Option<H::Element>) {
        if *self.shared.container.borrow() == container {
            return;
        }
        self.release();
        *self.shared.container.borrow_mut() = container;
        if self.mounted {
            self.attach();
        }
    }

    fn attach(&mut self) {
        recompute(&*self.hal, &self.shared);

        let weak_hal: Weak<H> = Rc::downgrade(&self.hal);
        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |()| {
            if let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) {
                schedule_recompute(&hal, &shared);
            }
        });
        let result = {
            let container = self.shared.container.borrow();
            self.hal.watch_scroll(container.as_ref(), listener)
        };
        match result {
            Ok(id) => self.subscription = Some(id),
            Err(e) => self
                .hal
                .debug_write(&format!("[scroll] Failed to watch scroll: {:?}", e)),
        }
    }

    fn release(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.hal.unsubscribe(id);
        }
        if let Some(handle) = self.shared.pending_frame.take() {
            self.hal.cancel_frame(handle);
        }
    }
}

impl<H: Hal> Lifecycle for ScrollProgressTracker<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.motion.mount();
        self.attach();
    }

    fn unmount(&mut self) {
        self.release();
        self.motion.unmount();
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Hal> Drop for ScrollProgressTracker<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
