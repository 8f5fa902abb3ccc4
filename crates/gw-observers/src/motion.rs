//! Reduced-motion preference monitor

use std::cell::Cell;
use std::rc::Rc;

use gw_hal::{Hal, SubscriptionId};
use gw_motion::REDUCED_MOTION_QUERY;

use crate::{Lifecycle, Notifier};

struct MotionShared {
    reduced: Cell<bool>,
    on_change: Notifier<bool>,
}

impl MotionShared {
    fn update(&self, reduced: bool) {
        if self.reduced.replace(reduced) != reduced {
            self.on_change.notify(&reduced);
        }
    }
}

/// Tracks `(prefers-reduced-motion: reduce)`
///
/// Reports reduced motion until the query has been read, and keeps that
/// default when the host cannot evaluate media queries.
pub struct MotionPreferenceMonitor<H: Hal> {
    hal: Rc<H>,
    shared: Rc<MotionShared>,
    subscription: Option<SubscriptionId>,
    mounted: bool,
}

/// Read-only handle to a monitor's current preference
#[derive(Clone)]
pub struct MotionReader {
    shared: Rc<MotionShared>,
}

impl MotionReader {
    pub fn prefers_reduced_motion(&self) -> bool {
        self.shared.reduced.get()
    }
}

impl<H: Hal> MotionPreferenceMonitor<H> {
    pub fn new(hal: Rc<H>) -> Self {
        Self {
            hal,
            shared: Rc::new(MotionShared {
                reduced: Cell::new(true),
                on_change: Notifier::new(),
            }),
            subscription: None,
            mounted: false,
        }
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.shared.reduced.get()
    }

    pub fn reader(&self) -> MotionReader {
        MotionReader {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Called with the new preference whenever it changes
    pub fn on_change(&self, listener: impl Fn(&bool) + 'static) {
        self.shared.on_change.set(listener);
    }
}

impl<H: Hal> Lifecycle for MotionPreferenceMonitor<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match self.hal.match_media(REDUCED_MOTION_QUERY) {
            Ok(reduced) => self.shared.update(reduced),
            Err(e) => {
                self.hal.debug_write(&format!(
                    "[motion] Media query unavailable ({:?}), keeping reduced motion",
                    e
                ));
                return;
            }
        }

        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |reduced: bool| {
            if let Some(shared) = weak.upgrade() {
                shared.update(reduced);
            }
        });
        match self.hal.watch_media(REDUCED_MOTION_QUERY, listener) {
            Ok(id) => self.subscription = Some(id),
            Err(e) => self.hal.debug_write(&format!(
                "[motion] Failed to watch preference changes: {:?}",
                e
            )),
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

impl<H: Hal> Drop for MotionPreferenceMonitor<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
