//! Intersection visibility observer

use std::cell::Cell;
use std::rc::{Rc, Weak};

use gw_hal::{Hal, IntersectionRequest, SubscriptionId};
use gw_motion::{IntersectionConfig, VisibilityState};

use crate::{Lifecycle, Notifier};

struct VisibilityShared {
    state: Cell<VisibilityState>,
    subscription: Cell<Option<SubscriptionId>>,
    on_change: Notifier<bool>,
}

impl VisibilityShared {
    fn apply(&self, update: impl FnOnce(&mut VisibilityState) -> bool) {
        let mut state = self.state.get();
        let was_visible = state.is_visible;
        if update(&mut state) {
            self.state.set(state);
            if state.is_visible != was_visible {
                self.on_change.notify(&state.is_visible);
            }
        }
    }
}

/// Reports whether one bound target is visible
///
/// The observer is rebuilt whenever the target, root or configuration
/// changes; the previous one is always released first. A target that froze
/// releases its observer right away. Without a bound target nothing is
/// observed and the target counts as not visible.
pub struct VisibilityObserver<H: Hal> {
    hal: Rc<H>,
    shared: Rc<VisibilityShared>,
    config: IntersectionConfig,
    root: Option<H::Element>,
    target: Option<H::Element>,
    mounted: bool,
}

impl<H: Hal> VisibilityObserver<H> {
    pub fn new(hal: Rc<H>, config: IntersectionConfig) -> Self {
        Self {
            hal,
            shared: Rc::new(VisibilityShared {
                state: Cell::new(VisibilityState::default()),
                subscription: Cell::new(None),
                on_change: Notifier::new(),
            }),
            config,
            root: None,
            target: None,
            mounted: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state.get().is_visible
    }

    pub fn is_intersecting(&self) -> bool {
        self.shared.state.get().is_intersecting
    }

    pub fn state(&self) -> VisibilityState {
        self.shared.state.get()
    }

    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    pub fn target(&self) -> Option<&H::Element> {
        self.target.as_ref()
    }

    /// Called with the new visibility whenever it flips
    pub fn on_change(&self, listener: impl Fn(&bool) + 'static) {
        self.shared.on_change.set(listener);
    }

    /// Replace the observation options
    pub fn configure(&mut self, config: IntersectionConfig) {
        if config != self.config {
            self.config = config;
            self.reconnect();
        }
    }

    /// Set the containment root (`None` = the viewport)
    pub fn set_root(&mut self, root: Option<H::Element>) {
        if root != self.root {
            self.root = root;
            self.reconnect();
        }
    }

    /// Bind a new target, starting from a fresh state
    pub fn bind(&mut self, target: Option<H::Element>) {
        if target == self.target {
            return;
        }
        self.disconnect();
        self.target = target;
        self.shared.apply(|state| {
            let fresh = VisibilityState::default();
            let changed = *state != fresh;
            *state = fresh;
            changed
        });
        if self.mounted {
            self.connect();
        }
    }

    fn reconnect(&mut self) {
        self.disconnect();
        if self.mounted {
            self.connect();
        }
    }

    fn disconnect(&mut self) {
        if let Some(id) = self.shared.subscription.take() {
            self.hal.unsubscribe(id);
        }
    }

    fn connect(&mut self) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let freeze = self.config.freeze_once_visible;
        if !self.shared.state.get().needs_observer(freeze) {
            return;
        }

        let thresholds = self.config.threshold.ratios();
        let request = IntersectionRequest {
            thresholds: &thresholds,
            root: self.root.as_ref(),
            root_margin: &self.config.root_margin,
        };
        let weak_hal: Weak<H> = Rc::downgrade(&self.hal);
        let weak = Rc::downgrade(&self.shared);
        let listener = Rc::new(move |intersecting: bool| {
            let (Some(hal), Some(shared)) = (weak_hal.upgrade(), weak.upgrade()) else {
                return;
            };
            shared.apply(|state| state.observe(intersecting, freeze));
            if !shared.state.get().needs_observer(freeze) {
                if let Some(id) = shared.subscription.take() {
                    hal.unsubscribe(id);
                }
            }
        });

        match self.hal.observe_intersection(target, request, listener) {
            Ok(id) => self.shared.subscription.set(Some(id)),
            Err(e) => {
                self.hal.debug_write(&format!(
                    "[visibility] Observer unavailable ({:?}), treating target as visible",
                    e
                ));
                self.shared.apply(VisibilityState::force_visible);
            }
        }
    }
}

impl<H: Hal> Lifecycle for VisibilityObserver<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.connect();
    }

    fn unmount(&mut self) {
        self.disconnect();
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Hal> Drop for VisibilityObserver<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
