//! Mock HAL implementation for testing Groundwork motion controllers
//!
//! This provides a mock implementation of the HAL trait that can be used
//! for testing controllers without a browser. Nothing happens on its own:
//! tests drive resizes, scrolls, intersections, route changes, frames and
//! timer expiry explicitly, and can inspect which subscriptions are live.

#![no_std]
extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use gw_hal::{
    FrameCallback, FrameHandle, Hal, HalError, IntersectionRequest, Listener, ScrollMetrics,
    SubscriptionId, TimerCallback, TimerHandle,
};

/// Element handle used by the mock host
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MockElement(pub u32);

/// Live subscription registered with the mock host
enum MockSubscription {
    Media {
        query: String,
        listener: Listener<bool>,
    },
    Resize(Listener<f64>),
    Intersection {
        target: MockElement,
        thresholds: Vec<f64>,
        root: Option<MockElement>,
        root_margin: String,
        listener: Listener<bool>,
    },
    Scroll {
        container: Option<MockElement>,
        listener: Listener<()>,
    },
    Route(Listener<String>),
}

/// Pending timeout (deadline in ms, callback)
struct MockTimer {
    deadline: f64,
    callback: TimerCallback,
}

/// Mock HAL for unit testing
///
/// Provides simulated time, media queries, viewport, scroll, intersection,
/// routing and scheduling for testing controller logic without a browser.
pub struct MockHal {
    /// Simulated time in milliseconds
    time: Cell<f64>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
    /// Next handle to assign (shared by all handle kinds)
    next_id: Cell<u32>,
    /// Media query match states
    media: RefCell<BTreeMap<String, bool>>,
    /// Whether `matchMedia` exists
    media_supported: Cell<bool>,
    /// Whether `IntersectionObserver` exists
    intersection_supported: Cell<bool>,
    /// Viewport width (`None` = no window)
    width: Cell<Option<f64>>,
    /// Document scroll metrics
    document_scroll: Cell<ScrollMetrics>,
    /// Container scroll metrics
    container_scroll: RefCell<BTreeMap<MockElement, ScrollMetrics>>,
    /// Current route path
    path: RefCell<String>,
    /// Live subscriptions
    subscriptions: RefCell<BTreeMap<u32, MockSubscription>>,
    /// Pending frame requests (in request order)
    frames: RefCell<BTreeMap<u32, FrameCallback>>,
    /// Pending timeouts
    timers: RefCell<BTreeMap<u32, MockTimer>>,
}

impl MockHal {
    /// Create a new mock HAL
    ///
    /// Starts at time 0 with a 1024px viewport on path `/`, every facility
    /// available and no media query matching.
    pub fn new() -> Self {
        Self {
            time: Cell::new(0.0),
            debug_log: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            media: RefCell::new(BTreeMap::new()),
            media_supported: Cell::new(true),
            intersection_supported: Cell::new(true),
            width: Cell::new(Some(1024.0)),
            document_scroll: Cell::new(ScrollMetrics::default()),
            container_scroll: RefCell::new(BTreeMap::new()),
            path: RefCell::new(String::from("/")),
            subscriptions: RefCell::new(BTreeMap::new()),
            frames: RefCell::new(BTreeMap::new()),
            timers: RefCell::new(BTreeMap::new()),
        }
    }

    /// Create a mock HAL with a specific viewport width
    pub fn with_width(width: f64) -> Self {
        let hal = Self::new();
        hal.width.set(Some(width));
        hal
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    // === Host configuration ===

    /// Toggle availability of `matchMedia`
    pub fn set_media_supported(&self, supported: bool) {
        self.media_supported.set(supported);
    }

    /// Toggle availability of `IntersectionObserver`
    pub fn set_intersection_supported(&self, supported: bool) {
        self.intersection_supported.set(supported);
    }

    /// Remove the viewport (reads fail with `Unavailable`)
    pub fn clear_viewport(&self) {
        self.width.set(None);
    }

    // === Signal triggers ===

    /// Set a media query match state and notify its subscribers
    pub fn set_media(&self, query: &str, matches: bool) {
        self.media.borrow_mut().insert(String::from(query), matches);
        let listeners: Vec<Listener<bool>> = self
            .subscriptions
            .borrow()
            .values()
            .filter_map(|sub| match sub {
                MockSubscription::Media { query: q, listener } if q == query => {
                    Some(Rc::clone(listener))
                }
                _ => None,
            })
            .collect();
        for listener in listeners {
            listener(matches);
        }
    }

    /// Resize the viewport and notify resize subscribers
    pub fn resize(&self, width: f64) {
        self.width.set(Some(width));
        let listeners: Vec<Listener<f64>> = self
            .subscriptions
            .borrow()
            .values()
            .filter_map(|sub| match sub {
                MockSubscription::Resize(listener) => Some(Rc::clone(listener)),
                _ => None,
            })
            .collect();
        for listener in listeners {
            listener(width);
        }
    }

    /// Deliver an intersection entry to every observer of `target`
    pub fn intersect(&self, target: MockElement, is_intersecting: bool) {
        let listeners: Vec<Listener<bool>> = self
            .subscriptions
            .borrow()
            .values()
            .filter_map(|sub| match sub {
                MockSubscription::Intersection { target: t, listener, .. } if *t == target => {
                    Some(Rc::clone(listener))
                }
                _ => None,
            })
            .collect();
        for listener in listeners {
            listener(is_intersecting);
        }
    }

    /// Set scroll metrics of the document or a container and fire scroll events
    pub fn scroll(&self, container: Option<MockElement>, metrics: ScrollMetrics) {
        match container {
            Some(element) => {
                self.container_scroll.borrow_mut().insert(element, metrics);
            }
            None => self.document_scroll.set(metrics),
        }
        let listeners: Vec<Listener<()>> = self
            .subscriptions
            .borrow()
            .values()
            .filter_map(|sub| match sub {
                MockSubscription::Scroll { container: c, listener } if *c == container => {
                    Some(Rc::clone(listener))
                }
                _ => None,
            })
            .collect();
        for listener in listeners {
            listener(());
        }
    }

    /// Change the route path and notify route subscribers
    pub fn navigate(&self, path: &str) {
        *self.path.borrow_mut() = String::from(path);
        let listeners: Vec<Listener<String>> = self
            .subscriptions
            .borrow()
            .values()
            .filter_map(|sub| match sub {
                MockSubscription::Route(listener) => Some(Rc::clone(listener)),
                _ => None,
            })
            .collect();
        for listener in listeners {
            listener(String::from(path));
        }
    }

    /// Produce one animation frame at `timestamp`
    ///
    /// Runs every frame callback that was pending before the call, unless an
    /// earlier callback of the same frame cancelled it. Callbacks requested
    /// while the frame runs wait for the next frame.
    /// Returns the number of callbacks run.
    pub fn tick_frame(&self, timestamp: f64) -> usize {
        self.time.set(timestamp);
        let due: Vec<u32> = self.frames.borrow().keys().copied().collect();
        let mut count = 0;
        for id in due {
            let Some(callback) = self.frames.borrow_mut().remove(&id) else {
                continue;
            };
            callback(timestamp);
            count += 1;
        }
        count
    }

    /// Advance the simulated time, firing due timeouts in deadline order
    pub fn advance_time(&self, ms: f64) {
        let target = self.time.get() + ms;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, timer)| timer.deadline <= target)
                .min_by(|(a_id, a), (b_id, b)| {
                    a.deadline
                        .partial_cmp(&b.deadline)
                        .unwrap_or(core::cmp::Ordering::Equal)
                        .then(a_id.cmp(b_id))
                })
                .map(|(id, _)| *id);
            let Some(id) = next else { break };
            let Some(timer) = self.timers.borrow_mut().remove(&id) else { break };
            if timer.deadline > self.time.get() {
                self.time.set(timer.deadline);
            }
            (timer.callback)();
        }
        self.time.set(target);
    }

    // === Inspection ===

    /// Number of live subscriptions of any kind
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Number of live media query subscriptions for `query`
    pub fn media_listener_count(&self, query: &str) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| matches!(sub, MockSubscription::Media { query: q, .. } if q == query))
            .count()
    }

    /// Number of live resize subscriptions
    pub fn resize_listener_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| matches!(sub, MockSubscription::Resize(_)))
            .count()
    }

    /// Number of live intersection observers watching `target`
    pub fn observer_count(&self, target: MockElement) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| {
                matches!(sub, MockSubscription::Intersection { target: t, .. } if *t == target)
            })
            .count()
    }

    /// Options of the live observer watching `target`
    ///
    /// Returns `(thresholds, root, root_margin)`.
    pub fn observer_options(
        &self,
        target: MockElement,
    ) -> Option<(Vec<f64>, Option<MockElement>, String)> {
        self.subscriptions.borrow().values().find_map(|sub| match sub {
            MockSubscription::Intersection {
                target: t,
                thresholds,
                root,
                root_margin,
                ..
            } if *t == target => Some((thresholds.clone(), *root, root_margin.clone())),
            _ => None,
        })
    }

    /// Number of live scroll subscriptions
    pub fn scroll_listener_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| matches!(sub, MockSubscription::Scroll { .. }))
            .count()
    }

    /// Number of live route subscriptions
    pub fn route_listener_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| matches!(sub, MockSubscription::Route(_)))
            .count()
    }

    /// Number of pending frame requests
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Number of pending timeouts
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Clear the debug log
    pub fn clear_debug_log(&self) {
        self.debug_log.borrow_mut().clear();
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }
}

impl Default for MockHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Hal for MockHal {
    type Element = MockElement;

    fn match_media(&self, query: &str) -> Result<bool, HalError> {
        if !self.media_supported.get() {
            return Err(HalError::NotSupported);
        }
        Ok(self.media.borrow().get(query).copied().unwrap_or(false))
    }

    fn watch_media(&self, query: &str, listener: Listener<bool>) -> Result<SubscriptionId, HalError> {
        if !self.media_supported.get() {
            return Err(HalError::NotSupported);
        }
        let id = self.next_id();
        self.subscriptions.borrow_mut().insert(
            id,
            MockSubscription::Media {
                query: String::from(query),
                listener,
            },
        );
        Ok(SubscriptionId(id))
    }

    fn viewport_width(&self) -> Result<f64, HalError> {
        self.width.get().ok_or(HalError::Unavailable)
    }

    fn watch_resize(&self, listener: Listener<f64>) -> Result<SubscriptionId, HalError> {
        let id = self.next_id();
        self.subscriptions
            .borrow_mut()
            .insert(id, MockSubscription::Resize(listener));
        Ok(SubscriptionId(id))
    }

    fn observe_intersection(
        &self,
        target: &MockElement,
        request: IntersectionRequest<'_, MockElement>,
        listener: Listener<bool>,
    ) -> Result<SubscriptionId, HalError> {
        if !self.intersection_supported.get() {
            return Err(HalError::NotSupported);
        }
        if request.thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(HalError::InvalidArgument);
        }
        let id = self.next_id();
        self.subscriptions.borrow_mut().insert(
            id,
            MockSubscription::Intersection {
                target: *target,
                thresholds: request.thresholds.to_vec(),
                root: request.root.copied(),
                root_margin: String::from(request.root_margin),
                listener,
            },
        );
        self.debug_write(&format!("[mock-hal] Observing element {}", target.0));
        Ok(SubscriptionId(id))
    }

    fn scroll_metrics(&self, container: Option<&MockElement>) -> Result<ScrollMetrics, HalError> {
        match container {
            Some(element) => Ok(self
                .container_scroll
                .borrow()
                .get(element)
                .copied()
                .unwrap_or_default()),
            None => Ok(self.document_scroll.get()),
        }
    }

    fn watch_scroll(
        &self,
        container: Option<&MockElement>,
        listener: Listener<()>,
    ) -> Result<SubscriptionId, HalError> {
        let id = self.next_id();
        self.subscriptions.borrow_mut().insert(
            id,
            MockSubscription::Scroll {
                container: container.copied(),
                listener,
            },
        );
        Ok(SubscriptionId(id))
    }

    fn current_path(&self) -> Result<String, HalError> {
        Ok(self.path.borrow().clone())
    }

    fn watch_route(&self, listener: Listener<String>) -> Result<SubscriptionId, HalError> {
        let id = self.next_id();
        self.subscriptions
            .borrow_mut()
            .insert(id, MockSubscription::Route(listener));
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        // Drop outside the borrow; a listener may own the last reference to
        // state whose drop unsubscribes again.
        let removed = self.subscriptions.borrow_mut().remove(&id.0);
        drop(removed);
    }

    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HalError> {
        let id = self.next_id();
        self.frames.borrow_mut().insert(id, callback);
        Ok(FrameHandle(id))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let removed = self.frames.borrow_mut().remove(&handle.0);
        drop(removed);
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerHandle, HalError> {
        let id = self.next_id();
        let deadline = self.time.get() + f64::from(delay_ms);
        self.timers
            .borrow_mut()
            .insert(id, MockTimer { deadline, callback });
        Ok(TimerHandle(id))
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let removed = self.timers.borrow_mut().remove(&handle.0);
        drop(removed);
    }

    fn now_ms(&self) -> f64 {
        self.time.get()
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(String::from(msg));
    }
}
