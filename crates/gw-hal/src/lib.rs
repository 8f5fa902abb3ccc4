//! Ambient signal abstraction layer for the Groundwork site
//!
//! This crate defines the HAL trait that lets every motion/layout controller
//! run against different hosts (the browser, or a deterministic mock in tests)
//! by abstracting the document-level signals they observe.
//!
//! # Signals
//!
//! - **Media queries**: `matchMedia()` reads and `change` notifications
//! - **Viewport**: `innerWidth` reads and `resize` notifications
//! - **Intersection**: `IntersectionObserver` per target element
//! - **Scroll**: document or container scroll metrics and `scroll` notifications
//! - **Routing**: current path and route-change notifications
//! - **Scheduling**: `requestAnimationFrame()` and `setTimeout()`
//!
//! Every subscription returns a handle that must be released explicitly.
//! Hosts never deliver a callback for a handle after it has been released.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;

/// Listener invoked on every notification of a subscribed signal
pub type Listener<T> = Rc<dyn Fn(T)>;

/// One-shot callback for an animation frame, receives the frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// One-shot callback for an elapsed timeout
pub type TimerCallback = Box<dyn FnOnce()>;

/// Handle to an active signal subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u32);

/// Handle to a pending animation frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u32);

/// Handle to a pending timeout
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u32);

/// Scroll position of the document or of a scroll container (px)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub const fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }
}

/// Parameters for an intersection observation
#[derive(Clone, Copy, Debug)]
pub struct IntersectionRequest<'a, E> {
    /// Visibility ratios at which the host reports a change
    pub thresholds: &'a [f64],
    /// Containment scope (`None` = the viewport)
    pub root: Option<&'a E>,
    /// CSS margin applied around the root, e.g. `"0px 0px -50px 0px"`
    pub root_margin: &'a str,
}

/// Ambient signal abstraction
///
/// Implementations provide host-specific access to the document signals the
/// controllers subscribe to. All callbacks are delivered on the UI thread.
///
/// # Associated Types
///
/// - `Element`: Host handle to an observable element
///   - In the browser: a DOM `Element`
///   - In tests: a numeric element id
pub trait Hal: 'static {
    /// Handle to an observable element
    type Element: Clone + PartialEq + 'static;

    // === Media Queries ===

    /// Evaluate a media query once
    ///
    /// # Returns
    /// * `Ok(matches)` - Current match state
    /// * `Err(HalError::NotSupported)` - Host has no media query facility
    fn match_media(&self, query: &str) -> Result<bool, HalError>;

    /// Subscribe to match-state changes of a media query
    ///
    /// The listener receives the new match state.
    fn watch_media(&self, query: &str, listener: Listener<bool>) -> Result<SubscriptionId, HalError>;

    // === Viewport ===

    /// Current viewport width in CSS pixels
    fn viewport_width(&self) -> Result<f64, HalError>;

    /// Subscribe to viewport resizes; the listener receives the new width
    fn watch_resize(&self, listener: Listener<f64>) -> Result<SubscriptionId, HalError>;

    // === Intersection ===

    /// Observe intersection changes of `target`
    ///
    /// The listener receives `is_intersecting` for every entry, in the order
    /// the host emits them.
    ///
    /// # Returns
    /// * `Ok(SubscriptionId)` - Observer attached
    /// * `Err(HalError::NotSupported)` - Host has no intersection facility
    /// * `Err(HalError::InvalidArgument)` - Rejected threshold or margin
    fn observe_intersection(
        &self,
        target: &Self::Element,
        request: IntersectionRequest<'_, Self::Element>,
        listener: Listener<bool>,
    ) -> Result<SubscriptionId, HalError>;

    // === Scroll ===

    /// Read scroll metrics of `container` (`None` = the document)
    fn scroll_metrics(&self, container: Option<&Self::Element>) -> Result<ScrollMetrics, HalError>;

    /// Subscribe to scroll events of `container` (`None` = the document)
    fn watch_scroll(
        &self,
        container: Option<&Self::Element>,
        listener: Listener<()>,
    ) -> Result<SubscriptionId, HalError>;

    // === Routing ===

    /// Current route path
    fn current_path(&self) -> Result<String, HalError> {
        Err(HalError::NotSupported)
    }

    /// Subscribe to route changes; the listener receives the new path
    ///
    /// Hosts whose router cannot be observed return `NotSupported`; the
    /// routing shell then pushes paths to the coordinator directly.
    fn watch_route(&self, _listener: Listener<String>) -> Result<SubscriptionId, HalError> {
        Err(HalError::NotSupported)
    }

    /// Release a subscription of any kind
    ///
    /// Releasing an unknown or already released handle is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);

    // === Scheduling ===

    /// Request a callback before the next repaint
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HalError>;

    /// Cancel a pending frame request (no-op if it already fired)
    fn cancel_frame(&self, handle: FrameHandle);

    /// Run `callback` after `delay_ms` milliseconds
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerHandle, HalError>;

    /// Cancel a pending timeout (no-op if it already fired)
    fn clear_timeout(&self, handle: TimerHandle);

    // === Time & Debug ===

    /// Monotonic time in milliseconds
    fn now_ms(&self) -> f64;

    /// Write a debug message to the host console/log
    fn debug_write(&self, msg: &str);
}

/// HAL errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalError {
    /// Facility not provided by this host
    NotSupported,
    /// Host object missing (no window, no document)
    Unavailable,
    /// Invalid argument (query, threshold, margin)
    InvalidArgument,
    /// Host refused to attach an observer or listener
    ObserverFailed,
    /// Host refused to schedule a frame or timeout
    SchedulingFailed,
}
