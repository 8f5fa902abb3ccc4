//! Browser HAL implementation
//!
//! Implements the ambient signal HAL over `web-sys`. Every subscription keeps
//! its JS closure alive in a map keyed by the handle it returned; releasing
//! the handle removes the browser listener and drops the closure.
//!
//! Frame and timer closures remove their own entry when they fire, so a
//! fired handle is simply unknown to later `cancel_frame`/`clear_timeout`
//! calls.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gw_hal::{
    FrameCallback, FrameHandle, Hal, HalError, IntersectionRequest, Listener, ScrollMetrics,
    SubscriptionId, TimerCallback, TimerHandle,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::util::log;

mod subscription;

use subscription::WebSubscription;

type FrameMap = RefCell<HashMap<u32, (i32, Closure<dyn FnMut(f64)>)>>;
type TimerMap = RefCell<HashMap<u32, (i32, Closure<dyn FnMut()>)>>;

thread_local! {
    static SHARED: Rc<WebHal> = Rc::new(WebHal::new());
}

/// The page-wide HAL instance shared by every handle
pub fn shared_hal() -> Rc<WebHal> {
    SHARED.with(Rc::clone)
}

fn window() -> Result<Window, HalError> {
    web_sys::window().ok_or(HalError::Unavailable)
}

/// WASM HAL implementation
///
/// Runs on the browser main thread; all callbacks are delivered by the
/// browser event loop.
pub struct WebHal {
    /// Next handle to assign (shared by all handle kinds)
    next_id: Cell<u32>,
    /// Live subscriptions: handle -> listener/observer and its closure
    subscriptions: RefCell<HashMap<u32, WebSubscription>>,
    /// Pending frames: handle -> (browser request id, closure)
    frames: Rc<FrameMap>,
    /// Pending timeouts: handle -> (browser timer id, closure)
    timers: Rc<TimerMap>,
}

impl WebHal {
    /// Create a new browser HAL
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            subscriptions: RefCell::new(HashMap::new()),
            frames: Rc::new(RefCell::new(HashMap::new())),
            timers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1).max(1));
        id
    }

    fn register(&self, subscription: WebSubscription) -> SubscriptionId {
        let id = self.next_id();
        self.subscriptions.borrow_mut().insert(id, subscription);
        SubscriptionId(id)
    }

    /// Attach an event listener and keep it registered under a new handle
    fn listen(
        &self,
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<SubscriptionId, HalError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| {
                log(&format!("[web-hal] Failed to listen for '{}': {:?}", event, e));
                HalError::ObserverFailed
            })?;
        Ok(self.register(WebSubscription::Listener {
            target,
            event,
            closure,
        }))
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Number of pending frames and timeouts
    pub fn pending_callbacks(&self) -> usize {
        self.frames.borrow().len() + self.timers.borrow().len()
    }
}

impl Default for WebHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Hal for WebHal {
    type Element = Element;

    fn match_media(&self, query: &str) -> Result<bool, HalError> {
        let list = window()?
            .match_media(query)
            .map_err(|_| HalError::InvalidArgument)?
            .ok_or(HalError::NotSupported)?;
        Ok(list.matches())
    }

    fn watch_media(&self, query: &str, listener: Listener<bool>) -> Result<SubscriptionId, HalError> {
        let list = window()?
            .match_media(query)
            .map_err(|_| HalError::InvalidArgument)?
            .ok_or(HalError::NotSupported)?;
        let reader = list.clone();
        self.listen(list.into(), "change", move |_| listener(reader.matches()))
    }

    fn viewport_width(&self) -> Result<f64, HalError> {
        window()?
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .ok_or(HalError::Unavailable)
    }

    fn watch_resize(&self, listener: Listener<f64>) -> Result<SubscriptionId, HalError> {
        let window = window()?;
        let reader = window.clone();
        self.listen(window.into(), "resize", move |_| {
            if let Some(width) = reader.inner_width().ok().and_then(|w| w.as_f64()) {
                listener(width);
            }
        })
    }

    fn observe_intersection(
        &self,
        target: &Element,
        request: IntersectionRequest<'_, Element>,
        listener: Listener<bool>,
    ) -> Result<SubscriptionId, HalError> {
        let window = window()?;
        let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false);
        if !supported {
            return Err(HalError::NotSupported);
        }

        let closure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    listener(entry.is_intersecting());
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let thresholds: js_sys::Array = request
            .thresholds
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&thresholds);
        init.set_root_margin(request.root_margin);
        if let Some(root) = request.root {
            init.set_root(Some(root.unchecked_ref::<web_sys::Element>()));
        }

        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(|e| {
                    log(&format!("[web-hal] IntersectionObserver rejected options: {:?}", e));
                    HalError::InvalidArgument
                })?;
        observer.observe(target);

        Ok(self.register(WebSubscription::Intersection {
            observer,
            _closure: closure,
        }))
    }

    fn scroll_metrics(&self, container: Option<&Element>) -> Result<ScrollMetrics, HalError> {
        let element = match container {
            Some(element) => element.clone(),
            None => window()?
                .document()
                .and_then(|doc| doc.document_element())
                .ok_or(HalError::Unavailable)?,
        };
        Ok(ScrollMetrics::new(
            f64::from(element.scroll_top()),
            f64::from(element.scroll_height()),
            f64::from(element.client_height()),
        ))
    }

    fn watch_scroll(
        &self,
        container: Option<&Element>,
        listener: Listener<()>,
    ) -> Result<SubscriptionId, HalError> {
        let target: EventTarget = match container {
            Some(element) => element.clone().into(),
            None => window()?.into(),
        };
        self.listen(target, "scroll", move |_| listener(()))
    }

    fn current_path(&self) -> Result<String, HalError> {
        window()?
            .location()
            .pathname()
            .map_err(|_| HalError::Unavailable)
    }

    fn watch_route(&self, listener: Listener<String>) -> Result<SubscriptionId, HalError> {
        let window = window()?;
        let location = window.location();
        self.listen(window.into(), "popstate", move |_| {
            if let Ok(path) = location.pathname() {
                listener(path);
            }
        })
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let removed = self.subscriptions.borrow_mut().remove(&id.0);
        if let Some(subscription) = removed {
            subscription.dispose();
        }
    }

    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HalError> {
        let window = window()?;
        let id = self.next_id();
        let frames = Rc::downgrade(&self.frames);
        let closure = Closure::once(move |timestamp: f64| {
            let entry = frames.upgrade().and_then(|f| f.borrow_mut().remove(&id));
            callback(timestamp);
            drop(entry);
        });
        let request_id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| {
                log(&format!("[web-hal] requestAnimationFrame failed: {:?}", e));
                HalError::SchedulingFailed
            })?;
        self.frames.borrow_mut().insert(id, (request_id, closure));
        Ok(FrameHandle(id))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let removed = self.frames.borrow_mut().remove(&handle.0);
        if let (Some((request_id, _closure)), Ok(window)) = (removed, window()) {
            let _ = window.cancel_animation_frame(request_id);
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerHandle, HalError> {
        let window = window()?;
        let id = self.next_id();
        let timers = Rc::downgrade(&self.timers);
        let closure = Closure::once(move || {
            let entry = timers.upgrade().and_then(|t| t.borrow_mut().remove(&id));
            callback();
            drop(entry);
        });
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let timer_id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            )
            .map_err(|e| {
                log(&format!("[web-hal] setTimeout failed: {:?}", e));
                HalError::SchedulingFailed
            })?;
        self.timers.borrow_mut().insert(id, (timer_id, closure));
        Ok(TimerHandle(id))
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let removed = self.timers.borrow_mut().remove(&handle.0);
        if let (Some((timer_id, _closure)), Ok(window)) = (removed, window()) {
            window.clear_timeout_with_handle(timer_id);
        }
    }

    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }
}
