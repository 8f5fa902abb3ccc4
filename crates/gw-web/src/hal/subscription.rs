//! Live browser subscriptions

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, IntersectionObserver};

/// A browser listener or observer plus the closure it calls
pub(crate) enum WebSubscription {
    /// `addEventListener` registration
    Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    },
    /// `IntersectionObserver` watching one target
    Intersection {
        observer: IntersectionObserver,
        _closure: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    },
}

impl WebSubscription {
    /// Detach from the browser; the closure is dropped afterwards
    pub(crate) fn dispose(self) {
        match self {
            WebSubscription::Listener {
                target,
                event,
                closure,
            } => {
                let _ = target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
            WebSubscription::Intersection { observer, .. } => observer.disconnect(),
        }
    }
}
