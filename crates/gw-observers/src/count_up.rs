//! Count-up animator

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gw_hal::{Hal, TimerHandle};
use gw_motion::{CountUpOptions, FrameTick, IntersectionConfig};

use crate::frame::FrameScheduler;
use crate::motion::{MotionPreferenceMonitor, MotionReader};
use crate::visibility::VisibilityObserver;
use crate::{Lifecycle, Notifier};

struct CountUpShared {
    options: RefCell<CountUpOptions>,
    value: Cell<f64>,
    /// Timestamp of the first animated frame
    started_at: Cell<Option<f64>>,
    has_run: Cell<bool>,
    delay_timer: Cell<Option<TimerHandle>>,
    reduced: MotionReader,
    on_change: Notifier<f64>,
}

impl CountUpShared {
    fn set_value(&self, value: f64) {
        if self.value.replace(value) != value {
            self.on_change.notify(&value);
        }
    }
}

/// Counts a number up once its element scrolls into view
///
/// Waits `delay_ms` after the element becomes visible, then interpolates on
/// every animation frame until `duration_ms` has elapsed. Under reduced
/// motion the value jumps straight to `end`.
pub struct CountUpAnimator<H: Hal> {
    hal: Rc<H>,
    shared: Rc<CountUpShared>,
    visibility: VisibilityObserver<H>,
    motion: MotionPreferenceMonitor<H>,
    frames: Rc<FrameScheduler<H>>,
    mounted: bool,
}

fn visibility_config(options: &CountUpOptions) -> IntersectionConfig {
    IntersectionConfig {
        freeze_once_visible: options.once,
        ..IntersectionConfig::default()
    }
}

fn cancel<H: Hal>(hal: &H, shared: &CountUpShared, frames: &FrameScheduler<H>) {
    if let Some(handle) = shared.delay_timer.take() {
        hal.clear_timeout(handle);
    }
    frames.set_active(false);
}

fn jump_to_end<H: Hal>(hal: &H, shared: &CountUpShared, frames: &FrameScheduler<H>) {
    cancel(hal, shared, frames);
    let end = shared.options.borrow().end;
    shared.set_value(end);
}

fn on_visibility<H: Hal>(
    hal: &Rc<H>,
    shared: &Rc<CountUpShared>,
    frames: &Rc<FrameScheduler<H>>,
    visible: bool,
) {
    if shared.reduced.prefers_reduced_motion() {
        jump_to_end(&**hal, shared, frames);
        return;
    }

    let (once, delay_ms, start) = {
        let options = shared.options.borrow();
        (options.once, options.delay_ms, options.start)
    };
    if !visible {
        if !once {
            cancel(&**hal, shared, frames);
        }
        return;
    }
    if once && shared.has_run.get() {
        return;
    }
    if shared.delay_timer.get().is_some() || frames.is_active() {
        return;
    }

    shared.has_run.set(true);
    shared.started_at.set(None);
    shared.set_value(start);

    let weak_frames: Weak<FrameScheduler<H>> = Rc::downgrade(frames);
    let weak = Rc::downgrade(shared);
    let callback = Box::new(move || {
        if let Some(shared) = weak.upgrade() {
            shared.delay_timer.set(None);
        }
        if let Some(frames) = weak_frames.upgrade() {
            frames.set_active(true);
        }
    });
    match hal.set_timeout(delay_ms, callback) {
        Ok(handle) => shared.delay_timer.set(Some(handle)),
        Err(e) => {
            hal.debug_write(&format!(
                "[count-up] Delay timer failed ({:?}), starting now",
                e
            ));
            frames.set_active(true);
        }
    }
}

fn on_frame<H: Hal>(shared: &CountUpShared, frames: &FrameScheduler<H>, tick: FrameTick) {
    let started_at = match shared.started_at.get() {
        Some(t) => t,
        None => {
            // The first forwarded tick carries the delta since the priming frame
            let t = tick.timestamp - tick.delta;
            shared.started_at.set(Some(t));
            t
        }
    };
    let elapsed = tick.timestamp - started_at;
    let (value, done) = {
        let options = shared.options.borrow();
        (options.value_at(elapsed), options.progress_at(elapsed) >= 1.0)
    };
    shared.set_value(value);
    if done {
        frames.set_active(false);
    }
}

impl<H: Hal> CountUpAnimator<H> {
    pub fn new(hal: Rc<H>, options: CountUpOptions) -> Self {
        let motion = MotionPreferenceMonitor::new(Rc::clone(&hal));
        let visibility = VisibilityObserver::new(Rc::clone(&hal), visibility_config(&options));
        let frames = Rc::new(FrameScheduler::new(Rc::clone(&hal)));
        let shared = Rc::new(CountUpShared {
            value: Cell::new(options.start),
            options: RefCell::new(options),
            started_at: Cell::new(None),
            has_run: Cell::new(false),
            delay_timer: Cell::new(None),
            reduced: motion.reader(),
            on_change: Notifier::new(),
        });

        let weak = Rc::downgrade(&shared);
        let weak_frames = Rc::downgrade(&frames);
        frames.set_callback(move |tick| {
            if let (Some(shared), Some(frames)) = (weak.upgrade(), weak_frames.upgrade()) {
                on_frame(&shared, &frames, tick);
            }
        });

        let weak_hal: Weak<H> = Rc::downgrade(&hal);
        let weak = Rc::downgrade(&shared);
        let weak_frames = Rc::downgrade(&frames);
        visibility.on_change(move |visible| {
            if let (Some(hal), Some(shared), Some(frames)) =
                (weak_hal.upgrade(), weak.upgrade(), weak_frames.upgrade())
            {
                on_visibility(&hal, &shared, &frames, *visible);
            }
        });

        let weak_hal: Weak<H> = Rc::downgrade(&hal);
        let weak = Rc::downgrade(&shared);
        let weak_frames = Rc::downgrade(&frames);
        motion.on_change(move |reduced| {
            if !*reduced {
                return;
            }
            if let (Some(hal), Some(shared), Some(frames)) =
                (weak_hal.upgrade(), weak.upgrade(), weak_frames.upgrade())
            {
                jump_to_end(&*hal, &shared, &frames);
            }
        });

        Self {
            hal,
            shared,
            visibility,
            motion,
            frames,
            mounted: false,
        }
    }

    /// Current (unformatted) value
    pub fn value(&self) -> f64 {
        self.shared.value.get()
    }

    /// Current value with prefix, suffix, decimals and separator applied
    pub fn formatted(&self) -> String {
        self.shared.options.borrow().format(self.value())
    }

    pub fn is_animating(&self) -> bool {
        self.frames.is_active() || self.shared.delay_timer.get().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn options(&self) -> CountUpOptions {
        self.shared.options.borrow().clone()
    }

    /// Called with the new value on every change
    pub fn on_change(&self, listener: impl Fn(&f64) + 'static) {
        self.shared.on_change.set(listener);
    }

    /// Bind the element whose visibility starts the count
    ///
    /// A different element counts again from `start`.
    pub fn bind(&mut self, target: Option<H::Element>) {
        if self.visibility.target() == target.as_ref() {
            return;
        }
        cancel(&*self.hal, &self.shared, &self.frames);
        self.shared.has_run.set(false);
        let value = {
            let options = self.shared.options.borrow();
            if self.mounted && self.shared.reduced.prefers_reduced_motion() {
                options.end
            } else {
                options.start
            }
        };
        self.shared.set_value(value);
        self.visibility.bind(target);
    }

    /// Replace the options
    ///
    /// A counter that has not run yet restarts from the new `start`; one that
    /// finished, or runs under reduced motion, snaps to the new `end`.
    pub fn configure(&mut self, options: CountUpOptions) {
        if *self.shared.options.borrow() == options {
            return;
        }
        let config = visibility_config(&options);
        let (start, end) = (options.start, options.end);
        *self.shared.options.borrow_mut() = options;

        if self.shared.reduced.prefers_reduced_motion() && self.mounted {
            self.shared.set_value(end);
        } else if !self.shared.has_run.get() {
            self.shared.set_value(start);
        } else if !self.is_animating() {
            self.shared.set_value(end);
        }
        self.visibility.configure(config);
    }
}

impl<H: Hal> Lifecycle for CountUpAnimator<H> {
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.frames.start();
        self.motion.mount();
        if self.motion.prefers_reduced_motion() {
            jump_to_end(&*self.hal, &self.shared, &self.frames);
        }
        self.visibility.mount();
        // A frozen target attaches no observer and will not report again
        if self.visibility.is_visible() && !self.shared.has_run.get() {
            on_visibility(&self.hal, &self.shared, &self.frames, true);
        }
    }

    fn unmount(&mut self) {
        let interrupted = self.is_animating();
        cancel(&*self.hal, &self.shared, &self.frames);
        self.frames.stop();
        self.visibility.unmount();
        self.motion.unmount();
        if interrupted {
            // An interrupted count may run again after remounting
            self.shared.has_run.set(false);
        }
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Hal> Drop for CountUpAnimator<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
