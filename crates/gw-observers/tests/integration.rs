//! Integration tests for the Groundwork controllers
//!
//! These tests drive every controller against `MockHal` and verify:
//! - Derived state for each signal (preference, breakpoint, visibility, scroll)
//! - Frame loop baseline and deactivation behavior
//! - Reveal and route transition sequencing, including superseded timers
//! - Count-up progress, reduced-motion shortcut and once semantics
//! - Release of every subscription, frame and timer on unmount/drop

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gw_hal::ScrollMetrics;
use gw_hal_mock::{MockElement, MockHal};
use gw_motion::{
    Breakpoint, CountUpOptions, FrameTick, IntersectionConfig, RevealOptions, RevealPhase,
    RouteTransitionState, ScrollIndicatorOptions, Threshold, REDUCED_MOTION_QUERY,
};
use gw_observers::{
    BreakpointTracker, CountUpAnimator, FrameScheduler, Lifecycle, MotionPreferenceMonitor,
    RevealCoordinator, RouteTransitionCoordinator, ScrollProgressTracker, VisibilityObserver,
};

const TARGET: MockElement = MockElement(1);
const OTHER: MockElement = MockElement(2);

fn hal() -> Rc<MockHal> {
    Rc::new(MockHal::new())
}

fn assert_released(hal: &MockHal) {
    assert_eq!(hal.subscription_count(), 0, "subscriptions leaked");
    assert_eq!(hal.pending_frames(), 0, "frames leaked");
    assert_eq!(hal.pending_timers(), 0, "timers leaked");
}

// =============================================================================
// Motion Preference Tests
// =============================================================================

#[test]
fn test_motion_defaults_to_reduced_until_read() {
    let hal = hal();
    let mut monitor = MotionPreferenceMonitor::new(Rc::clone(&hal));
    assert!(monitor.prefers_reduced_motion());

    monitor.mount();
    assert!(!monitor.prefers_reduced_motion());
    assert_eq!(hal.media_listener_count(REDUCED_MOTION_QUERY), 1);
}

#[test]
fn test_motion_follows_preference_changes() {
    let hal = hal();
    let mut monitor = MotionPreferenceMonitor::new(Rc::clone(&hal));
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    monitor.on_change(move |reduced| sink.borrow_mut().push(*reduced));

    monitor.mount();
    hal.set_media(REDUCED_MOTION_QUERY, true);
    assert!(monitor.prefers_reduced_motion());
    hal.set_media(REDUCED_MOTION_QUERY, false);

    assert_eq!(*changes.borrow(), vec![false, true, false]);

    monitor.unmount();
    hal.set_media(REDUCED_MOTION_QUERY, true);
    assert!(!monitor.prefers_reduced_motion());
    assert_released(&hal);
}

#[test]
fn test_motion_keeps_safe_default_without_media_queries() {
    let hal = hal();
    hal.set_media_supported(false);
    let mut monitor = MotionPreferenceMonitor::new(Rc::clone(&hal));

    monitor.mount();
    assert!(monitor.prefers_reduced_motion());
    assert!(monitor.is_mounted());
    assert!(hal.has_log_containing("[motion]"));
}

// =============================================================================
// Breakpoint Tests
// =============================================================================

#[test]
fn test_breakpoints_unmeasured_before_mount() {
    let hal = hal();
    let tracker = BreakpointTracker::new(Rc::clone(&hal));

    assert_eq!(tracker.width(), None);
    assert_eq!(tracker.breakpoint(), Breakpoint::Xs);
    for bp in Breakpoint::ALL {
        assert!(!tracker.is_breakpoint(bp));
    }
    assert!(!tracker.is_mounted());
}

#[test]
fn test_breakpoints_follow_resizes() {
    let hal = Rc::new(MockHal::with_width(500.0));
    let mut tracker = BreakpointTracker::new(Rc::clone(&hal));
    tracker.mount();

    let mut seen = Vec::new();
    for width in [500.0, 800.0, 1300.0] {
        hal.resize(width);
        seen.push((tracker.breakpoint(), tracker.is_mobile()));
    }
    assert_eq!(
        seen,
        vec![
            (Breakpoint::Xs, true),
            (Breakpoint::Md, false),
            (Breakpoint::Xl, false),
        ]
    );

    hal.resize(768.0);
    assert_eq!(tracker.breakpoint(), Breakpoint::Md);
    assert!(tracker.is_tablet());
    assert!(!tracker.is_desktop());
}

#[test]
fn test_breakpoints_are_monotonic() {
    let hal = hal();
    let mut tracker = BreakpointTracker::new(Rc::clone(&hal));
    tracker.mount();

    for width in [0.0, 639.0, 640.0, 1023.0, 1024.0, 1535.0, 1536.0, 4000.0] {
        hal.resize(width);
        for (i, larger) in Breakpoint::ALL.iter().enumerate() {
            for smaller in &Breakpoint::ALL[..i] {
                if tracker.is_breakpoint(*larger) {
                    assert!(tracker.is_breakpoint(*smaller), "width {}", width);
                }
            }
        }
    }
}

#[test]
fn test_breakpoints_notify_and_release() {
    let hal = hal();
    let mut tracker = BreakpointTracker::new(Rc::clone(&hal));
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    tracker.on_change(move |_| sink.set(sink.get() + 1));

    tracker.mount();
    assert_eq!(count.get(), 1);
    hal.resize(1024.0);
    assert_eq!(count.get(), 1);
    hal.resize(300.0);
    assert_eq!(count.get(), 2);

    drop(tracker);
    hal.resize(1200.0);
    assert_eq!(count.get(), 2);
    assert_released(&hal);
}

// =============================================================================
// Visibility Tests
// =============================================================================

fn frozen_config(threshold: f64) -> IntersectionConfig {
    IntersectionConfig {
        threshold: Threshold::from(threshold),
        freeze_once_visible: true,
        ..IntersectionConfig::default()
    }
}

#[test]
fn test_visibility_freeze_once_visible() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), frozen_config(0.1));
    observer.bind(Some(TARGET));
    observer.mount();

    let (thresholds, root, margin) = hal.observer_options(TARGET).unwrap();
    assert_eq!(thresholds, vec![0.1]);
    assert_eq!(root, None);
    assert_eq!(margin, "0%");

    let mut seen = Vec::new();
    for intersecting in [false, true, false] {
        hal.intersect(TARGET, intersecting);
        seen.push(observer.is_visible());
    }
    assert_eq!(seen, vec![false, true, true]);
    // Frozen targets release their observer
    assert_eq!(hal.observer_count(TARGET), 0);
}

#[test]
fn test_visibility_follows_target_without_freeze() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), IntersectionConfig::default());
    observer.bind(Some(TARGET));
    observer.mount();

    hal.intersect(TARGET, true);
    assert!(observer.is_visible());
    hal.intersect(TARGET, false);
    assert!(!observer.is_visible());
}

#[test]
fn test_visibility_frozen_target_skips_observer() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), frozen_config(0.0));
    observer.bind(Some(TARGET));
    observer.mount();
    hal.intersect(TARGET, true);

    // Reconfiguring rebuilds the observer, but a frozen target needs none
    observer.configure(IntersectionConfig {
        root_margin: "10px".to_string(),
        ..frozen_config(0.0)
    });
    assert_eq!(hal.observer_count(TARGET), 0);
    assert!(observer.is_visible());
}

#[test]
fn test_visibility_unfreezing_follows_target_again() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), frozen_config(0.0));
    observer.bind(Some(TARGET));
    observer.mount();
    hal.intersect(TARGET, true);
    assert_eq!(hal.observer_count(TARGET), 0);

    observer.configure(IntersectionConfig::default());
    assert_eq!(hal.observer_count(TARGET), 1);
    assert!(observer.is_visible());

    hal.intersect(TARGET, false);
    assert!(!observer.is_visible());
    hal.intersect(TARGET, true);
    assert!(observer.is_visible());
}

#[test]
fn test_visibility_reconnects_on_change() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), IntersectionConfig::default());
    observer.bind(Some(TARGET));
    observer.mount();
    assert_eq!(hal.observer_count(TARGET), 1);

    observer.configure(IntersectionConfig {
        threshold: Threshold::Many(vec![0.0, 0.5, 1.0]),
        ..IntersectionConfig::default()
    });
    assert_eq!(hal.observer_count(TARGET), 1);
    assert_eq!(hal.observer_options(TARGET).unwrap().0, vec![0.0, 0.5, 1.0]);

    observer.set_root(Some(OTHER));
    assert_eq!(hal.observer_count(TARGET), 1);
    assert_eq!(hal.observer_options(TARGET).unwrap().1, Some(OTHER));

    observer.bind(Some(OTHER));
    assert_eq!(hal.observer_count(TARGET), 0);
    assert_eq!(hal.observer_count(OTHER), 1);

    observer.unmount();
    assert_released(&hal);
}

#[test]
fn test_visibility_rebind_starts_fresh() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), frozen_config(0.0));
    observer.bind(Some(TARGET));
    observer.mount();
    hal.intersect(TARGET, true);
    assert!(observer.state().frozen);

    observer.bind(Some(OTHER));
    assert!(!observer.is_visible());
    assert!(!observer.state().frozen);
    assert_eq!(hal.observer_count(OTHER), 1);
}

#[test]
fn test_visibility_fails_open_without_observer() {
    let hal = hal();
    hal.set_intersection_supported(false);
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), IntersectionConfig::default());
    let flips = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&flips);
    observer.on_change(move |visible| sink.borrow_mut().push(*visible));

    observer.bind(Some(TARGET));
    observer.mount();
    assert!(observer.is_visible());
    assert_eq!(*flips.borrow(), vec![true]);
    assert!(hal.has_log_containing("[visibility]"));
}

#[test]
fn test_visibility_unbound_observes_nothing() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), IntersectionConfig::default());
    observer.mount();
    assert_eq!(hal.subscription_count(), 0);
    assert!(!observer.is_visible());
}

#[test]
fn test_visibility_ignores_entries_after_drop() {
    let hal = hal();
    let mut observer = VisibilityObserver::new(Rc::clone(&hal), IntersectionConfig::default());
    observer.bind(Some(TARGET));
    observer.mount();
    drop(observer);

    hal.intersect(TARGET, true);
    assert_released(&hal);
}

// =============================================================================
// Scroll Progress Tests
// =============================================================================

#[test]
fn test_scroll_progress_coalesces_to_one_frame() {
    let hal = hal();
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());
    let recomputes = Rc::new(Cell::new(0));
    let sink = Rc::clone(&recomputes);
    tracker.on_change(move |_| sink.set(sink.get() + 1));
    tracker.mount();

    hal.scroll(None, ScrollMetrics::new(100.0, 1100.0, 100.0));
    hal.scroll(None, ScrollMetrics::new(300.0, 1100.0, 100.0));
    hal.scroll(None, ScrollMetrics::new(500.0, 1100.0, 100.0));
    assert_eq!(hal.pending_frames(), 1);
    assert_eq!(tracker.progress(), 0.0);

    hal.tick_frame(16.0);
    assert_eq!(recomputes.get(), 1);
    assert!((tracker.progress() - 0.5).abs() < 1e-9);
}

#[test]
fn test_scroll_progress_bounds() {
    let hal = hal();
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());
    tracker.mount();

    let cases = [
        ScrollMetrics::new(0.0, 500.0, 500.0),
        ScrollMetrics::new(-40.0, 1000.0, 500.0),
        ScrollMetrics::new(900.0, 1000.0, 500.0),
        ScrollMetrics::new(250.0, 1000.0, 500.0),
    ];
    let mut seen = Vec::new();
    for (i, metrics) in cases.into_iter().enumerate() {
        hal.scroll(None, metrics);
        hal.tick_frame(16.0 * (i + 1) as f64);
        seen.push(tracker.progress());
    }
    assert_eq!(seen, vec![0.0, 0.0, 1.0, 0.5]);
}

#[test]
fn test_scroll_indicator_hidden_under_reduced_motion() {
    let hal = hal();
    hal.scroll(None, ScrollMetrics::new(500.0, 1500.0, 500.0));
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());

    // Preference unknown before mount
    assert!(tracker.indicator().is_none());

    tracker.mount();
    let indicator = tracker.indicator().unwrap();
    assert!((indicator.scale_x - 0.5).abs() < 1e-9);
    assert_eq!(indicator.color, "#F59E0B");
    assert_eq!(indicator.height, 3);
    assert_eq!(indicator.z_index, 50);

    hal.set_media(REDUCED_MOTION_QUERY, true);
    assert!(tracker.indicator().is_none());
    assert!((tracker.progress() - 0.5).abs() < 1e-9);
}

#[test]
fn test_scroll_options_change_notifies() {
    let hal = hal();
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());
    tracker.mount();
    let notified = Rc::new(Cell::new(0));
    let sink = Rc::clone(&notified);
    tracker.on_change(move |_| sink.set(sink.get() + 1));

    let options = ScrollIndicatorOptions {
        color: "#10B981".to_string(),
        ..ScrollIndicatorOptions::default()
    };
    tracker.set_options(options.clone());
    assert_eq!(notified.get(), 1);
    assert_eq!(tracker.indicator().unwrap().color, "#10B981");

    // Same options again
    tracker.set_options(options);
    assert_eq!(notified.get(), 1);
}

#[test]
fn test_scroll_container_switch() {
    let hal = hal();
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());
    tracker.mount();

    tracker.set_container(Some(TARGET));
    assert_eq!(hal.scroll_listener_count(), 1);

    // Document scrolls no longer count
    hal.scroll(None, ScrollMetrics::new(500.0, 1000.0, 500.0));
    assert_eq!(hal.pending_frames(), 0);

    hal.scroll(Some(TARGET), ScrollMetrics::new(50.0, 300.0, 100.0));
    hal.tick_frame(16.0);
    assert!((tracker.progress() - 0.25).abs() < 1e-9);

    tracker.unmount();
    assert_released(&hal);
}

#[test]
fn test_scroll_unmount_cancels_pending_frame() {
    let hal = hal();
    let mut tracker = ScrollProgressTracker::new(Rc::clone(&hal), ScrollIndicatorOptions::default());
    tracker.mount();
    hal.scroll(None, ScrollMetrics::new(10.0, 200.0, 100.0));
    assert_eq!(hal.pending_frames(), 1);

    drop(tracker);
    assert_released(&hal);
}

// =============================================================================
// Frame Scheduler Tests
// =============================================================================

fn recording_scheduler(hal: &Rc<MockHal>) -> (FrameScheduler<MockHal>, Rc<RefCell<Vec<FrameTick>>>) {
    let scheduler = FrameScheduler::new(Rc::clone(hal));
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ticks);
    scheduler.set_callback(move |tick| sink.borrow_mut().push(tick));
    (scheduler, ticks)
}

#[test]
fn test_frame_first_tick_is_baseline() {
    let hal = hal();
    let (mut scheduler, ticks) = recording_scheduler(&hal);
    scheduler.mount();
    scheduler.set_active(true);

    hal.tick_frame(100.0);
    assert!(ticks.borrow().is_empty());
    hal.tick_frame(116.0);
    hal.tick_frame(133.0);

    let ticks = ticks.borrow();
    assert_eq!(ticks.len(), 2);
    assert!((ticks[0].delta - 16.0).abs() < 1e-9);
    assert!((ticks[1].delta - 17.0).abs() < 1e-9);
    assert_eq!(ticks[1].timestamp, 133.0);
}

#[test]
fn test_frame_deactivation_stops_and_resets() {
    let hal = hal();
    let (mut scheduler, ticks) = recording_scheduler(&hal);
    scheduler.mount();
    scheduler.set_active(true);
    hal.tick_frame(0.0);
    hal.tick_frame(16.0);

    scheduler.set_active(false);
    assert_eq!(hal.pending_frames(), 0);
    assert_eq!(hal.tick_frame(32.0), 0);
    assert_eq!(ticks.borrow().len(), 1);

    // Reactivation drops the next tick again
    scheduler.set_active(true);
    hal.tick_frame(5000.0);
    assert_eq!(ticks.borrow().len(), 1);
    hal.tick_frame(5016.0);
    assert_eq!(ticks.borrow().len(), 2);
    assert!((ticks.borrow()[1].delta - 16.0).abs() < 1e-9);
}

#[test]
fn test_frame_callback_swap_keeps_loop() {
    let hal = hal();
    let (mut scheduler, first) = recording_scheduler(&hal);
    scheduler.mount();
    scheduler.set_active(true);
    hal.tick_frame(0.0);
    hal.tick_frame(16.0);

    let second = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&second);
    scheduler.set_callback(move |tick| sink.borrow_mut().push(tick.delta));
    assert_eq!(hal.pending_frames(), 1);

    hal.tick_frame(32.0);
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);
    assert!((second.borrow()[0] - 16.0).abs() < 1e-9);
}

#[test]
fn test_frame_inactive_until_mounted() {
    let hal = hal();
    let (mut scheduler, ticks) = recording_scheduler(&hal);
    scheduler.set_active(true);
    assert_eq!(hal.pending_frames(), 0);

    scheduler.mount();
    assert_eq!(hal.pending_frames(), 1);

    scheduler.unmount();
    assert_eq!(hal.pending_frames(), 0);
    assert!(scheduler.is_active());
    assert!(ticks.borrow().is_empty());
}

#[test]
fn test_frame_callback_can_deactivate() {
    let hal = hal();
    let scheduler = Rc::new(FrameScheduler::new(Rc::clone(&hal)));
    let weak = Rc::downgrade(&scheduler);
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    scheduler.set_callback(move |_| {
        sink.set(sink.get() + 1);
        if let Some(scheduler) = weak.upgrade() {
            scheduler.set_active(false);
        }
    });
    scheduler.start();
    scheduler.set_active(true);

    hal.tick_frame(0.0);
    hal.tick_frame(16.0);
    assert_eq!(count.get(), 1);
    assert_eq!(hal.pending_frames(), 0);
}

// =============================================================================
// Reveal Tests
// =============================================================================

#[test]
fn test_reveal_full_sequence() {
    let hal = hal();
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), RevealOptions::default());
    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&phases);
    reveal.on_change(move |snapshot| sink.borrow_mut().push(snapshot.phase));

    reveal.bind(Some(TARGET));
    reveal.mount();
    let (thresholds, _, margin) = hal.observer_options(TARGET).unwrap();
    assert_eq!(thresholds, vec![0.2]);
    assert_eq!(margin, "0px 0px -50px 0px");

    hal.intersect(TARGET, true);
    assert_eq!(reveal.phase(), RevealPhase::PendingVisible);
    assert!(!reveal.is_visible());
    // Observer released once triggered
    assert_eq!(hal.observer_count(TARGET), 0);

    hal.advance_time(0.0);
    assert!(reveal.is_visible());
    assert!(!reveal.is_ready());

    hal.advance_time(99.0);
    assert!(!reveal.is_ready());
    hal.advance_time(1.0);
    assert!(reveal.is_ready());

    assert_eq!(
        *phases.borrow(),
        vec![RevealPhase::PendingVisible, RevealPhase::Visible, RevealPhase::Settled]
    );
    assert_released(&hal);
}

#[test]
fn test_reveal_waits_for_delay() {
    let hal = hal();
    let options = RevealOptions {
        delay_ms: 250,
        ..RevealOptions::default()
    };
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), options);
    reveal.bind(Some(TARGET));
    reveal.mount();

    hal.intersect(TARGET, false);
    assert_eq!(reveal.phase(), RevealPhase::Hidden);

    hal.intersect(TARGET, true);
    hal.advance_time(249.0);
    assert_eq!(reveal.phase(), RevealPhase::PendingVisible);
    hal.advance_time(1.0);
    assert_eq!(reveal.phase(), RevealPhase::Visible);
    hal.advance_time(100.0);
    assert_eq!(reveal.phase(), RevealPhase::Settled);
}

#[test]
fn test_reveal_unmount_cancels_timers() {
    let hal = hal();
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), RevealOptions::default());
    reveal.bind(Some(TARGET));
    reveal.mount();
    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    assert_eq!(hal.pending_timers(), 1);

    reveal.unmount();
    assert_released(&hal);
    hal.advance_time(500.0);
    assert_eq!(reveal.phase(), RevealPhase::Visible);

    // Remounting resumes the settle window
    reveal.mount();
    hal.advance_time(100.0);
    assert!(reveal.is_ready());
}

#[test]
fn test_reveal_rebind_starts_fresh_machine() {
    let hal = hal();
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), RevealOptions::default());
    reveal.bind(Some(TARGET));
    reveal.mount();
    hal.intersect(TARGET, true);

    reveal.bind(Some(OTHER));
    assert_eq!(reveal.phase(), RevealPhase::Hidden);
    assert_eq!(hal.pending_timers(), 0);
    assert_eq!(hal.observer_count(OTHER), 1);

    // The old element's timer can no longer advance the new machine
    hal.advance_time(1000.0);
    assert_eq!(reveal.phase(), RevealPhase::Hidden);
}

#[test]
fn test_reveal_clamps_threshold() {
    let hal = hal();
    let options = RevealOptions {
        threshold: 1.5,
        ..RevealOptions::default()
    };
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), options);
    reveal.bind(Some(TARGET));
    reveal.mount();

    assert_eq!(hal.observer_options(TARGET).unwrap().0, vec![1.0]);
    assert_eq!(reveal.phase(), RevealPhase::Hidden);
    hal.intersect(TARGET, true);
    assert_eq!(reveal.phase(), RevealPhase::PendingVisible);
}

#[test]
fn test_reveal_fails_open() {
    let hal = hal();
    hal.set_intersection_supported(false);
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), RevealOptions::default());
    reveal.bind(Some(TARGET));
    reveal.mount();

    assert!(reveal.is_visible());
    assert!(reveal.is_ready());
    assert!(hal.has_log_containing("[reveal]"));
}

#[test]
fn test_reveal_never_reverts() {
    let hal = hal();
    let mut reveal = RevealCoordinator::new(Rc::clone(&hal), RevealOptions::default());
    reveal.bind(Some(TARGET));
    reveal.mount();

    let mut last = reveal.phase();
    for step in 0..8 {
        hal.intersect(TARGET, step % 2 == 0);
        hal.advance_time(40.0);
        assert!(reveal.phase() >= last);
        last = reveal.phase();
    }
    assert_eq!(last, RevealPhase::Settled);
}

// =============================================================================
// Route Transition Tests
// =============================================================================

fn route_log(
    route: &RouteTransitionCoordinator<MockHal>,
) -> Rc<RefCell<Vec<RouteTransitionState>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    route.on_change(move |state| sink.borrow_mut().push(state.clone()));
    log
}

#[test]
fn test_route_initial_fade_in() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();

    assert_eq!(route.opacity(), 0.0);
    assert_eq!(hal.route_listener_count(), 1);

    hal.advance_time(10.0);
    assert_eq!(
        route.state(),
        Some(RouteTransitionState::Entering {
            path: "/".to_string()
        })
    );
    assert_eq!(route.opacity(), 1.0);

    hal.advance_time(300.0);
    assert_eq!(
        route.state(),
        Some(RouteTransitionState::Visible {
            path: "/".to_string()
        })
    );
}

#[test]
fn test_route_superseded_path_never_enters() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();
    hal.advance_time(400.0);

    let log = route_log(&route);
    hal.navigate("/a");
    hal.advance_time(400.0);
    hal.navigate("/b");
    hal.advance_time(5.0);
    hal.navigate("/c");
    hal.advance_time(400.0);

    let log = log.borrow();
    assert!(!log.contains(&RouteTransitionState::Entering {
        path: "/b".to_string()
    }));
    assert!(log.contains(&RouteTransitionState::Exiting {
        from: Some("/b".to_string()),
        to: "/c".to_string()
    }));
    assert_eq!(
        log.last(),
        Some(&RouteTransitionState::Visible {
            path: "/c".to_string()
        })
    );
    assert_eq!(hal.pending_timers(), 0);
}

#[test]
fn test_route_exit_is_immediate() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();
    hal.advance_time(400.0);

    hal.navigate("/services");
    assert_eq!(route.opacity(), 0.0);
    assert_eq!(
        route.state(),
        Some(RouteTransitionState::Exiting {
            from: Some("/".to_string()),
            to: "/services".to_string()
        })
    );
}

#[test]
fn test_route_same_path_is_noop() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();
    hal.advance_time(400.0);

    let log = route_log(&route);
    route.set_path("/");
    assert!(log.borrow().is_empty());
    assert_eq!(hal.pending_timers(), 0);
}

#[test]
fn test_route_unmount_releases_and_resumes() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();
    route.unmount();
    assert_released(&hal);

    hal.advance_time(400.0);
    assert_eq!(route.opacity(), 0.0);

    route.mount();
    hal.advance_time(10.0);
    assert_eq!(route.opacity(), 1.0);
}

#[test]
fn test_route_set_path_drives_transition() {
    let hal = hal();
    let mut route = RouteTransitionCoordinator::new(Rc::clone(&hal));
    route.mount();
    hal.advance_time(400.0);

    route.set_path("/projects");
    hal.advance_time(10.0);
    hal.advance_time(300.0);
    assert_eq!(
        route.state(),
        Some(RouteTransitionState::Visible {
            path: "/projects".to_string()
        })
    );
}

// =============================================================================
// Count-Up Tests
// =============================================================================

fn counter(hal: &Rc<MockHal>, options: CountUpOptions) -> CountUpAnimator<MockHal> {
    let mut animator = CountUpAnimator::new(Rc::clone(hal), options);
    animator.bind(Some(TARGET));
    animator.mount();
    animator
}

#[test]
fn test_count_up_reaches_end_at_duration() {
    let hal = hal();
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 1000.0,
            ..CountUpOptions::default()
        },
    );
    assert_eq!(animator.value(), 0.0);

    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    assert!(animator.is_animating());

    hal.tick_frame(100.0);
    hal.tick_frame(1100.0);
    assert!((animator.value() - 500.0).abs() < 1e-6);
    assert_eq!(animator.formatted(), "500");

    hal.tick_frame(2100.0);
    assert_eq!(animator.value(), 1000.0);
    assert_eq!(animator.formatted(), "1,000");
    assert!(!animator.is_animating());
    assert_eq!(hal.pending_frames(), 0);
}

#[test]
fn test_count_up_waits_for_delay() {
    let hal = hal();
    let _animator = counter(
        &hal,
        CountUpOptions {
            end: 10.0,
            delay_ms: 300,
            ..CountUpOptions::default()
        },
    );
    hal.intersect(TARGET, true);
    hal.advance_time(299.0);
    assert_eq!(hal.pending_frames(), 0);
    hal.advance_time(1.0);
    assert_eq!(hal.pending_frames(), 1);
}

#[test]
fn test_count_up_jumps_to_end_under_reduced_motion() {
    let hal = hal();
    hal.set_media(REDUCED_MOTION_QUERY, true);
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 42.0,
            prefix: "$".to_string(),
            suffix: "k".to_string(),
            ..CountUpOptions::default()
        },
    );
    assert_eq!(animator.value(), 42.0);
    assert_eq!(animator.formatted(), "$42k");

    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    assert_eq!(hal.pending_frames(), 0);
    assert_eq!(animator.value(), 42.0);
}

#[test]
fn test_count_up_preference_flip_mid_animation() {
    let hal = hal();
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 100.0,
            ..CountUpOptions::default()
        },
    );
    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    hal.tick_frame(0.0);
    hal.tick_frame(500.0);
    assert!(animator.value() < 100.0);

    hal.set_media(REDUCED_MOTION_QUERY, true);
    assert_eq!(animator.value(), 100.0);
    assert_eq!(hal.pending_frames(), 0);
}

#[test]
fn test_count_up_runs_once() {
    let hal = hal();
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 5.0,
            duration_ms: 100.0,
            ..CountUpOptions::default()
        },
    );
    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    hal.tick_frame(0.0);
    hal.tick_frame(100.0);
    assert_eq!(animator.value(), 5.0);

    // Frozen target: no observer remains to restart it
    assert_eq!(hal.observer_count(TARGET), 0);
    hal.intersect(TARGET, false);
    hal.intersect(TARGET, true);
    assert_eq!(hal.pending_timers(), 0);
    assert_eq!(animator.value(), 5.0);
}

#[test]
fn test_count_up_repeats_without_once() {
    let hal = hal();
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 5.0,
            duration_ms: 100.0,
            once: false,
            ..CountUpOptions::default()
        },
    );
    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    hal.tick_frame(0.0);
    hal.tick_frame(100.0);
    assert_eq!(animator.value(), 5.0);

    hal.intersect(TARGET, false);
    hal.intersect(TARGET, true);
    assert_eq!(animator.value(), 0.0);
    assert_eq!(hal.pending_timers(), 1);
}

#[test]
fn test_count_up_drop_releases_everything() {
    let hal = hal();
    let animator = counter(
        &hal,
        CountUpOptions {
            end: 5.0,
            ..CountUpOptions::default()
        },
    );
    hal.intersect(TARGET, true);
    hal.advance_time(0.0);
    hal.tick_frame(0.0);
    assert_eq!(hal.pending_frames(), 1);

    drop(animator);
    assert_released(&hal);
}
