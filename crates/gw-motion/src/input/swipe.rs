//! Touch swipe tracking

use serde::{Deserialize, Serialize};

use crate::constants::{SWIPE_MAX_TIME_MS, SWIPE_MIN_DISTANCE_PX};

/// Dominant direction of a gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Horizontal wins only when strictly larger than the vertical delta
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if dy > 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
        }
    }
}

/// Snapshot of an in-progress touch
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchGesture {
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub current_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    /// `None` until the first move
    pub direction: Option<SwipeDirection>,
    pub distance: f64,
    /// px per ms
    pub velocity: f64,
}

/// Swipe classification thresholds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwipeOptions {
    pub min_swipe_distance: f64,
    pub max_swipe_time_ms: f64,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self {
            min_swipe_distance: SWIPE_MIN_DISTANCE_PX,
            max_swipe_time_ms: SWIPE_MAX_TIME_MS,
        }
    }
}

/// Tracks one touch from start to end
#[derive(Clone, Debug, Default)]
pub struct SwipeTracker {
    options: SwipeOptions,
    gesture: Option<TouchGesture>,
    started_at: f64,
}

impl SwipeTracker {
    pub fn new(options: SwipeOptions) -> Self {
        Self {
            options,
            gesture: None,
            started_at: 0.0,
        }
    }

    #[inline]
    pub fn gesture(&self) -> Option<&TouchGesture> {
        self.gesture.as_ref()
    }

    #[inline]
    pub fn options(&self) -> &SwipeOptions {
        &self.options
    }

    /// Begin a gesture, replacing any unfinished one
    pub fn start(&mut self, x: f64, y: f64, now_ms: f64) -> TouchGesture {
        let gesture = TouchGesture {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
            delta_x: 0.0,
            delta_y: 0.0,
            direction: None,
            distance: 0.0,
            velocity: 0.0,
        };
        self.gesture = Some(gesture);
        self.started_at = now_ms;
        gesture
    }

    /// Update the gesture; `None` when no touch is active
    pub fn move_to(&mut self, x: f64, y: f64, now_ms: f64) -> Option<TouchGesture> {
        let gesture = self.gesture.as_mut()?;
        let dx = x - gesture.start_x;
        let dy = y - gesture.start_y;
        let distance = dx.hypot(dy);
        let elapsed = now_ms - self.started_at;

        gesture.current_x = x;
        gesture.current_y = y;
        gesture.delta_x = dx;
        gesture.delta_y = dy;
        gesture.distance = distance;
        gesture.velocity = if elapsed > 0.0 { distance / elapsed } else { 0.0 };
        gesture.direction = Some(SwipeDirection::from_delta(dx, dy));
        Some(*gesture)
    }

    /// Finish the gesture
    ///
    /// Returns the swipe direction when the last recorded movement was long
    /// enough and the touch was short enough.
    pub fn end(&mut self, now_ms: f64) -> Option<SwipeDirection> {
        let gesture = self.gesture.take()?;
        let elapsed = now_ms - self.started_at;
        if gesture.distance >= self.options.min_swipe_distance
            && elapsed <= self.options.max_swipe_time_ms
        {
            gesture.direction
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(SwipeDirection::from_delta(10.0, 2.0), SwipeDirection::Right);
        assert_eq!(SwipeDirection::from_delta(-10.0, 2.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_delta(2.0, 10.0), SwipeDirection::Down);
        assert_eq!(SwipeDirection::from_delta(2.0, -10.0), SwipeDirection::Up);
        // Ties go vertical
        assert_eq!(SwipeDirection::from_delta(5.0, 5.0), SwipeDirection::Down);
        assert_eq!(SwipeDirection::Left.name(), "left");
    }

    #[test]
    fn test_fast_long_swipe() {
        let mut tracker = SwipeTracker::default();
        tracker.start(200.0, 100.0, 0.0);
        let gesture = tracker.move_to(100.0, 110.0, 100.0).unwrap();
        assert_eq!(gesture.direction, Some(SwipeDirection::Left));
        assert!((gesture.velocity - gesture.distance / 100.0).abs() < 1e-9);
        assert_eq!(tracker.end(150.0), Some(SwipeDirection::Left));
        assert!(tracker.gesture().is_none());
    }

    #[test]
    fn test_short_or_slow_is_not_a_swipe() {
        let mut tracker = SwipeTracker::default();
        tracker.start(0.0, 0.0, 0.0);
        tracker.move_to(0.0, 30.0, 50.0);
        assert_eq!(tracker.end(80.0), None);

        tracker.start(0.0, 0.0, 1000.0);
        tracker.move_to(0.0, 200.0, 1100.0);
        assert_eq!(tracker.end(1400.0), None);
    }

    #[test]
    fn test_tap_without_move() {
        let mut tracker = SwipeTracker::default();
        tracker.start(10.0, 10.0, 0.0);
        assert_eq!(tracker.end(20.0), None);
    }

    #[test]
    fn test_move_without_start() {
        let mut tracker = SwipeTracker::default();
        assert!(tracker.move_to(10.0, 10.0, 5.0).is_none());
        assert_eq!(tracker.end(10.0), None);
    }

    #[test]
    fn test_zero_elapsed_velocity() {
        let mut tracker = SwipeTracker::default();
        tracker.start(0.0, 0.0, 10.0);
        let gesture = tracker.move_to(60.0, 0.0, 10.0).unwrap();
        assert_eq!(gesture.velocity, 0.0);
    }

    #[test]
    fn test_gesture_json() {
        let mut tracker = SwipeTracker::default();
        tracker.start(0.0, 0.0, 0.0);
        let gesture = tracker.move_to(0.0, -60.0, 100.0).unwrap();
        let json = serde_json::to_value(gesture).unwrap();
        assert_eq!(json["direction"], "up");
        assert_eq!(json["deltaY"], -60.0);
    }
}
