//! Intersection visibility latch

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ROOT_MARGIN;

/// Visible ratio(s) at which the host reports an intersection change
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Single(f64),
    Many(Vec<f64>),
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Single(0.0)
    }
}

impl Threshold {
    /// Ratios clamped into [0, 1] (NaN becomes 0), never empty
    pub fn ratios(&self) -> Vec<f64> {
        let clamp = |t: f64| if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let ratios: Vec<f64> = match self {
            Threshold::Single(t) => vec![clamp(*t)],
            Threshold::Many(ts) => ts.iter().copied().map(clamp).collect(),
        };
        if ratios.is_empty() {
            vec![0.0]
        } else {
            ratios
        }
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Threshold::Single(value)
    }
}

/// Visibility observation options
///
/// The root element is passed separately since it is a host handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntersectionConfig {
    pub threshold: Threshold,
    pub root_margin: String,
    /// Latch `is_visible` once the target first intersects
    pub freeze_once_visible: bool,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            freeze_once_visible: false,
        }
    }
}

/// Visibility of one observed target
///
/// `frozen` is only set when freezing is configured and the target
/// intersects; while freezing stays configured `is_visible` then stays true
/// for the target's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub is_intersecting: bool,
    pub is_visible: bool,
    pub frozen: bool,
}

impl VisibilityState {
    /// Apply one intersection entry, returns true if the state changed
    pub fn observe(&mut self, intersecting: bool, freeze_once_visible: bool) -> bool {
        let before = *self;
        self.is_intersecting = intersecting;
        if intersecting {
            self.is_visible = true;
            if freeze_once_visible {
                self.frozen = true;
            }
        } else if !(freeze_once_visible && self.frozen) {
            self.is_visible = false;
        }
        *self != before
    }

    /// Fail open when observation is impossible
    pub fn force_visible(&mut self) -> bool {
        let changed = !self.is_visible;
        self.is_visible = true;
        changed
    }

    /// Whether an observer is needed at all
    ///
    /// A frozen target with freezing configured never changes again, so no
    /// observer is attached for it.
    pub fn needs_observer(&self, freeze_once_visible: bool) -> bool {
        !(freeze_once_visible && self.frozen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_sequence(events: &[bool], freeze: bool) -> Vec<bool> {
        let mut state = VisibilityState::default();
        events
            .iter()
            .map(|&e| {
                state.observe(e, freeze);
                state.is_visible
            })
            .collect()
    }

    #[test]
    fn test_freeze_suppresses_exit() {
        assert_eq!(visible_sequence(&[false, true, false], true), vec![false, true, true]);
    }

    #[test]
    fn test_without_freeze_replays() {
        assert_eq!(
            visible_sequence(&[false, true, false, true], false),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn test_frozen_is_monotonic() {
        let events = [true, false, false, true, false, true, false];
        let seq = visible_sequence(&events, true);
        let first = seq.iter().position(|v| *v).unwrap();
        assert!(seq[first..].iter().all(|v| *v));
    }

    #[test]
    fn test_needs_observer() {
        let mut state = VisibilityState::default();
        assert!(state.needs_observer(true));

        state.observe(true, true);
        assert!(state.frozen);
        assert!(!state.needs_observer(true));
        assert!(state.needs_observer(false));
    }

    #[test]
    fn test_exit_clears_once_freezing_is_off() {
        let mut state = VisibilityState::default();
        state.observe(true, true);
        state.observe(false, true);
        assert!(state.is_visible);

        assert!(state.observe(false, false));
        assert!(!state.is_visible);
    }

    #[test]
    fn test_observe_reports_change() {
        let mut state = VisibilityState::default();
        assert!(!state.observe(false, false));
        assert!(state.observe(true, false));
        assert!(!state.observe(true, false));
    }

    #[test]
    fn test_force_visible() {
        let mut state = VisibilityState::default();
        assert!(state.force_visible());
        assert!(state.is_visible);
        assert!(!state.force_visible());
    }

    #[test]
    fn test_threshold_ratios() {
        assert_eq!(Threshold::default().ratios(), vec![0.0]);
        assert_eq!(Threshold::Single(1.4).ratios(), vec![1.0]);
        assert_eq!(Threshold::Many(vec![]).ratios(), vec![0.0]);
        assert_eq!(Threshold::Many(vec![0.25, f64::NAN, -1.0]).ratios(), vec![0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_config_from_json() {
        let config: IntersectionConfig =
            serde_json::from_str(r#"{"threshold":0.1,"freezeOnceVisible":true}"#).unwrap();
        assert_eq!(config.threshold, Threshold::Single(0.1));
        assert_eq!(config.root_margin, "0%");
        assert!(config.freeze_once_visible);

        let config: IntersectionConfig =
            serde_json::from_str(r#"{"threshold":[0,0.5,1],"rootMargin":"10px"}"#).unwrap();
        assert_eq!(config.threshold, Threshold::Many(vec![0.0, 0.5, 1.0]));
        assert_eq!(config.root_margin, "10px");
    }
}
