//! Reveal entrance machine
//!
//! Staggered entrance animations need two signals: `is_visible` starts the
//! CSS transition, `is_ready` lets dependent animations start after a short
//! settle window. Both come from one forward-only phase value.

use serde::{Deserialize, Serialize};

use crate::constants::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};

/// Reveal phase, ordered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealPhase {
    #[default]
    Hidden,
    /// Target intersected, waiting for the configured delay
    PendingVisible,
    /// Entrance animation running, waiting for the settle window
    Visible,
    Settled,
}

/// Inputs to the reveal machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Intersected,
    DelayElapsed,
    SettleElapsed,
    /// Skip to the final phase (observation impossible, scheduling failed)
    ForceSettle,
}

/// Forward-only reveal machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealMachine {
    phase: RevealPhase,
}

/// Read-only view handed to the presentational layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealSnapshot {
    pub phase: RevealPhase,
    pub is_visible: bool,
    pub is_ready: bool,
}

impl RevealMachine {
    pub const fn new() -> Self {
        Self {
            phase: RevealPhase::Hidden,
        }
    }

    #[inline]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Apply an event
    ///
    /// Returns the new phase if the event advanced the machine. Events that
    /// do not match the current phase are ignored; the phase never moves back.
    pub fn apply(&mut self, event: RevealEvent) -> Option<RevealPhase> {
        let next = match (self.phase, event) {
            (RevealPhase::Hidden, RevealEvent::Intersected) => RevealPhase::PendingVisible,
            (RevealPhase::PendingVisible, RevealEvent::DelayElapsed) => RevealPhase::Visible,
            (RevealPhase::Visible, RevealEvent::SettleElapsed) => RevealPhase::Settled,
            (phase, RevealEvent::ForceSettle) if phase != RevealPhase::Settled => {
                RevealPhase::Settled
            }
            _ => return None,
        };
        self.phase = next;
        Some(next)
    }

    pub fn is_visible(&self) -> bool {
        self.phase >= RevealPhase::Visible
    }

    pub fn is_ready(&self) -> bool {
        self.phase == RevealPhase::Settled
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot {
            phase: self.phase,
            is_visible: self.is_visible(),
            is_ready: self.is_ready(),
        }
    }
}

/// Reveal options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: String,
    /// Delay between intersection and `Visible` (ms)
    pub delay_ms: u32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
            root_margin: REVEAL_ROOT_MARGIN.to_string(),
            delay_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut machine = RevealMachine::new();
        assert_eq!(machine.apply(RevealEvent::Intersected), Some(RevealPhase::PendingVisible));
        assert!(!machine.is_visible());
        assert_eq!(machine.apply(RevealEvent::DelayElapsed), Some(RevealPhase::Visible));
        assert!(machine.is_visible());
        assert!(!machine.is_ready());
        assert_eq!(machine.apply(RevealEvent::SettleElapsed), Some(RevealPhase::Settled));
        assert!(machine.is_ready());
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let mut machine = RevealMachine::new();
        assert_eq!(machine.apply(RevealEvent::DelayElapsed), None);
        assert_eq!(machine.apply(RevealEvent::SettleElapsed), None);
        assert_eq!(machine.phase(), RevealPhase::Hidden);

        machine.apply(RevealEvent::Intersected);
        assert_eq!(machine.apply(RevealEvent::Intersected), None);
        assert_eq!(machine.apply(RevealEvent::SettleElapsed), None);
        assert_eq!(machine.phase(), RevealPhase::PendingVisible);
    }

    #[test]
    fn test_phase_never_reverts() {
        let events = [
            RevealEvent::SettleElapsed,
            RevealEvent::Intersected,
            RevealEvent::Intersected,
            RevealEvent::SettleElapsed,
            RevealEvent::DelayElapsed,
            RevealEvent::Intersected,
            RevealEvent::DelayElapsed,
            RevealEvent::SettleElapsed,
            RevealEvent::Intersected,
            RevealEvent::ForceSettle,
        ];
        let mut machine = RevealMachine::new();
        let mut last = machine.phase();
        for event in events {
            machine.apply(event);
            assert!(machine.phase() >= last);
            last = machine.phase();
        }
        assert_eq!(last, RevealPhase::Settled);
    }

    #[test]
    fn test_force_settle() {
        let mut machine = RevealMachine::new();
        assert_eq!(machine.apply(RevealEvent::ForceSettle), Some(RevealPhase::Settled));
        assert!(machine.is_visible());
        assert!(machine.is_ready());
        assert_eq!(machine.apply(RevealEvent::ForceSettle), None);
    }

    #[test]
    fn test_options_defaults_and_json() {
        let defaults = RevealOptions::default();
        assert_eq!(defaults.threshold, 0.2);
        assert_eq!(defaults.root_margin, "0px 0px -50px 0px");
        assert_eq!(defaults.delay_ms, 0);

        let options: RevealOptions = serde_json::from_str(r#"{"delayMs":150}"#).unwrap();
        assert_eq!(options.delay_ms, 150);
        assert_eq!(options.threshold, 0.2);
    }

    #[test]
    fn test_snapshot_json() {
        let mut machine = RevealMachine::new();
        machine.apply(RevealEvent::ForceSettle);
        let json = serde_json::to_string(&machine.snapshot()).unwrap();
        assert_eq!(json, r#"{"phase":"settled","isVisible":true,"isReady":true}"#);
    }
}
