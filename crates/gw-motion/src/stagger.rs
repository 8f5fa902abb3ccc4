//! Staggered entrance delays

use serde::{Deserialize, Serialize};

use crate::constants::STAGGER_STEP_MS;
use crate::transition::RevealOptions;

/// Delay schedule for the children of a staggered group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaggerPlan {
    /// Delay before the first child (ms)
    pub base_delay_ms: u32,
    /// Delay added per child (ms)
    pub step_ms: u32,
}

impl Default for StaggerPlan {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            step_ms: STAGGER_STEP_MS,
        }
    }
}

impl StaggerPlan {
    /// Entrance delay of child `index` (saturates instead of wrapping)
    pub fn delay_for(&self, index: u32) -> u32 {
        self.base_delay_ms
            .saturating_add(index.saturating_mul(self.step_ms))
    }

    /// Reveal options for child `index`, everything but the delay taken from `base`
    pub fn reveal_options(&self, index: u32, base: &RevealOptions) -> RevealOptions {
        RevealOptions {
            delay_ms: self.delay_for(index),
            ..base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step() {
        let plan = StaggerPlan::default();
        assert_eq!(plan.delay_for(0), 0);
        assert_eq!(plan.delay_for(1), 100);
        assert_eq!(plan.delay_for(4), 400);
    }

    #[test]
    fn test_base_delay_and_saturation() {
        let plan = StaggerPlan {
            base_delay_ms: 250,
            step_ms: 50,
        };
        assert_eq!(plan.delay_for(2), 350);
        assert_eq!(plan.delay_for(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_reveal_options_keep_base() {
        let base = RevealOptions {
            threshold: 0.5,
            ..RevealOptions::default()
        };
        let options = StaggerPlan::default().reveal_options(3, &base);
        assert_eq!(options.delay_ms, 300);
        assert_eq!(options.threshold, 0.5);
        assert_eq!(options.root_margin, base.root_margin);
    }
}
