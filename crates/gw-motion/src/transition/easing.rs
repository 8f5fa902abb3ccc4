//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Ease-in-out cubic function
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Ease-out cubic function
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Ease-in cubic function
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

/// Linear interpolation (no easing)
#[inline]
pub fn linear(t: f32) -> f32 {
    t
}

/// Easing curve selectable from JS options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOutCubic,
    EaseOutCubic,
    EaseInCubic,
}

impl Easing {
    /// Map progress `t` (clamped to [0, 1]) through the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => linear(t),
            Easing::EaseInOutCubic => ease_in_out(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::EaseInCubic => ease_in_cubic(t),
        }
    }
}
