//! Scroll progress

use serde::{Deserialize, Serialize};

use crate::constants::{SCROLL_INDICATOR_COLOR, SCROLL_INDICATOR_HEIGHT_PX, SCROLL_INDICATOR_Z_INDEX};

/// Normalized scroll progress in [0, 1]
///
/// `scroll_top / (scroll_height - client_height)`, clamped. A document that
/// cannot scroll has progress 0.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if !(range > 0.0) || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0)
}

/// Styling of the fixed progress bar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollIndicatorOptions {
    pub color: String,
    pub height: u32,
    pub z_index: i32,
}

impl Default for ScrollIndicatorOptions {
    fn default() -> Self {
        Self {
            color: SCROLL_INDICATOR_COLOR.to_string(),
            height: SCROLL_INDICATOR_HEIGHT_PX,
            z_index: SCROLL_INDICATOR_Z_INDEX,
        }
    }
}

/// Render instructions for the progress bar (`scale_x` = progress)
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollIndicator {
    pub scale_x: f64,
    pub color: String,
    pub height: u32,
    pub z_index: i32,
}

impl ScrollIndicator {
    pub fn new(progress: f64, options: &ScrollIndicatorOptions) -> Self {
        Self {
            scale_x: progress,
            color: options.color.clone(),
            height: options.height,
            z_index: options.z_index,
        }
    }
}
