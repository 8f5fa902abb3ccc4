//! Numeric count-up interpolation and formatting

use serde::{Deserialize, Serialize};

use crate::constants::{COUNT_UP_DURATION_MS, COUNT_UP_SEPARATOR};
use crate::transition::Easing;

/// Count-up options, deserialized from the JS handle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountUpOptions {
    pub start: f64,
    pub end: f64,
    pub duration_ms: f64,
    /// Wait between becoming visible and the first frame (ms)
    pub delay_ms: u32,
    pub decimals: usize,
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
    /// Run once per target, ignoring later visibility changes
    pub once: bool,
    pub easing: Easing,
}

impl Default for CountUpOptions {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            duration_ms: COUNT_UP_DURATION_MS,
            delay_ms: 0,
            decimals: 0,
            prefix: String::new(),
            suffix: String::new(),
            separator: COUNT_UP_SEPARATOR.to_string(),
            once: true,
            easing: Easing::Linear,
        }
    }
}

impl CountUpOptions {
    /// Progress in [0, 1] after `elapsed_ms`
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Counter value after `elapsed_ms`
    ///
    /// Exactly `end` once progress reaches 1 so the final frame never shows
    /// a rounding artifact.
    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        let progress = self.progress_at(elapsed_ms);
        if progress >= 1.0 {
            return self.end;
        }
        let eased = f64::from(self.easing.apply(progress as f32));
        self.start + eased * (self.end - self.start)
    }

    /// Render `value` with prefix, suffix, decimals and separator
    pub fn format(&self, value: f64) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            format_number(value, self.decimals, &self.separator),
            self.suffix
        )
    }
}

/// Fixed-point rendering with the integer part grouped by thousands
pub fn format_number(value: f64, decimals: usize, separator: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 * separator.len() + 1);
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
