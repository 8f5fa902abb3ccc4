//! Frame clock

/// One forwarded animation frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Frame timestamp (ms, host clock)
    pub timestamp: f64,
    /// Time since the previous frame (ms)
    pub delta: f64,
}

/// Baseline tracker for a frame loop
///
/// The first tick after creation or `reset` only establishes the baseline,
/// so consumers never see an undefined or huge initial delta.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    previous: Option<f64>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Record a frame; returns the tick to forward, if any
    pub fn tick(&mut self, timestamp: f64) -> Option<FrameTick> {
        self.previous.replace(timestamp).map(|previous| FrameTick {
            timestamp,
            delta: timestamp - previous,
        })
    }

    /// Drop the baseline
    pub fn reset(&mut self) {
        self.previous = None;
    }

    #[inline]
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }
}
