//! Viewport breakpoints
//!
//! Responsive tiers derived from the viewport width. The width is the only
//! input; a tier is never set directly.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BREAKPOINT_2XL_PX, BREAKPOINT_LG_PX, BREAKPOINT_MD_PX, BREAKPOINT_SM_PX, BREAKPOINT_XL_PX,
};

/// Named viewport-width tier, ordered by minimum width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    /// All tiers, smallest first
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Minimum viewport width of this tier
    pub const fn min_width(self) -> f64 {
        match self {
            Breakpoint::Xs => 0.0,
            Breakpoint::Sm => BREAKPOINT_SM_PX,
            Breakpoint::Md => BREAKPOINT_MD_PX,
            Breakpoint::Lg => BREAKPOINT_LG_PX,
            Breakpoint::Xl => BREAKPOINT_XL_PX,
            Breakpoint::Xxl => BREAKPOINT_2XL_PX,
        }
    }

    /// Largest tier whose minimum width is <= `width`
    pub fn from_width(width: f64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|bp| width >= bp.min_width())
            .unwrap_or(Breakpoint::Xs)
    }

    /// Tailwind-style name (`"xs"` .. `"2xl"`)
    pub const fn name(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }

    /// Parse a tier name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|bp| bp.name() == name)
    }
}

/// Measured viewport state
///
/// Unmeasured until the first width arrives; until then every tier query
/// answers `false` so server and client renders agree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BreakpointState {
    width: Option<f64>,
}

/// Read-only view handed to the presentational layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointSnapshot {
    pub width: Option<f64>,
    pub breakpoint: Breakpoint,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
}

impl BreakpointState {
    pub const fn unmeasured() -> Self {
        Self { width: None }
    }

    /// Record a width measurement, returns true if the width changed
    pub fn measure(&mut self, width: f64) -> bool {
        let changed = self.width != Some(width);
        self.width = Some(width);
        changed
    }

    #[inline]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    #[inline]
    pub fn is_measured(&self) -> bool {
        self.width.is_some()
    }

    /// Current tier (`Xs` until measured)
    pub fn breakpoint(&self) -> Breakpoint {
        self.width.map(Breakpoint::from_width).unwrap_or_default()
    }

    /// True if the viewport is at least as wide as `bp` (false until measured)
    pub fn is_breakpoint(&self, bp: Breakpoint) -> bool {
        match self.width {
            Some(width) => width >= bp.min_width(),
            None => false,
        }
    }

    pub fn is_mobile(&self) -> bool {
        !self.is_breakpoint(Breakpoint::Md)
    }

    pub fn is_tablet(&self) -> bool {
        self.is_breakpoint(Breakpoint::Md) && !self.is_breakpoint(Breakpoint::Lg)
    }

    pub fn is_desktop(&self) -> bool {
        self.is_breakpoint(Breakpoint::Lg)
    }

    pub fn snapshot(&self) -> BreakpointSnapshot {
        BreakpointSnapshot {
            width: self.width,
            breakpoint: self.breakpoint(),
            is_mobile: self.is_mobile(),
            is_tablet: self.is_tablet(),
            is_desktop: self.is_desktop(),
        }
    }
}
