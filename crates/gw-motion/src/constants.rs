//! Centralized constants for the motion layer
//!
//! Breakpoint widths, settle windows, debounce delays and component defaults
//! are defined here to avoid scatter and keep the JS styles in sync.

// =============================================================================
// Media Queries
// =============================================================================

/// Media query matching the reduced-motion accessibility preference
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// =============================================================================
// Breakpoints (min-width, CSS px)
// =============================================================================

pub const BREAKPOINT_SM_PX: f64 = 640.0;
pub const BREAKPOINT_MD_PX: f64 = 768.0;
pub const BREAKPOINT_LG_PX: f64 = 1024.0;
pub const BREAKPOINT_XL_PX: f64 = 1280.0;
pub const BREAKPOINT_2XL_PX: f64 = 1536.0;

// =============================================================================
// Intersection
// =============================================================================

/// Default root margin for plain visibility observation
pub const DEFAULT_ROOT_MARGIN: &str = "0%";

/// Default visible ratio for reveal animations
pub const REVEAL_THRESHOLD: f64 = 0.2;

/// Default root margin for reveal animations (trigger 50px before the bottom edge)
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// Settle window between `Visible` and `Settled` (ms)
pub const REVEAL_SETTLE_MS: u32 = 100;

// =============================================================================
// Route Transitions
// =============================================================================

/// Debounce before the entering route fades in (ms)
pub const ROUTE_ENTER_DEBOUNCE_MS: u32 = 10;

/// Duration of the fade-in, matches the CSS `duration-300` class (ms)
pub const ROUTE_ENTER_DURATION_MS: u32 = 300;

// =============================================================================
// Scroll Indicator
// =============================================================================

pub const SCROLL_INDICATOR_COLOR: &str = "#F59E0B";
pub const SCROLL_INDICATOR_HEIGHT_PX: u32 = 3;
pub const SCROLL_INDICATOR_Z_INDEX: i32 = 50;

// =============================================================================
// Count-up / Stagger
// =============================================================================

pub const COUNT_UP_DURATION_MS: f64 = 2000.0;
pub const COUNT_UP_SEPARATOR: &str = ",";

/// Delay between consecutive children of a staggered group (ms)
pub const STAGGER_STEP_MS: u32 = 100;

// =============================================================================
// Gestures
// =============================================================================

pub const SWIPE_MIN_DISTANCE_PX: f64 = 50.0;
pub const SWIPE_MAX_TIME_MS: f64 = 300.0;
