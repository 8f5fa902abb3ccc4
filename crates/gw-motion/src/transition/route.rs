//! Route fade transition machine

use serde::Serialize;

/// Transition state of the routed subtree
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum RouteTransitionState {
    /// New route mounted with the exit style (opacity 0)
    Exiting { from: Option<String>, to: String },
    /// Enter style applied (opacity 1), fade running
    Entering { path: String },
    /// Fade finished
    Visible { path: String },
}

impl RouteTransitionState {
    /// Path this state belongs to (the destination while exiting)
    pub fn path(&self) -> &str {
        match self {
            RouteTransitionState::Exiting { to, .. } => to,
            RouteTransitionState::Entering { path } | RouteTransitionState::Visible { path } => {
                path
            }
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            RouteTransitionState::Exiting { .. } => 0.0,
            _ => 1.0,
        }
    }
}

/// Route transition machine
///
/// Every `navigate` bumps the generation. `enter`/`settle` carry the
/// generation their timer was scheduled for and are rejected when stale, so a
/// late timer from a superseded navigation can never overwrite a newer one.
#[derive(Clone, Debug, Default)]
pub struct RouteTransition {
    state: Option<RouteTransitionState>,
    generation: u64,
}

impl RouteTransition {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> Option<&RouteTransitionState> {
        self.state.as_ref()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Opacity of the routed subtree (0 before the first route)
    pub fn opacity(&self) -> f32 {
        self.state.as_ref().map_or(0.0, RouteTransitionState::opacity)
    }

    /// Start a transition to `path`
    ///
    /// Returns the new generation, or `None` if `path` is already current.
    pub fn navigate(&mut self, path: &str) -> Option<u64> {
        let from = match &self.state {
            Some(state) if state.path() == path => return None,
            Some(state) => Some(state.path().to_string()),
            None => None,
        };
        self.generation += 1;
        self.state = Some(RouteTransitionState::Exiting {
            from,
            to: path.to_string(),
        });
        Some(self.generation)
    }

    /// Debounce elapsed: Exiting -> Entering
    pub fn enter(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.state.take() {
            Some(RouteTransitionState::Exiting { to, .. }) => {
                self.state = Some(RouteTransitionState::Entering { path: to });
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Fade finished: Entering -> Visible
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.state.take() {
            Some(RouteTransitionState::Entering { path }) => {
                self.state = Some(RouteTransitionState::Visible { path });
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_route() {
        let mut route = RouteTransition::new();
        assert_eq!(route.opacity(), 0.0);

        let generation = route.navigate("/").unwrap();
        assert_eq!(
            route.state(),
            Some(&RouteTransitionState::Exiting {
                from: None,
                to: "/".to_string()
            })
        );

        assert!(route.enter(generation));
        assert_eq!(route.opacity(), 1.0);
        assert!(route.settle(generation));
        assert_eq!(
            route.state(),
            Some(&RouteTransitionState::Visible {
                path: "/".to_string()
            })
        );
    }

    #[test]
    fn test_navigation_passes_through_exiting() {
        let mut route = RouteTransition::new();
        let g = route.navigate("/a").unwrap();
        route.enter(g);
        route.settle(g);

        let g = route.navigate("/b").unwrap();
        assert_eq!(
            route.state(),
            Some(&RouteTransitionState::Exiting {
                from: Some("/a".to_string()),
                to: "/b".to_string()
            })
        );
        assert_eq!(route.opacity(), 0.0);
        assert!(route.enter(g));
        assert_eq!(route.state().map(|s| s.path()), Some("/b"));
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut route = RouteTransition::new();
        let g_a = route.navigate("/a").unwrap();
        route.enter(g_a);
        route.settle(g_a);

        let g_b = route.navigate("/b").unwrap();
        let g_c = route.navigate("/c").unwrap();

        // /b's debounce fires late
        assert!(!route.enter(g_b));
        assert!(!route.settle(g_b));
        assert_eq!(
            route.state(),
            Some(&RouteTransitionState::Exiting {
                from: Some("/b".to_string()),
                to: "/c".to_string()
            })
        );

        assert!(route.enter(g_c));
        assert!(route.settle(g_c));
        assert_eq!(route.state().map(|s| s.path()), Some("/c"));
    }

    #[test]
    fn test_same_path_is_noop() {
        let mut route = RouteTransition::new();
        let g = route.navigate("/a").unwrap();
        assert_eq!(route.navigate("/a"), None);
        assert_eq!(route.generation(), g);
    }

    #[test]
    fn test_steps_require_matching_state() {
        let mut route = RouteTransition::new();
        let g = route.navigate("/a").unwrap();
        // settle before enter
        assert!(!route.settle(g));
        assert!(route.enter(g));
        assert!(!route.enter(g));
    }

    #[test]
    fn test_state_json() {
        let state = RouteTransitionState::Entering {
            path: "/services".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"phase":"entering","path":"/services"}"#
        );
    }
}
