//! Search configuration.
//!
//! A [`RuleSet`] bundles the budgets, neighborhood, movement strategy chain
//! and execution mode of a search. Two presets cover the common cases and
//! the `with_*` builder adjusts them.
//!
//! # Example
//!
//! ```
//! use route_pathfind::rules::RuleSet;
//! use route_pathfind::strategy::{Jumpable, Walkable};
//!
//! let rules = RuleSet::async_defaults()
//!     .with_max_iterations(20_000)
//!     .with_max_length(128.0)
//!     .with_diagonal(false)
//!     .with_strategies(vec![])
//!     .with_strategy(Walkable::new())
//!     .with_strategy(Jumpable::new());
//!
//! assert!(rules.is_async());
//! assert_eq!(rules.strategies().len(), 2);
//! assert!(rules.validate().is_empty());
//! ```

use std::sync::Arc;

use route_snapshot::SnapshotView;

use crate::heuristics::Heuristic;
use crate::strategy::{Direct, MovementStrategy, Step};

/// Expansion budget of the synchronous preset.
pub const SYNC_MAX_ITERATIONS: usize = 5_000;

/// Expansion budget of the asynchronous preset.
pub const ASYNC_MAX_ITERATIONS: usize = 50_000;

/// Configuration of one search.
///
/// Cloning is cheap: strategies are shared.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Upper bound on node expansions.
    max_iterations: usize,
    /// Upper bound on path length.
    max_length: Option<f64>,
    /// Report the closest reachable node when the search gives up.
    allow_fallback: bool,
    /// 26-connected neighborhood instead of 6.
    allow_diagonal: bool,
    /// Movement checks, evaluated in order.
    strategies: Vec<Arc<dyn MovementStrategy>>,
    /// Run in the background instead of on the caller's thread.
    async_capable: bool,
}

impl RuleSet {
    /// Preset for searches run on the caller's thread.
    ///
    /// 5 000 iterations, no length bound, no fallback, diagonal movement,
    /// [`Direct`] movement.
    #[must_use]
    pub fn sync_defaults() -> Self {
        Self {
            max_iterations: SYNC_MAX_ITERATIONS,
            max_length: None,
            allow_fallback: false,
            allow_diagonal: true,
            strategies: vec![Arc::new(Direct::new())],
            async_capable: false,
        }
    }

    /// Preset for background searches.
    ///
    /// 50 000 iterations, no length bound, fallback enabled, diagonal
    /// movement, [`Direct`] movement.
    #[must_use]
    pub fn async_defaults() -> Self {
        Self {
            max_iterations: ASYNC_MAX_ITERATIONS,
            allow_fallback: true,
            async_capable: true,
            ..Self::sync_defaults()
        }
    }

    /// Sets the expansion budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Bounds the path length.
    #[must_use]
    pub const fn with_max_length(mut self, length: f64) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Removes the path length bound.
    #[must_use]
    pub const fn without_max_length(mut self) -> Self {
        self.max_length = None;
        self
    }

    /// Enables or disables fallback on budget exhaustion.
    #[must_use]
    pub const fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// Sets whether diagonal movement is allowed.
    ///
    /// - `true`: 26-connectivity, octile heuristic
    /// - `false`: 6-connectivity, Manhattan heuristic
    #[must_use]
    pub const fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }

    /// Appends a strategy to the chain.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl MovementStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Replaces the whole chain.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Arc<dyn MovementStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets whether the search runs in the background.
    #[must_use]
    pub const fn with_async(mut self, async_capable: bool) -> Self {
        self.async_capable = async_capable;
        self
    }

    /// Returns the expansion budget.
    #[must_use]
    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the path length bound.
    #[must_use]
    pub const fn max_length(&self) -> Option<f64> {
        self.max_length
    }

    /// Returns whether fallback is enabled.
    #[must_use]
    pub const fn allow_fallback(&self) -> bool {
        self.allow_fallback
    }

    /// Returns whether diagonal movement is allowed.
    #[must_use]
    pub const fn allow_diagonal(&self) -> bool {
        self.allow_diagonal
    }

    /// Returns the strategy chain.
    #[must_use]
    pub fn strategies(&self) -> &[Arc<dyn MovementStrategy>] {
        &self.strategies
    }

    /// Returns whether the search runs in the background.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.async_capable
    }

    /// Returns the heuristic matching the neighborhood.
    #[must_use]
    pub const fn heuristic(&self) -> Heuristic {
        Heuristic::for_connectivity(self.allow_diagonal)
    }

    /// Validates the configuration and returns any issues.
    ///
    /// An empty result means the configuration is sensible; issues do not
    /// stop a search from running.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.strategies.is_empty() {
            issues.push("Strategy chain is empty; every move will be accepted".to_string());
        }

        if let Some(length) = self.max_length {
            if !length.is_finite() || length <= 0.0 {
                issues.push(format!("Max length {length} must be finite and positive"));
            }
        }

        if self.max_iterations == 0 {
            issues.push("Max iterations is 0; no search can succeed".to_string());
        }

        issues
    }

    /// `true` if every strategy in the chain accepts `step`.
    pub(crate) fn accepts(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool {
        self.strategies
            .iter()
            .all(|strategy| strategy.is_valid(step, terrain))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::sync_defaults()
    }
}
