//! Search outcomes.
//!
//! A search always produces a [`PathfinderResult`]: a terminal [`PathState`]
//! plus the best path the engine could justify for that state, and
//! [`SearchStats`] describing the work done.
//!
//! # Example
//!
//! ```
//! use route_types::{Path, PathState, PathfinderResult, SearchStats};
//! use cf_spatial::{EnvironmentId, Position};
//!
//! let world = EnvironmentId::new(0);
//! let path = Path::from_single(Position::new(world, 0.0, 0.0, 0.0));
//!
//! let result = PathfinderResult::new(PathState::Fallback, path)
//!     .with_stats(SearchStats::new().with_iterations(5000).with_budget_exhausted(true));
//!
//! assert!(result.has_fallen_back());
//! assert!(!result.successful());
//! assert_eq!(result.stats().iterations(), 5000);
//! ```

use std::time::Duration;

use crate::path::Path;

/// Terminal classification of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathState {
    /// The goal was reached.
    Found,
    /// No path could be produced. The path is empty.
    Failed,
    /// The goal was not reached; the path leads to the closest node found.
    Fallback,
    /// The path exceeded the configured maximum length.
    LengthLimited,
    /// The iteration budget ran out.
    ///
    /// The engine folds budget exhaustion into [`PathState::Failed`] or
    /// [`PathState::Fallback`] and flags it in
    /// [`SearchStats::budget_exhausted`]; this variant is available to hosts
    /// that reclassify results.
    MaxIterationsReached,
}

impl PathState {
    /// Returns `true` if results in this state carry a non-empty path.
    #[must_use]
    pub const fn has_path(self) -> bool {
        matches!(self, Self::Found | Self::Fallback | Self::LengthLimited)
    }
}

impl std::fmt::Display for PathState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Found => "found",
            Self::Failed => "failed",
            Self::Fallback => "fallback",
            Self::LengthLimited => "length limited",
            Self::MaxIterationsReached => "max iterations reached",
        };
        f.write_str(name)
    }
}

/// Statistics about a search.
///
/// Elapsed time is informational; it never influences termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of expansions performed.
    iterations: usize,
    /// Number of distinct cells ever pushed to the open set.
    nodes_discovered: usize,
    /// Open set size at termination.
    open_set_size: usize,
    /// Whether the iteration budget ran out.
    budget_exhausted: bool,
    /// Wall time spent in the search.
    time_elapsed: Duration,
}

impl SearchStats {
    /// Creates zeroed statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            iterations: 0,
            nodes_discovered: 0,
            open_set_size: 0,
            budget_exhausted: false,
            time_elapsed: Duration::ZERO,
        }
    }

    /// Sets the number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of discovered nodes.
    #[must_use]
    pub const fn with_nodes_discovered(mut self, count: usize) -> Self {
        self.nodes_discovered = count;
        self
    }

    /// Sets the open set size at termination.
    #[must_use]
    pub const fn with_open_set_size(mut self, size: usize) -> Self {
        self.open_set_size = size;
        self
    }

    /// Marks whether the iteration budget ran out.
    #[must_use]
    pub const fn with_budget_exhausted(mut self, exhausted: bool) -> Self {
        self.budget_exhausted = exhausted;
        self
    }

    /// Sets the time elapsed.
    #[must_use]
    pub const fn with_elapsed(mut self, duration: Duration) -> Self {
        self.time_elapsed = duration;
        self
    }

    /// Returns the number of expansions performed.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the number of distinct cells pushed to the open set.
    #[must_use]
    pub const fn nodes_discovered(&self) -> usize {
        self.nodes_discovered
    }

    /// Returns the open set size at termination.
    #[must_use]
    pub const fn open_set_size(&self) -> usize {
        self.open_set_size
    }

    /// Returns `true` if the iteration budget ran out before termination.
    #[must_use]
    pub const fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }

    /// Returns the wall time spent in the search.
    #[must_use]
    pub const fn time_elapsed(&self) -> Duration {
        self.time_elapsed
    }
}

/// The outcome of one search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderResult {
    /// Terminal state.
    state: PathState,
    /// Path for the state; empty when failed.
    path: Path,
    /// Work done by the search.
    stats: SearchStats,
}

impl PathfinderResult {
    /// Creates a result from a state and path.
    ///
    /// A [`PathState::Failed`] result always carries an empty path.
    #[must_use]
    pub fn new(state: PathState, path: Path) -> Self {
        let path = if state == PathState::Failed {
            Path::empty()
        } else {
            path
        };
        Self {
            state,
            path,
            stats: SearchStats::new(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            state: PathState::Failed,
            path: Path::empty(),
            stats: SearchStats::new(),
        }
    }

    /// Attaches search statistics.
    #[must_use]
    pub const fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Returns the terminal state.
    #[must_use]
    pub const fn state(&self) -> PathState {
        self.state
    }

    /// Returns the path.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the result, returning the path.
    #[must_use]
    pub fn into_path(self) -> Path {
        self.path
    }

    /// Returns the search statistics.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// `true` iff the state is [`PathState::Found`].
    #[must_use]
    pub fn successful(&self) -> bool {
        self.state == PathState::Found
    }

    /// `true` iff the state is [`PathState::Failed`].
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.state == PathState::Failed
    }

    /// `true` iff the state is [`PathState::Fallback`].
    #[must_use]
    pub fn has_fallen_back(&self) -> bool {
        self.state == PathState::Fallback
    }
}
