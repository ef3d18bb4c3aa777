//! Search lifecycle hooks and cancellation.
//!
//! Hooks are called synchronously, in registration order, on the thread
//! that runs the search. A background search therefore calls them on a
//! worker thread.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use route_pathfind::hooks::{FinishEvent, PathfinderHook, StartEvent};
//!
//! #[derive(Debug, Default)]
//! struct Counter(AtomicUsize);
//!
//! impl PathfinderHook for Counter {
//!     fn on_finish(&self, event: &FinishEvent<'_>) {
//!         if event.result().successful() {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cf_spatial::{Coordinate, Position};
use route_types::PathfinderResult;

use crate::rules::RuleSet;

/// Shared cancellation flag polled by a running search.
///
/// Clones observe the same flag. Cancelling is permanent.
///
/// # Example
///
/// ```
/// use route_pathfind::hooks::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Observer of search lifecycle events.
///
/// Every method has an empty default body.
pub trait PathfinderHook: Send + Sync + std::fmt::Debug {
    /// Called before the first iteration. May cancel the search.
    fn on_start(&self, event: &StartEvent<'_>) {
        let _ = event;
    }

    /// Called after each node expansion.
    fn on_step(&self, event: &StepEvent) {
        let _ = event;
    }

    /// Called once with the final result.
    fn on_finish(&self, event: &FinishEvent<'_>) {
        let _ = event;
    }
}

/// A search is about to begin.
#[derive(Debug)]
pub struct StartEvent<'a> {
    start: Position,
    end: Position,
    rules: &'a RuleSet,
    token: &'a CancellationToken,
}

impl<'a> StartEvent<'a> {
    pub(crate) const fn new(
        start: Position,
        end: Position,
        rules: &'a RuleSet,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            start,
            end,
            rules,
            token,
        }
    }

    /// The requested start.
    #[must_use]
    pub const fn start(&self) -> &Position {
        &self.start
    }

    /// The requested end.
    #[must_use]
    pub const fn end(&self) -> &Position {
        &self.end
    }

    /// The search's configuration.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        self.rules
    }

    /// Cancels the search before it runs; it finishes as failed.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` if the search is already cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A node was expanded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Iterations consumed so far, this one included.
    pub iteration: usize,
    /// The node just expanded.
    pub node: Coordinate,
    /// Path cost from the start to `node`.
    pub cost: f64,
    /// Entries left in the open set.
    pub open_set_size: usize,
}

/// A search finished.
#[derive(Debug)]
pub struct FinishEvent<'a> {
    result: &'a PathfinderResult,
}

impl<'a> FinishEvent<'a> {
    pub(crate) const fn new(result: &'a PathfinderResult) -> Self {
        Self { result }
    }

    /// The outcome.
    #[must_use]
    pub const fn result(&self) -> &PathfinderResult {
        self.result
    }
}
