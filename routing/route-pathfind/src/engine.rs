//! A* search over terrain snapshots.
//!
//! One call runs one search to a terminal [`PathState`]; a search never
//! returns an error or panics on bad input.
//!
//! - `Found`: the goal cell was expanded.
//! - `Fallback`: the budget ran out or the open set emptied and the rule set
//!   allows fallback; the path leads to the discovered cell closest to the
//!   goal.
//! - `LengthLimited`: an expanded cell lies further than the rule set's
//!   length bound; the path to it is reported as computed.
//! - `Failed`: everything else, including cancellation and start/end in
//!   different environments. The path is empty.
//!
//! Path waypoints are the minimum corners of the cells visited, from the
//! start cell to the last cell in order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_pathfind::engine::VoxelAStar;
//! use route_pathfind::rules::RuleSet;
//! use route_snapshot::{MemoryTerrain, SnapshotCache};
//! use route_types::PathState;
//! use cf_spatial::{EnvironmentId, Position};
//!
//! let cache = SnapshotCache::new(Arc::new(MemoryTerrain::new(-8, 8)));
//! let rules = RuleSet::sync_defaults();
//! let world = EnvironmentId::new(0);
//!
//! let result = VoxelAStar::new(&cache, &rules).find_path(
//!     &Position::new(world, 0.0, 0.0, 0.0),
//!     &Position::new(world, 5.0, 0.0, 0.0),
//! );
//! assert_eq!(result.state(), PathState::Found);
//! assert_eq!(result.path().len(), 6);
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use cf_spatial::{Coordinate, Position};
use route_snapshot::SnapshotCache;
use route_types::{Path, PathState, PathfinderResult, SearchStats};
use tracing::{debug, info, warn};

use crate::hooks::{CancellationToken, FinishEvent, PathfinderHook, StartEvent, StepEvent};
use crate::neighbors::NeighborGenerator;
use crate::rules::RuleSet;

/// A discovered cell.
#[derive(Debug)]
struct Node {
    coordinate: Coordinate,
    parent: Option<usize>,
    g: f64,
    h: f64,
    closed: bool,
}

/// Open set entry. Ordered so the heap pops lowest `f`, then lowest `h`,
/// then the earliest push.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    g: f64,
    h: f64,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Why the main loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Goal(usize),
    TooLong(usize),
    BudgetExhausted,
    OpenSetEmpty,
    Cancelled,
}

/// Mutable state of one search.
struct SearchState {
    nodes: Vec<Node>,
    index: HashMap<Coordinate, usize>,
    open: BinaryHeap<OpenEntry>,
    seq: u64,
    /// Discovered node with the lowest `h`; earliest wins ties.
    closest: usize,
}

impl SearchState {
    fn new(start: Coordinate, h: f64) -> Self {
        let mut state = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            open: BinaryHeap::new(),
            seq: 0,
            closest: 0,
        };
        state.discover(start, None, 0.0, h);
        state
    }

    fn push(&mut self, node: usize) {
        let Node { g, h, .. } = self.nodes[node];
        self.open.push(OpenEntry {
            f: g + h,
            g,
            h,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    fn discover(&mut self, coordinate: Coordinate, parent: Option<usize>, g: f64, h: f64) {
        let node = self.nodes.len();
        self.nodes.push(Node {
            coordinate,
            parent,
            g,
            h,
            closed: false,
        });
        self.index.insert(coordinate, node);
        if h < self.nodes[self.closest].h {
            self.closest = node;
        }
        self.push(node);
    }

    /// Records a route to `coordinate` through `parent` if it is new or
    /// cheaper than the best known one.
    fn relax(&mut self, coordinate: Coordinate, parent: usize, g: f64, h: impl FnOnce() -> f64) {
        let Some(&node) = self.index.get(&coordinate) else {
            self.discover(coordinate, Some(parent), g, h());
            return;
        };
        let known = &mut self.nodes[node];
        if known.closed || g >= known.g {
            return;
        }
        known.g = g;
        known.parent = Some(parent);
        self.push(node);
    }

    /// Pops the next live entry, skipping stale ones.
    fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let node = &self.nodes[entry.node];
            if !node.closed && entry.g <= node.g {
                return Some(entry.node);
            }
        }
        None
    }

    /// Path from the start to `node`.
    fn path_to(&self, node: usize) -> Path {
        let mut waypoints = Vec::new();
        let mut current = Some(node);
        while let Some(index) = current {
            let node = &self.nodes[index];
            waypoints.push(Position::from(node.coordinate));
            current = node.parent;
        }
        waypoints.reverse();
        Path::new(waypoints)
    }
}

/// A* search bound to a snapshot cache and a rule set.
///
/// Each [`find_path`](Self::find_path) call reads terrain through a fresh
/// [`route_snapshot::SnapshotView`], so one search sees one snapshot per
/// region.
#[derive(Debug)]
pub struct VoxelAStar<'a> {
    /// Terrain source.
    cache: &'a SnapshotCache,
    /// Search configuration.
    rules: &'a RuleSet,
    /// Polled at every iteration boundary.
    token: CancellationToken,
    /// Lifecycle observers, in call order.
    hooks: &'a [Arc<dyn PathfinderHook>],
}

impl<'a> VoxelAStar<'a> {
    /// Creates a search over `cache` configured by `rules`.
    #[must_use]
    pub fn new(cache: &'a SnapshotCache, rules: &'a RuleSet) -> Self {
        Self {
            cache,
            rules,
            token: CancellationToken::new(),
            hooks: &[],
        }
    }

    /// Uses `token` to cancel the search.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Notifies `hooks` of the search lifecycle.
    #[must_use]
    pub fn with_hooks(mut self, hooks: &'a [Arc<dyn PathfinderHook>]) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        self.rules
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Searches from the cell containing `start` to the cell containing
    /// `end`.
    ///
    /// Start hooks run first and may cancel; finish hooks receive the result
    /// before it is returned.
    #[must_use]
    pub fn find_path(&self, start: &Position, end: &Position) -> PathfinderResult {
        let event = StartEvent::new(*start, *end, self.rules, &self.token);
        for hook in self.hooks {
            hook.on_start(&event);
        }

        let result = self.search(start, end);

        let event = FinishEvent::new(&result);
        for hook in self.hooks {
            hook.on_finish(&event);
        }
        result
    }

    fn search(&self, start: &Position, end: &Position) -> PathfinderResult {
        let started = Instant::now();
        let start_cell = start.floor();
        let goal = end.floor();

        if !start.same_environment(end) {
            info!(
                start = %start_cell,
                goal = %goal,
                "start and end lie in different environments"
            );
            return PathfinderResult::failed()
                .with_stats(SearchStats::new().with_elapsed(started.elapsed()));
        }
        if self.token.is_cancelled() {
            debug!(start = %start_cell, goal = %goal, "search cancelled before start");
            return PathfinderResult::failed()
                .with_stats(SearchStats::new().with_elapsed(started.elapsed()));
        }
        if start_cell == goal {
            let path = Path::from_single(Position::from(start_cell));
            let stats = SearchStats::new()
                .with_nodes_discovered(1)
                .with_elapsed(started.elapsed());
            return PathfinderResult::new(PathState::Found, path).with_stats(stats);
        }

        let heuristic = self.rules.heuristic();
        let terrain = self.cache.view();
        let generator = NeighborGenerator::new(self.rules, &terrain);
        debug!(
            start = %start_cell,
            goal = %goal,
            max_iterations = self.rules.max_iterations(),
            candidates = generator.candidate_count(),
            %heuristic,
            heuristic_scale = generator.heuristic_scale(),
            "starting search"
        );

        let mut state = SearchState::new(start_cell, generator.estimate(start_cell, goal));
        let mut iterations = 0usize;

        let stop = loop {
            if self.token.is_cancelled() {
                break Stop::Cancelled;
            }
            if iterations >= self.rules.max_iterations() {
                break Stop::BudgetExhausted;
            }
            let Some(current) = state.pop() else {
                break Stop::OpenSetEmpty;
            };
            state.nodes[current].closed = true;
            iterations += 1;

            let Node { coordinate, g, .. } = state.nodes[current];
            if !self.hooks.is_empty() {
                let event = StepEvent {
                    iteration: iterations,
                    node: coordinate,
                    cost: g,
                    open_set_size: state.open.len(),
                };
                for hook in self.hooks {
                    hook.on_step(&event);
                }
            }

            if self.rules.max_length().is_some_and(|max| g > max) {
                break Stop::TooLong(current);
            }
            if coordinate == goal {
                break Stop::Goal(current);
            }

            for (neighbor, cost) in generator.successors(coordinate) {
                state.relax(neighbor, current, g + cost, || generator.estimate(neighbor, goal));
            }
        };

        let (result_state, path) = match stop {
            Stop::Goal(node) => (PathState::Found, state.path_to(node)),
            Stop::TooLong(node) => (PathState::LengthLimited, state.path_to(node)),
            Stop::Cancelled => (PathState::Failed, Path::empty()),
            Stop::BudgetExhausted | Stop::OpenSetEmpty => {
                if self.rules.allow_fallback() {
                    (PathState::Fallback, state.path_to(state.closest))
                } else {
                    (PathState::Failed, Path::empty())
                }
            }
        };

        let budget_exhausted = stop == Stop::BudgetExhausted;
        if budget_exhausted {
            warn!(
                start = %start_cell,
                goal = %goal,
                iterations,
                fallback = self.rules.allow_fallback(),
                "search budget exhausted"
            );
        }

        let stats = SearchStats::new()
            .with_iterations(iterations)
            .with_nodes_discovered(state.nodes.len())
            .with_open_set_size(state.open.len())
            .with_budget_exhausted(budget_exhausted)
            .with_elapsed(started.elapsed());

        info!(
            start = %start_cell,
            goal = %goal,
            state = %result_state,
            iterations,
            waypoints = path.len(),
            "search finished"
        );

        PathfinderResult::new(result_state, path).with_stats(stats)
    }
}

/// Convenience function for a single search without hooks or cancellation.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use route_pathfind::engine::find_path;
/// use route_pathfind::rules::RuleSet;
/// use route_snapshot::{MemoryTerrain, SnapshotCache};
/// use cf_spatial::{EnvironmentId, Position};
///
/// let cache = SnapshotCache::new(Arc::new(MemoryTerrain::new(0, 8)));
/// let world = EnvironmentId::new(0);
/// let result = find_path(
///     &Position::new(world, 0.0, 0.0, 0.0),
///     &Position::new(world, 3.0, 3.0, 3.0),
///     &RuleSet::sync_defaults(),
///     &cache,
/// );
/// assert!(result.successful());
/// ```
#[must_use]
pub fn find_path(
    start: &Position,
    end: &Position,
    rules: &RuleSet,
    cache: &SnapshotCache,
) -> PathfinderResult {
    VoxelAStar::new(cache, rules).find_path(start, end)
}
