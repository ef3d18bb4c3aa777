//! Search front end: synchronous and background execution.
//!
//! A [`Pathfinder`] owns the shared snapshot cache and the registered hooks.
//! Each request returns a [`PathfindingTask`]. Rule sets that are not
//! async-capable run on the caller's thread and the task is complete on
//! return; async-capable ones run on a rayon pool and deliver their result
//! through a channel.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_pathfind::{Pathfinder, RuleSet};
//! use route_snapshot::{MemoryTerrain, SnapshotCache};
//! use cf_spatial::{EnvironmentId, Position};
//!
//! let cache = Arc::new(SnapshotCache::new(Arc::new(MemoryTerrain::new(-8, 8))));
//! let pathfinder = Pathfinder::new(cache);
//! let world = EnvironmentId::new(0);
//!
//! let task = pathfinder.find_path(
//!     Position::new(world, 0.0, 0.0, 0.0),
//!     Position::new(world, 6.0, 2.0, -3.0),
//!     Arc::new(RuleSet::async_defaults()),
//! );
//! let result = task.wait();
//! assert!(result.successful());
//! ```

use std::cell::OnceCell;
use std::sync::{Arc, mpsc};

use cf_spatial::Position;
use route_snapshot::SnapshotCache;
use route_types::PathfinderResult;
use tracing::{debug, warn};

use crate::engine::VoxelAStar;
use crate::hooks::{CancellationToken, PathfinderHook};
use crate::rules::RuleSet;

/// Entry point for route searches over one snapshot cache.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    /// Terrain shared by every search.
    cache: Arc<SnapshotCache>,
    /// Lifecycle observers, in call order.
    hooks: Arc<[Arc<dyn PathfinderHook>]>,
    /// Pool for background searches; rayon's global pool when unset.
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Pathfinder {
    /// Creates a pathfinder over `cache` with no hooks.
    #[must_use]
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self {
            cache,
            hooks: Arc::from(Vec::new()),
            pool: None,
        }
    }

    /// Registers a hook after those already registered.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn PathfinderHook>) -> Self {
        let mut hooks = self.hooks.to_vec();
        hooks.push(hook);
        self.hooks = hooks.into();
        self
    }

    /// Runs background searches on `pool` instead of rayon's global pool.
    #[must_use]
    pub fn with_thread_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Returns the snapshot cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Returns the registered hooks.
    #[must_use]
    pub fn hooks(&self) -> &[Arc<dyn PathfinderHook>] {
        &self.hooks
    }

    /// Starts a search from `start` to `end`.
    ///
    /// Runs on the caller's thread unless `rules` is async-capable.
    #[must_use]
    pub fn find_path(
        &self,
        start: Position,
        end: Position,
        rules: Arc<RuleSet>,
    ) -> PathfindingTask {
        let token = CancellationToken::new();

        if !rules.is_async() {
            let result = self.run(&start, &end, &rules, token.clone());
            return PathfindingTask::complete(result, token);
        }

        let (sender, receiver) = mpsc::channel();
        let cache = Arc::clone(&self.cache);
        let hooks = Arc::clone(&self.hooks);
        let worker_token = token.clone();
        let job = move || {
            let result = VoxelAStar::new(&cache, &rules)
                .with_cancellation(worker_token)
                .with_hooks(&hooks)
                .find_path(&start, &end);
            // The task may have been dropped; nobody is waiting then
            let _ = sender.send(result);
        };

        debug!(start = %start.floor(), goal = %end.floor(), "spawning background search");
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
        PathfindingTask::pending(receiver, token)
    }

    /// Runs a search on the caller's thread regardless of the rule set's
    /// execution mode.
    #[must_use]
    pub fn find_path_blocking(
        &self,
        start: &Position,
        end: &Position,
        rules: &RuleSet,
    ) -> PathfinderResult {
        self.run(start, end, rules, CancellationToken::new())
    }

    fn run(
        &self,
        start: &Position,
        end: &Position,
        rules: &RuleSet,
        token: CancellationToken,
    ) -> PathfinderResult {
        VoxelAStar::new(&self.cache, rules)
            .with_cancellation(token)
            .with_hooks(&self.hooks)
            .find_path(start, end)
    }
}

/// Handle to one search.
///
/// Owned by the requester. Polling and waiting happen on the requester's
/// thread; the handle itself is `Send` but not `Sync`.
#[derive(Debug)]
pub struct PathfindingTask {
    token: CancellationToken,
    result: OnceCell<PathfinderResult>,
    receiver: Option<mpsc::Receiver<PathfinderResult>>,
}

impl PathfindingTask {
    fn complete(result: PathfinderResult, token: CancellationToken) -> Self {
        Self {
            token,
            result: OnceCell::from(result),
            receiver: None,
        }
    }

    fn pending(receiver: mpsc::Receiver<PathfinderResult>, token: CancellationToken) -> Self {
        Self {
            token,
            result: OnceCell::new(),
            receiver: Some(receiver),
        }
    }

    /// Returns the token that cancels this search.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Requests cancellation. The search observes it at its next iteration
    /// boundary and finishes as failed. No effect once finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    fn poll(&self) -> Option<&PathfinderResult> {
        if self.result.get().is_none() {
            if let Some(result) = self.receiver.as_ref().and_then(|rx| rx.try_recv().ok()) {
                let _ = self.result.set(result);
            }
        }
        self.result.get()
    }

    /// Returns `true` once the result is available.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.poll().is_some()
    }

    /// Returns the result if the search has finished.
    #[must_use]
    pub fn try_result(&self) -> Option<PathfinderResult> {
        self.poll().cloned()
    }

    /// Blocks until the search finishes and returns its result.
    ///
    /// A background worker that ends without a result (its search
    /// panicked under a pool that catches panics) yields a failed result.
    #[must_use]
    pub fn wait(self) -> PathfinderResult {
        if let Some(result) = self.result.into_inner() {
            return result;
        }
        match self.receiver.map(|rx| rx.recv()) {
            Some(Ok(result)) => result,
            _ => {
                warn!("background search ended without a result");
                PathfinderResult::failed()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hooks::{FinishEvent, StartEvent, StepEvent};
    use cf_spatial::EnvironmentId;
    use route_snapshot::MemoryTerrain;
    use route_types::PathState;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WORLD: EnvironmentId = EnvironmentId::new(0);

    fn pos(x: f64, y: f64, z: f64) -> Position {
        Position::new(WORLD, x, y, z)
    }

    fn pathfinder() -> Pathfinder {
        Pathfinder::new(Arc::new(SnapshotCache::new(Arc::new(MemoryTerrain::new(-8, 8)))))
    }

    #[derive(Debug, Default)]
    struct Recorder {
        starts: AtomicUsize,
        steps: AtomicUsize,
        finishes: Mutex<Vec<PathState>>,
    }

    impl PathfinderHook for Recorder {
        fn on_start(&self, _: &StartEvent<'_>) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_step(&self, _: &StepEvent) {
            self.steps.fetch_add(1, Ordering::SeqCst);
        }

        fn on_finish(&self, event: &FinishEvent<'_>) {
            self.finishes.lock().unwrap().push(event.result().state());
        }
    }

    #[derive(Debug)]
    struct CancelOnStart;

    impl PathfinderHook for CancelOnStart {
        fn on_start(&self, event: &StartEvent<'_>) {
            event.cancel();
        }
    }

    /// Blocks the search in `on_start` until released.
    #[derive(Debug)]
    struct Gate(Mutex<mpsc::Receiver<()>>);

    impl PathfinderHook for Gate {
        fn on_start(&self, _: &StartEvent<'_>) {
            let _ = self.0.lock().unwrap().recv();
        }
    }

    #[derive(Debug)]
    struct PanicOnStart;

    impl PathfinderHook for PanicOnStart {
        fn on_start(&self, _: &StartEvent<'_>) {
            panic!("hook failure");
        }
    }

    // ==================== Sync Tests ====================

    #[test]
    fn test_sync_task_is_complete_on_return() {
        let task = pathfinder().find_path(
            pos(0.0, 0.0, 0.0),
            pos(4.0, 0.0, 0.0),
            Arc::new(RuleSet::sync_defaults()),
        );
        assert!(task.is_finished());
        assert!(task.try_result().unwrap().successful());
        assert!(task.wait().successful());
    }

    #[test]
    fn test_hooks_called_in_order_of_lifecycle() {
        let recorder = Arc::new(Recorder::default());
        let pathfinder = pathfinder().with_hook(recorder.clone());
        let rules = RuleSet::sync_defaults().with_diagonal(false);

        let result =
            pathfinder.find_path_blocking(&pos(0.0, 0.0, 0.0), &pos(3.0, 0.0, 0.0), &rules);

        assert!(result.successful());
        assert_eq!(recorder.starts.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.steps.load(Ordering::SeqCst), result.stats().iterations());
        assert_eq!(*recorder.finishes.lock().unwrap(), [PathState::Found]);
    }

    #[test]
    fn test_start_hook_cancellation() {
        let recorder = Arc::new(Recorder::default());
        let pathfinder = pathfinder()
            .with_hook(Arc::new(CancelOnStart))
            .with_hook(recorder.clone());

        let result = pathfinder.find_path_blocking(
            &pos(0.0, 0.0, 0.0),
            &pos(3.0, 0.0, 0.0),
            &RuleSet::sync_defaults(),
        );

        assert!(result.has_failed());
        assert_eq!(result.stats().iterations(), 0);
        assert_eq!(recorder.steps.load(Ordering::SeqCst), 0);
        assert_eq!(*recorder.finishes.lock().unwrap(), [PathState::Failed]);
    }

    // ==================== Async Tests ====================

    #[test]
    fn test_async_result_delivered() {
        let recorder = Arc::new(Recorder::default());
        let pathfinder = pathfinder().with_hook(recorder.clone());
        let task = pathfinder.find_path(
            pos(0.0, 0.0, 0.0),
            pos(-5.0, 3.0, 2.0),
            Arc::new(RuleSet::async_defaults()),
        );

        let result = task.wait();
        assert!(result.successful());
        assert_eq!(*recorder.finishes.lock().unwrap(), [PathState::Found]);
    }

    #[test]
    fn test_async_cancel_before_first_iteration() {
        let (release, gate) = mpsc::channel();
        let pathfinder = pathfinder().with_hook(Arc::new(Gate(Mutex::new(gate))));
        let task = pathfinder.find_path(
            pos(0.0, 0.0, 0.0),
            pos(6.0, 0.0, 0.0),
            Arc::new(RuleSet::async_defaults()),
        );

        assert!(!task.is_finished());
        task.cancel();
        release.send(()).unwrap();

        let result = task.wait();
        assert!(result.has_failed());
        assert_eq!(result.stats().iterations(), 0);
    }

    #[test]
    fn test_dedicated_pool() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap());
        let pathfinder = pathfinder().with_thread_pool(pool);
        let rules = Arc::new(RuleSet::async_defaults());

        let tasks: Vec<_> = (1..=4)
            .map(|i| {
                let end = pos(f64::from(i), 0.0, 0.0);
                pathfinder.find_path(pos(0.0, 0.0, 0.0), end, Arc::clone(&rules))
            })
            .collect();
        for task in tasks {
            assert!(task.wait().successful());
        }
    }

    #[test]
    fn test_worker_panic_yields_failed() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .panic_handler(|_| {})
            .build()
            .unwrap();
        let pathfinder = pathfinder()
            .with_thread_pool(Arc::new(pool))
            .with_hook(Arc::new(PanicOnStart));
        let task = pathfinder.find_path(
            pos(0.0, 0.0, 0.0),
            pos(3.0, 0.0, 0.0),
            Arc::new(RuleSet::async_defaults()),
        );

        let result = task.wait();
        assert!(result.has_failed());
        assert!(result.path().is_empty());
    }

    #[test]
    fn test_blocking_ignores_async_mode() {
        let result = pathfinder().find_path_blocking(
            &pos(0.0, 0.0, 0.0),
            &pos(2.0, 2.0, 2.0),
            &RuleSet::async_defaults(),
        );
        assert!(result.successful());
    }
}
