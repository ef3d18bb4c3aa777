//! Sharded cache of immutable region snapshots.
//!
//! Searches may run on any thread while live terrain can only be read where
//! the provider allows it. The cache bridges the two: each region is captured
//! once through the [`TerrainProvider`] and then served from an
//! `Arc<RegionSnapshot>` to every reader.
//!
//! # Concurrency
//!
//! The map is split into shards, each behind its own `RwLock`. Lookups take a
//! read lock on one shard; a capture calls the provider with no lock held and
//! then write-locks a single shard to publish the snapshot. Two threads
//! capturing the same region both publish, and the later write wins. Readers
//! that already hold the earlier `Arc` keep a consistent copy.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_snapshot::{CellProperties, MemoryTerrain, RegionKey, SnapshotCache};
//! use cf_spatial::{Coordinate, EnvironmentId};
//!
//! let world = EnvironmentId::new(0);
//! let mut terrain = MemoryTerrain::new(0, 16);
//! terrain.set(Coordinate::new(world, 3, 0, 3), CellProperties::SOLID);
//!
//! let cache = SnapshotCache::new(Arc::new(terrain));
//! let cell = cache.get(&Coordinate::new(world, 3, 0, 3)).unwrap();
//! assert!(cell.is_solid());
//! assert!(cache.contains(&RegionKey::new(world, 0, 0)));
//! ```

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use cf_spatial::{Coordinate, EnvironmentId};
use tracing::{debug, warn};

use crate::cell::VoxelCell;
use crate::error::TerrainError;
use crate::provider::TerrainProvider;
use crate::region::{RegionKey, RegionSnapshot};
use crate::view::SnapshotView;

/// Number of independently locked shards.
const SHARD_COUNT: usize = 16;

type Shard = RwLock<HashMap<RegionKey, Arc<RegionSnapshot>>>;

/// Region snapshot cache shared by concurrent searches.
pub struct SnapshotCache {
    /// Terrain source for captures.
    provider: Arc<dyn TerrainProvider>,
    /// Snapshot map, split by region hash.
    shards: Vec<Shard>,
    /// Successful captures performed.
    captures: AtomicUsize,
}

impl SnapshotCache {
    /// Creates an empty cache reading from `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn TerrainProvider>) -> Self {
        Self {
            provider,
            shards: (0..SHARD_COUNT).map(|_| RwLock::default()).collect(),
            captures: AtomicUsize::new(0),
        }
    }

    fn shard(&self, key: &RegionKey) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let index = (hasher.finish() % SHARD_COUNT as u64) as usize;
        &self.shards[index]
    }

    /// Returns the cell at `coordinate`, capturing its region on first access.
    ///
    /// # Errors
    ///
    /// - [`TerrainError::Unavailable`] if the provider cannot supply the region
    /// - [`TerrainError::OutOfBounds`] if `y` is outside the region's range
    pub fn get(&self, coordinate: &Coordinate) -> Result<VoxelCell, TerrainError> {
        self.region(RegionKey::containing(coordinate))?
            .cell(coordinate)
    }

    /// Returns the snapshot for `key`, capturing it if it is not cached.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if a capture was needed and failed.
    pub fn region(&self, key: RegionKey) -> Result<Arc<RegionSnapshot>, TerrainError> {
        match self.snapshot(&key) {
            Some(snapshot) => Ok(snapshot),
            None => self.capture(key),
        }
    }

    /// Captures `key` from the provider and publishes it, replacing any
    /// cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the cache is left unchanged.
    pub fn capture(&self, key: RegionKey) -> Result<Arc<RegionSnapshot>, TerrainError> {
        let grid = self
            .provider
            .capture_region(key.environment, key.region_x, key.region_z)
            .inspect_err(|error| warn!(region = %key, %error, "terrain capture failed"))?;

        let snapshot = Arc::new(RegionSnapshot::new(key, grid));
        let replaced = self
            .shard(&key)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&snapshot))
            .is_some();
        self.captures.fetch_add(1, Ordering::Relaxed);

        debug!(region = %key, replaced, "captured terrain region");
        Ok(snapshot)
    }

    /// Returns the cached snapshot for `key` without capturing.
    #[must_use]
    pub fn snapshot(&self, key: &RegionKey) -> Option<Arc<RegionSnapshot>> {
        self.shard(key)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns `true` if `key` is cached.
    #[must_use]
    pub fn contains(&self, key: &RegionKey) -> bool {
        self.shard(key)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Drops the cached snapshot for `key` so the next access recaptures it.
    ///
    /// Returns `true` if a snapshot was cached.
    pub fn invalidate(&self, key: &RegionKey) -> bool {
        let removed = self
            .shard(key)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            debug!(region = %key, "invalidated terrain region");
        }
        removed
    }

    /// Drops every cached snapshot.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    /// Number of cached regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    /// Returns `true` if no region is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful captures since creation.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::Relaxed)
    }

    /// The highest solid cell in the column at `x`/`z`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the region could not be captured.
    pub fn highest_solid(
        &self,
        environment: EnvironmentId,
        x: i32,
        z: i32,
    ) -> Result<Option<VoxelCell>, TerrainError> {
        let key = RegionKey::containing(&Coordinate::new(environment, x, 0, z));
        self.region(key)?.highest_solid(x, z)
    }

    /// Opens a per-search view that pins every region it reads.
    #[must_use]
    pub fn view(&self) -> SnapshotView<'_> {
        SnapshotView::new(self)
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("regions", &self.len())
            .field("captures", &self.capture_count())
            .finish_non_exhaustive()
    }
}
