//! Per-search terrain view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use cf_spatial::Coordinate;

use crate::cache::SnapshotCache;
use crate::cell::VoxelCell;
use crate::error::TerrainError;
use crate::region::{RegionKey, RegionSnapshot};

/// A single search's window onto a [`SnapshotCache`].
///
/// The first read of a region resolves it through the cache and pins the
/// result for the view's lifetime, so one search sees one consistent
/// snapshot per region even if the cache is invalidated or recaptured
/// meanwhile. Failed captures are pinned too and are not retried.
///
/// A view is owned by one search and is not `Sync`.
#[derive(Debug)]
pub struct SnapshotView<'a> {
    cache: &'a SnapshotCache,
    pinned: RefCell<HashMap<RegionKey, Result<Arc<RegionSnapshot>, TerrainError>>>,
}

impl<'a> SnapshotView<'a> {
    pub(crate) fn new(cache: &'a SnapshotCache) -> Self {
        Self {
            cache,
            pinned: RefCell::new(HashMap::new()),
        }
    }

    /// The cache this view reads through.
    #[must_use]
    pub const fn cache(&self) -> &'a SnapshotCache {
        self.cache
    }

    /// Returns the snapshot for `key`, pinning it on first access.
    ///
    /// # Errors
    ///
    /// Returns the (pinned) capture error for an unavailable region.
    pub fn region(&self, key: RegionKey) -> Result<Arc<RegionSnapshot>, TerrainError> {
        if let Some(pinned) = self.pinned.borrow().get(&key) {
            return pinned.clone();
        }
        let resolved = self.cache.region(key);
        self.pinned.borrow_mut().insert(key, resolved.clone());
        resolved
    }

    /// Returns the cell at `coordinate`.
    ///
    /// # Errors
    ///
    /// - [`TerrainError::Unavailable`] if the region could not be captured
    /// - [`TerrainError::OutOfBounds`] if `y` is outside the captured range
    pub fn get(&self, coordinate: &Coordinate) -> Result<VoxelCell, TerrainError> {
        self.region(RegionKey::containing(coordinate))?
            .cell(coordinate)
    }

    /// Returns the cell at `coordinate`, or `None` if it cannot be read.
    #[must_use]
    pub fn cell(&self, coordinate: &Coordinate) -> Option<VoxelCell> {
        self.get(coordinate).ok()
    }

    /// `true` if the cell is readable and passable.
    #[must_use]
    pub fn is_passable(&self, coordinate: &Coordinate) -> bool {
        self.cell(coordinate).is_some_and(|cell| cell.is_passable())
    }

    /// `true` if the cell is readable and solid.
    #[must_use]
    pub fn is_solid(&self, coordinate: &Coordinate) -> bool {
        self.cell(coordinate).is_some_and(|cell| cell.is_solid())
    }

    /// Number of regions this view has pinned, including failed ones.
    #[must_use]
    pub fn pinned_regions(&self) -> usize {
        self.pinned.borrow().len()
    }
}
