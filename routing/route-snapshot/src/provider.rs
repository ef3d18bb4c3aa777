//! Terrain sources.
//!
//! The cache reads terrain exclusively through [`TerrainProvider`]. Hosts
//! implement it over their live world (typically by scheduling the read on
//! the thread that owns world state and blocking until it completes).
//! [`MemoryTerrain`] is an in-process implementation for tools and tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use cf_spatial::{Coordinate, EnvironmentId, VoxelCoord};

use crate::cell::CellProperties;
use crate::error::TerrainError;
use crate::region::{RegionGrid, RegionKey};

/// Supplies cell data for one region at a time.
///
/// Implementations must be callable from any thread. A capture may run
/// more than once for the same region; each call should describe the
/// terrain as it is at that moment.
pub trait TerrainProvider: Send + Sync {
    /// Captures the region at (`region_x`, `region_z`) of `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Unavailable`] when the region cannot be read.
    fn capture_region(
        &self,
        environment: EnvironmentId,
        region_x: i32,
        region_z: i32,
    ) -> Result<RegionGrid, TerrainError>;
}

impl<F> TerrainProvider for F
where
    F: Fn(EnvironmentId, i32, i32) -> Result<RegionGrid, TerrainError> + Send + Sync,
{
    fn capture_region(
        &self,
        environment: EnvironmentId,
        region_x: i32,
        region_z: i32,
    ) -> Result<RegionGrid, TerrainError> {
        self(environment, region_x, region_z)
    }
}

/// Sparse in-memory terrain.
///
/// Every cell is `default_cell` (air unless configured) except those set
/// explicitly. Storage is grouped by region so a capture only touches the
/// cells it returns.
///
/// # Example
///
/// ```
/// use route_snapshot::{CellProperties, MemoryTerrain, TerrainProvider};
/// use cf_spatial::{EnvironmentId, VoxelCoord};
///
/// let world = EnvironmentId::new(0);
/// let mut terrain = MemoryTerrain::new(-8, 32);
/// terrain.fill(world, VoxelCoord::new(0, -1, 0), VoxelCoord::new(9, -1, 9), CellProperties::SOLID);
///
/// let grid = terrain.capture_region(world, 0, 0).unwrap();
/// assert_eq!(grid.get(4, -1, 4), Some(CellProperties::SOLID));
/// assert_eq!(grid.get(4, 0, 4), Some(CellProperties::AIR));
/// assert_eq!(terrain.capture_count(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryTerrain {
    /// Explicitly set cells, grouped by region.
    cells: HashMap<RegionKey, HashMap<VoxelCoord, CellProperties>>,
    /// Properties of every cell not set explicitly.
    default_cell: CellProperties,
    /// Vertical range `[min, max)` used for environments without an override.
    default_range: (i32, i32),
    /// Per-environment vertical ranges.
    ranges: HashMap<EnvironmentId, (i32, i32)>,
    /// Regions that report unavailable.
    unavailable: HashSet<RegionKey>,
    /// Number of captures served.
    captures: AtomicUsize,
}

impl MemoryTerrain {
    /// Creates empty terrain whose environments span `min_y..max_y`.
    #[must_use]
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            cells: HashMap::new(),
            default_cell: CellProperties::AIR,
            default_range: (min_y, max_y),
            ranges: HashMap::new(),
            unavailable: HashSet::new(),
            captures: AtomicUsize::new(0),
        }
    }

    /// Sets the properties of cells that were never set explicitly.
    #[must_use]
    pub const fn with_default_cell(mut self, properties: CellProperties) -> Self {
        self.default_cell = properties;
        self
    }

    /// Overrides the vertical range of one environment.
    #[must_use]
    pub fn with_height_range(mut self, environment: EnvironmentId, min_y: i32, max_y: i32) -> Self {
        self.ranges.insert(environment, (min_y, max_y));
        self
    }

    /// Sets one cell.
    pub fn set(&mut self, coordinate: Coordinate, properties: CellProperties) {
        self.cells
            .entry(RegionKey::containing(&coordinate))
            .or_default()
            .insert(coordinate.voxel, properties);
    }

    /// Sets every cell in the inclusive box spanned by `a` and `b`.
    pub fn fill(
        &mut self,
        environment: EnvironmentId,
        a: VoxelCoord,
        b: VoxelCoord,
        properties: CellProperties,
    ) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set(Coordinate::new(environment, x, y, z), properties);
                }
            }
        }
    }

    /// Makes captures of `key` fail with [`TerrainError::Unavailable`].
    pub fn mark_unavailable(&mut self, key: RegionKey) {
        self.unavailable.insert(key);
    }

    /// Returns the properties of one cell as currently configured.
    #[must_use]
    pub fn properties(&self, coordinate: &Coordinate) -> CellProperties {
        self.cells
            .get(&RegionKey::containing(coordinate))
            .and_then(|region| region.get(&coordinate.voxel))
            .copied()
            .unwrap_or(self.default_cell)
    }

    /// Number of captures served so far, including failed ones.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::Relaxed)
    }

    fn height_range(&self, environment: EnvironmentId) -> (i32, i32) {
        self.ranges
            .get(&environment)
            .copied()
            .unwrap_or(self.default_range)
    }
}

impl TerrainProvider for MemoryTerrain {
    fn capture_region(
        &self,
        environment: EnvironmentId,
        region_x: i32,
        region_z: i32,
    ) -> Result<RegionGrid, TerrainError> {
        self.captures.fetch_add(1, Ordering::Relaxed);

        let key = RegionKey::new(environment, region_x, region_z);
        if self.unavailable.contains(&key) {
            return Err(TerrainError::unavailable(key, "region marked unavailable"));
        }

        let (min_y, max_y) = self.height_range(environment);
        let mut grid = RegionGrid::filled(min_y, max_y, self.default_cell)?;

        if let Some(cells) = self.cells.get(&key) {
            let (origin_x, origin_z) = key.origin();
            for (voxel, properties) in cells {
                // Cells outside the vertical range are not part of the capture
                if (min_y..max_y).contains(&voxel.y) {
                    grid.set(
                        voxel.x.wrapping_sub(origin_x),
                        voxel.y,
                        voxel.z.wrapping_sub(origin_z),
                        *properties,
                    )?;
                }
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const WORLD: EnvironmentId = EnvironmentId::new(1);

    #[test]
    fn test_default_is_air() {
        let terrain = MemoryTerrain::new(0, 4);
        let grid = terrain.capture_region(WORLD, 7, -3).unwrap();
        assert_eq!(grid.get(0, 0, 0), Some(CellProperties::AIR));
        assert_eq!(grid.min_y(), 0);
        assert_eq!(grid.max_y(), 4);
    }

    #[test]
    fn test_set_lands_in_right_region() {
        let mut terrain = MemoryTerrain::new(0, 4);
        terrain.set(Coordinate::new(WORLD, -1, 2, 17), CellProperties::SOLID);

        let grid = terrain.capture_region(WORLD, -1, 1).unwrap();
        assert_eq!(grid.get(15, 2, 1), Some(CellProperties::SOLID));

        let other = terrain.capture_region(WORLD, 0, 1).unwrap();
        assert_eq!(other.get(15, 2, 1), Some(CellProperties::AIR));
    }

    #[test]
    fn test_fill_box_any_corner_order() {
        let mut terrain = MemoryTerrain::new(0, 4);
        terrain.fill(WORLD, VoxelCoord::new(2, 1, 2), VoxelCoord::new(0, 0, 0), CellProperties::SOLID);
        assert_eq!(terrain.properties(&Coordinate::new(WORLD, 1, 1, 1)), CellProperties::SOLID);
        assert_eq!(terrain.properties(&Coordinate::new(WORLD, 3, 1, 1)), CellProperties::AIR);
    }

    #[test]
    fn test_cells_outside_range_are_ignored() {
        let mut terrain = MemoryTerrain::new(0, 4);
        terrain.set(Coordinate::new(WORLD, 0, 10, 0), CellProperties::SOLID);
        assert!(terrain.capture_region(WORLD, 0, 0).is_ok());
    }

    #[test]
    fn test_per_environment_range_and_default_cell() {
        let other = EnvironmentId::new(2);
        let terrain = MemoryTerrain::new(0, 4)
            .with_height_range(other, -10, 10)
            .with_default_cell(CellProperties::LIQUID);
        let grid = terrain.capture_region(other, 0, 0).unwrap();
        assert_eq!(grid.min_y(), -10);
        assert_eq!(grid.get(0, -10, 0), Some(CellProperties::LIQUID));
    }

    #[test]
    fn test_unavailable_region() {
        let mut terrain = MemoryTerrain::new(0, 4);
        terrain.mark_unavailable(RegionKey::new(WORLD, 0, 0));
        let err = terrain.capture_region(WORLD, 0, 0).unwrap_err();
        assert!(err.is_unavailable());
        assert!(terrain.capture_region(WORLD, 1, 0).is_ok());
        assert_eq!(terrain.capture_count(), 2);
    }

    #[test]
    fn test_closure_provider() {
        let provider = |_: EnvironmentId, _: i32, _: i32| RegionGrid::filled(0, 1, CellProperties::SOLID);
        let grid = provider.capture_region(WORLD, 0, 0).unwrap();
        assert_eq!(grid.get(5, 0, 5), Some(CellProperties::SOLID));
    }
}
