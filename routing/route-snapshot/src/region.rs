//! Terrain regions: the unit of capture and caching.
//!
//! A region is a column of [`REGION_SIZE`] x [`REGION_SIZE`] cells over the
//! `x`/`z` plane spanning the environment's vertical range. Providers fill a
//! [`RegionGrid`]; the cache freezes it into a [`RegionSnapshot`].

use cf_spatial::{Coordinate, EnvironmentId};

use crate::cell::{CellProperties, VoxelCell};
use crate::error::TerrainError;

/// Horizontal edge length of a region, in cells.
pub const REGION_SIZE: i32 = 16;

/// `log2(REGION_SIZE)`.
const REGION_SHIFT: u32 = 4;

#[allow(clippy::cast_sign_loss)]
const REGION_SIDE: usize = REGION_SIZE as usize;

const REGION_AREA: usize = REGION_SIDE * REGION_SIDE;

/// Tallest vertical range a region may span, in cells.
pub const MAX_REGION_HEIGHT: u32 = 4096;

/// Identifies one region of one environment.
///
/// # Example
///
/// ```
/// use route_snapshot::RegionKey;
/// use cf_spatial::{Coordinate, EnvironmentId};
///
/// let world = EnvironmentId::new(0);
/// assert_eq!(
///     RegionKey::containing(&Coordinate::new(world, 17, 64, -1)),
///     RegionKey::new(world, 1, -1)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionKey {
    /// Environment the region belongs to.
    pub environment: EnvironmentId,
    /// Region index along x (`x >> 4`).
    pub region_x: i32,
    /// Region index along z (`z >> 4`).
    pub region_z: i32,
}

impl RegionKey {
    /// Creates a region key.
    #[must_use]
    pub const fn new(environment: EnvironmentId, region_x: i32, region_z: i32) -> Self {
        Self {
            environment,
            region_x,
            region_z,
        }
    }

    /// The region containing `coordinate`.
    #[must_use]
    pub const fn containing(coordinate: &Coordinate) -> Self {
        Self::new(
            coordinate.environment,
            coordinate.voxel.x >> REGION_SHIFT,
            coordinate.voxel.z >> REGION_SHIFT,
        )
    }

    /// World `x`/`z` of the region's minimum corner.
    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        (
            self.region_x.wrapping_mul(REGION_SIZE),
            self.region_z.wrapping_mul(REGION_SIZE),
        )
    }

    /// Whether `coordinate` lies in this region.
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        Self::containing(coordinate) == *self
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]@{}", self.region_x, self.region_z, self.environment)
    }
}

/// Cell data for one region as produced by a terrain provider.
///
/// Cells are addressed by local offset `(lx, y, lz)` with
/// `0 <= lx, lz < REGION_SIZE` and `min_y <= y < max_y`.
///
/// # Example
///
/// ```
/// use route_snapshot::{CellProperties, RegionGrid};
///
/// let mut grid = RegionGrid::filled(0, 8, CellProperties::AIR).unwrap();
/// grid.set(3, 0, 4, CellProperties::SOLID).unwrap();
///
/// assert_eq!(grid.get(3, 0, 4), Some(CellProperties::SOLID));
/// assert_eq!(grid.get(3, 8, 4), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGrid {
    /// Lowest `y` (inclusive).
    min_y: i32,
    /// Highest `y` (exclusive).
    max_y: i32,
    /// Cells in `y`-major, then `z`, then `x` order.
    cells: Vec<CellProperties>,
}

impl RegionGrid {
    /// Creates a grid where every cell has the same properties.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRegion`] if `max_y <= min_y` or the
    /// range is taller than [`MAX_REGION_HEIGHT`].
    pub fn filled(min_y: i32, max_y: i32, fill: CellProperties) -> Result<Self, TerrainError> {
        if max_y <= min_y {
            return Err(TerrainError::invalid_region(format!(
                "empty vertical range {min_y}..{max_y}"
            )));
        }
        let too_tall = || {
            TerrainError::invalid_region(format!(
                "vertical range {min_y}..{max_y} exceeds {MAX_REGION_HEIGHT} cells"
            ))
        };
        let height = max_y.abs_diff(min_y);
        if height > MAX_REGION_HEIGHT {
            return Err(too_tall());
        }
        let len = usize::try_from(height)
            .ok()
            .and_then(|height| height.checked_mul(REGION_AREA))
            .ok_or_else(too_tall)?;
        Ok(Self {
            min_y,
            max_y,
            cells: vec![fill; len],
        })
    }

    /// Lowest `y` (inclusive).
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Highest `y` (exclusive).
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Index of a local cell, or `None` if outside the grid.
    fn index(&self, lx: i32, y: i32, lz: i32) -> Option<usize> {
        if !(0..REGION_SIZE).contains(&lx)
            || !(0..REGION_SIZE).contains(&lz)
            || !(self.min_y..self.max_y).contains(&y)
        {
            return None;
        }
        let layer = usize::try_from(i64::from(y) - i64::from(self.min_y)).ok()?;
        let row = usize::try_from(lz).ok()?;
        let col = usize::try_from(lx).ok()?;
        Some(layer * REGION_AREA + row * REGION_SIDE + col)
    }

    /// Returns the cell at a local offset.
    #[must_use]
    pub fn get(&self, lx: i32, y: i32, lz: i32) -> Option<CellProperties> {
        self.index(lx, y, lz).map(|i| self.cells[i])
    }

    /// Sets the cell at a local offset.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRegion`] if the offset is outside the grid.
    pub fn set(
        &mut self,
        lx: i32,
        y: i32,
        lz: i32,
        properties: CellProperties,
    ) -> Result<(), TerrainError> {
        let index = self.index(lx, y, lz).ok_or_else(|| {
            TerrainError::invalid_region(format!("local cell ({lx}, {y}, {lz}) is outside the grid"))
        })?;
        self.cells[index] = properties;
        Ok(())
    }
}

/// An immutable captured region.
///
/// Shared between searches behind `Arc`; replacing a cache entry never
/// changes a snapshot someone already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSnapshot {
    key: RegionKey,
    grid: RegionGrid,
}

impl RegionSnapshot {
    /// Freezes a provider grid for `key`.
    #[must_use]
    pub const fn new(key: RegionKey, grid: RegionGrid) -> Self {
        Self { key, grid }
    }

    /// The region this snapshot covers.
    #[must_use]
    pub const fn key(&self) -> RegionKey {
        self.key
    }

    /// Lowest captured `y` (inclusive).
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.grid.min_y()
    }

    /// Highest captured `y` (exclusive).
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.grid.max_y()
    }

    /// Looks up a cell by world coordinate.
    ///
    /// # Errors
    ///
    /// - [`TerrainError::InvalidRegion`] if `coordinate` is in another region
    /// - [`TerrainError::OutOfBounds`] if `y` is outside the captured range
    pub fn cell(&self, coordinate: &Coordinate) -> Result<VoxelCell, TerrainError> {
        if !self.key.contains(coordinate) {
            return Err(TerrainError::invalid_region(format!(
                "{coordinate} is not in region {}",
                self.key
            )));
        }
        let (origin_x, origin_z) = self.key.origin();
        self.grid
            .get(
                coordinate.x().wrapping_sub(origin_x),
                coordinate.y(),
                coordinate.z().wrapping_sub(origin_z),
            )
            .map(|properties| VoxelCell::new(*coordinate, properties))
            .ok_or(TerrainError::OutOfBounds {
                coordinate: *coordinate,
                min_y: self.min_y(),
                max_y: self.max_y(),
            })
    }

    /// The highest solid cell in the column at world `x`/`z`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRegion`] if the column is in another region.
    pub fn highest_solid(&self, x: i32, z: i32) -> Result<Option<VoxelCell>, TerrainError> {
        let top = Coordinate::new(self.key.environment, x, self.max_y() - 1, z);
        if !self.key.contains(&top) {
            return Err(TerrainError::invalid_region(format!(
                "column ({x}, {z}) is not in region {}",
                self.key
            )));
        }
        let (origin_x, origin_z) = self.key.origin();
        let (lx, lz) = (x.wrapping_sub(origin_x), z.wrapping_sub(origin_z));

        Ok((self.min_y()..self.max_y()).rev().find_map(|y| {
            self.grid
                .get(lx, y, lz)
                .filter(|properties| properties.is_solid())
                .map(|properties| {
                    VoxelCell::new(Coordinate::new(self.key.environment, x, y, z), properties)
                })
        }))
    }
}
