//! Movement strategies.
//!
//! A strategy decides whether one candidate move is allowed. A rule set
//! holds an ordered chain of strategies and a move is accepted only if every
//! strategy accepts it; evaluation stops at the first rejection.
//!
//! Strategies read terrain through the search's [`SnapshotView`]. A cell that
//! cannot be read (unavailable region, outside the vertical range) never
//! satisfies a check, so the move is rejected.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_pathfind::strategy::{MovementStrategy, Step, Walkable};
//! use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
//! use cf_spatial::{Coordinate, EnvironmentId, VoxelCoord};
//!
//! let world = EnvironmentId::new(0);
//! let mut terrain = MemoryTerrain::new(-4, 16);
//! terrain.fill(world, VoxelCoord::new(0, -1, 0), VoxelCoord::new(4, -1, 0), CellProperties::SOLID);
//! let cache = SnapshotCache::new(Arc::new(terrain));
//! let view = cache.view();
//!
//! let step = Step::new(Coordinate::new(world, 0, 0, 0), Coordinate::new(world, 1, 0, 0));
//! assert!(Walkable::new().is_valid(&step, &view));
//!
//! let off_edge = Step::new(Coordinate::new(world, 4, 0, 0), Coordinate::new(world, 5, 0, 0));
//! assert!(!Walkable::new().is_valid(&off_edge, &view));
//! ```

mod direct;
mod jumpable;
mod walkable;

pub use direct::Direct;
pub use jumpable::Jumpable;
pub use walkable::Walkable;

use cf_spatial::{Coordinate, VoxelCoord};
use route_snapshot::SnapshotView;

/// A candidate move from the node being expanded to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// The node being expanded.
    pub from: Coordinate,
    /// The candidate neighbor.
    pub to: Coordinate,
}

impl Step {
    /// Creates a step.
    #[must_use]
    pub const fn new(from: Coordinate, to: Coordinate) -> Self {
        Self { from, to }
    }

    /// Offset from `from` to `to`.
    #[must_use]
    pub fn offset(&self) -> VoxelCoord {
        self.to.voxel - self.from.voxel
    }

    /// Elevation change; positive when climbing.
    #[must_use]
    pub const fn rise(&self) -> i32 {
        self.to.voxel.y.wrapping_sub(self.from.voxel.y)
    }

    /// Horizontal Chebyshev span of the move.
    #[must_use]
    pub fn run(&self) -> u32 {
        self.from.voxel.horizontal_span(self.to.voxel)
    }
}

/// Decides whether a single move is allowed.
///
/// Implementations must be pure: for the same step and terrain the answer is
/// always the same.
pub trait MovementStrategy: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns `true` if moving along `step` is allowed.
    fn is_valid(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool;

    /// Candidate offsets this strategy adds beyond the base neighborhood.
    ///
    /// Extra candidates are still checked by every strategy in the chain.
    fn extra_offsets(&self, allow_diagonal: bool) -> Vec<VoxelCoord> {
        let _ = allow_diagonal;
        Vec::new()
    }
}

/// `true` if every cell of `coordinate`'s column in `(from_y, to_y]` is
/// passable.
pub(crate) fn column_passable(
    terrain: &SnapshotView<'_>,
    coordinate: Coordinate,
    from_y: i32,
    to_y: i32,
) -> bool {
    (from_y.saturating_add(1)..=to_y).all(|y| {
        terrain.is_passable(&Coordinate::new(
            coordinate.environment,
            coordinate.voxel.x,
            y,
            coordinate.voxel.z,
        ))
    })
}
