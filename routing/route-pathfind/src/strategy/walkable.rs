//! Ground movement.

use route_snapshot::SnapshotView;

use super::{MovementStrategy, Step, column_passable};

/// Accepts a move onto a cell an entity can stand in.
///
/// The target must be passable, the cell beneath it solid, and
/// `entity_height` cells above it passable (headroom).
///
/// # Example
///
/// ```
/// use route_pathfind::strategy::Walkable;
///
/// let tall = Walkable::new().with_entity_height(2);
/// assert_eq!(tall.entity_height(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Walkable {
    entity_height: u32,
}

impl Walkable {
    /// Creates the strategy with one cell of headroom.
    #[must_use]
    pub const fn new() -> Self {
        Self { entity_height: 1 }
    }

    /// Sets how many cells above the target must be passable.
    #[must_use]
    pub const fn with_entity_height(mut self, cells: u32) -> Self {
        self.entity_height = cells;
        self
    }

    /// Cells of headroom required above the target.
    #[must_use]
    pub const fn entity_height(&self) -> u32 {
        self.entity_height
    }

    /// `true` if an entity can stand at `step.to`.
    pub(crate) fn can_stand(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool {
        let to = step.to;
        let headroom = i32::try_from(self.entity_height).unwrap_or(i32::MAX);
        terrain.is_passable(&to)
            && terrain.is_solid(&to.below())
            && column_passable(terrain, to, to.voxel.y, to.voxel.y.saturating_add(headroom))
    }
}

impl Default for Walkable {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementStrategy for Walkable {
    fn name(&self) -> &'static str {
        "walkable"
    }

    fn is_valid(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool {
        self.can_stand(step, terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_spatial::{Coordinate, EnvironmentId, VoxelCoord};
    use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
    use std::sync::Arc;

    const WORLD: EnvironmentId = EnvironmentId::new(0);

    fn at(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(WORLD, x, y, z)
    }

    fn floor() -> MemoryTerrain {
        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(9, -1, 9), CellProperties::SOLID);
        terrain
    }

    #[test]
    fn test_on_floor() {
        let cache = SnapshotCache::new(Arc::new(floor()));
        let view = cache.view();
        assert!(Walkable::new().is_valid(&Step::new(at(0, 0, 0), at(1, 0, 1)), &view));
    }

    #[test]
    fn test_no_footing() {
        let cache = SnapshotCache::new(Arc::new(floor()));
        let view = cache.view();
        // Stepping into the air above the floor
        assert!(!Walkable::new().is_valid(&Step::new(at(0, 0, 0), at(0, 1, 0)), &view));
        // Walking off the edge
        assert!(!Walkable::new().is_valid(&Step::new(at(9, 0, 0), at(10, 0, 0)), &view));
    }

    #[test]
    fn test_blocked_target() {
        let mut terrain = floor();
        terrain.set(at(1, 0, 0), CellProperties::BLOCKED);
        let cache = SnapshotCache::new(Arc::new(terrain));
        assert!(!Walkable::new().is_valid(&Step::new(at(0, 0, 0), at(1, 0, 0)), &cache.view()));
    }

    #[test]
    fn test_headroom() {
        let mut terrain = floor();
        terrain.set(at(1, 2, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let step = Step::new(at(0, 0, 0), at(1, 0, 0));
        assert!(Walkable::new().is_valid(&step, &view));
        assert!(!Walkable::new().with_entity_height(2).is_valid(&step, &view));
    }

    #[test]
    fn test_headroom_above_world_is_unknown() {
        let mut terrain = MemoryTerrain::new(0, 2);
        terrain.set(at(1, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let step = Step::new(at(0, 1, 0), at(1, 1, 0));
        assert!(!Walkable::new().is_valid(&step, &cache.view()));
        assert!(Walkable::new().with_entity_height(0).is_valid(&step, &cache.view()));
    }
}
