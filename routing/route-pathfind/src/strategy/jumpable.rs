//! Jumping and dropping.

use cf_spatial::{Coordinate, SegmentTraversal, VoxelCoord};
use route_snapshot::SnapshotView;

use super::{MovementStrategy, Step, Walkable, column_passable};

/// Ground movement extended with bounded jumps and drops.
///
/// A move is accepted if an entity can stand at the target (see
/// [`Walkable`]), it climbs at most `max_jump_height`, drops at most
/// `max_fall_height`, covers at most `max_run` cells horizontally, and the
/// arc is clear: the column above `from` up to the peak, the cells crossed
/// horizontally at the peak, and the column above `to` up to the peak are
/// all passable. The peak is the higher of the two endpoints.
///
/// Jumpable contributes its jump offsets as extra neighbor candidates, so a
/// search limited to face moves can still hop onto a ledge.
///
/// # Example
///
/// ```
/// use route_pathfind::strategy::{Jumpable, MovementStrategy};
///
/// let jump = Jumpable::new().with_max_run(2).with_max_jump_height(1);
/// // Straight runs only: 2 directions on 2 axes, 2 distances, 3 heights
/// assert_eq!(jump.extra_offsets(false).len(), 2 * 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Jumpable {
    walkable: Walkable,
    max_run: u32,
    max_jump_height: u32,
    max_fall_height: u32,
}

impl Jumpable {
    /// Creates the strategy: one cell of run, one cell up, one cell down.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            walkable: Walkable::new(),
            max_run: 1,
            max_jump_height: 1,
            max_fall_height: 1,
        }
    }

    /// Sets the maximum horizontal distance of one jump.
    #[must_use]
    pub const fn with_max_run(mut self, cells: u32) -> Self {
        self.max_run = cells;
        self
    }

    /// Sets the maximum elevation gain of one move.
    #[must_use]
    pub const fn with_max_jump_height(mut self, cells: u32) -> Self {
        self.max_jump_height = cells;
        self
    }

    /// Sets the maximum elevation loss of one move.
    #[must_use]
    pub const fn with_max_fall_height(mut self, cells: u32) -> Self {
        self.max_fall_height = cells;
        self
    }

    /// Sets the headroom required at the landing cell.
    #[must_use]
    pub const fn with_entity_height(mut self, cells: u32) -> Self {
        self.walkable = self.walkable.with_entity_height(cells);
        self
    }

    /// Maximum horizontal distance of one jump.
    #[must_use]
    pub const fn max_run(&self) -> u32 {
        self.max_run
    }

    /// Maximum elevation gain of one move.
    #[must_use]
    pub const fn max_jump_height(&self) -> u32 {
        self.max_jump_height
    }

    /// Maximum elevation loss of one move.
    #[must_use]
    pub const fn max_fall_height(&self) -> u32 {
        self.max_fall_height
    }

    fn within_reach(&self, step: &Step) -> bool {
        let rise = step.rise();
        let climb_ok = rise <= 0 || rise.unsigned_abs() <= self.max_jump_height;
        let drop_ok = rise >= 0 || rise.unsigned_abs() <= self.max_fall_height;
        climb_ok && drop_ok && step.run() <= self.max_run
    }

    fn arc_clear(step: &Step, terrain: &SnapshotView<'_>) -> bool {
        let (from, to) = (step.from, step.to);
        let peak = from.voxel.y.max(to.voxel.y);

        if !column_passable(terrain, from, from.voxel.y, peak)
            || !column_passable(terrain, to, to.voxel.y, peak)
        {
            return false;
        }

        let start = VoxelCoord::new(from.voxel.x, peak, from.voxel.z);
        let end = VoxelCoord::new(to.voxel.x, peak, to.voxel.z);
        SegmentTraversal::new(start, end)
            .all(|voxel| terrain.is_passable(&Coordinate::at(from.environment, voxel)))
    }
}

impl Default for Jumpable {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementStrategy for Jumpable {
    fn name(&self) -> &'static str {
        "jumpable"
    }

    fn is_valid(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool {
        self.within_reach(step)
            && self.walkable.can_stand(step, terrain)
            && Self::arc_clear(step, terrain)
    }

    fn extra_offsets(&self, allow_diagonal: bool) -> Vec<VoxelCoord> {
        let run = i32::try_from(self.max_run).unwrap_or(i32::MAX);
        let up = i32::try_from(self.max_jump_height).unwrap_or(i32::MAX);
        let down = i32::try_from(self.max_fall_height).unwrap_or(i32::MAX);

        let mut offsets = Vec::new();
        for dx in -run..=run {
            for dz in -run..=run {
                let horizontal = (dx, dz) != (0, 0);
                let straight = dx == 0 || dz == 0;
                if !horizontal || (!allow_diagonal && !straight) {
                    continue;
                }
                offsets.extend((-down..=up).map(|dy| VoxelCoord::new(dx, dy, dz)));
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_spatial::EnvironmentId;
    use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
    use std::sync::Arc;

    const WORLD: EnvironmentId = EnvironmentId::new(0);

    fn at(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(WORLD, x, y, z)
    }

    /// Floor at y = -1 over x 0..=9 with a one-high wall at x = 5.
    fn walled() -> SnapshotCache {
        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(9, -1, 0), CellProperties::SOLID);
        terrain.set(at(5, 0, 0), CellProperties::SOLID);
        SnapshotCache::new(Arc::new(terrain))
    }

    // ==================== Reach Tests ====================

    #[test]
    fn test_jump_onto_wall_and_down() {
        let cache = walled();
        let view = cache.view();
        let jump = Jumpable::new();
        assert!(jump.is_valid(&Step::new(at(4, 0, 0), at(5, 1, 0)), &view));
        assert!(jump.is_valid(&Step::new(at(5, 1, 0), at(6, 0, 0)), &view));
    }

    #[test]
    fn test_jump_height_limit() {
        let cache = walled();
        let view = cache.view();
        let grounded = Jumpable::new().with_max_jump_height(0);
        assert!(!grounded.is_valid(&Step::new(at(4, 0, 0), at(5, 1, 0)), &view));
        assert!(grounded.is_valid(&Step::new(at(3, 0, 0), at(4, 0, 0)), &view));
    }

    #[test]
    fn test_fall_height_limit() {
        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, 2, 0), VoxelCoord::new(0, 2, 0), CellProperties::SOLID);
        terrain.fill(WORLD, VoxelCoord::new(1, -1, 0), VoxelCoord::new(3, -1, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let step = Step::new(at(0, 3, 0), at(1, 0, 0));
        assert!(!Jumpable::new().is_valid(&step, &view));
        assert!(Jumpable::new().with_max_fall_height(3).is_valid(&step, &view));
    }

    #[test]
    fn test_run_limit() {
        let cache = walled();
        let view = cache.view();
        let step = Step::new(at(0, 0, 0), at(2, 0, 0));
        assert!(!Jumpable::new().is_valid(&step, &view));
        assert!(Jumpable::new().with_max_run(2).is_valid(&step, &view));
    }

    // ==================== Arc Tests ====================

    #[test]
    fn test_low_ceiling_blocks_jump() {
        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(9, -1, 0), CellProperties::SOLID);
        terrain.set(at(5, 0, 0), CellProperties::SOLID);
        terrain.set(at(4, 1, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        assert!(!Jumpable::new().is_valid(&Step::new(at(4, 0, 0), at(5, 1, 0)), &cache.view()));
    }

    #[test]
    fn test_long_jump_over_gap_needs_clear_peak() {
        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.set(at(0, -1, 0), CellProperties::SOLID);
        terrain.set(at(3, -1, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let jump = Jumpable::new().with_max_run(3);
        assert!(jump.is_valid(&Step::new(at(0, 0, 0), at(3, 0, 0)), &cache.view()));

        let mut terrain = MemoryTerrain::new(-4, 8);
        terrain.set(at(0, -1, 0), CellProperties::SOLID);
        terrain.set(at(3, -1, 0), CellProperties::SOLID);
        terrain.set(at(2, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        assert!(!jump.is_valid(&Step::new(at(0, 0, 0), at(3, 0, 0)), &cache.view()));
    }

    #[test]
    fn test_needs_footing() {
        let cache = walled();
        assert!(!Jumpable::new().is_valid(&Step::new(at(9, 0, 0), at(10, 0, 0)), &cache.view()));
    }

    // ==================== Offset Tests ====================

    #[test]
    fn test_extra_offsets_straight() {
        let offsets = Jumpable::new().extra_offsets(false);
        assert_eq!(offsets.len(), 4 * 3);
        assert!(offsets.contains(&VoxelCoord::new(1, 1, 0)));
        assert!(offsets.contains(&VoxelCoord::new(0, -1, -1)));
        assert!(!offsets.contains(&VoxelCoord::new(1, 0, 1)));
        assert!(offsets.iter().all(|o| o.x == 0 || o.z == 0));
    }

    #[test]
    fn test_extra_offsets_diagonal() {
        let offsets = Jumpable::new()
            .with_max_run(2)
            .with_max_jump_height(2)
            .with_max_fall_height(0)
            .extra_offsets(true);
        // 5x5 horizontal square minus the center, 3 heights
        assert_eq!(offsets.len(), 24 * 3);
        assert!(offsets.contains(&VoxelCoord::new(-2, 2, 1)));
        assert!(offsets.iter().all(|o| o.y >= 0));
    }
}
