//! Neighbor generation for voxel route search.
//!
//! Candidates are the base neighborhood (6 face or 26 Moore offsets) plus
//! any extra offsets the rule set's strategies contribute. A candidate
//! survives if its cell can be read and every strategy accepts the move.
//!
//! A one-cell diagonal move in the horizontal plane also needs a shared
//! side: one of the two cells beside both endpoints must itself be an
//! accepted move from the origin, and passable at the target's height. Two
//! solid cells touching at an edge therefore seal the gap between them.
//!
//! Extra offsets can cover more heuristic distance than they cost, so the
//! generator also reports the factor that keeps the heuristic admissible
//! over its full offset set (see [`Heuristic::admissible_scale`](crate::heuristics::Heuristic::admissible_scale)).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_pathfind::neighbors::NeighborGenerator;
//! use route_pathfind::rules::RuleSet;
//! use route_snapshot::{MemoryTerrain, SnapshotCache};
//! use cf_spatial::{Coordinate, EnvironmentId};
//!
//! let cache = SnapshotCache::new(Arc::new(MemoryTerrain::new(-8, 8)));
//! let view = cache.view();
//! let rules = RuleSet::sync_defaults();
//! let generator = NeighborGenerator::new(&rules, &view);
//!
//! let here = Coordinate::new(EnvironmentId::new(0), 0, 0, 0);
//! assert_eq!(generator.successors(here).count(), 26);
//! ```

use cf_spatial::{Coordinate, VoxelCoord};
use route_snapshot::SnapshotView;

use crate::heuristics::move_cost;
use crate::rules::RuleSet;
use crate::strategy::Step;

/// Generator for valid neighboring cells during a search.
pub struct NeighborGenerator<'r, 'v> {
    /// Connectivity and strategy chain.
    rules: &'r RuleSet,
    /// The search's terrain.
    terrain: &'r SnapshotView<'v>,
    /// Candidate offsets with their move costs, sorted and deduplicated.
    offsets: Vec<(VoxelCoord, f64)>,
    /// Heuristic factor that never overestimates any candidate move.
    heuristic_scale: f64,
}

impl<'r, 'v> NeighborGenerator<'r, 'v> {
    /// Creates a generator for `rules` over `terrain`.
    #[must_use]
    pub fn new(rules: &'r RuleSet, terrain: &'r SnapshotView<'v>) -> Self {
        let mut offsets: Vec<VoxelCoord> =
            VoxelCoord::neighbor_offsets(rules.allow_diagonal()).to_vec();
        for strategy in rules.strategies() {
            offsets.extend(strategy.extra_offsets(rules.allow_diagonal()));
        }
        offsets.retain(|offset| *offset != VoxelCoord::origin());
        offsets.sort_unstable();
        offsets.dedup();

        let heuristic_scale = rules.heuristic().admissible_scale(offsets.iter().copied());

        Self {
            rules,
            terrain,
            heuristic_scale,
            offsets: offsets
                .into_iter()
                .map(|offset| (offset, move_cost(offset)))
                .collect(),
        }
    }

    /// Number of candidate offsets tried per expansion.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.offsets.len()
    }

    /// Factor applied to [`RuleSet::heuristic`] estimates; `1.0` for the
    /// base neighborhoods, smaller once jump offsets are in play.
    #[must_use]
    pub const fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    /// Scaled estimate of the remaining cost from `from` to `goal`.
    #[must_use]
    pub fn estimate(&self, from: Coordinate, goal: Coordinate) -> f64 {
        self.heuristic_scale * self.rules.heuristic().estimate(from.voxel, goal.voxel)
    }

    /// Returns the accepted neighbors of `from` with their move costs.
    pub fn successors(&self, from: Coordinate) -> impl Iterator<Item = (Coordinate, f64)> + '_ {
        self.offsets.iter().filter_map(move |&(offset, cost)| {
            let to = Coordinate::at(from.environment, from.voxel.checked_add(offset)?);
            // Unknown terrain is never expanded
            self.terrain.cell(&to)?;
            let accepted = self.rules.accepts(&Step::new(from, to), self.terrain)
                && self.corner_clear(from, offset);
            accepted.then_some((to, cost))
        })
    }

    /// `true` unless `offset` is a one-cell horizontal diagonal with no
    /// usable side cell.
    fn corner_clear(&self, from: Coordinate, offset: VoxelCoord) -> bool {
        if offset.x.unsigned_abs() != 1 || offset.z.unsigned_abs() != 1 {
            return true;
        }
        let shift = |cell: Coordinate, by: VoxelCoord| {
            cell.voxel
                .checked_add(by)
                .map(|voxel| Coordinate::at(cell.environment, voxel))
        };
        [VoxelCoord::new(offset.x, 0, 0), VoxelCoord::new(0, 0, offset.z)]
            .into_iter()
            .filter_map(|side| shift(from, side))
            .any(|side| {
                let level = offset.y == 0
                    || shift(side, VoxelCoord::new(0, offset.y, 0))
                        .is_some_and(|cell| self.terrain.is_passable(&cell));
                level
                    && self.terrain.cell(&side).is_some()
                    && self.rules.accepts(&Step::new(from, side), self.terrain)
            })
    }
}

impl std::fmt::Debug for NeighborGenerator<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeighborGenerator")
            .field("allow_diagonal", &self.rules.allow_diagonal())
            .field("candidates", &self.offsets.len())
            .field("heuristic_scale", &self.heuristic_scale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::strategy::{Jumpable, Walkable};
    use approx::assert_relative_eq;
    use cf_spatial::EnvironmentId;
    use route_snapshot::{CellProperties, MemoryTerrain, RegionKey, SnapshotCache};
    use std::sync::Arc;

    const WORLD: EnvironmentId = EnvironmentId::new(0);

    fn at(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(WORLD, x, y, z)
    }

    fn open_air() -> SnapshotCache {
        SnapshotCache::new(Arc::new(MemoryTerrain::new(-8, 8)))
    }

    #[test]
    fn test_face_neighbors() {
        let cache = open_air();
        let view = cache.view();
        let rules = RuleSet::sync_defaults().with_diagonal(false);
        let generator = NeighborGenerator::new(&rules, &view);

        assert_eq!(generator.candidate_count(), 6);
        let successors: Vec<_> = generator.successors(at(0, 0, 0)).collect();
        assert_eq!(successors.len(), 6);
        for (_, cost) in &successors {
            assert_relative_eq!(*cost, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_moore_costs() {
        let cache = open_air();
        let view = cache.view();
        let rules = RuleSet::sync_defaults();
        let generator = NeighborGenerator::new(&rules, &view);

        let successors: Vec<_> = generator.successors(at(0, 0, 0)).collect();
        let count = |target: f64| {
            successors
                .iter()
                .filter(|(_, c)| (*c - target).abs() < 1e-10)
                .count()
        };
        assert_eq!(count(1.0), 6);
        assert_eq!(count(std::f64::consts::SQRT_2), 12);
        assert_eq!(count(3.0_f64.sqrt()), 8);
    }

    #[test]
    fn test_solid_neighbor_rejected() {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.set(at(1, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let rules = RuleSet::sync_defaults().with_diagonal(false);
        let generator = NeighborGenerator::new(&rules, &view);

        let successors: Vec<_> = generator.successors(at(0, 0, 0)).map(|(c, _)| c).collect();
        assert_eq!(successors.len(), 5);
        assert!(!successors.contains(&at(1, 0, 0)));
    }

    #[test]
    fn test_unknown_terrain_skipped_even_without_strategies() {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.mark_unavailable(RegionKey::new(WORLD, -1, 0));
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let rules = RuleSet::sync_defaults()
            .with_diagonal(false)
            .with_strategies(vec![]);
        let generator = NeighborGenerator::new(&rules, &view);

        // -x lies in the unavailable region, +y is above the vertical range
        let successors: Vec<_> = generator.successors(at(0, 7, 0)).map(|(c, _)| c).collect();
        assert_eq!(successors.len(), 4);
        assert!(!successors.contains(&at(-1, 7, 0)));
        assert!(!successors.contains(&at(0, 8, 0)));
    }

    #[test]
    fn test_jump_offsets_merged_and_deduplicated() {
        let cache = open_air();
        let view = cache.view();
        let rules = RuleSet::sync_defaults()
            .with_diagonal(false)
            .with_strategy(Jumpable::new());
        let generator = NeighborGenerator::new(&rules, &view);
        // 6 faces + 12 jump offsets, of which the 4 level moves repeat faces
        assert_eq!(generator.candidate_count(), 14);
    }

    #[test]
    fn test_jump_reaches_ledge_without_diagonals() {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(3, -1, 0), CellProperties::SOLID);
        terrain.set(at(2, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();

        let walk_only = RuleSet::sync_defaults()
            .with_diagonal(false)
            .with_strategies(vec![Arc::new(Walkable::new())]);
        let generator = NeighborGenerator::new(&walk_only, &view);
        assert!(generator.successors(at(1, 0, 0)).all(|(c, _)| c != at(2, 1, 0)));

        let jumping = walk_only.with_strategy(Jumpable::new());
        let generator = NeighborGenerator::new(&jumping, &view);
        let ledge = generator.successors(at(1, 0, 0)).find(|(c, _)| *c == at(2, 1, 0));
        assert_relative_eq!(ledge.unwrap().1, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    // ==================== Corner Tests ====================

    /// Floor at y = -1 over x, z in 0..=3 with solid cells at (1, 0, 0) and
    /// (0, 0, 1), which touch along an edge.
    fn pinched_corner() -> SnapshotCache {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(3, -1, 3), CellProperties::SOLID);
        terrain.set(at(1, 0, 0), CellProperties::SOLID);
        terrain.set(at(0, 0, 1), CellProperties::SOLID);
        SnapshotCache::new(Arc::new(terrain))
    }

    #[test]
    fn test_diagonal_between_touching_solids_rejected() {
        let cache = pinched_corner();
        let view = cache.view();
        let rules = RuleSet::sync_defaults().with_strategies(vec![Arc::new(Walkable::new())]);
        let generator = NeighborGenerator::new(&rules, &view);

        let successors: Vec<_> = generator.successors(at(0, 0, 0)).map(|(c, _)| c).collect();
        assert!(!successors.contains(&at(1, 0, 1)));
        // The reverse move is sealed the same way
        assert!(generator.successors(at(1, 0, 1)).all(|(c, _)| c != at(0, 0, 0)));
    }

    #[test]
    fn test_diagonal_with_one_open_side_accepted() {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(3, -1, 3), CellProperties::SOLID);
        terrain.set(at(1, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let rules = RuleSet::sync_defaults().with_strategies(vec![Arc::new(Walkable::new())]);
        let generator = NeighborGenerator::new(&rules, &view);

        assert!(generator.successors(at(0, 0, 0)).any(|(c, _)| c == at(1, 0, 1)));
    }

    #[test]
    fn test_diagonal_climb_needs_clear_side_at_target_height() {
        // Ledge at (1, 0, 1); side cells stand on the floor but the one at
        // (1, 1, 0) is capped, the one at (0, 1, 1) is open
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(3, -1, 3), CellProperties::SOLID);
        terrain.set(at(1, 0, 1), CellProperties::SOLID);
        terrain.set(at(1, 1, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let rules = RuleSet::sync_defaults().with_strategies(vec![Arc::new(Walkable::new())]);
        let generator = NeighborGenerator::new(&rules, &view);
        assert!(generator.successors(at(0, 0, 0)).any(|(c, _)| c == at(1, 1, 1)));

        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(0, -1, 0), VoxelCoord::new(3, -1, 3), CellProperties::SOLID);
        terrain.set(at(1, 0, 1), CellProperties::SOLID);
        terrain.set(at(1, 1, 0), CellProperties::SOLID);
        terrain.set(at(0, 1, 1), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let generator = NeighborGenerator::new(&rules, &view);
        assert!(generator.successors(at(0, 0, 0)).all(|(c, _)| c != at(1, 1, 1)));
    }

    #[test]
    fn test_open_air_diagonals_unaffected() {
        let cache = open_air();
        let view = cache.view();
        let rules = RuleSet::sync_defaults();
        let generator = NeighborGenerator::new(&rules, &view);
        assert_eq!(generator.successors(at(0, 0, 0)).count(), 26);
    }

    // ==================== Heuristic Scale Tests ====================

    #[test]
    fn test_base_neighborhoods_keep_full_heuristic() {
        let cache = open_air();
        let view = cache.view();
        for diagonal in [false, true] {
            let rules = RuleSet::sync_defaults().with_diagonal(diagonal);
            let generator = NeighborGenerator::new(&rules, &view);
            assert_relative_eq!(generator.heuristic_scale(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_jump_offsets_scale_heuristic_down() {
        let mut terrain = MemoryTerrain::new(-8, 8);
        terrain.fill(WORLD, VoxelCoord::new(-3, -1, -3), VoxelCoord::new(3, -1, 3), CellProperties::SOLID);
        terrain.set(at(1, 0, 0), CellProperties::SOLID);
        let cache = SnapshotCache::new(Arc::new(terrain));
        let view = cache.view();
        let rules = RuleSet::sync_defaults()
            .with_diagonal(false)
            .with_strategies(vec![Arc::new(Walkable::new()), Arc::new(Jumpable::new())]);
        let generator = NeighborGenerator::new(&rules, &view);
        assert_relative_eq!(
            generator.heuristic_scale(),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );

        // No candidate move is cheaper than the estimate it removes
        let origin = at(0, 0, 0);
        let successors: Vec<_> = generator.successors(origin).collect();
        assert!(successors.iter().any(|(c, _)| *c == at(1, 1, 0)));
        for (to, cost) in successors {
            assert!(generator.estimate(origin, to) <= cost + 1e-12);
        }
    }
}
