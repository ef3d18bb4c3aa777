//! Property-based tests for the search engine.
//!
//! Run with: cargo test -p route-pathfind -- proptest

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use cf_spatial::{EnvironmentId, Position, VoxelCoord};
use proptest::prelude::*;
use route_pathfind::{RuleSet, find_path};
use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
use route_types::PathState;

const WORLD: EnvironmentId = EnvironmentId::new(0);

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = Position> {
    prop::array::uniform3(-6.0..6.0f64).prop_map(|[x, y, z]| Position::new(WORLD, x, y, z))
}

fn arb_obstacles() -> impl Strategy<Value = Vec<VoxelCoord>> {
    prop::collection::vec(
        prop::array::uniform3(-6i32..6).prop_map(VoxelCoord::from),
        0..40,
    )
}

fn cache_with(obstacles: &[VoxelCoord]) -> SnapshotCache {
    let mut terrain = MemoryTerrain::new(-16, 16);
    for voxel in obstacles {
        terrain.set(cf_spatial::Coordinate::at(WORLD, *voxel), CellProperties::SOLID);
    }
    SnapshotCache::new(Arc::new(terrain))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// In open air every pair of cells is connected, so the search finds a
    /// path whose ends are the floored endpoints.
    #[test]
    fn open_air_is_always_found(start in arb_position(), end in arb_position(), diagonal: bool) {
        let cache = cache_with(&[]);
        let rules = RuleSet::sync_defaults().with_diagonal(diagonal);
        let result = find_path(&start, &end, &rules, &cache);

        prop_assert_eq!(result.state(), PathState::Found);
        prop_assert_eq!(result.path().start().unwrap().floor(), start.floor());
        prop_assert_eq!(result.path().end().unwrap().floor(), end.floor());
        prop_assert!(result.path().length() >= 0.0);
    }

    /// With 26-connectivity in open air the path is as long as the octile
    /// distance between the cells.
    #[test]
    fn open_air_path_is_shortest(start in arb_position(), end in arb_position()) {
        let cache = cache_with(&[]);
        let result = find_path(&start, &end, &RuleSet::sync_defaults(), &cache);
        let expected = start.floor().voxel.octile_distance(end.floor().voxel);
        prop_assert!((result.path().length() - expected).abs() < 1e-6);
    }

    /// A zero budget never finds a path between distinct cells.
    #[test]
    fn zero_budget_never_found(
        start in arb_position(),
        end in arb_position(),
        fallback: bool,
    ) {
        prop_assume!(start.floor() != end.floor());
        let cache = cache_with(&[]);
        let rules = RuleSet::sync_defaults().with_max_iterations(0).with_fallback(fallback);
        let result = find_path(&start, &end, &rules, &cache);

        prop_assert_ne!(result.state(), PathState::Found);
        prop_assert_eq!(result.stats().iterations(), 0);
    }

    /// Found paths never pass through solid cells and move between
    /// neighboring cells only.
    #[test]
    fn found_paths_avoid_obstacles(
        start in arb_position(),
        end in arb_position(),
        obstacles in arb_obstacles(),
    ) {
        let blocked = |p: &Position| obstacles.contains(&p.floor().voxel);
        prop_assume!(!blocked(&start) && !blocked(&end));

        let cache = cache_with(&obstacles);
        let rules = RuleSet::sync_defaults().with_diagonal(false);
        let result = find_path(&start, &end, &rules, &cache);

        if result.successful() {
            for waypoint in result.path() {
                prop_assert!(!blocked(waypoint));
            }
            for (a, b) in result.path().segments() {
                prop_assert_eq!(a.floor().voxel.manhattan_distance(b.floor().voxel), 1);
            }
        }
    }

    /// The iteration budget is respected exactly.
    #[test]
    fn budget_is_respected(start in arb_position(), end in arb_position(), budget in 0usize..20) {
        let cache = cache_with(&[]);
        let rules = RuleSet::sync_defaults().with_max_iterations(budget);
        let result = find_path(&start, &end, &rules, &cache);
        prop_assert!(result.stats().iterations() <= budget);
    }
}
