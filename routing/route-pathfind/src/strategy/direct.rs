//! Free movement through anything that is not solid.

use cf_spatial::{Coordinate, SegmentTraversal};
use route_snapshot::SnapshotView;

use super::{MovementStrategy, Step};

/// Accepts a move if the straight segment between the cell centers crosses
/// no solid cell.
///
/// Every cell the segment enters after leaving `from` is checked, `to`
/// included. There is no footing requirement, so on its own this describes
/// flying or swimming movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Direct;

impl Direct {
    /// Creates the strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MovementStrategy for Direct {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn is_valid(&self, step: &Step, terrain: &SnapshotView<'_>) -> bool {
        let environment = step.from.environment;
        SegmentTraversal::new(step.from.voxel, step.to.voxel).all(|voxel| {
            terrain
                .cell(&Coordinate::at(environment, voxel))
                .is_some_and(|cell| !cell.is_solid())
        })
    }
}
