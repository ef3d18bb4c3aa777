//! Environment-scoped cell coordinates.

use crate::voxel::VoxelCoord;
use crate::position::Position;

/// Identifier of a world or grid that coordinates live in.
///
/// Coordinates and positions carrying different identifiers never compare
/// equal, even when their components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentId(pub u64);

impl EnvironmentId {
    /// Creates an environment identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "env#{}", self.0)
    }
}

/// A cell coordinate within a specific environment.
///
/// # Example
///
/// ```
/// use cf_spatial::{Coordinate, EnvironmentId, VoxelCoord};
///
/// let world = EnvironmentId::new(1);
/// let a = Coordinate::new(world, 4, 64, -2);
/// assert_eq!(a.voxel, VoxelCoord::new(4, 64, -2));
///
/// let other_world = Coordinate::new(EnvironmentId::new(2), 4, 64, -2);
/// assert_ne!(a, other_world);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// The environment this cell belongs to.
    pub environment: EnvironmentId,
    /// The cell within the environment.
    pub voxel: VoxelCoord,
}

impl Coordinate {
    /// Creates a coordinate from components.
    #[must_use]
    pub const fn new(environment: EnvironmentId, x: i32, y: i32, z: i32) -> Self {
        Self {
            environment,
            voxel: VoxelCoord::new(x, y, z),
        }
    }

    /// Creates a coordinate from an existing voxel coordinate.
    #[must_use]
    pub const fn at(environment: EnvironmentId, voxel: VoxelCoord) -> Self {
        Self { environment, voxel }
    }

    /// X component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.voxel.x
    }

    /// Y component (vertical).
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.voxel.y
    }

    /// Z component.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.voxel.z
    }

    /// Returns this coordinate shifted by `offset` in the same environment.
    #[must_use]
    pub fn offset(&self, offset: VoxelCoord) -> Self {
        Self::at(self.environment, self.voxel + offset)
    }

    /// The cell directly beneath.
    #[must_use]
    pub const fn below(&self) -> Self {
        Self::at(self.environment, self.voxel.below())
    }

    /// The cell `n` steps above.
    #[must_use]
    pub const fn above(&self, n: i32) -> Self {
        Self::at(self.environment, self.voxel.above(n))
    }

    /// Whether both coordinates belong to the same environment.
    #[must_use]
    pub fn same_environment(&self, other: &Self) -> bool {
        self.environment == other.environment
    }

    /// The position of this cell's minimum corner.
    #[must_use]
    pub fn to_position(&self) -> Position {
        Position::from_point(self.environment, self.voxel.to_point())
    }

    /// The position of this cell's center.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::from_point(self.environment, self.voxel.center())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.voxel, self.environment)
    }
}
