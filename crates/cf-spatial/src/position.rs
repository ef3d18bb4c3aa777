//! Real-valued positions and the metrics the router uses on them.
//!
//! A [`Position`] is a point in an environment. Waypoints of a route are
//! positions rather than cells so that transforms such as interpolation can
//! place them between cell corners.
//!
//! # Example
//!
//! ```
//! use cf_spatial::{EnvironmentId, Position};
//! use approx::assert_relative_eq;
//!
//! let world = EnvironmentId::new(0);
//! let a = Position::new(world, 0.0, 0.0, 0.0);
//! let b = Position::new(world, 3.0, 4.0, 0.0);
//!
//! assert_relative_eq!(a.distance(&b), 5.0);
//! assert_relative_eq!(a.distance_squared(&b), 25.0);
//! assert_relative_eq!(a.manhattan(&b), 7.0);
//! assert_relative_eq!(a.midpoint(&b).x(), 1.5);
//! ```

use nalgebra::{Point3, Vector3};

use crate::coordinate::{Coordinate, EnvironmentId};
use crate::voxel::VoxelCoord;

/// A point in a specific environment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// The environment this position belongs to.
    pub environment: EnvironmentId,
    /// Location in world units.
    pub point: Point3<f64>,
}

impl Position {
    /// Creates a position from components.
    #[must_use]
    pub const fn new(environment: EnvironmentId, x: f64, y: f64, z: f64) -> Self {
        Self {
            environment,
            point: Point3::new(x, y, z),
        }
    }

    /// Creates a position from a point.
    #[must_use]
    pub const fn from_point(environment: EnvironmentId, point: Point3<f64>) -> Self {
        Self { environment, point }
    }

    /// X component.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.point.x
    }

    /// Y component (vertical).
    #[must_use]
    pub fn y(&self) -> f64 {
        self.point.y
    }

    /// Z component.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.point.z
    }

    /// Euclidean distance to `other`.
    ///
    /// Environments are not compared; callers that mix environments should
    /// check [`Position::same_environment`] first.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.point, &other.point)
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        nalgebra::distance_squared(&self.point, &other.point)
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn manhattan(&self, other: &Self) -> f64 {
        (other.point - self.point).abs().sum()
    }

    /// 3D octile distance to `other`.
    ///
    /// Matches [`VoxelCoord::octile_distance`] for integral positions.
    #[must_use]
    pub fn octile(&self, other: &Self) -> f64 {
        let delta = (other.point - self.point).abs();
        let mut dims = [delta.x, delta.y, delta.z];
        dims.sort_by(f64::total_cmp);
        let [min, mid, max] = dims;
        3.0_f64
            .sqrt()
            .mul_add(min, std::f64::consts::SQRT_2.mul_add(mid - min, max - mid))
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    ///
    /// The environment of `self` is kept.
    #[must_use]
    pub fn interpolate(&self, other: &Self, t: f64) -> Self {
        let point = self.point + (other.point - self.point) * t;
        Self::from_point(self.environment, point)
    }

    /// The point halfway to `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::from_point(self.environment, nalgebra::center(&self.point, &other.point))
    }

    /// Returns this position moved by `offset`.
    #[must_use]
    pub fn offset(&self, offset: &Vector3<f64>) -> Self {
        Self::from_point(self.environment, self.point + offset)
    }

    /// Vector from `self` to `other`.
    #[must_use]
    pub fn vector_to(&self, other: &Self) -> Vector3<f64> {
        other.point - self.point
    }

    /// The cell containing this position.
    #[must_use]
    pub fn floor(&self) -> Coordinate {
        Coordinate::at(self.environment, VoxelCoord::containing(&self.point))
    }

    /// The center of the cell containing this position.
    #[must_use]
    pub fn centered(&self) -> Self {
        self.floor().center()
    }

    /// Whether both positions belong to the same environment.
    #[must_use]
    pub fn same_environment(&self, other: &Self) -> bool {
        self.environment == other.environment
    }

    /// Distance from this position to the segment `a`-`b`.
    ///
    /// Degenerates to the distance to `a` when the segment has zero length.
    #[must_use]
    pub fn distance_to_segment(&self, a: &Self, b: &Self) -> f64 {
        let ab = b.point - a.point;
        let len_sq = ab.norm_squared();
        if len_sq <= f64::EPSILON {
            return self.distance(a);
        }
        let t = ((self.point - a.point).dot(&ab) / len_sq).clamp(0.0, 1.0);
        nalgebra::distance(&self.point, &(a.point + ab * t))
    }
}

impl From<Coordinate> for Position {
    fn from(coord: Coordinate) -> Self {
        coord.to_position()
    }
}
