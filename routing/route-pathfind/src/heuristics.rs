//! Distance estimates and move costs.
//!
//! The heuristic follows the neighborhood: Manhattan distance for face moves
//! only, octile distance when diagonal moves are allowed.
//!
//! # Example
//!
//! ```
//! use route_pathfind::heuristics::Heuristic;
//! use cf_spatial::VoxelCoord;
//!
//! let from = VoxelCoord::new(0, 0, 0);
//! let to = VoxelCoord::new(3, 4, 0);
//!
//! assert!((Heuristic::Manhattan.estimate(from, to) - 7.0).abs() < 1e-10);
//! assert!(Heuristic::Octile.estimate(from, to) < 7.0);
//! ```

use cf_spatial::VoxelCoord;

/// Goal-distance estimate used to order the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Sum of absolute differences: |dx| + |dy| + |dz|.
    ///
    /// Matches 6-connectivity (face neighbors only).
    Manhattan,

    /// Octile distance over face, edge and corner moves.
    ///
    /// Matches 26-connectivity.
    Octile,
}

impl Heuristic {
    /// The heuristic matching a neighborhood.
    #[must_use]
    pub const fn for_connectivity(allow_diagonal: bool) -> Self {
        if allow_diagonal {
            Self::Octile
        } else {
            Self::Manhattan
        }
    }

    /// Estimates the remaining cost from `from` to `to`.
    #[must_use]
    pub fn estimate(self, from: VoxelCoord, to: VoxelCoord) -> f64 {
        match self {
            Self::Manhattan => f64::from(from.manhattan_distance(to)),
            Self::Octile => from.octile_distance(to),
        }
    }

    /// Largest factor `s <= 1` such that `s * estimate` never exceeds the
    /// cost of moving by any of `offsets`.
    ///
    /// Both heuristics satisfy the triangle inequality, so bounding every
    /// single move keeps the scaled estimate consistent.
    ///
    /// # Example
    ///
    /// ```
    /// use route_pathfind::heuristics::Heuristic;
    /// use cf_spatial::VoxelCoord;
    ///
    /// let faces = [VoxelCoord::new(1, 0, 0), VoxelCoord::new(0, -1, 0)];
    /// assert!((Heuristic::Manhattan.admissible_scale(faces) - 1.0).abs() < 1e-12);
    ///
    /// // A climbing step costs sqrt(2) but covers 2 Manhattan units
    /// let climb = [VoxelCoord::new(1, 1, 0)];
    /// let scale = Heuristic::Manhattan.admissible_scale(climb);
    /// assert!((scale - 2.0_f64.sqrt() / 2.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn admissible_scale(self, offsets: impl IntoIterator<Item = VoxelCoord>) -> f64 {
        offsets
            .into_iter()
            .filter_map(|offset| {
                let covered = self.estimate(VoxelCoord::origin(), offset);
                (covered > 0.0).then(|| move_cost(offset) / covered)
            })
            .fold(1.0, f64::min)
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manhattan => write!(f, "manhattan"),
            Self::Octile => write!(f, "octile"),
        }
    }
}

/// Cost of moving by `offset`: the Euclidean length between cell centers.
///
/// `1` for a face move, `√2` for an edge move, `√3` for a corner move, and
/// the straight-line length for longer jumps.
///
/// # Example
///
/// ```
/// use route_pathfind::heuristics::move_cost;
/// use cf_spatial::VoxelCoord;
///
/// assert!((move_cost(VoxelCoord::new(1, 0, 0)) - 1.0).abs() < 1e-10);
/// assert!((move_cost(VoxelCoord::new(1, 1, 0)) - 2.0_f64.sqrt()).abs() < 1e-10);
/// ```
#[must_use]
pub fn move_cost(offset: VoxelCoord) -> f64 {
    offset.to_vector().norm()
}
