//! Cell traversal along the segment between two cell centers.
//!
//! [`SegmentTraversal`] walks the cells pierced by the straight line from the
//! center of one cell to the center of another, using the same incremental
//! boundary stepping as a grid ray march. When the line passes exactly
//! through an edge or corner, every tied axis advances at once, so a
//! diagonal step goes straight to the diagonal cell instead of brushing one
//! of its side neighbors.

use crate::voxel::VoxelCoord;

/// Tolerance for treating boundary crossings on different axes as simultaneous.
const TIE_EPSILON: f64 = 1e-9;

/// Iterator over the cells between two cell centers.
///
/// Yields every cell after `from`, ending with `to`. Yields nothing when
/// `from == to`.
///
/// # Example
///
/// ```
/// use cf_spatial::{SegmentTraversal, VoxelCoord};
///
/// let cells: Vec<_> = SegmentTraversal::new(VoxelCoord::new(0, 0, 0), VoxelCoord::new(3, 0, 0)).collect();
/// assert_eq!(
///     cells,
///     vec![VoxelCoord::new(1, 0, 0), VoxelCoord::new(2, 0, 0), VoxelCoord::new(3, 0, 0)]
/// );
///
/// // A pure diagonal passes through corners only
/// let diagonal: Vec<_> = SegmentTraversal::new(VoxelCoord::new(0, 0, 0), VoxelCoord::new(1, 1, 0)).collect();
/// assert_eq!(diagonal, vec![VoxelCoord::new(1, 1, 0)]);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentTraversal {
    /// Current cell.
    current: VoxelCoord,
    /// Final cell.
    target: VoxelCoord,
    /// Step direction for each axis (-1, 0 or 1).
    step: [i32; 3],
    /// Parametric distance to the next boundary in each axis.
    t_max: [f64; 3],
    /// Parametric distance between boundaries in each axis.
    t_delta: [f64; 3],
}

impl SegmentTraversal {
    /// Creates a traversal from the center of `from` to the center of `to`.
    #[must_use]
    pub fn new(from: VoxelCoord, to: VoxelCoord) -> Self {
        let delta = [
            i64::from(to.x) - i64::from(from.x),
            i64::from(to.y) - i64::from(from.y),
            i64::from(to.z) - i64::from(from.z),
        ];

        let mut step = [0i32; 3];
        let mut t_max = [f64::INFINITY; 3];
        let mut t_delta = [f64::INFINITY; 3];

        for axis in 0..3 {
            if delta[axis] != 0 {
                #[allow(clippy::cast_precision_loss)]
                let span = delta[axis].unsigned_abs() as f64;
                step[axis] = if delta[axis] > 0 { 1 } else { -1 };
                t_delta[axis] = 1.0 / span;
                // Centers sit half a cell from the first boundary
                t_max[axis] = 0.5 / span;
            }
        }

        Self {
            current: from,
            target: to,
            step,
            t_max,
            t_delta,
        }
    }
}

impl Iterator for SegmentTraversal {
    type Item = VoxelCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.target {
            return None;
        }

        let t = self.t_max[0].min(self.t_max[1]).min(self.t_max[2]);
        if !t.is_finite() || t > 1.0 {
            return None;
        }

        for axis in 0..3 {
            if (self.t_max[axis] - t).abs() <= TIE_EPSILON {
                match axis {
                    0 => self.current.x = self.current.x.wrapping_add(self.step[0]),
                    1 => self.current.y = self.current.y.wrapping_add(self.step[1]),
                    _ => self.current.z = self.current.z.wrapping_add(self.step[2]),
                }
                self.t_max[axis] += self.t_delta[axis];
            }
        }

        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(from: VoxelCoord, to: VoxelCoord) -> Vec<VoxelCoord> {
        SegmentTraversal::new(from, to).collect()
    }

    #[test]
    fn test_same_cell_yields_nothing() {
        let c = VoxelCoord::new(4, 4, 4);
        assert!(cells(c, c).is_empty());
    }

    #[test]
    fn test_unit_step() {
        let from = VoxelCoord::new(0, 0, 0);
        assert_eq!(cells(from, VoxelCoord::new(0, -1, 0)), vec![VoxelCoord::new(0, -1, 0)]);
    }

    #[test]
    fn test_space_diagonal_single_step() {
        let from = VoxelCoord::new(0, 0, 0);
        let to = VoxelCoord::new(-1, 1, -1);
        assert_eq!(cells(from, to), vec![to]);
    }

    #[test]
    fn test_ends_at_target() {
        let from = VoxelCoord::new(-3, 2, 5);
        let to = VoxelCoord::new(4, -1, 9);
        let visited = cells(from, to);
        assert_eq!(visited.last(), Some(&to));
        assert!(!visited.contains(&from));
    }

    #[test]
    fn test_consecutive_cells_are_adjacent() {
        let from = VoxelCoord::new(0, 0, 0);
        let to = VoxelCoord::new(5, 2, -3);
        let mut prev = from;
        for cell in cells(from, to) {
            assert_eq!(prev.chebyshev_distance(cell), 1);
            prev = cell;
        }
    }

    #[test]
    fn test_shallow_line() {
        // (0,0) -> (2,1): crosses x at t=0.25, y at t=0.5, x again at t=0.75
        let visited = cells(VoxelCoord::new(0, 0, 0), VoxelCoord::new(2, 1, 0));
        assert_eq!(
            visited,
            vec![
                VoxelCoord::new(1, 0, 0),
                VoxelCoord::new(1, 1, 0),
                VoxelCoord::new(2, 1, 0),
            ]
        );
    }
}
