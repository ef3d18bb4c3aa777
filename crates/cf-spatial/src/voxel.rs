//! Integer cell coordinates and neighborhood offsets.

use nalgebra::{Point3, Vector3};

/// The six face-adjacent offsets (von Neumann neighborhood).
///
/// Ordered `+x, -x, +y, -y, +z, -z`. Neighbor expansion visits offsets in
/// this order, which keeps search output stable.
pub const FACE_OFFSETS: [VoxelCoord; 6] = [
    VoxelCoord::new(1, 0, 0),
    VoxelCoord::new(-1, 0, 0),
    VoxelCoord::new(0, 1, 0),
    VoxelCoord::new(0, -1, 0),
    VoxelCoord::new(0, 0, 1),
    VoxelCoord::new(0, 0, -1),
];

/// The 26 offsets of the Moore neighborhood, in `dx, dy, dz` lexicographic order.
pub const MOORE_OFFSETS: [VoxelCoord; 26] = moore_offsets();

const fn moore_offsets() -> [VoxelCoord; 26] {
    let mut result = [VoxelCoord::new(0, 0, 0); 26];
    let mut idx = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    result[idx] = VoxelCoord::new(dx, dy, dz);
                    idx += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    result
}

/// A discrete 3D cell coordinate.
///
/// `y` is the vertical axis: "beneath" a cell means `y - 1` and terrain
/// regions are columns over the `x`/`z` plane.
///
/// # Example
///
/// ```
/// use cf_spatial::VoxelCoord;
///
/// let coord = VoxelCoord::new(1, 2, 3);
/// assert_eq!(coord.below(), VoxelCoord::new(1, 1, 3));
/// assert_eq!(coord.manhattan_distance(VoxelCoord::origin()), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (vertical).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new voxel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate `(0, 0, 0)`.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the coordinate as an array.
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Converts to a floating-point point at the cell's minimum corner.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::VoxelCoord;
    /// use nalgebra::Point3;
    ///
    /// assert_eq!(VoxelCoord::new(1, 2, 3).to_point(), Point3::new(1.0, 2.0, 3.0));
    /// ```
    #[must_use]
    pub fn to_point(self) -> Point3<f64> {
        Point3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Converts to a floating-point point at the cell's center.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::VoxelCoord;
    /// use nalgebra::Point3;
    ///
    /// assert_eq!(VoxelCoord::new(1, 2, 3).center(), Point3::new(1.5, 2.5, 3.5));
    /// ```
    #[must_use]
    pub fn center(self) -> Point3<f64> {
        self.to_point() + Vector3::repeat(0.5)
    }

    /// Converts to a floating-point vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Floors a real point to the cell containing it.
    ///
    /// Components outside the `i32` range saturate.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::VoxelCoord;
    /// use nalgebra::Point3;
    ///
    /// let coord = VoxelCoord::containing(&Point3::new(1.9, -0.1, 3.0));
    /// assert_eq!(coord, VoxelCoord::new(1, -1, 3));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(point: &Point3<f64>) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// The cell directly beneath this one.
    #[must_use]
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y.wrapping_sub(1), self.z)
    }

    /// The cell `n` steps above this one.
    #[must_use]
    pub const fn above(self, n: i32) -> Self {
        Self::new(self.x, self.y.wrapping_add(n), self.z)
    }

    /// Returns the neighbor offsets for the given connectivity.
    ///
    /// - `false`: the 6 face offsets
    /// - `true`: all 26 Moore offsets
    #[must_use]
    pub const fn neighbor_offsets(allow_diagonal: bool) -> &'static [Self] {
        if allow_diagonal {
            &MOORE_OFFSETS
        } else {
            &FACE_OFFSETS
        }
    }

    /// Computes the Manhattan distance to another coordinate.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.saturating_add(dy).saturating_add(dz)
    }

    /// Computes the Chebyshev distance to another coordinate.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }

    /// Horizontal (`x`/`z`) Chebyshev span to another coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::VoxelCoord;
    ///
    /// let a = VoxelCoord::new(0, 0, 0);
    /// assert_eq!(a.horizontal_span(VoxelCoord::new(2, 7, -1)), 2);
    /// ```
    #[must_use]
    pub fn horizontal_span(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Computes the Euclidean distance to another coordinate.
    #[must_use]
    pub fn euclidean_distance(self, other: Self) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Computes the 3D octile distance to another coordinate.
    ///
    /// This is the exact shortest distance on a 26-connected lattice where
    /// face, edge and corner moves cost `1`, `√2` and `√3`.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::VoxelCoord;
    /// use approx::assert_relative_eq;
    ///
    /// let a = VoxelCoord::origin();
    /// assert_relative_eq!(a.octile_distance(VoxelCoord::new(3, 0, 3)), 3.0 * 2.0_f64.sqrt());
    /// ```
    #[must_use]
    pub fn octile_distance(self, other: Self) -> f64 {
        let mut dims = [
            f64::from(self.x.abs_diff(other.x)),
            f64::from(self.y.abs_diff(other.y)),
            f64::from(self.z.abs_diff(other.z)),
        ];
        dims.sort_by(f64::total_cmp);
        let [min, mid, max] = dims;

        let sqrt3 = 3.0_f64.sqrt();
        let sqrt2 = std::f64::consts::SQRT_2;
        // min moves along the space diagonal, (mid - min) along a face
        // diagonal, the remainder straight.
        sqrt3.mul_add(min, sqrt2.mul_add(mid - min, max - mid))
    }

    /// Adds an offset to this coordinate, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
            self.z.checked_add(other.z)?,
        ))
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl std::ops::Add for VoxelCoord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.z.wrapping_add(other.z),
        )
    }
}

impl std::ops::Sub for VoxelCoord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

impl std::ops::Neg for VoxelCoord {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(
            self.x.wrapping_neg(),
            self.y.wrapping_neg(),
            self.z.wrapping_neg(),
        )
    }
}

impl std::fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
