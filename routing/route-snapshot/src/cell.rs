//! Voxel cell descriptors.

use cf_spatial::Coordinate;

/// Passability attributes of one cell, as captured from terrain.
///
/// # Example
///
/// ```
/// use route_snapshot::CellProperties;
///
/// assert!(CellProperties::AIR.is_passable());
/// assert!(CellProperties::SOLID.is_solid());
/// assert!(CellProperties::LIQUID.is_passable() && !CellProperties::LIQUID.is_air());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellProperties {
    /// Nothing occupies the cell.
    is_air: bool,
    /// An entity can occupy the cell.
    is_passable: bool,
    /// The cell supports an entity standing on top of it.
    is_solid: bool,
}

impl CellProperties {
    /// Empty space.
    pub const AIR: Self = Self::new(true, true, false);
    /// Solid ground or wall.
    pub const SOLID: Self = Self::new(false, false, true);
    /// Fluid an entity can move through but not stand on.
    pub const LIQUID: Self = Self::new(false, true, false);
    /// Occupied but neither walkable through nor standable (e.g. a fence gap).
    pub const BLOCKED: Self = Self::new(false, false, false);

    /// Creates cell properties from flags.
    #[must_use]
    pub const fn new(is_air: bool, is_passable: bool, is_solid: bool) -> Self {
        Self {
            is_air,
            is_passable,
            is_solid,
        }
    }

    /// `true` if nothing occupies the cell.
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.is_air
    }

    /// `true` if an entity can occupy the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        self.is_passable
    }

    /// `true` if the cell can be stood on.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.is_solid
    }
}

impl Default for CellProperties {
    fn default() -> Self {
        Self::AIR
    }
}

/// One cell of a captured snapshot.
///
/// Derived once from a [`crate::RegionSnapshot`] and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCell {
    coordinate: Coordinate,
    properties: CellProperties,
}

impl VoxelCell {
    /// Creates a cell.
    #[must_use]
    pub const fn new(coordinate: Coordinate, properties: CellProperties) -> Self {
        Self {
            coordinate,
            properties,
        }
    }

    /// The cell's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// The cell's attributes.
    #[must_use]
    pub const fn properties(&self) -> CellProperties {
        self.properties
    }

    /// `true` if nothing occupies the cell.
    #[must_use]
    pub const fn is_air(&self) -> bool {
        self.properties.is_air()
    }

    /// `true` if an entity can occupy the cell.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.properties.is_passable()
    }

    /// `true` if the cell can be stood on.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.properties.is_solid()
    }
}
