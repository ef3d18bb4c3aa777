//! Error types for terrain access.

use cf_spatial::Coordinate;

use crate::region::RegionKey;

/// Errors raised while capturing or reading terrain snapshots.
///
/// The search engine never surfaces these to callers: a cell whose lookup
/// fails is treated as unknown and skipped.
///
/// # Example
///
/// ```
/// use route_snapshot::{RegionKey, TerrainError};
/// use cf_spatial::EnvironmentId;
///
/// let key = RegionKey::new(EnvironmentId::new(0), 3, -1);
/// let error = TerrainError::unavailable(key, "chunk not loaded");
/// assert!(error.is_unavailable());
/// assert!(error.to_string().contains("chunk not loaded"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TerrainError {
    /// The provider could not supply the region.
    #[error("terrain unavailable for region {key}: {reason}")]
    Unavailable {
        /// The region that was requested.
        key: RegionKey,
        /// Provider-supplied explanation.
        reason: String,
    },

    /// The cell lies above or below the captured vertical range.
    #[error("{coordinate} is outside the vertical range {min_y}..{max_y}")]
    OutOfBounds {
        /// The requested cell.
        coordinate: Coordinate,
        /// Lowest captured `y` (inclusive).
        min_y: i32,
        /// Highest captured `y` (exclusive).
        max_y: i32,
    },

    /// A region grid was malformed or asked for a cell it does not cover.
    #[error("invalid region: {0}")]
    InvalidRegion(String),
}

impl TerrainError {
    /// Creates an unavailable-region error.
    #[must_use]
    pub fn unavailable(key: RegionKey, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            key,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-region error.
    #[must_use]
    pub fn invalid_region(message: impl Into<String>) -> Self {
        Self::InvalidRegion(message.into())
    }

    /// Returns `true` if the provider could not supply the region.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns `true` if the cell was outside the captured vertical range.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_spatial::EnvironmentId;

    #[test]
    fn test_out_of_bounds_display() {
        let error = TerrainError::OutOfBounds {
            coordinate: Coordinate::new(EnvironmentId::new(1), 0, 500, 0),
            min_y: -64,
            max_y: 320,
        };
        let msg = error.to_string();
        assert!(msg.contains("-64..320"));
        assert!(error.is_out_of_bounds());
        assert!(!error.is_unavailable());
    }

    #[test]
    fn test_invalid_region_helper() {
        let error = TerrainError::invalid_region("empty height range");
        assert!(matches!(error, TerrainError::InvalidRegion(ref msg) if msg == "empty height range"));
    }
}
