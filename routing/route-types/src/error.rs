//! Error types for route operations.
//!
//! This module defines the [`RoutingError`] enum for failures of path
//! transforms and configuration checks. Search outcomes are never errors:
//! they are reported through [`crate::PathState`].

use cf_spatial::EnvironmentId;

/// Errors that can occur while transforming paths or validating settings.
///
/// # Example
///
/// ```
/// use route_types::RoutingError;
///
/// let error = RoutingError::InvalidStep(0.0);
/// assert!(error.to_string().contains("interpolation step"));
/// assert!(error.is_invalid_parameter());
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RoutingError {
    /// An interpolation step was zero, negative or not finite.
    #[error("interpolation step must be finite and positive, got {0}")]
    InvalidStep(f64),

    /// An interpolation step would produce more waypoints than a path may hold.
    #[error("interpolation step {step} would produce more than {limit} waypoints")]
    TooManyWaypoints {
        /// The requested step.
        step: f64,
        /// The waypoint limit.
        limit: usize,
    },

    /// A simplification tolerance was negative or not finite.
    #[error("simplification tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    /// Two paths from different environments were combined.
    #[error("cannot combine paths from {left} and {right}")]
    EnvironmentMismatch {
        /// Environment of the receiving path.
        left: EnvironmentId,
        /// Environment of the other path.
        right: EnvironmentId,
    },

    /// An invalid configuration parameter was provided.
    ///
    /// Check the configuration values for valid ranges.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RoutingError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use route_types::RoutingError;
    ///
    /// let error = RoutingError::invalid_config("max_length must be positive");
    /// assert!(error.to_string().contains("max_length"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` for a rejected numeric parameter (step or tolerance).
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidStep(_) | Self::TooManyWaypoints { .. } | Self::InvalidTolerance(_)
        )
    }

    /// Returns `true` if two environments were mixed.
    #[must_use]
    pub const fn is_environment_mismatch(&self) -> bool {
        matches!(self, Self::EnvironmentMismatch { .. })
    }
}
