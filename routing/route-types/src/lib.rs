//! Core types for voxel routing: paths, transforms and search outcomes.
//!
//! This crate provides the value types that the route search produces and
//! that callers consume afterwards.
//!
//! # Overview
//!
//! - **Paths**: ordered waypoint sequences ([`Path`]) with geometric
//!   transforms (interpolate, simplify, trim, join, mutate)
//! - **Results**: the terminal state of a search ([`PathState`]), its path
//!   and statistics ([`PathfinderResult`], [`SearchStats`])
//! - **Errors**: invalid transform parameters and configuration
//!   ([`RoutingError`])
//!
//! # Example
//!
//! ```
//! use route_types::{Path, PathState, PathfinderResult};
//! use cf_spatial::{EnvironmentId, Position};
//!
//! let world = EnvironmentId::new(0);
//! let path: Path = (0..4)
//!     .map(|i| Position::new(world, f64::from(i), 64.0, f64::from(i)))
//!     .collect();
//!
//! let result = PathfinderResult::new(PathState::Found, path);
//! assert!(result.successful());
//!
//! // Densify for smooth movement, then drop the final approach
//! let dense = result.path().interpolate(0.25).unwrap().trim(2);
//! assert!(dense.len() > result.path().len());
//! ```
//!
//! # Integration with cf-spatial
//!
//! Waypoints are [`cf_spatial::Position`] values, so every path carries the
//! environment it was computed in.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![doc(html_root_url = "https://docs.rs/route-types/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod path;
pub mod result;

// Re-export main types at crate root for convenience
pub use error::RoutingError;
pub use path::Path;
pub use result::{PathState, PathfinderResult, SearchStats};
