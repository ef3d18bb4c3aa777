//! Spatial primitives for CortenForge routing.
//!
//! This crate provides the coordinate and vector math that the voxel route
//! search builds on:
//!
//! - [`VoxelCoord`] - Integer cell coordinates, neighborhoods and lattice metrics
//! - [`EnvironmentId`] and [`Coordinate`] - Cells scoped to a world/grid
//! - [`Position`] - Real-valued points used as route waypoints
//! - [`Vector`] - Three-component real vector (nalgebra `Vector3<f64>`)
//! - [`SegmentTraversal`] - Cells pierced by the segment between two cell centers
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It knows nothing
//! about terrain or search and can be used by any tool that needs the same
//! coordinate conventions.
//!
//! # Coordinate Systems
//!
//! Voxel worlds are **Y-up**:
//! - X, Z: horizontal plane (terrain regions are columns over X/Z)
//! - Y: height (a cell's footing is the cell at `y - 1`)
//!
//! World coordinates are continuous `f64` values. Cell coordinates are discrete
//! `i32` values; [`Position::floor`] maps one onto the other.
//!
//! # Example
//!
//! ```
//! use cf_spatial::{Coordinate, EnvironmentId, Position, Vector, VoxelCoord};
//!
//! let world = EnvironmentId::new(0);
//! let start = Position::new(world, 0.5, 64.0, 0.5);
//!
//! // Snap to the containing cell and walk to a neighbor
//! let cell = start.floor();
//! assert_eq!(cell, Coordinate::new(world, 0, 64, 0));
//! let east = cell.offset(VoxelCoord::new(1, 0, 0));
//!
//! // Vector algebra is nalgebra's
//! let step: Vector = start.vector_to(&east.center());
//! assert!(step.cross(&Vector::y()).norm() > 0.0);
//! assert!((step.normalize().norm() - 1.0).abs() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all value types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod coordinate;
mod position;
mod traversal;
mod voxel;

pub use coordinate::{Coordinate, EnvironmentId};
pub use position::Position;
pub use traversal::SegmentTraversal;
pub use voxel::{FACE_OFFSETS, MOORE_OFFSETS, VoxelCoord};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

/// Three real components with the usual algebra (add, subtract, scale, dot,
/// cross, normalize, norm).
pub type Vector = Vector3<f64>;
