//! Terrain snapshots for voxel routing.
//!
//! Live terrain usually belongs to one thread. Route searches run anywhere.
//! This crate captures terrain one 16×16 column region at a time into
//! immutable snapshots that any thread can read.
//!
//! # Overview
//!
//! - [`TerrainProvider`]: the source of region captures (implemented by the
//!   host; [`MemoryTerrain`] for tools and tests)
//! - [`SnapshotCache`]: sharded, shareable cache of [`RegionSnapshot`]s
//! - [`SnapshotView`]: one search's pinned view of the cache
//! - [`VoxelCell`]: the immutable cell value handed to movement rules
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
//! use cf_spatial::{Coordinate, EnvironmentId, VoxelCoord};
//!
//! let world = EnvironmentId::new(0);
//! let mut terrain = MemoryTerrain::new(-16, 64);
//! terrain.fill(world, VoxelCoord::new(-8, -1, -8), VoxelCoord::new(8, -1, 8), CellProperties::SOLID);
//!
//! let cache = SnapshotCache::new(Arc::new(terrain));
//! let view = cache.view();
//! assert!(view.is_solid(&Coordinate::new(world, 0, -1, 0)));
//! assert!(view.is_passable(&Coordinate::new(world, 0, 0, 0)));
//! ```
//!
//! # Coordinate System
//!
//! Y is up. Regions are keyed by `(x >> 4, z >> 4)` per environment and span
//! the environment's whole vertical range.
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for cell and key types

#![doc(html_root_url = "https://docs.rs/route-snapshot/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod cache;
pub mod cell;
pub mod error;
pub mod provider;
pub mod region;
pub mod view;

pub use cache::SnapshotCache;
pub use cell::{CellProperties, VoxelCell};
pub use error::TerrainError;
pub use provider::{MemoryTerrain, TerrainProvider};
pub use region::{MAX_REGION_HEIGHT, REGION_SIZE, RegionGrid, RegionKey, RegionSnapshot};
pub use view::SnapshotView;
