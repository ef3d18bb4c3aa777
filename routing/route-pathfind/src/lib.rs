//! A* route search over voxel terrain snapshots.
//!
//! This crate searches the cells captured by `route-snapshot` and produces
//! the `route-types` path and result values.
//!
//! # Overview
//!
//! - **Rules** ([`RuleSet`]): budgets, neighborhood, strategy chain and
//!   execution mode, with sync and async presets
//! - **Strategies** ([`strategy`]): pluggable move checks ([`Direct`],
//!   [`Walkable`], [`Jumpable`]) combined conjunctively
//! - **Engine** ([`VoxelAStar`]): deterministic A* with iteration budget,
//!   length bound, fallback and cancellation
//! - **Front end** ([`Pathfinder`]): runs searches on the caller's thread or
//!   on a rayon pool and hands back a [`PathfindingTask`]
//! - **Hooks** ([`hooks`]): start/step/finish observers and
//!   [`CancellationToken`]
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use route_pathfind::{Pathfinder, RuleSet, Walkable};
//! use route_snapshot::{CellProperties, MemoryTerrain, SnapshotCache};
//! use cf_spatial::{EnvironmentId, Position, VoxelCoord};
//!
//! // A 10x10 stone floor
//! let world = EnvironmentId::new(0);
//! let mut terrain = MemoryTerrain::new(-16, 64);
//! terrain.fill(world, VoxelCoord::new(0, -1, 0), VoxelCoord::new(9, -1, 9), CellProperties::SOLID);
//!
//! let cache = Arc::new(SnapshotCache::new(Arc::new(terrain)));
//! let pathfinder = Pathfinder::new(cache);
//!
//! let rules = RuleSet::sync_defaults().with_strategy(Walkable::new());
//! let result = pathfinder.find_path_blocking(
//!     &Position::new(world, 0.0, 0.0, 0.0),
//!     &Position::new(world, 9.0, 0.0, 9.0),
//!     &rules,
//! );
//!
//! assert!(result.successful());
//! let smooth = result.path().simplify(0.0).unwrap();
//! assert_eq!(smooth.len(), 2);
//! ```
//!
//! # Neighborhoods
//!
//! | `allow_diagonal` | Neighbors | Heuristic |
//! |------------------|-----------|-----------|
//! | `false` | 6 face neighbors | Manhattan |
//! | `true` | 26 Moore neighbors | Octile |
//!
//! Strategies may add candidates beyond these, such as the jump offsets of
//! [`Jumpable`].
//!
//! # Threading
//!
//! The snapshot cache is shared between searches. Each search owns its open
//! set and reads terrain through a private view, so any number of searches
//! can run at once.

#![doc(html_root_url = "https://docs.rs/route-pathfind/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod engine;
pub mod heuristics;
pub mod hooks;
pub mod neighbors;
pub mod pathfinder;
pub mod rules;
pub mod strategy;

// Re-export main types for convenience
pub use engine::{VoxelAStar, find_path};
pub use heuristics::Heuristic;
pub use hooks::{CancellationToken, FinishEvent, PathfinderHook, StartEvent, StepEvent};
pub use neighbors::NeighborGenerator;
pub use pathfinder::{Pathfinder, PathfindingTask};
pub use rules::RuleSet;
pub use strategy::{Direct, Jumpable, MovementStrategy, Step, Walkable};
