//! # Sparse ECS
//!
//! Sparse-set Entity-Component-System storage and query engine for
//! simulation-style workloads.
//!
//! ## Design Goals
//! - Dense, gap-free component storage for cache-friendly iteration
//! - O(1) entity/component operations on every hot path
//! - Compile-time typed views with intersection and exclusion
//! - Mutation during iteration rejected by the borrow checker
//!
//! ## Quick tour
//!
//! ```
//! use sparse_ecs::{EntityManager, ViewError};
//!
//! struct Position { x: f32, y: f32 }
//! struct Velocity { dx: f32, dy: f32 }
//! struct Frozen;
//!
//! fn main() -> Result<(), ViewError> {
//!     let mut world = EntityManager::new();
//!
//!     let mover = world.spawn();
//!     world.attach(mover, Position { x: 0.0, y: 0.0 }).unwrap();
//!     world.attach(mover, Velocity { dx: 1.0, dy: 2.0 }).unwrap();
//!
//!     let statue = world.spawn();
//!     world.attach(statue, Position { x: 5.0, y: 5.0 }).unwrap();
//!     world.attach(statue, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
//!     world.attach(statue, Frozen).unwrap();
//!
//!     // Everything with Position and Velocity but not Frozen.
//!     let mut view = world.view_mut::<(Position, Velocity), (Frozen,)>()?;
//!     view.for_each(|_entity, (position, velocity)| {
//!         position.x += velocity.dx;
//!         position.y += velocity.dy;
//!     });
//!
//!     assert_eq!(world.get::<Position>(mover).map(|p| p.x), Some(1.0));
//!     assert_eq!(world.get::<Position>(statue).map(|p| p.x), Some(5.0));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]
#![deny(dead_code)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core types

pub use engine::manager::{Entity, EntityManager};

pub use engine::sparse::SparseSet;

pub use engine::pool::{Pool, TypeErasedPool};

// Component identity

pub use engine::component::{
    component_count, component_description, component_id_of, component_id_of_registered,
    freeze_components, register_component, register_singleton, ComponentDesc,
};

// Views

pub use engine::view::{ExcludeSet, IncludeSet, View, ViewMut};

pub use engine::error::ViewError;

// Aliases and limits

pub use engine::types::{Bitmask, ComponentId, EntityId, COMPONENT_CAP};
