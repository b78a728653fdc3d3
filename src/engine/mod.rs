//! Core engine: entity bookkeeping, component storage, and views.
//!
//! The modules layer bottom-up:
//!
//! - [`types`] — shared aliases, the component capacity, and mask helpers.
//! - [`sparse`] — the dense indexed store backing every pool.
//! - [`pool`] — typed pools behind a type-erased ownership trait.
//! - [`component`] — the process-global component identity registry.
//! - [`manager`] — the [`EntityManager`](manager::EntityManager) owning all
//!   state and the attach/detach/query surface.
//! - [`view`] — typed intersection/exclusion iteration over pools.
//! - [`error`] — the view construction error type.

pub mod component;
pub mod error;
pub mod manager;
pub mod pool;
pub mod sparse;
pub mod types;
pub mod view;
