//! Component pools and their type-erased ownership interface.
//!
//! A [`Pool<T>`] binds one [`SparseSet`] to one static component type. The
//! manager owns one pool per registered component, created lazily on first
//! attach, behind the narrow [`TypeErasedPool`] trait: destruction plus typed
//! downcast, nothing more. All behavior lives in the sparse set.

use std::any::{type_name, Any};

use crate::engine::sparse::SparseSet;

/// Narrow, non-generic interface over a concrete [`Pool<T>`].
///
/// Lets the manager hold a heterogeneous `Vec<Option<Box<dyn TypeErasedPool>>>`
/// indexed by component ID and recover the typed pool where the component
/// type is statically known.
pub trait TypeErasedPool {
    /// Upcast for typed downcasting via [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting via [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Number of live components in the pool.
    fn len(&self) -> usize;

    /// Returns `true` if the pool holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable element type name, for diagnostics.
    fn element_type_name(&self) -> &'static str;

    /// Drops every component in the pool.
    fn clear(&mut self);
}

/// Storage for every component of type `T`, keyed by entity.
pub struct Pool<T> {
    /// The backing dense indexed store.
    pub components: SparseSet<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            components: SparseSet::new(),
        }
    }
}

impl<T: 'static> TypeErasedPool for Pool<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn clear(&mut self) {
        self.components.clear();
    }
}
