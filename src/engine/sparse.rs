//! Dense indexed storage keyed by entity.
//!
//! This module implements [`SparseSet<T>`], the storage primitive behind every
//! component pool: a map from sparse entity keys to densely packed values with
//! O(1) amortized insert, O(1) unordered removal, O(1) membership and lookup,
//! and gap-free iteration over the live set.
//!
//! # Storage model
//!
//! A set owns three parallel arrays:
//!
//! ```text
//! elements:     [ v0, v1, v2, ... ]          packed values, no gaps
//! dense_to_key: [ k0, k1, k2, ... ]          dense slot -> key
//! key_to_dense: [ ..., 2, ABSENT, 0, ... ]   key -> dense slot (sentinel = absent)
//! ```
//!
//! The dense arrays always have equal length. The sparse array grows on demand
//! to fit the highest key ever inserted and never shrinks.
//!
//! # Core operations
//!
//! - **Insert**: appends the value and wires both directional mappings. If the
//!   key is already occupied the stored value is left untouched (first writer
//!   wins) and the call still succeeds.
//! - **Remove**: swap-with-last — the final dense element moves into the
//!   vacated slot and both mappings for the moved element are rewired. True
//!   O(1) erasure at the cost of insertion order; removing the sole element
//!   degenerates to a self-move.
//! - **External iteration**: [`keys`](SparseSet::keys) and
//!   [`elements`](SparseSet::elements) expose the packed arrays so callers
//!   (the view engine) can walk one pool while cross-checking membership in
//!   others.
//! - **Reordering**: [`sort_by_key`](SparseSet::sort_by_key) restores
//!   deterministic ascending-key order in O(n log n). Purely optional; no
//!   other operation relies on order.
//!
//! # Invariants
//!
//! For every occupied key `k`:
//!
//! - `key_to_dense[k] != ABSENT`,
//! - `dense_to_key[key_to_dense[k]] == k`,
//! - `elements.len() == dense_to_key.len()`.
//!
//! Every method upholds these invariants; tests exercise them through the
//! public API.

use crate::engine::types::{EntityId, ABSENT};

/// Sparse-key-to-packed-value storage with O(1) insert, removal, and lookup.
///
/// See the [module docs](self) for the storage model and invariants.
pub struct SparseSet<T> {
    /// Packed values, one per live key.
    elements: Vec<T>,

    /// Dense slot → key. Same length as `elements`.
    dense_to_key: Vec<EntityId>,

    /// Key → dense slot; `ABSENT` marks an unoccupied key. Sized to the
    /// highest key ever inserted.
    key_to_dense: Vec<u32>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            dense_to_key: Vec::new(),
            key_to_dense: Vec::new(),
        }
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` if `key` currently occupies a slot.
    #[inline]
    pub fn contains(&self, key: EntityId) -> bool {
        self.key_to_dense
            .get(key as usize)
            .map_or(false, |&slot| slot != ABSENT)
    }

    /// Inserts `value` at `key`.
    ///
    /// Grows the sparse index on demand to fit `key`. If the key is already
    /// occupied this is a no-op success: the stored value is **not**
    /// replaced. Returns `true` when the set contains `key` after the call
    /// (always, for any representable key).
    pub fn insert(&mut self, key: EntityId, value: T) -> bool {
        self.expand_to_fit(key);

        if self.key_to_dense[key as usize] != ABSENT {
            return true;
        }

        self.key_to_dense[key as usize] = self.elements.len() as u32;
        self.dense_to_key.push(key);
        self.elements.push(value);
        true
    }

    /// Removes the element at `key` by swap-with-last.
    ///
    /// Returns `false` if `key` is absent. The last dense element moves into
    /// the vacated slot and both of its mappings are rewired; the vacated
    /// key's sparse slot becomes [`ABSENT`].
    pub fn remove(&mut self, key: EntityId) -> bool {
        if !self.contains(key) {
            return false;
        }

        let slot = self.key_to_dense[key as usize] as usize;
        let moved_key = *self
            .dense_to_key
            .last()
            .expect("occupied set has a last dense entry");

        self.elements.swap_remove(slot);
        self.dense_to_key.swap_remove(slot);

        // When the removed element was last, moved_key == key and the slot
        // rewire below is overwritten by the ABSENT marker.
        self.key_to_dense[moved_key as usize] = slot as u32;
        self.key_to_dense[key as usize] = ABSENT;
        true
    }

    /// Returns a reference to the value at `key`, if present.
    #[inline]
    pub fn get(&self, key: EntityId) -> Option<&T> {
        let slot = *self.key_to_dense.get(key as usize)?;
        if slot == ABSENT {
            return None;
        }
        Some(&self.elements[slot as usize])
    }

    /// Returns a mutable reference to the value at `key`, if present.
    #[inline]
    pub fn get_mut(&mut self, key: EntityId) -> Option<&mut T> {
        let slot = *self.key_to_dense.get(key as usize)?;
        if slot == ABSENT {
            return None;
        }
        Some(&mut self.elements[slot as usize])
    }

    /// Dense slot → key mapping, parallel to [`elements`](Self::elements).
    #[inline]
    pub fn keys(&self) -> &[EntityId] {
        &self.dense_to_key
    }

    /// Packed value slice, parallel to [`keys`](Self::keys).
    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    /// Mutable packed value slice, parallel to [`keys`](Self::keys).
    #[inline]
    pub fn elements_mut(&mut self) -> &mut [T] {
        &mut self.elements
    }

    /// Drops all elements and marks every key absent.
    ///
    /// The sparse index keeps its length so re-inserts at previously used
    /// keys do not re-grow it.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.dense_to_key.clear();
        self.key_to_dense.fill(ABSENT);
    }

    /// Reorders the dense arrays into ascending key order.
    ///
    /// O(n log n). Restores deterministic iteration after swap-removals have
    /// scrambled dense order; no operation requires it for correctness.
    pub fn sort_by_key(&mut self) {
        let keys = std::mem::take(&mut self.dense_to_key);
        let elements = std::mem::take(&mut self.elements);

        let mut pairs: Vec<(EntityId, T)> = keys.into_iter().zip(elements).collect();
        pairs.sort_unstable_by_key(|&(key, _)| key);

        self.dense_to_key.reserve(pairs.len());
        self.elements.reserve(pairs.len());
        for (slot, (key, value)) in pairs.into_iter().enumerate() {
            self.key_to_dense[key as usize] = slot as u32;
            self.dense_to_key.push(key);
            self.elements.push(value);
        }
    }

    /// Approximate heap footprint in bytes (capacity, not length).
    pub fn byte_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + std::mem::size_of::<T>() * self.elements.capacity()
            + std::mem::size_of::<EntityId>() * self.dense_to_key.capacity()
            + std::mem::size_of::<u32>() * self.key_to_dense.capacity()
    }

    fn expand_to_fit(&mut self, key: EntityId) {
        let needed = key as usize + 1;
        if needed > self.key_to_dense.len() {
            self.key_to_dense.resize(needed, ABSENT);
        }
    }
}
