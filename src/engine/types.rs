//! Core identifiers, capacities, and the component bitmask.
//!
//! This module defines the **fundamental types and bit-level layouts** shared
//! by every subsystem of the engine: entity keys, component identifiers, and
//! the fixed-width per-entity component mask.
//!
//! ## Design philosophy
//!
//! The engine is built around:
//!
//! - **Dense storage** — components live in packed arrays keyed by entity,
//! - **Bitmask membership** — one bit per component type, one mask per entity,
//! - **Stable numeric identifiers** — every component type maps to a small
//!   integer that doubles as its bit position and pool index.
//!
//! ## Entity representation
//!
//! An entity is a plain non-negative key ([`EntityId`]) into the manager's
//! validity and mask vectors. Keys are recycled through a freelist after
//! destruction; there is no generation counter, so a stale handle to a
//! recycled key observes the new entity (the manager's validity flag is the
//! single source of truth).
//!
//! ## Component mask
//!
//! Component membership is a single [`Bitmask`] word: bit `i` is set exactly
//! when the component type assigned [`ComponentId`] `i` currently occupies the
//! entity's slot in pool `i`. The mask width bounds the number of distinct
//! component types a process may use; exceeding [`COMPONENT_CAP`] is a fatal
//! configuration error detected by the registry, never a silent truncation.

/// Non-negative entity key. Indexes the manager's mask/validity vectors and
/// the sparse side of every component pool.
pub type EntityId = u32;

/// Compact component type identifier.
///
/// Doubles as the component's bit position in entity masks and its index in
/// the manager's pool vector.
pub type ComponentId = u8;

/// Fixed-width per-entity component membership word.
pub type Bitmask = u64;

/// Maximum number of distinct component types per process run.
///
/// Equal to the bit width of [`Bitmask`]; the registry refuses to assign IDs
/// past this bound.
pub const COMPONENT_CAP: usize = Bitmask::BITS as usize;

/// Sentinel marking an absent key in a sparse index slot.
pub const ABSENT: u32 = u32::MAX;

const _: [(); 1] = [(); (COMPONENT_CAP <= u64::BITS as usize) as usize];
const _: [(); 1] = [(); ((ComponentId::MAX as usize) >= COMPONENT_CAP - 1) as usize];

/// Returns the mask word with only `component_id`'s bit set.
#[inline]
pub const fn mask_bit(component_id: ComponentId) -> Bitmask {
    1u64 << component_id
}

/// Sets `component_id`'s bit in `mask`.
#[inline]
pub fn mask_set(mask: &mut Bitmask, component_id: ComponentId) {
    *mask |= mask_bit(component_id);
}

/// Clears `component_id`'s bit in `mask`.
#[inline]
pub fn mask_clear(mask: &mut Bitmask, component_id: ComponentId) {
    *mask &= !mask_bit(component_id);
}

/// Returns `true` if `component_id`'s bit is set in `mask`.
#[inline]
pub const fn mask_has(mask: Bitmask, component_id: ComponentId) -> bool {
    mask & mask_bit(component_id) != 0
}

/// Builds a mask from a list of component IDs.
pub fn build_mask(component_ids: &[ComponentId]) -> Bitmask {
    let mut mask = 0;
    for &component_id in component_ids {
        mask_set(&mut mask, component_id);
    }
    mask
}
