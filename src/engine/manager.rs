//! Entity registry and component attachment surface.
//!
//! [`EntityManager`] owns the entire engine state: the per-entity component
//! masks, the validity vector, the freelist of recycled keys, and one lazily
//! created component pool per registered type. Every public operation is
//! amortized O(1) and runs to completion synchronously.
//!
//! ## Lifecycle
//!
//! Entities are created by [`spawn`](EntityManager::spawn) — a recycled key
//! with its mask reset, or a freshly appended one — and destroyed by
//! [`despawn`](EntityManager::despawn), which resets the mask, clears the
//! validity flag, and pushes the key onto the freelist.
//!
//! ## Destroy policy
//!
//! Despawn does **not** eagerly remove the entity's entries from component
//! pools. The entries become unreachable through the mask and are overwritten
//! in place by a future attach on the recycled key. This trades storage
//! tightness for destroy-time speed; callers needing tight pools can detach
//! explicitly before despawning.
//!
//! ## Failure semantics
//!
//! Operations on dead entities or absent components are silent no-ops with
//! sentinel returns (`None`/`false`) — this is a hot-path structure and the
//! conditions are expected. Only programmer errors fail loudly: view contract
//! violations return `Err` at construction and registry misconfiguration
//! panics at setup (see [`crate::engine::component`]).

use crate::engine::component::{component_id_of_registered, component_meta_of};
use crate::engine::pool::{Pool, TypeErasedPool};
use crate::engine::types::{mask_clear, mask_has, mask_set, Bitmask, ComponentId, EntityId};

/// Fixed pool key shared by every holder of a singleton-tagged component.
pub(crate) const SINGLETON_KEY: EntityId = 0;

/// Handle to an entity owned by an [`EntityManager`].
///
/// A plain recycled key: after the entity is despawned and its key respawned,
/// old handles observe the new entity. The manager's validity flag is the
/// single source of truth.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entity(pub(crate) EntityId);

impl Entity {
    /// The underlying entity key.
    #[inline]
    pub fn key(self) -> EntityId {
        self.0
    }
}

/// Owner of entity bookkeeping and all component pools.
///
/// See the [module docs](self) for lifecycle and failure semantics.
#[derive(Default)]
pub struct EntityManager {
    /// Per-entity component membership, indexed by key.
    masks: Vec<Bitmask>,

    /// Per-entity validity flag, indexed by key.
    alive: Vec<bool>,

    /// Previously despawned keys awaiting reuse.
    free_store: Vec<EntityId>,

    /// One pool per component type, indexed by `ComponentId`; `None` until
    /// the type's first attach.
    pools: Vec<Option<Box<dyn TypeErasedPool>>>,
}

impl EntityManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates bookkeeping capacity for `count` additional entities.
    pub fn reserve_entities(&mut self, count: usize) {
        self.masks.reserve(count);
        self.alive.reserve(count);
    }

    /// Creates an entity: a recycled key with its mask reset, or a freshly
    /// appended key. Amortized O(1).
    pub fn spawn(&mut self) -> Entity {
        if let Some(key) = self.free_store.pop() {
            self.masks[key as usize] = 0;
            self.alive[key as usize] = true;
            return Entity(key);
        }

        let key = self.masks.len() as EntityId;
        self.masks.push(0);
        self.alive.push(true);
        Entity(key)
    }

    /// Destroys an entity: resets its mask, clears validity, recycles the key.
    ///
    /// Returns `false` if the entity was already dead. Pool entries are left
    /// in place per the lazy destroy policy (module docs).
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let index = entity.0 as usize;
        self.masks[index] = 0;
        self.alive[index] = false;
        self.free_store.push(entity.0);
        true
    }

    /// Bounds-checked validity test.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.0 as usize).copied().unwrap_or(false)
    }

    /// Number of live entities.
    pub fn live_count(&self) -> usize {
        self.masks.len() - self.free_store.len()
    }

    /// The entity's component membership mask; zero for dead or unknown keys.
    #[inline]
    pub fn component_mask(&self, entity: Entity) -> Bitmask {
        if !self.is_alive(entity) {
            return 0;
        }
        self.masks[entity.0 as usize]
    }

    /// Attaches a component of type `T` to `entity`.
    ///
    /// Returns `None` if the entity is dead. Lazily creates `T`'s pool on
    /// first use. Attach is idempotent: if the entity already carries `T`,
    /// the existing component is returned unchanged and `value` is dropped.
    /// An orphaned entry left at the key by the destroy policy is overwritten
    /// in place.
    ///
    /// Singleton-tagged types store one instance at a fixed key; the first
    /// attach stores `value`, later attaches by other entities only set their
    /// bit and observe the shared instance.
    pub fn attach<T: 'static>(&mut self, entity: Entity, value: T) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }

        let desc = component_meta_of::<T>();
        let id = desc.component_id;
        let key = if desc.singleton { SINGLETON_KEY } else { entity.0 };
        let already_attached = mask_has(self.masks[entity.0 as usize], id);

        if !already_attached {
            mask_set(&mut self.masks[entity.0 as usize], id);
        }

        let pool = self.ensure_pool::<T>(id);
        if !already_attached {
            if desc.singleton {
                // First attach stores the instance; later attaches share it.
                pool.components.insert(key, value);
            } else if let Some(orphan) = pool.components.get_mut(key) {
                *orphan = value;
            } else {
                pool.components.insert(key, value);
            }
        }

        pool.components.get_mut(key)
    }

    /// Detaches `T` from `entity`.
    ///
    /// Silent no-op unless the entity is alive, `T`'s pool exists, and the
    /// bit is set. Regular components are swap-removed from the pool;
    /// singleton detach only clears the entity's bit — the shared instance
    /// stays for its other holders.
    pub fn detach<T: 'static>(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        let Some(id) = component_id_of_registered::<T>() else {
            return;
        };
        if !mask_has(self.masks[entity.0 as usize], id) {
            return;
        }
        let Some(pool) = self.pool_mut::<T>(id) else {
            return;
        };

        if !crate::engine::component::is_singleton(id) {
            pool.components.remove(entity.0);
        }
        mask_clear(&mut self.masks[entity.0 as usize], id);
    }

    /// O(1) bitmask test: does `entity` carry `T`?
    #[inline]
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        let Some(id) = component_id_of_registered::<T>() else {
            return false;
        };
        self.is_alive(entity) && mask_has(self.masks[entity.0 as usize], id)
    }

    /// Returns `entity`'s component of type `T`, if attached.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        let (id, key) = self.lookup_key::<T>(entity)?;
        self.pool_ref::<T>(id)?.components.get(key)
    }

    /// Returns `entity`'s component of type `T` mutably, if attached.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        let (id, key) = self.lookup_key::<T>(entity)?;
        self.pool_mut::<T>(id)?.components.get_mut(key)
    }

    /// Number of live components in `T`'s pool; zero if the pool was never
    /// created.
    pub fn pool_len<T: 'static>(&self) -> usize {
        component_id_of_registered::<T>()
            .and_then(|id| self.pool_ref::<T>(id))
            .map_or(0, |pool| pool.components.len())
    }

    /// Drops every entity and empties every pool. Pool allocations and
    /// component IDs are retained.
    pub fn clear(&mut self) {
        self.masks.clear();
        self.alive.clear();
        self.free_store.clear();
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
    }

    fn lookup_key<T: 'static>(&self, entity: Entity) -> Option<(ComponentId, EntityId)> {
        let id = component_id_of_registered::<T>()?;
        if !self.is_alive(entity) || !mask_has(self.masks[entity.0 as usize], id) {
            return None;
        }
        let key = if crate::engine::component::is_singleton(id) {
            SINGLETON_KEY
        } else {
            entity.0
        };
        Some((id, key))
    }

    /// Returns `T`'s pool, creating it if absent. The caller guarantees `id`
    /// is `T`'s registered ID.
    pub(crate) fn ensure_pool<T: 'static>(&mut self, id: ComponentId) -> &mut Pool<T> {
        let index = id as usize;
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }
        self.pools[index]
            .get_or_insert_with(|| Box::new(Pool::<T>::default()) as Box<dyn TypeErasedPool>)
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
            .expect("pool type matches its component id")
    }

    pub(crate) fn pool_ref<T: 'static>(&self, id: ComponentId) -> Option<&Pool<T>> {
        self.pools
            .get(id as usize)?
            .as_deref()?
            .as_any()
            .downcast_ref::<Pool<T>>()
    }

    fn pool_mut<T: 'static>(&mut self, id: ComponentId) -> Option<&mut Pool<T>> {
        self.pools
            .get_mut(id as usize)?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
    }

    pub(crate) fn pool_slice(&self) -> &[Option<Box<dyn TypeErasedPool>>] {
        &self.pools
    }

    pub(crate) fn pool_slice_mut(&mut self) -> &mut [Option<Box<dyn TypeErasedPool>>] {
        &mut self.pools
    }
}
