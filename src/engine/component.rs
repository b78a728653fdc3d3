//! # Component Registry
//!
//! Global registry assigning stable [`ComponentId`] values to Rust component
//! types. The assigned ID is both the component's bit position in entity
//! masks and its index in the manager's pool vector.
//!
//! ## Identity policy
//!
//! IDs are assigned **lazily on first use**: the first call that names a type
//! (typically `EntityManager::attach::<T>`) allocates the next free ID.
//! Callers that need deterministic numbering can pre-register types in a
//! fixed order with [`register_component`] at startup. Either way:
//!
//! - an ID is unique for the lifetime of the process,
//! - an ID is never renumbered once assigned,
//! - IDs depend on first-use order and must never be persisted across runs.
//!
//! ## Singleton tagging
//!
//! [`register_singleton`] marks a type as singleton-tagged *before* its first
//! use: its pool stores exactly one instance at a fixed key, shared by every
//! entity whose mask bit is set. Tagging a type that was already registered
//! as a regular component is a fatal misuse.
//!
//! ## Capacity
//!
//! At most [`COMPONENT_CAP`] distinct types may be registered; the cap equals
//! the entity bitmask width. Exceeding it panics at registration — a fatal
//! misconfiguration, never a silent truncation of the mask.
//!
//! ## Concurrency
//!
//! The registry is process-global behind `OnceLock<RwLock<..>>`: reads are
//! concurrent, registration is serialized. Managers themselves are
//! single-threaded; the lock only keeps ID assignment correct when multiple
//! managers live on different threads.

use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::{OnceLock, RwLock},
};

use crate::engine::types::{ComponentId, COMPONENT_CAP};

/// Global mapping between Rust component types and compact [`ComponentId`]s.
///
/// ## Invariants
/// - Every entry in `by_type` has a matching `by_id[id]`.
/// - IDs are always in bounds of [`COMPONENT_CAP`].
/// - When frozen, registration is disallowed.
pub struct ComponentRegistry {
    next_id: ComponentId,
    by_type: HashMap<TypeId, ComponentId>,
    by_id: Vec<Option<ComponentDesc>>,
    frozen: bool,
}

static REGISTRY: OnceLock<RwLock<ComponentRegistry>> = OnceLock::new();

fn component_registry() -> &'static RwLock<ComponentRegistry> {
    REGISTRY.get_or_init(|| {
        RwLock::new(ComponentRegistry {
            next_id: 0,
            by_type: HashMap::new(),
            by_id: vec![None; COMPONENT_CAP],
            frozen: false,
        })
    })
}

impl ComponentRegistry {
    /// Allocates the next free `ComponentId`.
    ///
    /// ## Panics
    /// Panics if [`COMPONENT_CAP`] distinct types are already registered.
    fn alloc_id(&mut self) -> ComponentId {
        let component_id = self.next_id;
        assert!(
            (component_id as usize) < COMPONENT_CAP,
            "component capacity exceeded: at most {} distinct component types \
             fit the entity bitmask",
            COMPONENT_CAP
        );
        self.next_id = component_id.wrapping_add(1);
        component_id
    }

    /// Freezes the registry, preventing further registrations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns `true` if the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the ID for `T`, registering it first if needed.
    ///
    /// ## Panics
    /// - Panics if the registry is frozen and `T` is unregistered.
    /// - Panics if the capacity is exceeded.
    pub fn register<T: 'static>(&mut self, singleton: bool) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&type_id) {
            let desc = self.by_id[existing as usize]
                .as_ref()
                .expect("registered id has a descriptor");
            assert!(
                desc.singleton == singleton || !singleton,
                "component {} already registered without the singleton tag",
                desc.name
            );
            return existing;
        }

        assert!(
            !self.frozen,
            "component registry frozen; cannot register {}",
            type_name::<T>()
        );
        let id = self.alloc_id();
        self.by_type.insert(type_id, id);
        self.by_id[id as usize] = Some(ComponentDesc::of::<T>(id, singleton));
        id
    }

    /// Returns the `ComponentId` for `T`, if already registered.
    pub fn id_of<T: 'static>(&self) -> Option<ComponentId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the descriptor for `component_id`, if registered.
    pub fn description(&self, component_id: ComponentId) -> Option<&ComponentDesc> {
        self.by_id
            .get(component_id as usize)
            .and_then(|desc| desc.as_ref())
    }

    /// Number of registered component types.
    pub fn count(&self) -> usize {
        self.next_id as usize
    }
}

/// Returns `T`'s `ComponentId`, assigning one on first use (lazy policy).
///
/// ## Panics
/// Panics if the registry is frozen and `T` was never registered, or if the
/// capacity is exceeded.
pub fn component_id_of<T: 'static>() -> ComponentId {
    let registry = component_registry();
    if let Some(id) = registry.read().unwrap().id_of::<T>() {
        return id;
    }
    registry.write().unwrap().register::<T>(false)
}

/// Eagerly registers `T` (deterministic-order startup registration) and
/// returns its `ComponentId`. Idempotent.
///
/// ## Panics
/// Panics if the registry is frozen or the capacity is exceeded.
pub fn register_component<T: 'static>() -> ComponentId {
    component_registry().write().unwrap().register::<T>(false)
}

/// Registers `T` as a singleton-tagged component and returns its ID.
///
/// Must run before `T`'s first lazy use. Idempotent for singleton-tagged
/// types.
///
/// ## Panics
/// Panics if `T` was already registered as a regular component, if the
/// registry is frozen, or if the capacity is exceeded.
pub fn register_singleton<T: 'static>() -> ComponentId {
    component_registry().write().unwrap().register::<T>(true)
}

/// Freezes the global registry: later first-use registrations panic.
///
/// Locks component identity so a fixed startup registration order stays
/// complete and stable.
pub fn freeze_components() {
    component_registry().write().unwrap().freeze();
}

/// Returns the registered `ComponentId` for `T` without registering it.
pub fn component_id_of_registered<T: 'static>() -> Option<ComponentId> {
    component_registry().read().unwrap().id_of::<T>()
}

/// Returns `T`'s descriptor, assigning an ID on first use (lazy policy).
///
/// Single-lock variant of [`component_id_of`] for call sites that also need
/// the singleton flag.
///
/// ## Panics
/// Same conditions as [`component_id_of`].
pub fn component_meta_of<T: 'static>() -> ComponentDesc {
    let registry = component_registry();
    {
        let registry = registry.read().unwrap();
        if let Some(id) = registry.id_of::<T>() {
            return *registry.description(id).expect("registered id has a descriptor");
        }
    }
    let mut registry = registry.write().unwrap();
    let id = registry.register::<T>(false);
    *registry.description(id).expect("registered id has a descriptor")
}

/// Returns `true` if `component_id` is singleton-tagged.
pub fn is_singleton(component_id: ComponentId) -> bool {
    component_registry()
        .read()
        .unwrap()
        .description(component_id)
        .map_or(false, |desc| desc.singleton)
}

/// Returns a copy of the descriptor for `component_id`, if registered.
pub fn component_description(component_id: ComponentId) -> Option<ComponentDesc> {
    component_registry()
        .read()
        .unwrap()
        .description(component_id)
        .copied()
}

/// Number of component types registered so far.
pub fn component_count() -> usize {
    component_registry().read().unwrap().count()
}

/// Describes a registered component type.
///
/// Diagnostics metadata; `Copy` and safe to pass around freely.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDesc {
    /// Runtime identifier assigned to this component type.
    pub component_id: ComponentId,

    /// Rust type name for diagnostics.
    pub name: &'static str,

    /// Runtime `TypeId` of the component.
    pub type_id: TypeId,

    /// Whether the type is singleton-tagged.
    pub singleton: bool,
}

impl ComponentDesc {
    fn of<T: 'static>(component_id: ComponentId, singleton: bool) -> Self {
        Self {
            component_id,
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            singleton,
        }
    }
}

impl std::fmt::Display for ComponentDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ComponentDesc {{ id: {}, name: {}, singleton: {} }}",
            self.component_id, self.name, self.singleton
        )
    }
}
