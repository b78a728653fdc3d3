//! Typed multi-pool intersection/exclusion views.
//!
//! A view iterates every entity that carries **all** of the Included
//! component types and **none** of the Excluded ones, yielding direct
//! references to each Included component. Both sets are fixed at compile
//! time as tuples: [`IncludeSet`] is implemented for component tuples of
//! arity 1–4 and [`ExcludeSet`] for arities 0–4 (`()` means no exclusion).
//!
//! ## Execution model
//!
//! The first Included type is the **driver**. Iteration walks the driver
//! pool's dense key array once, in its current (swap-removal-affected,
//! non-guaranteed) order; per key:
//!
//! 1. skip if any other Included pool lacks the key,
//! 2. skip if any bound Excluded pool has the key,
//! 3. otherwise invoke the callback with references to every Included
//!    component, in declared order.
//!
//! A single-include, zero-exclusion view walks the driver's packed element
//! slice directly with no per-entity sparse lookups — a pure optimization,
//! semantically identical to the general path.
//!
//! ## Contract
//!
//! Construction fails with [`ViewError`] if a type repeats inside the
//! include set or appears in both sets. An empty include set cannot be
//! expressed (no arity-0 [`IncludeSet`] impl). Missing Included pools are
//! created empty at construction (an empty pool just matches nothing);
//! missing Excluded pools are left absent and never exclude anything.
//!
//! Views hold a borrow of the [`EntityManager`], so attaching or detaching
//! a component while a view is iterating — which could invalidate the dense
//! arrays mid-walk via swap-removal — is rejected by the borrow checker
//! rather than left as undefined behavior.
//!
//! Singleton-tagged types are not meaningful inside view type sets: their
//! pool is keyed by a fixed slot, not by entity, so membership checks
//! against entity keys do not apply to them.
//!
//! ## Safety
//!
//! [`ViewMut`] yields mutable references fetched through raw pool pointers.
//! Soundness rests on two invariants established at construction: the
//! component IDs of the fetched pools are pairwise distinct (validated), and
//! the view holds the manager's unique borrow for its whole lifetime.

use std::any::Any;
use std::marker::PhantomData;

use crate::engine::component::{component_description, component_id_of};
use crate::engine::error::ViewError;
use crate::engine::manager::{Entity, EntityManager};
use crate::engine::pool::{Pool, TypeErasedPool};
use crate::engine::sparse::SparseSet;
use crate::engine::types::{ComponentId, EntityId};

/// Looks up the typed sparse set for `id` in a pool slice, if the pool
/// exists.
fn pool_components<T: 'static>(
    pools: &[Option<Box<dyn TypeErasedPool>>],
    id: ComponentId,
) -> Option<&SparseSet<T>> {
    let pool = pools.get(id as usize)?.as_deref()?;
    let pool = pool
        .as_any()
        .downcast_ref::<Pool<T>>()
        .expect("pool type matches its component id");
    Some(&pool.components)
}

/// Compile-time set of component types a view must find **absent**.
///
/// Implemented for `()` (no exclusion) and component tuples of arity 1–4.
pub trait ExcludeSet {
    /// Number of excluded types.
    const LEN: usize;

    /// Component IDs of the excluded types, assigning IDs on first use.
    fn component_ids() -> Vec<ComponentId>;

    /// Bound exclusion pools; `None` where the pool does not exist (an
    /// absent pool never excludes).
    type Fetch<'a>: Copy;

    /// Binds the exclusion pools without creating any.
    fn fetch(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::Fetch<'_>;

    /// Returns `true` if any bound exclusion pool contains `key`.
    fn excludes(fetch: Self::Fetch<'_>, key: EntityId) -> bool;

    /// Raw-pointer form of [`Fetch`](Self::Fetch), for mutable views.
    type FetchRaw: Copy;

    /// Binds the exclusion pools as raw pointers.
    fn fetch_raw(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::FetchRaw;

    /// Raw-pointer form of [`excludes`](Self::excludes).
    ///
    /// # Safety
    /// Every non-`None` pointer in `fetch` must still point at a live pool.
    unsafe fn excludes_raw(fetch: Self::FetchRaw, key: EntityId) -> bool;
}

impl ExcludeSet for () {
    const LEN: usize = 0;

    fn component_ids() -> Vec<ComponentId> {
        Vec::new()
    }

    type Fetch<'a> = ();

    fn fetch(_pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::Fetch<'_> {}

    #[inline]
    fn excludes(_fetch: Self::Fetch<'_>, _key: EntityId) -> bool {
        false
    }

    type FetchRaw = ();

    fn fetch_raw(_pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::FetchRaw {}

    #[inline]
    unsafe fn excludes_raw(_fetch: Self::FetchRaw, _key: EntityId) -> bool {
        false
    }
}

macro_rules! impl_exclude_set {
    ($($name:ident),+) => {
        impl<$($name: 'static),+> ExcludeSet for ($($name,)+) {
            const LEN: usize = { [$(stringify!($name)),+].len() };

            fn component_ids() -> Vec<ComponentId> {
                vec![$(component_id_of::<$name>()),+]
            }

            type Fetch<'a> = ($(Option<&'a SparseSet<$name>>,)+);

            fn fetch(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::Fetch<'_> {
                ($(pool_components::<$name>(pools, component_id_of::<$name>()),)+)
            }

            #[inline]
            fn excludes(fetch: Self::Fetch<'_>, key: EntityId) -> bool {
                #[allow(non_snake_case)]
                let ($($name,)+) = fetch;
                false $(|| $name.map_or(false, |set| set.contains(key)))+
            }

            type FetchRaw = ($(Option<*const SparseSet<$name>>,)+);

            fn fetch_raw(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::FetchRaw {
                ($(
                    pool_components::<$name>(pools, component_id_of::<$name>())
                        .map(|set| set as *const SparseSet<$name>),
                )+)
            }

            #[inline]
            unsafe fn excludes_raw(fetch: Self::FetchRaw, key: EntityId) -> bool {
                #[allow(non_snake_case)]
                let ($($name,)+) = fetch;
                // SAFETY: caller guarantees the pointers are live; the
                // reference is transient.
                false $(|| $name.map_or(false, |set| unsafe { (*set).contains(key) }))+
            }
        }
    };
}

impl_exclude_set!(A);
impl_exclude_set!(A, B);
impl_exclude_set!(A, B, C);
impl_exclude_set!(A, B, C, D);

/// Compile-time set of component types a view must find **present**.
///
/// Implemented for component tuples of arity 1–4; the first tuple element
/// is the iteration driver. There is no arity-0 impl: an empty include set
/// is a contract violation and cannot be expressed.
pub trait IncludeSet {
    /// Number of included types.
    const LEN: usize;

    /// Component IDs of the included types in declared order, assigning IDs
    /// on first use.
    fn component_ids() -> Vec<ComponentId>;

    /// Creates any missing included pools (empty pools match nothing).
    fn ensure_pools(manager: &mut EntityManager);

    /// Bound included pools, driver first.
    type Fetch<'a>: Copy;

    /// Binds the included pools. Call after [`ensure_pools`](Self::ensure_pools).
    fn fetch(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::Fetch<'_>;

    /// Shared references to each included component, in declared order.
    type Item<'a>;

    /// Fetches `key`'s components, if every included pool contains it.
    fn get(fetch: Self::Fetch<'_>, key: EntityId) -> Option<Self::Item<'_>>;

    /// Fetches `key`'s component of type `T`, if `T` is an included type and
    /// its pool contains the key.
    fn get_one<'a, T: 'static>(fetch: Self::Fetch<'a>, key: EntityId) -> Option<&'a T>;

    /// Walks the driver pool once, invoking `f` for each entity that has
    /// every included type and no excluded type.
    fn for_each_shared<'a, EX, F>(fetch: Self::Fetch<'a>, exclude: EX::Fetch<'a>, f: F)
    where
        EX: ExcludeSet,
        F: FnMut(Entity, Self::Item<'a>);

    /// Raw-pointer form of [`Fetch`](Self::Fetch), for mutable views.
    type FetchMut: Copy;

    /// Mutable references to each included component, in declared order.
    type ItemMut<'a>;

    /// Binds the included pools as raw pointers. Call after
    /// [`ensure_pools`](Self::ensure_pools).
    fn fetch_mut(pools: &mut [Option<Box<dyn TypeErasedPool>>]) -> Self::FetchMut;

    /// Mutable-reference form of [`for_each_shared`](Self::for_each_shared).
    ///
    /// # Safety
    /// The pointers in `fetch` and `exclude` must point at live pools with
    /// pairwise-distinct component IDs, and the caller must hold the
    /// manager's unique borrow so no other access overlaps the walk.
    unsafe fn for_each_mut_raw<EX, F>(fetch: Self::FetchMut, exclude: EX::FetchRaw, f: F)
    where
        EX: ExcludeSet,
        F: for<'b> FnMut(Entity, Self::ItemMut<'b>);
}

macro_rules! impl_include_set {
    ($first:ident $(, $rest:ident)*) => {
        #[allow(non_snake_case)]
        impl<$first: 'static $(, $rest: 'static)*> IncludeSet for ($first, $($rest,)*) {
            const LEN: usize = { [stringify!($first) $(, stringify!($rest))*].len() };

            fn component_ids() -> Vec<ComponentId> {
                vec![component_id_of::<$first>() $(, component_id_of::<$rest>())*]
            }

            fn ensure_pools(manager: &mut EntityManager) {
                manager.ensure_pool::<$first>(component_id_of::<$first>());
                $(manager.ensure_pool::<$rest>(component_id_of::<$rest>());)*
            }

            type Fetch<'a> = (&'a SparseSet<$first>, $(&'a SparseSet<$rest>,)*);

            fn fetch(pools: &[Option<Box<dyn TypeErasedPool>>]) -> Self::Fetch<'_> {
                (
                    pool_components::<$first>(pools, component_id_of::<$first>())
                        .expect("include pools are created at view construction"),
                    $(
                        pool_components::<$rest>(pools, component_id_of::<$rest>())
                            .expect("include pools are created at view construction"),
                    )*
                )
            }

            type Item<'a> = (&'a $first, $(&'a $rest,)*);

            fn get(fetch: Self::Fetch<'_>, key: EntityId) -> Option<Self::Item<'_>> {
                let ($first, $($rest,)*) = fetch;
                Some(($first.get(key)?, $($rest.get(key)?,)*))
            }

            fn get_one<'a, T: 'static>(fetch: Self::Fetch<'a>, key: EntityId) -> Option<&'a T> {
                let ($first, $($rest,)*) = fetch;
                let any: &dyn Any = $first;
                if let Some(set) = any.downcast_ref::<SparseSet<T>>() {
                    return set.get(key);
                }
                $(
                    let any: &dyn Any = $rest;
                    if let Some(set) = any.downcast_ref::<SparseSet<T>>() {
                        return set.get(key);
                    }
                )*
                None
            }

            fn for_each_shared<'a, EX, F>(fetch: Self::Fetch<'a>, exclude: EX::Fetch<'a>, mut f: F)
            where
                EX: ExcludeSet,
                F: FnMut(Entity, Self::Item<'a>),
            {
                let ($first, $($rest,)*) = fetch;

                // For a single include with no exclusions both guards below
                // expand to constants, leaving a lookup-free walk over the
                // driver's packed elements.
                for (slot, &key) in $first.keys().iter().enumerate() {
                    if !(true $(&& $rest.contains(key))*) {
                        continue;
                    }
                    if EX::excludes(exclude, key) {
                        continue;
                    }
                    let item = (
                        &$first.elements()[slot],
                        $($rest.get(key).expect("membership verified above"),)*
                    );
                    f(Entity(key), item);
                }
            }

            type FetchMut = (*mut SparseSet<$first>, $(*mut SparseSet<$rest>,)*);

            type ItemMut<'a> = (&'a mut $first, $(&'a mut $rest,)*);

            fn fetch_mut(pools: &mut [Option<Box<dyn TypeErasedPool>>]) -> Self::FetchMut {
                let $first: *mut SparseSet<$first> = {
                    let pool = pools[component_id_of::<$first>() as usize]
                        .as_deref_mut()
                        .expect("include pools are created at view construction")
                        .as_any_mut()
                        .downcast_mut::<Pool<$first>>()
                        .expect("pool type matches its component id");
                    &mut pool.components
                };
                $(
                    let $rest: *mut SparseSet<$rest> = {
                        let pool = pools[component_id_of::<$rest>() as usize]
                            .as_deref_mut()
                            .expect("include pools are created at view construction")
                            .as_any_mut()
                            .downcast_mut::<Pool<$rest>>()
                            .expect("pool type matches its component id");
                        &mut pool.components
                    };
                )*
                ($first, $($rest,)*)
            }

            unsafe fn for_each_mut_raw<EX, F>(fetch: Self::FetchMut, exclude: EX::FetchRaw, mut f: F)
            where
                EX: ExcludeSet,
                F: for<'b> FnMut(Entity, Self::ItemMut<'b>),
            {
                let ($first, $($rest,)*) = fetch;

                // SAFETY (whole body): the pointers are live and pairwise
                // distinct per the caller's contract; every reference formed
                // below is either transient or handed to `f`, whose HRTB
                // signature prevents it from escaping the call.
                let len = unsafe { (*$first).len() };
                for slot in 0..len {
                    let key = unsafe { (*$first).keys()[slot] };
                    if !(true $(&& unsafe { (*$rest).contains(key) })*) {
                        continue;
                    }
                    if unsafe { EX::excludes_raw(exclude, key) } {
                        continue;
                    }
                    let item = unsafe {
                        (
                            &mut (*$first).elements_mut()[slot],
                            $((*$rest).get_mut(key).expect("membership verified above"),)*
                        )
                    };
                    f(Entity(key), item);
                }
            }
        }
    };
}

impl_include_set!(A);
impl_include_set!(A, B);
impl_include_set!(A, B, C);
impl_include_set!(A, B, C, D);

/// Checks the include/exclude contract: no repeated include, no overlap.
fn validate_sets<I: IncludeSet, E: ExcludeSet>() -> Result<(), ViewError> {
    let include = I::component_ids();
    for (index, &id) in include.iter().enumerate() {
        if include[..index].contains(&id) {
            return Err(ViewError::DuplicateInclude {
                component_id: id,
                name: component_name(id),
            });
        }
    }
    for id in E::component_ids() {
        if include.contains(&id) {
            return Err(ViewError::IncludeExcludeOverlap {
                component_id: id,
                name: component_name(id),
            });
        }
    }
    Ok(())
}

fn component_name(id: ComponentId) -> &'static str {
    component_description(id).map_or("<unregistered>", |desc| desc.name)
}

/// Read-only binding over a fixed include/exclude type set.
///
/// Holds shared references into the manager's pools; the manager cannot be
/// mutated while the view is alive.
pub struct View<'a, I: IncludeSet, E: ExcludeSet = ()> {
    include: I::Fetch<'a>,
    exclude: E::Fetch<'a>,
}

impl<'a, I: IncludeSet, E: ExcludeSet> std::fmt::Debug for View<'a, I, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View").finish_non_exhaustive()
    }
}

impl<'a, I: IncludeSet, E: ExcludeSet> View<'a, I, E> {
    /// Invokes `f` for every entity carrying all included and no excluded
    /// types, passing references to the included components in declared
    /// order. Iteration order follows the driver pool's current dense order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(Entity, I::Item<'a>),
    {
        I::for_each_shared::<E, F>(self.include, self.exclude, f);
    }

    /// Returns `entity`'s component of included type `T`; `None` if `T` is
    /// not in the include set or the entity does not carry it.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&'a T> {
        I::get_one::<T>(self.include, entity.key())
    }

    /// All included components for `entity`, if it currently matches the
    /// view's include and exclude sets.
    pub fn fetch(&self, entity: Entity) -> Option<I::Item<'a>> {
        if E::excludes(self.exclude, entity.key()) {
            return None;
        }
        I::get(self.include, entity.key())
    }
}

/// Mutable binding over a fixed include/exclude type set.
///
/// Yields mutable references to included components. Holds the manager's
/// unique borrow, so no structural mutation can overlap iteration.
pub struct ViewMut<'a, I: IncludeSet, E: ExcludeSet = ()> {
    include: I::FetchMut,
    exclude: E::FetchRaw,
    _manager: PhantomData<&'a mut EntityManager>,
}

impl<'a, I: IncludeSet, E: ExcludeSet> ViewMut<'a, I, E> {
    /// Mutable-reference counterpart of [`View::for_each`].
    pub fn for_each<F>(&mut self, f: F)
    where
        F: for<'b> FnMut(Entity, I::ItemMut<'b>),
    {
        // SAFETY: construction validated pairwise-distinct component IDs and
        // this view still holds the manager's unique borrow.
        unsafe { I::for_each_mut_raw::<E, F>(self.include, self.exclude, f) }
    }
}

impl EntityManager {
    /// Builds a read-only view over include set `I` and exclude set `E`.
    ///
    /// Fails if a type repeats inside `I` or appears in both sets. Missing
    /// included pools are created empty; missing excluded pools are left
    /// absent and never exclude.
    pub fn view<I: IncludeSet, E: ExcludeSet>(&mut self) -> Result<View<'_, I, E>, ViewError> {
        validate_sets::<I, E>()?;
        I::ensure_pools(self);
        let pools = self.pool_slice();
        Ok(View {
            include: I::fetch(pools),
            exclude: E::fetch(pools),
        })
    }

    /// Builds a mutable view over include set `I` and exclude set `E`.
    ///
    /// Same contract as [`view`](Self::view); the returned view yields
    /// mutable component references.
    pub fn view_mut<I: IncludeSet, E: ExcludeSet>(
        &mut self,
    ) -> Result<ViewMut<'_, I, E>, ViewError> {
        validate_sets::<I, E>()?;
        I::ensure_pools(self);
        let include = I::fetch_mut(self.pool_slice_mut());
        let exclude = E::fetch_raw(self.pool_slice());
        Ok(ViewMut {
            include,
            exclude,
            _manager: PhantomData,
        })
    }
}
