//! # The Registry
//!
//! The single facade over entity lifecycle, component storage, and queries.
//! Every mutation updates a pool, then recomputes the entity's signature and
//! moves it between groups, so the group index is always current. Every query
//! computes a target mask once and scans the group index, which is bounded by
//! the number of distinct signatures in use, not by entity count.
//!
//! ## Aliasing & reentrancy
//!
//! References handed out by [`Registry::get_entity`] and the `each` callbacks
//! stay valid only until the next mutating call; the borrow checker enforces
//! this. In particular, `each` holds the registry exclusively for the whole
//! iteration, so adding or removing components from inside a callback is a
//! compile error, not a runtime hazard. [`Registry::view`] returns owned
//! snapshot rows that survive later mutation.

use std::any::type_name;

use crate::error::{EcsError, EcsResult};

use super::constants::MAX_ENTITY_COUNT;
use super::entity::{EntityAllocator, EntityId};
use super::group::GroupIndex;
use super::pool::{Component, PoolTable};
use super::query::ComponentSet;
use super::signature::Signature;
use super::sparse::SparseSet;

/// In-process store for entities and their typed components.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = Registry::new();
/// let id = registry.create_entity();
/// registry.emplace(id, Position::new(0.0, 0.0, 0.0));
/// registry.each::<(Position,), _>(|(position,)| {
///     position.x += 1.0;
/// });
/// ```
pub struct Registry {
    /// Entity id issue and recycling.
    allocator: EntityAllocator,
    /// One pool per registered component type.
    pools: PoolTable,
    /// Current signature of every live entity.
    signatures: SparseSet<Signature>,
    /// Exact-signature grouping of live entities.
    groups: GroupIndex,
}

impl Registry {
    /// Creates a registry with the default [`MAX_ENTITY_COUNT`] entity cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_entity_limit(MAX_ENTITY_COUNT)
    }

    /// Creates a registry with an explicit entity cap.
    #[must_use]
    pub fn with_entity_limit(limit: usize) -> Self {
        Self {
            allocator: EntityAllocator::with_limit(limit),
            pools: PoolTable::new(),
            signatures: SparseSet::new(),
            groups: GroupIndex::new(),
        }
    }

    /// Returns the entity cap this registry was built with.
    #[inline]
    #[must_use]
    pub fn entity_limit(&self) -> usize {
        self.allocator.limit()
    }

    /// Creates an entity with no components and an empty signature.
    ///
    /// # Returns
    ///
    /// A fresh or recycled id, or [`EntityId::NULL`] when the cap is
    /// exhausted.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.allocator.create();
        if id.is_null() {
            return id;
        }
        self.signatures.insert(id, Signature::EMPTY);
        self.groups.insert(Signature::EMPTY, id);
        id
    }

    /// Creates an entity, reporting exhaustion as an error.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityLimitReached`] when the cap is exhausted.
    pub fn try_create_entity(&mut self) -> EcsResult<EntityId> {
        let id = self.create_entity();
        if id.is_null() {
            return Err(EcsError::EntityLimitReached {
                limit: self.allocator.limit(),
            });
        }
        Ok(id)
    }

    /// Registers a component type, assigning its stable bit position.
    ///
    /// Idempotent; `emplace` also registers implicitly on first use.
    ///
    /// # Panics
    ///
    /// Panics past [`MAX_COMPONENT_COUNT`](super::constants::MAX_COMPONENT_COUNT)
    /// distinct types.
    pub fn register_component<C: Component>(&mut self) -> usize {
        self.pools.register::<C>()
    }

    /// Checks if an entity is currently live.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.signatures.contains(id)
    }

    /// Checks if a live entity owns a component of type `C`.
    #[inline]
    #[must_use]
    pub fn contains_component<C: Component>(&self, id: EntityId) -> bool {
        self.pools.pool::<C>().is_some_and(|pool| pool.contains(id))
    }

    /// Returns the current signature of an entity.
    ///
    /// # Returns
    ///
    /// The signature, or `None` when the entity is not live.
    #[inline]
    #[must_use]
    pub fn signature_of(&self, id: EntityId) -> Option<Signature> {
        self.signatures.get(id).copied()
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the number of distinct signatures currently in use.
    ///
    /// Query cost is proportional to this, not to entity count.
    #[inline]
    #[must_use]
    pub fn distinct_signatures(&self) -> usize {
        self.groups.len()
    }

    /// Attaches a component to an entity, overwriting any existing value.
    ///
    /// Registers `C` on first use. The entity's signature gains the type's
    /// bit and the entity moves to the matching group. A null or dead id is
    /// a logged no-op; destroyed entities are not resurrected.
    pub fn emplace<C: Component>(&mut self, id: EntityId, component: C) {
        if id.is_null() {
            tracing::debug!("emplace on the null entity ignored");
            return;
        }
        let Some(&old) = self.signatures.get(id) else {
            tracing::debug!(entity = id.index(), "emplace on a dead entity ignored");
            return;
        };
        let (position, pool) = self.pools.pool_or_register::<C>();
        pool.insert(id, component);
        let new = old.with(position);
        if new != old {
            self.signatures.insert(id, new);
            self.groups.transfer(id, old, new);
        }
    }

    /// Detaches a component from an entity.
    ///
    /// No-op when the entity is dead, the type was never registered, or the
    /// entity does not own it; removal of what is absent alters nothing.
    pub fn remove<C: Component>(&mut self, id: EntityId) {
        let Some(&old) = self.signatures.get(id) else {
            tracing::debug!(entity = id.index(), "component removal on a dead entity ignored");
            return;
        };
        let Some(position) = self.pools.position_of::<C>() else {
            return;
        };
        if !old.test(position) {
            return;
        }
        if let Some(pool) = self.pools.pool_mut::<C>() {
            pool.remove(id);
        }
        let new = old.without(position);
        self.signatures.insert(id, new);
        self.groups.transfer(id, old, new);
    }

    /// Destroys an entity: every owned component is dropped, its group
    /// membership and signature are cleared, and the id returns to the
    /// allocator's free pool.
    ///
    /// No-op when the entity is not live, so destruction is idempotent.
    pub fn remove_entity(&mut self, id: EntityId) {
        let Some(&signature) = self.signatures.get(id) else {
            tracing::debug!(entity = id.index(), "destruction of a dead entity ignored");
            return;
        };
        self.pools.remove_everywhere(id, signature);
        self.groups.remove(signature, id);
        self.signatures.remove(id);
        self.allocator.release(id);
    }

    /// Gets one component of a live entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::NoSuchEntity`] when the entity is dead,
    /// [`EcsError::MissingComponent`] when it does not own `C`.
    pub fn try_get<C: Component>(&self, id: EntityId) -> EcsResult<&C> {
        if !self.contains(id) {
            return Err(EcsError::NoSuchEntity(id));
        }
        self.pools
            .pool::<C>()
            .and_then(|pool| pool.get(id))
            .ok_or_else(|| EcsError::MissingComponent {
                entity: id,
                component: type_name::<C>(),
            })
    }

    /// Gets one component of a live entity mutably.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::try_get`].
    pub fn try_get_mut<C: Component>(&mut self, id: EntityId) -> EcsResult<&mut C> {
        if !self.contains(id) {
            return Err(EcsError::NoSuchEntity(id));
        }
        match self.pools.pool_mut::<C>().and_then(|pool| pool.get_mut(id)) {
            Some(component) => Ok(component),
            None => Err(EcsError::MissingComponent {
                entity: id,
                component: type_name::<C>(),
            }),
        }
    }

    /// Gets several components of one entity at once, by shared reference.
    ///
    /// # Panics
    ///
    /// Panics when the entity is dead or lacks any requested component:
    /// both are contract violations, not runtime conditions.
    #[must_use]
    pub fn get_entity<Q: ComponentSet>(&self, id: EntityId) -> Q::Ref<'_> {
        assert!(self.contains(id), "entity {id:?} does not exist");
        Q::row_ref(&self.pools, id)
    }

    /// Gets several components of one entity at once, by exclusive reference.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Self::get_entity`], plus a repeated component
    /// type in the tuple.
    pub fn get_entity_mut<Q: ComponentSet>(&mut self, id: EntityId) -> Q::RefMut<'_> {
        assert!(self.contains(id), "entity {id:?} does not exist");
        Q::row_mut(&mut self.pools, id)
    }

    /// Materializes a snapshot of every entity owning all of `Q`'s types.
    ///
    /// Rows are owned clones: the snapshot is complete before the caller
    /// observes it and is not kept in sync with later mutations. Every
    /// matching entity appears exactly once; order is unspecified.
    ///
    /// # Panics
    ///
    /// Panics when a queried type is unregistered or repeated.
    #[must_use]
    pub fn view<Q: ComponentSet>(&self) -> Vec<(EntityId, Q::Row)> {
        let mask = Q::signature(&self.pools);
        let mut rows = Vec::new();
        for (signature, members) in self.groups.iter() {
            if signature.contains_all(mask) {
                for &id in members.ids() {
                    rows.push((id, Q::row(&self.pools, id)));
                }
            }
        }
        rows
    }

    /// Invokes `callback` once per entity owning all of `Q`'s types, with
    /// exclusive references to the requested components.
    ///
    /// The registry is exclusively borrowed for the whole iteration, so the
    /// callback cannot add or remove components or entities; mutate the
    /// component values in place and defer structural changes.
    ///
    /// # Panics
    ///
    /// Panics when a queried type is unregistered or repeated.
    pub fn each<Q, F>(&mut self, mut callback: F)
    where
        Q: ComponentSet,
        F: for<'r> FnMut(Q::RefMut<'r>),
    {
        let mask = Q::signature(&self.pools);
        let Self { pools, groups, .. } = self;
        for (signature, members) in groups.iter() {
            if signature.contains_all(mask) {
                for &id in members.ids() {
                    callback(Q::row_mut(pools, id));
                }
            }
        }
    }

    /// Like [`Self::each`], but the callback also receives the entity id.
    ///
    /// # Panics
    ///
    /// Panics when a queried type is unregistered or repeated.
    pub fn each_entity<Q, F>(&mut self, mut callback: F)
    where
        Q: ComponentSet,
        F: for<'r> FnMut(EntityId, Q::RefMut<'r>),
    {
        let mask = Q::signature(&self.pools);
        let Self { pools, groups, .. } = self;
        for (signature, members) in groups.iter() {
            if signature.contains_all(mask) {
                for &id in members.ids() {
                    callback(id, Q::row_mut(pools, id));
                }
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
