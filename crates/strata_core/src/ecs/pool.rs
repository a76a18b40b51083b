//! # Component Pools
//!
//! One [`SparseSet`] per registered component type, held behind a type-erased
//! interface and indexed by the type's **bit position**: a small integer
//! assigned once, in first-registration order, that doubles as the type's bit
//! in entity signatures.
//!
//! Type erasure stays inside this module and the query layer. The public
//! registry surface only ever hands out concretely-typed references; the
//! downcast from the erased pool back to `SparseSet<C>` is never the caller's
//! problem.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::constants::MAX_COMPONENT_COUNT;
use super::entity::EntityId;
use super::signature::Signature;
use super::sparse::SparseSet;

/// Marker trait for component types.
///
/// Any `Clone + Send + Sync + 'static` value type qualifies; no explicit impl
/// is needed. `Clone` is required because [`view`](crate::Registry::view)
/// returns owned snapshot rows.
pub trait Component: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Component for T {}

/// Uniform, non-generic interface over a component pool.
///
/// This is what lets `remove_entity` clean up an entity's components without
/// static knowledge of their types: the bit position recovered from the
/// entity's signature is enough to reach the right pool.
pub trait ErasedPool {
    /// Removes the component stored under `id`. No-op if absent.
    fn remove(&mut self, id: EntityId);

    /// Checks if a component is stored under `id`.
    fn contains(&self, id: EntityId) -> bool;

    /// The pool as `Any`, for the registry-internal downcast.
    fn as_any(&self) -> &dyn Any;

    /// The pool as mutable `Any`, for the registry-internal downcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedPool for SparseSet<C> {
    fn remove(&mut self, id: EntityId) {
        SparseSet::remove(self, id);
    }

    fn contains(&self, id: EntityId) -> bool {
        SparseSet::contains(self, id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The collection of component pools, one per registered type.
///
/// Bit positions are dense integers in first-registration order, keyed by
/// `TypeId` - never by type-name strings - so identity is deterministic for
/// the life of the process and cheap to compare.
pub struct PoolTable {
    /// Pools indexed by bit position.
    pools: Vec<Box<dyn ErasedPool>>,
    /// Component type to bit position.
    positions: HashMap<TypeId, usize>,
}

impl PoolTable {
    /// Creates an empty pool table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Registers a component type, assigning its bit position.
    ///
    /// Idempotent: a type already registered returns its existing position.
    ///
    /// # Returns
    ///
    /// The type's stable bit position.
    ///
    /// # Panics
    ///
    /// Panics if the table already holds [`MAX_COMPONENT_COUNT`] types; this
    /// is a configuration error, not a runtime condition.
    pub fn register<C: Component>(&mut self) -> usize {
        if let Some(&position) = self.positions.get(&TypeId::of::<C>()) {
            return position;
        }
        assert!(
            self.pools.len() < MAX_COMPONENT_COUNT,
            "component limit reached ({MAX_COMPONENT_COUNT} types), cannot register {}",
            type_name::<C>()
        );
        let position = self.pools.len();
        self.positions.insert(TypeId::of::<C>(), position);
        self.pools.push(Box::new(SparseSet::<C>::new()));
        tracing::trace!(component = type_name::<C>(), position, "registered component type");
        position
    }

    /// Returns the bit position of a registered type.
    #[inline]
    #[must_use]
    pub fn position_of<C: Component>(&self) -> Option<usize> {
        self.positions.get(&TypeId::of::<C>()).copied()
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Checks if no component types are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Fetches the pool for a registered type.
    ///
    /// # Returns
    ///
    /// The typed pool, or `None` if the type was never registered.
    #[must_use]
    pub fn pool<C: Component>(&self) -> Option<&SparseSet<C>> {
        let position = self.position_of::<C>()?;
        self.pools[position].as_any().downcast_ref::<SparseSet<C>>()
    }

    /// Fetches the pool for a registered type mutably.
    pub fn pool_mut<C: Component>(&mut self) -> Option<&mut SparseSet<C>> {
        let position = self.position_of::<C>()?;
        self.pools[position].as_any_mut().downcast_mut::<SparseSet<C>>()
    }

    /// Registers the type if needed and fetches its pool.
    ///
    /// This is the auto-registration path `emplace` uses; everything else
    /// goes through the explicit [`Self::register`] + [`Self::pool`] steps.
    ///
    /// # Returns
    ///
    /// The type's bit position and its pool.
    pub fn pool_or_register<C: Component>(&mut self) -> (usize, &mut SparseSet<C>) {
        let position = self.register::<C>();
        match self.pools[position].as_any_mut().downcast_mut::<SparseSet<C>>() {
            Some(pool) => (position, pool),
            None => panic!("pool at position {position} does not store {}", type_name::<C>()),
        }
    }

    /// Returns the erased pool at a bit position, for liveness probes.
    #[must_use]
    pub fn erased(&self, position: usize) -> Option<&dyn ErasedPool> {
        self.pools.get(position).map(Box::as_ref)
    }

    /// Removes `id` from every pool whose bit is set in `signature`.
    ///
    /// This is how entity destruction cleans up without static type
    /// knowledge: the signature records exactly which pools hold the entity.
    pub fn remove_everywhere(&mut self, id: EntityId, signature: Signature) {
        for position in signature.iter() {
            self.pools[position].remove(id);
        }
    }

    /// Borrows several pools mutably at once, by bit position.
    ///
    /// # Panics
    ///
    /// Panics if two positions coincide - the signature a query builds from a
    /// tuple with a repeated component type would alias a pool, which has no
    /// sound meaning under exclusive references.
    pub(crate) fn disjoint_mut<const N: usize>(
        &mut self,
        positions: [usize; N],
    ) -> [&mut Box<dyn ErasedPool>; N] {
        match self.pools.get_disjoint_mut(positions) {
            Ok(pools) => pools,
            Err(_) => panic!("duplicate component type in query tuple"),
        }
    }
}

impl Default for PoolTable {
    fn default() -> Self {
        Self::new()
    }
}
