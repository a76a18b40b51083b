//! # Query Protocol
//!
//! A query names its component types as a tuple: `(Position,)`,
//! `(Position, Velocity)`, and so on up to eight types. The tuple builds a
//! target bitmask once; the registry then scans every signature group whose
//! signature is a superset of the mask and fetches each requested component
//! directly from its pool, O(1) per component.
//!
//! ## Contract
//!
//! Every queried type must already be registered (registration happens on
//! first `emplace`, or explicitly); querying an unregistered type is a fatal
//! contract violation, as is repeating a type within one tuple - exclusive
//! references to the same pool cannot alias.

use std::any::type_name;

use super::entity::EntityId;
use super::pool::{Component, PoolTable};
use super::signature::Signature;
use super::sparse::SparseSet;

/// A tuple of component types usable with `get_entity`, `view`, and `each`.
///
/// Implemented for tuples of 1 to 8 [`Component`] types. The associated
/// types are the three row shapes a query can yield: owned snapshots for
/// `view`, shared references for `get_entity`, exclusive references for
/// `each` and `get_entity_mut`.
pub trait ComponentSet {
    /// Owned snapshot row: `(A, B, ...)`.
    type Row;
    /// Shared-reference row: `(&A, &B, ...)`.
    type Ref<'a>;
    /// Exclusive-reference row: `(&mut A, &mut B, ...)`.
    type RefMut<'a>;

    /// Builds the target bitmask with exactly the requested bits set.
    ///
    /// # Panics
    ///
    /// Panics if a queried type is unregistered or appears twice.
    fn signature(pools: &PoolTable) -> Signature;

    /// Clones one row out of the pools.
    ///
    /// # Panics
    ///
    /// Panics if the entity lacks any requested component.
    fn row(pools: &PoolTable, id: EntityId) -> Self::Row;

    /// Borrows one row from the pools.
    ///
    /// # Panics
    ///
    /// Panics if the entity lacks any requested component.
    fn row_ref(pools: &PoolTable, id: EntityId) -> Self::Ref<'_>;

    /// Borrows one row mutably from the pools.
    ///
    /// # Panics
    ///
    /// Panics if the entity lacks any requested component.
    fn row_mut(pools: &mut PoolTable, id: EntityId) -> Self::RefMut<'_>;
}

/// Bit position of `C`, fatal if `C` was never registered.
fn required_position<C: Component>(pools: &PoolTable) -> usize {
    match pools.position_of::<C>() {
        Some(position) => position,
        None => panic!(
            "query references unregistered component type {}",
            type_name::<C>()
        ),
    }
}

/// Shared fetch of one component, fatal if absent.
fn fetch<C: Component>(pools: &PoolTable, id: EntityId) -> &C {
    let pool = match pools.pool::<C>() {
        Some(pool) => pool,
        None => panic!(
            "query references unregistered component type {}",
            type_name::<C>()
        ),
    };
    match pool.get(id) {
        Some(value) => value,
        None => panic!(
            "entity {id:?} does not have component {}",
            type_name::<C>()
        ),
    }
}

/// Exclusive fetch of one component out of an erased pool, fatal if absent.
fn fetch_mut<C: Component>(pool: &mut dyn std::any::Any, id: EntityId) -> &mut C {
    let pool = match pool.downcast_mut::<SparseSet<C>>() {
        Some(pool) => pool,
        None => panic!("pool position does not store {}", type_name::<C>()),
    };
    match pool.get_mut(id) {
        Some(value) => value,
        None => panic!(
            "entity {id:?} does not have component {}",
            type_name::<C>()
        ),
    }
}

macro_rules! component_set_impl {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Row = ($($name,)+);
            type Ref<'a> = ($(&'a $name,)+);
            type RefMut<'a> = ($(&'a mut $name,)+);

            fn signature(pools: &PoolTable) -> Signature {
                let mut mask = Signature::EMPTY;
                let mut arity = 0_usize;
                $(
                    mask = mask.with(required_position::<$name>(pools));
                    arity += 1;
                )+
                assert!(
                    mask.count() == arity,
                    "duplicate component type in query tuple"
                );
                mask
            }

            fn row(pools: &PoolTable, id: EntityId) -> Self::Row {
                ($(fetch::<$name>(pools, id).clone(),)+)
            }

            fn row_ref(pools: &PoolTable, id: EntityId) -> Self::Ref<'_> {
                ($(fetch::<$name>(pools, id),)+)
            }

            #[allow(non_snake_case)]
            fn row_mut(pools: &mut PoolTable, id: EntityId) -> Self::RefMut<'_> {
                let positions = [$(required_position::<$name>(pools),)+];
                // Rejects duplicate positions, so the references are disjoint
                let [$($name,)+] = pools.disjoint_mut(positions);
                ($(fetch_mut::<$name>($name.as_any_mut(), id),)+)
            }
        }
    };
}

component_set_impl!(A);
component_set_impl!(A, B);
component_set_impl!(A, B, C);
component_set_impl!(A, B, C, D);
component_set_impl!(A, B, C, D, E);
component_set_impl!(A, B, C, D, E, F);
component_set_impl!(A, B, C, D, E, F, G);
component_set_impl!(A, B, C, D, E, F, G, H);
