//! # STRATA Core Engine
//!
//! Sparse-set entity-component storage designed for:
//! - Many short queries per simulation frame
//! - O(1) amortized insert/update/remove/lookup
//! - Memory that scales with ids actually used, not with configured caps
//!
//! ## Architecture Rules
//!
//! 1. **Exact-signature grouping** - queries scan distinct signatures, never
//!    all entities
//! 2. **Swap-removal everywhere** - removal is O(1); dense order is not
//!    stable and nothing may rely on it
//! 3. **Contract violations abort** - reading a component an entity does not
//!    own is a programmer error, not a runtime condition
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::Registry;
//!
//! let mut registry = Registry::new();
//! let player = registry.create_entity();
//! registry.emplace(player, Position::new(0.0, 0.0, 0.0));
//! for (id, (position,)) in registry.view::<(Position,)>() {
//!     // owned snapshot row
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    Component, ComponentSet, EntityAllocator, EntityId, ErasedPool, GroupIndex, PoolTable,
    Registry, Signature, SignatureIter, SparseSet, TOMBSTONE,
};
pub use error::{EcsError, EcsResult};
