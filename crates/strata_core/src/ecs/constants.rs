//! # Storage Engine Constants
//!
//! Compile-time configuration for the registry and its sparse sets.
//!
//! **CRITICAL:** These values are baked into the binary. Changes require a
//! rebuild of every crate that embeds the registry.

// =============================================================================
// REGISTRY CONFIGURATION
// =============================================================================

/// Hard cap on the number of entity ids the allocator will ever issue.
///
/// Reached ids are recycled, so this bounds *simultaneously live* entities.
/// `Registry::with_entity_limit` can lower the cap per instance; it can never
/// raise it past this value's `u32` range.
pub const MAX_ENTITY_COUNT: usize = 100_000;

/// Number of fresh entity ids materialized per allocator refill.
///
/// Ids are issued lazily in chunks so bookkeeping scales with ids actually
/// used, not with [`MAX_ENTITY_COUNT`].
pub const ENTITY_CHUNK_SIZE: usize = 1_000;

/// Maximum number of distinct component types a registry can hold.
///
/// Each registered type is assigned one bit position in an entity signature.
/// Registering more types than this is a fatal configuration error.
pub const MAX_COMPONENT_COUNT: usize = 64;

// =============================================================================
// SPARSE SET CONFIGURATION
// =============================================================================

/// Additional dense-array capacity reserved when a sparse set fills up.
pub const DENSE_CHUNK_SIZE: usize = 3_200;

/// Number of slots per lazily-allocated sparse-index page.
///
/// Memory for the sparse index scales with "pages touched", in increments of
/// this many slots, rather than with the maximum entity id.
pub const SPARSE_PAGE_SIZE: usize = 1_600;

// Signatures are backed by a u64, one bit per component type.
const _: () = assert!(MAX_COMPONENT_COUNT <= u64::BITS as usize);
