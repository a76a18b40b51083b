//! # Entity Identity & Lifecycle
//!
//! Entities are bare `u32` handles with no inherent data; they become
//! meaningful through the components keyed under them. The allocator issues
//! ids lazily in chunks up to a hard cap and recycles released ids in FIFO
//! order, so id bookkeeping scales with ids actually used.

use std::collections::VecDeque;

use super::constants::{ENTITY_CHUNK_SIZE, MAX_ENTITY_COUNT};

/// Unique identifier for an entity.
///
/// Ids are unique among live entities and reused after destruction. The
/// registry clears every trace of a destroyed entity before its id returns to
/// the free pool, so a recycled id carries no data from its previous life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Null/invalid entity id, returned when allocation fails.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates an entity id from a raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this id.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Checks if this id is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Issues and recycles entity ids.
///
/// Fresh ids are materialized into the free queue one chunk of
/// [`ENTITY_CHUNK_SIZE`] at a time, only when the queue runs dry and the hard
/// cap has not been reached. Released ids go to the back of the queue, so
/// reuse is FIFO: the oldest released id is handed out first.
///
/// The allocator does not track liveness; guarding against double release is
/// the registry's job.
pub struct EntityAllocator {
    /// Ids available for issue, oldest first.
    free: VecDeque<EntityId>,
    /// High-water mark: ids below this have been materialized at least once.
    issued: u32,
    /// Hard cap on ids this allocator will ever materialize.
    limit: u32,
}

impl EntityAllocator {
    /// Creates an allocator with the default [`MAX_ENTITY_COUNT`] cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(MAX_ENTITY_COUNT)
    }

    /// Creates an allocator with an explicit id cap.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of distinct ids to issue
    ///
    /// # Panics
    ///
    /// Panics if `limit` does not leave room for the null sentinel.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        assert!(
            u32::try_from(limit).is_ok_and(|limit| limit < u32::MAX),
            "entity limit {limit} must stay below the null sentinel"
        );
        Self {
            free: VecDeque::new(),
            issued: 0,
            limit: limit as u32,
        }
    }

    /// Returns the hard cap on issued ids.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit as usize
    }

    /// Issues an entity id.
    ///
    /// # Returns
    ///
    /// A fresh or recycled id, or [`EntityId::NULL`] when the cap is
    /// exhausted. Exhaustion leaves the allocator unchanged.
    #[inline]
    pub fn create(&mut self) -> EntityId {
        if self.free.is_empty() && !self.refill() {
            tracing::warn!(limit = self.limit, "entity limit reached, returning the null entity");
            return EntityId::NULL;
        }
        // Refill guarantees at least one queued id
        match self.free.pop_front() {
            Some(id) => id,
            None => EntityId::NULL,
        }
    }

    /// Returns an id to the free pool.
    ///
    /// The caller must ensure `id` was issued by this allocator and is not
    /// already free; the registry enforces this by releasing only live ids.
    #[inline]
    pub fn release(&mut self, id: EntityId) {
        self.free.push_back(id);
    }

    /// Materializes the next chunk of sequential fresh ids.
    ///
    /// # Returns
    ///
    /// `false` if the cap was already reached and no ids were added.
    fn refill(&mut self) -> bool {
        if self.issued == self.limit {
            return false;
        }
        let next_issued = self.issued.saturating_add(ENTITY_CHUNK_SIZE as u32).min(self.limit);
        for index in self.issued..next_issued {
            self.free.push_back(EntityId::new(index));
        }
        self.issued = next_issued;
        true
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sentinel() {
        assert!(EntityId::NULL.is_null());
        assert!(!EntityId::new(0).is_null());
        assert_eq!(EntityId::default(), EntityId::NULL);
        assert_eq!(EntityId::new(42).index(), 42);
    }

    #[test]
    fn test_sequential_issue() {
        let mut allocator = EntityAllocator::new();
        let first = allocator.create();
        let second = allocator.create();
        assert_eq!(first, EntityId::new(0));
        assert_eq!(second, EntityId::new(1));
    }

    #[test]
    fn test_fifo_reuse() {
        let mut allocator = EntityAllocator::new();
        let a = allocator.create();
        let b = allocator.create();

        allocator.release(a);
        allocator.release(b);

        // Fresh ids from the first chunk are still queued ahead of releases;
        // drain them so reuse order is observable.
        let mut drained = Vec::new();
        loop {
            let id = allocator.create();
            if id == a {
                break;
            }
            drained.push(id);
        }
        assert_eq!(allocator.create(), b);
        assert!(!drained.contains(&a));
        assert!(!drained.contains(&b));
    }

    #[test]
    fn test_exhaustion_returns_null() {
        let mut allocator = EntityAllocator::with_limit(3);
        assert_eq!(allocator.create(), EntityId::new(0));
        assert_eq!(allocator.create(), EntityId::new(1));
        assert_eq!(allocator.create(), EntityId::new(2));
        assert_eq!(allocator.create(), EntityId::NULL);
        // Exhaustion is not sticky: releasing an id makes it available again.
        allocator.release(EntityId::new(1));
        assert_eq!(allocator.create(), EntityId::new(1));
        assert_eq!(allocator.create(), EntityId::NULL);
    }

    #[test]
    fn test_chunked_growth_stops_at_limit() {
        let mut allocator = EntityAllocator::with_limit(ENTITY_CHUNK_SIZE + 5);
        for expected in 0..ENTITY_CHUNK_SIZE + 5 {
            assert_eq!(allocator.create(), EntityId::new(expected as u32));
        }
        assert_eq!(allocator.create(), EntityId::NULL);
    }
}
