//! # Signature Groups
//!
//! Maps each signature *in use* to the sparse set of entity ids holding
//! exactly that signature. Grouping by exact signature keeps the map bounded
//! by signature diversity - typically small and stable in a running
//! simulation - so a query is a scan over groups, each tested once with a
//! bitmask superset check, instead of a scan over entities.

use std::collections::HashMap;

use super::entity::EntityId;
use super::signature::Signature;
use super::sparse::SparseSet;

/// Index from exact signature to its member entities.
///
/// Membership is maintained incrementally on every signature transition, so
/// it is always current: a live entity is in exactly one group, the one keyed
/// by its current signature, and groups are dropped the moment they empty.
pub struct GroupIndex {
    groups: HashMap<Signature, SparseSet<EntityId>>,
}

impl GroupIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Adds `id` to the group keyed by `signature`, creating it on demand.
    pub fn insert(&mut self, signature: Signature, id: EntityId) {
        self.groups.entry(signature).or_default().insert(id, id);
    }

    /// Removes `id` from the group keyed by `signature`.
    ///
    /// No-op if the group or the membership does not exist. A group left
    /// empty is removed outright - stale empty groups would otherwise slow
    /// every future query scan.
    pub fn remove(&mut self, signature: Signature, id: EntityId) {
        if let Some(group) = self.groups.get_mut(&signature) {
            group.remove(id);
            if group.is_empty() {
                self.groups.remove(&signature);
            }
        }
    }

    /// Moves `id` from the group keyed by `old` to the group keyed by `new`.
    ///
    /// Called on every emplace/remove that changes an entity's signature.
    pub fn transfer(&mut self, id: EntityId, old: Signature, new: Signature) {
        self.remove(old, id);
        self.insert(new, id);
    }

    /// Returns the members of the group keyed by `signature`.
    #[must_use]
    pub fn group(&self, signature: Signature) -> Option<&SparseSet<EntityId>> {
        self.groups.get(&signature)
    }

    /// Iterates over `(signature, members)` for every group in use.
    ///
    /// Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (Signature, &SparseSet<EntityId>)> {
        self.groups.iter().map(|(signature, group)| (*signature, group))
    }

    /// Returns the number of distinct signatures in use.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Checks if no groups exist.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EntityId {
        EntityId::new(index)
    }

    #[test]
    fn test_insert_creates_group_on_demand() {
        let mut index = GroupIndex::new();
        let signature = Signature::EMPTY.with(0);

        index.insert(signature, id(1));
        index.insert(signature, id(2));

        assert_eq!(index.len(), 1);
        let group = index.group(signature).unwrap();
        assert!(group.contains(id(1)));
        assert!(group.contains(id(2)));
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let mut index = GroupIndex::new();
        let signature = Signature::EMPTY.with(3);

        index.insert(signature, id(1));
        index.remove(signature, id(1));

        assert!(index.is_empty());
        assert!(index.group(signature).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut index = GroupIndex::new();
        let signature = Signature::EMPTY.with(1);

        index.insert(signature, id(1));
        index.remove(signature, id(2));
        index.remove(Signature::EMPTY.with(9), id(1));

        assert_eq!(index.len(), 1);
        assert!(index.group(signature).unwrap().contains(id(1)));
    }

    #[test]
    fn test_transfer_moves_membership() {
        let mut index = GroupIndex::new();
        let old = Signature::EMPTY.with(0);
        let new = old.with(1);

        index.insert(old, id(7));
        index.transfer(id(7), old, new);

        assert!(index.group(old).is_none());
        assert!(index.group(new).unwrap().contains(id(7)));
        assert_eq!(index.len(), 1);
    }
}
