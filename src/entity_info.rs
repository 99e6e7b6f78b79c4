// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The entity info index: the authoritative "where is this entity" table.
//!
//! One logical record per entity id, split across three parallel
//! [`JaggedArray`]s so each field stays cache-dense: the reuse version,
//! the owning archetype, and the slot within it. Archetype and slot are
//! written and cleared as a pair; the version outlives a removal so a
//! recycled id can be told apart from its previous occupant.
//!
//! Mutating operations assume exclusive access during a structural
//! change; nothing here is internally synchronized.

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::archetype::{Archetype, ArchetypeId};
use crate::jagged::JaggedArray;
use crate::slot::Slot;

/// Snapshot of one entity's index record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityInfo {
    pub version: i32,
    pub archetype: ArchetypeId,
    pub slot: Slot,
}

/// Id-keyed index from entity to archetype, slot and version
pub struct EntityInfoStorage {
    versions: JaggedArray<i32>,
    archetypes: JaggedArray<ArchetypeId>,
    slots: JaggedArray<Slot>,
}

impl EntityInfoStorage {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            versions: JaggedArray::new(),
            archetypes: JaggedArray::new(),
            slots: JaggedArray::new(),
        }
    }

    /// Register an id, brand new or recycled.
    ///
    /// The version is whatever the id allocator hands us; on a recycled
    /// id it must exceed the one stored for the previous occupant.
    pub fn add(&mut self, id: usize, version: i32, archetype: ArchetypeId, slot: Slot) {
        self.versions.set(id, version);
        self.archetypes.set(id, archetype);
        self.slots.set(id, slot);
    }

    /// True if `id` currently resolves to a live row.
    ///
    /// Presence is carried by the archetype/slot pair, not the version:
    /// the version deliberately survives [`remove`](Self::remove) so the
    /// recycling policy can read and bump it.
    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.archetypes.try_get(id).is_some()
    }

    /// Stored version for `id`, filler (-1) if never registered.
    ///
    /// Fast path; callers that cannot vouch for the id use
    /// [`try_get_version`](Self::try_get_version).
    #[inline]
    pub fn version(&self, id: usize) -> i32 {
        self.versions.try_get(id).copied().unwrap_or(-1)
    }

    /// Stored version for `id`, `None` if never registered.
    ///
    /// The safe lookup behind handle-validity checks. Note the recycling
    /// window: between `remove` and the allocator's bump this still
    /// returns the old occupant's version, so a validity check must also
    /// consult [`contains`](Self::contains).
    #[inline]
    pub fn try_get_version(&self, id: usize) -> Option<i32> {
        self.versions.try_get(id).copied()
    }

    /// Owning archetype of `id`.
    ///
    /// Caller has already established presence; an unset id yields the
    /// invalid archetype id, never a torn read.
    #[inline]
    pub fn archetype(&self, id: usize) -> ArchetypeId {
        debug_assert!(self.contains(id));
        self.archetypes
            .try_get(id)
            .copied()
            .unwrap_or(ArchetypeId::INVALID)
    }

    /// Slot of `id`; same trust contract as [`archetype`](Self::archetype)
    #[inline]
    pub fn slot(&self, id: usize) -> Slot {
        debug_assert!(self.contains(id));
        self.slots.try_get(id).copied().unwrap_or(Slot::INVALID)
    }

    /// Mutable slot of `id`, for in-place row updates during compaction
    #[inline]
    pub fn slot_mut(&mut self, id: usize) -> &mut Slot {
        debug_assert!(self.contains(id));
        self.slots.get_mut(id)
    }

    /// Live borrows of the archetype/slot pair of one id.
    ///
    /// For callers that rewrite both fields together; the borrows end
    /// with the call site, so they can never dangle across a
    /// growth-triggering operation.
    pub fn entity_slot_mut(&mut self, id: usize) -> (&mut ArchetypeId, &mut Slot) {
        debug_assert!(self.contains(id));
        (self.archetypes.get_mut(id), self.slots.get_mut(id))
    }

    /// Convenience triple read, no presence check
    pub fn info(&self, id: usize) -> EntityInfo {
        EntityInfo {
            version: self.version(id),
            archetype: self.archetypes
                .try_get(id)
                .copied()
                .unwrap_or(ArchetypeId::INVALID),
            slot: self.slots.try_get(id).copied().unwrap_or(Slot::INVALID),
        }
    }

    /// Unregister `id`: clears archetype and slot, leaves the version.
    ///
    /// Bumping the version is the id allocator's job, done before the id
    /// is reissued; this index stores whatever it is later given by
    /// [`add`](Self::add).
    pub fn remove(&mut self, id: usize) {
        self.archetypes.remove(id);
        self.slots.remove(id);
    }

    /// Relocate `id` within its current archetype
    #[inline]
    pub fn move_within(&mut self, id: usize, slot: Slot) {
        debug_assert!(self.contains(id));
        self.slots.set(id, slot);
    }

    /// Relocate `id` to a row of another archetype; both fields rewritten
    #[inline]
    pub fn move_to(&mut self, id: usize, archetype: ArchetypeId, slot: Slot) {
        self.archetypes.set(id, archetype);
        self.slots.set(id, slot);
    }

    /// Number of ids currently addressable without growth
    pub fn capacity(&self) -> usize {
        self.archetypes.capacity()
    }

    /// Pre-grow all three arrays to cover ids below `capacity`
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.versions.ensure_capacity(capacity);
        self.archetypes.ensure_capacity(capacity);
        self.slots.ensure_capacity(capacity);
    }

    /// Free trailing all-empty blocks of all three arrays
    pub fn trim_excess(&mut self) {
        self.versions.trim_excess();
        self.archetypes.trim_excess();
        self.slots.trim_excess();
    }

    /// Forget every entity, versions included; capacity is retained.
    ///
    /// The one operation allowed to reset versions.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.archetypes.clear();
        self.slots.clear();
    }

    /// Repair the index after a bulk row copy between archetype ranges.
    ///
    /// `from` is the highest source row of the copied range, `to` the
    /// row its lowest entity now occupies in `destination`. The copy
    /// itself has already happened; this pass only rewrites bookkeeping.
    ///
    /// Chunks are walked from `from.chunk_index` down to
    /// `to.chunk_index`, rows in decreasing order within each chunk.
    /// Each visited row's occupant is read from the source chunk and
    /// moved to its slot rebased into the destination's chunk capacity.
    /// Decreasing order is what makes a single unconditional pass
    /// correct for in-place compaction as well: a stale occupant read at
    /// its old, higher row is overwritten by the later write from its
    /// new, lower row.
    ///
    /// Malformed ranges are a caller bug, asserted in debug builds.
    pub fn shift(
        &mut self,
        source: &Archetype,
        from: Slot,
        destination_id: ArchetypeId,
        destination: &Archetype,
        to: Slot,
    ) {
        debug_assert!(from.chunk_index >= to.chunk_index);
        debug_assert!(from.chunk_index < source.chunk_count());

        #[cfg(feature = "profiling")]
        let span = info_span!(
            "entity_info.shift",
            from_chunk = from.chunk_index,
            to_chunk = to.chunk_index
        );
        #[cfg(feature = "profiling")]
        let _guard = span.enter();

        let source_capacity = source.entities_per_chunk();
        let destination_capacity = destination.entities_per_chunk();

        let mut chunk_index = from.chunk_index;
        loop {
            let chunk = source.chunk(chunk_index);
            let is_first = chunk_index == from.chunk_index;
            let is_last = chunk_index == to.chunk_index;

            debug_assert!(is_first || chunk.size() > 0);
            let upper = if is_first { from.index } else { chunk.size() - 1 };
            let lower = if is_last { to.index } else { 0 };

            for index in (lower..=upper).rev() {
                let entity = chunk.entity(index);
                let rebased =
                    Slot::new(index, chunk_index).rebase(source_capacity, destination_capacity);
                self.move_to(entity.id, destination_id, rebased);
            }

            if is_last {
                break;
            }
            chunk_index -= 1;
        }
    }
}

impl Default for EntityInfoStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_lookups() {
        let mut info = EntityInfoStorage::new();
        info.add(3, 0, ArchetypeId(1), Slot::new(5, 0));

        assert!(info.contains(3));
        assert!(!info.contains(2));
        assert_eq!(info.version(3), 0);
        assert_eq!(info.try_get_version(3), Some(0));
        assert_eq!(info.try_get_version(99), None);
        assert_eq!(info.archetype(3), ArchetypeId(1));
        assert_eq!(info.slot(3), Slot::new(5, 0));

        let snapshot = info.info(3);
        assert_eq!(snapshot.version, 0);
        assert_eq!(snapshot.archetype, ArchetypeId(1));
        assert_eq!(snapshot.slot, Slot::new(5, 0));
    }

    #[test]
    fn test_remove_keeps_version_for_recycling() {
        let mut info = EntityInfoStorage::new();
        info.add(7, 2, ArchetypeId(0), Slot::new(0, 0));
        info.remove(7);

        assert!(!info.contains(7));
        // The old occupant's version is still visible until the
        // allocator reissues the id
        assert_eq!(info.try_get_version(7), Some(2));

        // Reissue with a bumped version
        info.add(7, 3, ArchetypeId(1), Slot::new(4, 0));
        assert!(info.contains(7));
        assert_eq!(info.try_get_version(7), Some(3));
    }

    #[test]
    fn test_moves() {
        let mut info = EntityInfoStorage::new();
        info.add(1, 0, ArchetypeId(0), Slot::new(9, 0));

        info.move_within(1, Slot::new(3, 0));
        assert_eq!(info.archetype(1), ArchetypeId(0));
        assert_eq!(info.slot(1), Slot::new(3, 0));

        info.move_to(1, ArchetypeId(2), Slot::new(0, 1));
        assert_eq!(info.archetype(1), ArchetypeId(2));
        assert_eq!(info.slot(1), Slot::new(0, 1));
    }

    #[test]
    fn test_entity_slot_mut_rewrites_pair() {
        let mut info = EntityInfoStorage::new();
        info.add(4, 0, ArchetypeId(0), Slot::new(2, 0));

        let (archetype, slot) = info.entity_slot_mut(4);
        *archetype = ArchetypeId(5);
        *slot = Slot::new(1, 1);

        assert_eq!(info.archetype(4), ArchetypeId(5));
        assert_eq!(info.slot(4), Slot::new(1, 1));
    }

    #[test]
    fn test_slot_mut_in_place() {
        let mut info = EntityInfoStorage::new();
        info.add(2, 0, ArchetypeId(0), Slot::new(0, 0));
        info.slot_mut(2).index = 6;
        assert_eq!(info.slot(2), Slot::new(6, 0));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut info = EntityInfoStorage::new();
        for id in 0..100 {
            info.add(id, 1, ArchetypeId(0), Slot::new(id, 0));
        }
        info.clear();
        for id in 0..100 {
            assert!(!info.contains(id));
            assert_eq!(info.try_get_version(id), None);
        }
    }

    #[test]
    fn test_trim_then_reads_still_correct() {
        let mut info = EntityInfoStorage::new();
        info.add(10, 0, ArchetypeId(0), Slot::new(1, 0));
        info.ensure_capacity(100_000);
        info.trim_excess();

        assert!(info.contains(10));
        assert_eq!(info.slot(10), Slot::new(1, 0));
        assert_eq!(info.try_get_version(70_000), None);
    }
}
