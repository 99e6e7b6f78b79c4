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

//! Archetypes and chunks, entity occupancy only.
//!
//! Component columns live outside this crate; the index only needs to
//! know which entity occupies which row, how many rows a chunk holds,
//! and how archetypes are identified. Chunks keep their backing array
//! at full capacity for their whole lifetime, so rows past the current
//! size stay readable (they hold stale occupants after a compaction,
//! which the relocation pass tolerates by construction).

use std::any::TypeId;

use ahash::AHashMap;
use smallvec::SmallVec;

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::entity::Entity;
use crate::jagged::SparseElement;
use crate::slot::Slot;

/// Component signature
pub type ArchetypeSignature = SmallVec<[TypeId; 8]>;

/// Default chunk capacity in rows; power of two
pub const DEFAULT_ENTITIES_PER_CHUNK: usize = 1024;

/// Index of an archetype in the world's archetype list.
///
/// Archetype identity is id equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchetypeId(pub u32);

impl ArchetypeId {
    /// Sentinel for "no archetype"
    pub const INVALID: ArchetypeId = ArchetypeId(u32::MAX);

    /// Position in the archetype list
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl SparseElement for ArchetypeId {
    fn filler() -> Self {
        ArchetypeId::INVALID
    }
}

/// Fixed-capacity block of entity rows within an archetype
pub struct Chunk {
    entities: Box<[Entity]>,
    size: usize,
}

impl Chunk {
    fn new(capacity: usize) -> Self {
        Self {
            entities: vec![Entity::new(usize::MAX, -1); capacity].into_boxed_slice(),
            size: 0,
        }
    }

    /// Entity occupying `row`.
    ///
    /// Rows up to the chunk's capacity are readable; rows at or past
    /// `size` hold whatever occupied them last.
    #[inline]
    pub fn entity(&self, row: usize) -> Entity {
        self.entities[row]
    }

    /// Rows currently populated
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row capacity
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// True when no row is free
    pub fn is_full(&self) -> bool {
        self.size == self.entities.len()
    }

    fn push(&mut self, entity: Entity) -> usize {
        let row = self.size;
        self.entities[row] = entity;
        self.size += 1;
        row
    }
}

/// Chunked row storage for entities sharing one component signature
pub struct Archetype {
    signature: ArchetypeSignature,
    entities_per_chunk: usize,
    chunks: Vec<Chunk>,
    len: usize,
}

impl Archetype {
    /// Create an archetype with the given chunk capacity.
    ///
    /// The capacity must be a power of two so slots can be flattened
    /// and re-chunked cheaply.
    pub fn new(signature: ArchetypeSignature, entities_per_chunk: usize) -> Self {
        debug_assert!(entities_per_chunk.is_power_of_two());
        Self {
            signature,
            entities_per_chunk,
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Get signature
    pub fn signature(&self) -> &ArchetypeSignature {
        &self.signature
    }

    /// Row capacity of every chunk
    #[inline]
    pub fn entities_per_chunk(&self) -> usize {
        self.entities_per_chunk
    }

    /// Chunk at `chunk_index`
    #[inline]
    pub fn chunk(&self, chunk_index: usize) -> &Chunk {
        &self.chunks[chunk_index]
    }

    /// Number of allocated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if archetype is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot of the highest occupied row.
    ///
    /// Meaningless on an empty archetype; callers check `is_empty`.
    pub fn last_slot(&self) -> Slot {
        debug_assert!(self.len > 0);
        Slot::from_row(self.len - 1, self.entities_per_chunk)
    }

    /// Entity occupying `slot`
    pub fn entity_at(&self, slot: Slot) -> Entity {
        self.chunks[slot.chunk_index].entity(slot.index)
    }

    /// Append an entity, allocating a new chunk when the last is full
    pub fn allocate_row(&mut self, entity: Entity) -> Slot {
        if self.chunks.last().map_or(true, Chunk::is_full) {
            self.chunks.push(Chunk::new(self.entities_per_chunk));
        }
        let chunk_index = self.chunks.len() - 1;
        let index = self.chunks[chunk_index].push(entity);
        self.len += 1;
        Slot::new(index, chunk_index)
    }

    /// Remove the row at `slot` and slide every higher row down one.
    ///
    /// This is the physical bulk copy; the caller follows it with
    /// [`EntityInfoStorage::shift`](crate::entity_info::EntityInfoStorage::shift)
    /// to repair the index. Trailing chunks are kept allocated so the
    /// fix-up pass can still read the vacated rows.
    pub fn compact_remove(&mut self, slot: Slot) {
        let removed = slot.to_row(self.entities_per_chunk);
        debug_assert!(removed < self.len);

        for row in removed..self.len - 1 {
            let next = Slot::from_row(row + 1, self.entities_per_chunk);
            let entity = self.chunks[next.chunk_index].entities[next.index];
            let here = Slot::from_row(row, self.entities_per_chunk);
            self.chunks[here.chunk_index].entities[here.index] = entity;
        }

        self.len -= 1;
        // Only the last occupied chunk loses a row
        let last_chunk = self.len / self.entities_per_chunk;
        for (chunk_index, chunk) in self.chunks.iter_mut().enumerate() {
            chunk.size = if chunk_index < last_chunk {
                self.entities_per_chunk
            } else if chunk_index == last_chunk {
                self.len - last_chunk * self.entities_per_chunk
            } else {
                0
            };
        }
    }
}

/// Archetype list plus the signature lookup used to deduplicate it
pub struct Archetypes {
    archetypes: Vec<Archetype>,
    by_signature: AHashMap<ArchetypeSignature, ArchetypeId>,
}

impl Archetypes {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            // Reasonable defaults to avoid resize spikes
            archetypes: Vec::with_capacity(64),
            by_signature: AHashMap::with_capacity(64),
        }
    }

    /// Id for `signature`, creating the archetype on first sight
    pub fn get_or_create(
        &mut self,
        signature: ArchetypeSignature,
        entities_per_chunk: usize,
    ) -> ArchetypeId {
        if let Some(&id) = self.by_signature.get(&signature) {
            return id;
        }

        #[cfg(feature = "profiling")]
        let span = info_span!(
            "archetypes.create",
            component_count = signature.len(),
            archetype_count = self.archetypes.len()
        );
        #[cfg(feature = "profiling")]
        let _guard = span.enter();

        let id = ArchetypeId(self.archetypes.len() as u32);
        self.archetypes
            .push(Archetype::new(signature.clone(), entities_per_chunk));
        self.by_signature.insert(signature, id);
        id
    }

    /// Archetype by id
    pub fn get(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    /// Archetype by id, mutable
    pub fn get_mut(&mut self, id: ArchetypeId) -> Option<&mut Archetype> {
        self.archetypes.get_mut(id.index())
    }

    /// Number of archetypes
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// True when no archetype has been created
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Iterate archetypes with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ArchetypeId, &Archetype)> {
        self.archetypes
            .iter()
            .enumerate()
            .map(|(index, archetype)| (ArchetypeId(index as u32), archetype))
    }
}

impl Default for Archetypes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_allocate_rows_across_chunks() {
        let mut arch = Archetype::new(ArchetypeSignature::new(), 4);
        for id in 0..6 {
            let slot = arch.allocate_row(Entity::new(id, 0));
            assert_eq!(slot, Slot::from_row(id, 4));
        }
        assert_eq!(arch.len(), 6);
        assert_eq!(arch.chunk_count(), 2);
        assert_eq!(arch.chunk(0).capacity(), 4);
        assert_eq!(arch.chunk(0).size(), 4);
        assert_eq!(arch.chunk(1).size(), 2);
        assert_eq!(arch.last_slot(), Slot::new(1, 1));
        assert_eq!(arch.entity_at(Slot::new(1, 1)).id, 5);
    }

    #[test]
    fn test_compact_remove_slides_rows_down() {
        let mut arch = Archetype::new(ArchetypeSignature::new(), 4);
        for id in 0..6 {
            arch.allocate_row(Entity::new(id, 0));
        }
        arch.compact_remove(Slot::new(1, 0));
        assert_eq!(arch.len(), 5);
        // Rows 1..4 now hold the former rows 2..5
        for row in 1..5 {
            let slot = Slot::from_row(row, 4);
            assert_eq!(arch.entity_at(slot).id, row + 1);
        }
        assert_eq!(arch.chunk(0).size(), 4);
        assert_eq!(arch.chunk(1).size(), 1);
        // The vacated row is stale but still readable
        assert_eq!(arch.chunk(1).entity(1).id, 5);
    }

    #[test]
    fn test_registry_deduplicates_by_signature() {
        let mut archetypes = Archetypes::new();
        let sig: ArchetypeSignature = smallvec![TypeId::of::<i32>(), TypeId::of::<f32>()];
        let first = archetypes.get_or_create(sig.clone(), 8);
        let second = archetypes.get_or_create(sig, 8);
        assert_eq!(first, second);
        assert_eq!(archetypes.len(), 1);
        assert!(archetypes.get(first).is_some());
        assert!(archetypes.get(ArchetypeId::INVALID).is_none());
    }
}
