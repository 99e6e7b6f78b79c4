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

//! Physical row addressing within chunked archetype storage.

use crate::jagged::SparseElement;

/// Physical position of an entity row: (row index within chunk, chunk index within archetype)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub chunk_index: usize,
}

impl Slot {
    /// Sentinel for "no row"; out of range for any real archetype
    pub const INVALID: Slot = Slot {
        index: usize::MAX,
        chunk_index: usize::MAX,
    };

    /// Create a slot from a row index and chunk index
    pub const fn new(index: usize, chunk_index: usize) -> Self {
        Self { index, chunk_index }
    }

    /// Flatten to a global row number for an archetype with the given chunk capacity
    pub const fn to_row(self, entities_per_chunk: usize) -> usize {
        self.chunk_index * entities_per_chunk + self.index
    }

    /// Split a global row number back into a slot for the given chunk capacity
    pub const fn from_row(row: usize, entities_per_chunk: usize) -> Self {
        Self {
            index: row % entities_per_chunk,
            chunk_index: row / entities_per_chunk,
        }
    }

    /// Re-express this slot in another archetype's addressing scheme.
    ///
    /// Flattens with the source chunk capacity and splits with the
    /// destination's. Bulk copies preserve global row order, so this is
    /// the entire location fix-up needed after a copy; see
    /// [`EntityInfoStorage::shift`](crate::entity_info::EntityInfoStorage::shift).
    pub const fn rebase(self, source_capacity: usize, destination_capacity: usize) -> Slot {
        Self::from_row(self.to_row(source_capacity), destination_capacity)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::INVALID
    }
}

impl SparseElement for Slot {
    fn filler() -> Self {
        Slot::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trip() {
        let slot = Slot::new(3, 2);
        assert_eq!(slot.to_row(8), 19);
        assert_eq!(Slot::from_row(19, 8), slot);
    }

    #[test]
    fn test_rebase_same_capacity_is_identity() {
        let slot = Slot::new(5, 1);
        assert_eq!(slot.rebase(8, 8), slot);
    }

    #[test]
    fn test_rebase_across_capacities() {
        // Global row 9 in chunks of 8 becomes (1, chunk 2) in chunks of 4
        let slot = Slot::new(1, 1);
        assert_eq!(slot.rebase(8, 4), Slot::new(1, 2));
        // And back
        assert_eq!(Slot::new(1, 2).rebase(4, 8), slot);
    }

    #[test]
    fn test_invalid_is_out_of_range() {
        assert_ne!(Slot::INVALID, Slot::new(0, 0));
        assert_eq!(Slot::default(), Slot::INVALID);
    }
}
