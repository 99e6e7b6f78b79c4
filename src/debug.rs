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

//! Index inspection and consistency checking for debugging.

use crate::archetype::Archetypes;
use crate::entity_info::EntityInfoStorage;
use crate::error::{EcsError, Result};
use crate::slot::Slot;

/// Index inspector for debugging
pub struct IndexInspector;

impl IndexInspector {
    /// Number of ids the index currently resolves
    pub fn entity_count(info: &EntityInfoStorage) -> usize {
        (0..info.capacity()).filter(|&id| info.contains(id)).count()
    }

    /// Get archetype summary
    pub fn archetype_summary(archetypes: &Archetypes) -> Vec<ArchetypeDebugInfo> {
        archetypes
            .iter()
            .map(|(id, archetype)| ArchetypeDebugInfo {
                id: id.index(),
                signature: archetype
                    .signature()
                    .iter()
                    .map(|type_id| format!("{type_id:?}"))
                    .collect(),
                entity_count: archetype.len(),
                chunk_count: archetype.chunk_count(),
                entities_per_chunk: archetype.entities_per_chunk(),
            })
            .collect()
    }

    /// Check that the index and the archetype storage agree.
    ///
    /// Every occupied row's entity must be indexed back to exactly that
    /// row with a matching version, and every indexed id must resolve to
    /// a live, in-bounds row. Returns the first disagreement found.
    pub fn validate(info: &EntityInfoStorage, archetypes: &Archetypes) -> Result<()> {
        for (id, archetype) in archetypes.iter() {
            for row in 0..archetype.len() {
                let slot = Slot::from_row(row, archetype.entities_per_chunk());
                let entity = archetype.entity_at(slot);

                if !info.contains(entity.id) {
                    return Err(EcsError::InconsistentIndex(format!(
                        "entity {} occupies row {row} of archetype {} but is not indexed",
                        entity.id,
                        id.index()
                    )));
                }
                if info.archetype(entity.id) != id || info.slot(entity.id) != slot {
                    return Err(EcsError::InconsistentIndex(format!(
                        "entity {} occupies row {row} of archetype {} but is indexed elsewhere",
                        entity.id,
                        id.index()
                    )));
                }
                if info.version(entity.id) != entity.version {
                    return Err(EcsError::InconsistentIndex(format!(
                        "entity {} stored with version {}, indexed with version {}",
                        entity.id,
                        entity.version,
                        info.version(entity.id)
                    )));
                }
            }
        }

        for id in 0..info.capacity() {
            if !info.contains(id) {
                continue;
            }
            let archetype = archetypes
                .get(info.archetype(id))
                .ok_or(EcsError::ArchetypeNotFound)?;
            let slot = info.slot(id);
            let row = slot.to_row(archetype.entities_per_chunk());
            if row >= archetype.len() {
                return Err(EcsError::InconsistentIndex(format!(
                    "entity {id} indexed at row {row}, past the {} live rows of its archetype",
                    archetype.len()
                )));
            }
            if archetype.entity_at(slot).id != id {
                return Err(EcsError::InconsistentIndex(format!(
                    "entity {id} indexed at row {row} but another entity occupies it"
                )));
            }
        }

        Ok(())
    }

    /// Print index and archetype summary to console
    pub fn print_summary(info: &EntityInfoStorage, archetypes: &Archetypes) {
        println!("=== Index Summary ===");
        println!("Entities: {}", Self::entity_count(info));
        println!("Id capacity: {}", info.capacity());
        println!("Archetypes: {}", archetypes.len());

        println!("\n=== Archetypes ===");
        for summary in Self::archetype_summary(archetypes) {
            println!(
                "Archetype {}: {} entities, {} chunks of {}",
                summary.id, summary.entity_count, summary.chunk_count, summary.entities_per_chunk
            );
        }
    }
}

/// Archetype information for debugging
#[derive(Clone, Debug)]
pub struct ArchetypeDebugInfo {
    pub id: usize,
    pub signature: Vec<String>,
    pub entity_count: usize,
    pub chunk_count: usize,
    pub entities_per_chunk: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeSignature;
    use crate::entity::Entity;

    #[test]
    fn test_validate_agreeing_state() {
        let mut archetypes = Archetypes::new();
        let mut info = EntityInfoStorage::new();

        let id = archetypes.get_or_create(ArchetypeSignature::new(), 8);
        for entity_id in 0..10 {
            let entity = Entity::new(entity_id, 0);
            let slot = archetypes.get_mut(id).unwrap().allocate_row(entity);
            info.add(entity_id, 0, id, slot);
        }

        assert!(IndexInspector::validate(&info, &archetypes).is_ok());
        assert_eq!(IndexInspector::entity_count(&info), 10);
    }

    #[test]
    fn test_validate_catches_misdirected_slot() {
        let mut archetypes = Archetypes::new();
        let mut info = EntityInfoStorage::new();

        let id = archetypes.get_or_create(ArchetypeSignature::new(), 8);
        let slot = archetypes
            .get_mut(id)
            .unwrap()
            .allocate_row(Entity::new(0, 0));
        info.add(0, 0, id, slot);

        info.move_within(0, crate::slot::Slot::new(5, 0));
        assert!(IndexInspector::validate(&info, &archetypes).is_err());
    }

    #[test]
    fn test_summary_reports_chunks() {
        let mut archetypes = Archetypes::new();
        let id = archetypes.get_or_create(ArchetypeSignature::new(), 4);
        for entity_id in 0..6 {
            archetypes
                .get_mut(id)
                .unwrap()
                .allocate_row(Entity::new(entity_id, 0));
        }

        let summary = IndexInspector::archetype_summary(&archetypes);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].entity_count, 6);
        assert_eq!(summary[0].chunk_count, 2);
    }
}
