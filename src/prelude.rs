//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use entity_index::prelude::*;
//! ```

pub use crate::archetype::{Archetype, ArchetypeId, ArchetypeSignature, Archetypes, Chunk};
pub use crate::debug::IndexInspector;
pub use crate::entity::Entity;
pub use crate::entity_info::{EntityInfo, EntityInfoStorage};
pub use crate::error::{EcsError, Result};
pub use crate::jagged::{JaggedArray, SparseElement};
pub use crate::slot::Slot;
