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

//! Entity handles.
//!
//! An entity is an id plus the version captured when the handle was
//! issued. Ids are dense-ish and reused; the version distinguishes
//! successive occupants of the same id. A handle is live only while its
//! version matches the one stored in the index for that id.

/// Stable entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub id: usize,
    pub version: i32,
}

impl Entity {
    /// Create a handle from an id and its current version
    pub const fn new(id: usize, version: i32) -> Self {
        Self { id, version }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality_includes_version() {
        let first = Entity::new(7, 0);
        let recycled = Entity::new(7, 1);
        assert_ne!(first, recycled);
        assert_eq!(first, Entity::new(7, 0));
    }
}
