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

//! Error types
//!
//! The index fast paths are infallible; errors only surface from the
//! validation and inspection layer.

use std::fmt;

/// ECS storage error type
#[derive(Debug, Clone)]
pub enum EcsError {
    /// Entity not found
    EntityNotFound,

    /// Invalid entity ID
    InvalidEntity,

    /// Archetype not found
    ArchetypeNotFound,

    /// Index and archetype storage disagree
    InconsistentIndex(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::EntityNotFound => write!(f, "Entity not found"),
            EcsError::InvalidEntity => write!(f, "Invalid entity ID"),
            EcsError::ArchetypeNotFound => write!(f, "Archetype not found"),
            EcsError::InconsistentIndex(msg) => write!(f, "Inconsistent index: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
