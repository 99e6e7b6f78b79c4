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

//! Entity Index - sparse entity-location storage for archetype ECS
//!
//! The authoritative id-to-location table an archetype ECS builds on:
//! block-sparse arrays, the entity info index, and the bulk relocation
//! fix-up used during structural changes.

pub mod archetype;
pub mod debug;
pub mod entity;
pub mod entity_info;
pub mod error;
pub mod jagged;
pub mod prelude;
#[cfg(feature = "profiling")]
pub mod profiling;
pub mod slot;


pub use archetype::*;
pub use debug::*;
pub use entity::*;
pub use entity_info::*;
pub use error::*;
pub use jagged::*;
pub use slot::*;
