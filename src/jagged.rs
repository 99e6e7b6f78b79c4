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

//! Block-sparse array storage.
//!
//! A `JaggedArray` is a growable sequence of fixed-size blocks indexed
//! by splitting an id into an outer block index and an inner offset.
//! Any id in `[0, capacity)` is readable without pre-allocating one
//! contiguous array, and growth appends blocks without moving the ones
//! already allocated. This sits on the hot entity-lookup path, so the
//! block size is a power of two and the split is a shift plus a mask.

#[cfg(feature = "profiling")]
use tracing::info_span;

/// Per-block memory budget, sized to keep one block inside L1 cache
pub const BLOCK_BUDGET_BYTES: usize = 16_000;

/// Block capacity in elements for a given element type.
///
/// Computed once per concrete type: the budget divided by the element
/// size, rounded up to the next power of two so indexing is shift+mask
/// instead of division.
pub const fn block_capacity_for<T>() -> usize {
    let size = core::mem::size_of::<T>();
    let size = if size == 0 { 1 } else { size };
    BLOCK_BUDGET_BYTES.div_ceil(size).next_power_of_two()
}

/// Element stored in a [`JaggedArray`].
///
/// Every element type designates a filler value meaning "unset". The
/// filler must compare unequal to every valid stored value; presence is
/// decided by value equality against it.
pub trait SparseElement: Clone + PartialEq {
    /// The distinguished "unset" value
    fn filler() -> Self;

    /// True if this value is the filler
    fn is_filler(&self) -> bool {
        *self == Self::filler()
    }
}

/// Growable block-sparse array
pub struct JaggedArray<T: SparseElement> {
    blocks: Vec<Box<[T]>>,
    block_capacity: usize,
    shift: u32,
    mask: usize,
    filler: T,
}

impl<T: SparseElement> JaggedArray<T> {
    /// Create an empty array
    pub fn new() -> Self {
        let block_capacity = block_capacity_for::<T>();
        Self {
            blocks: Vec::new(),
            block_capacity,
            shift: block_capacity.trailing_zeros(),
            mask: block_capacity - 1,
            filler: T::filler(),
        }
    }

    /// Create an array that already covers ids below `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        array.ensure_capacity(capacity);
        array
    }

    #[inline]
    fn decompose(&self, id: usize) -> (usize, usize) {
        (id >> self.shift, id & self.mask)
    }

    /// Number of ids currently addressable without growth
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() << self.shift
    }

    /// Number of allocated blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Elements per block for this element type
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    /// Mutable access to the value stored for `id`, growing to cover it.
    ///
    /// Never fails: ids past the current capacity trigger allocation of
    /// the missing blocks, each fully initialized to filler before it
    /// becomes reachable.
    #[inline]
    pub fn get_mut(&mut self, id: usize) -> &mut T {
        self.ensure_capacity(id + 1);
        let (outer, inner) = self.decompose(id);
        &mut self.blocks[outer][inner]
    }

    /// Look up `id` without growing.
    ///
    /// Returns `None` when `id` is past the current capacity or the
    /// stored value is the filler.
    #[inline]
    pub fn try_get(&self, id: usize) -> Option<&T> {
        let (outer, inner) = self.decompose(id);
        let value = self.blocks.get(outer)?.get(inner)?;
        if value.is_filler() {
            None
        } else {
            Some(value)
        }
    }

    /// Store `value` for `id`, growing to cover it
    #[inline]
    pub fn set(&mut self, id: usize, value: T) {
        *self.get_mut(id) = value;
    }

    /// Reset the value for `id` back to filler.
    ///
    /// Never grows and never shrinks; a no-op past the current capacity.
    #[inline]
    pub fn remove(&mut self, id: usize) {
        let (outer, inner) = self.decompose(id);
        if let Some(block) = self.blocks.get_mut(outer) {
            block[inner] = self.filler.clone();
        }
    }

    /// Grow until ids below `capacity` are addressable.
    ///
    /// A no-op when already covered. Appends whole blocks; blocks
    /// already allocated are never moved or touched.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let needed = capacity.div_ceil(self.block_capacity);
        while self.blocks.len() < needed {
            let block = vec![self.filler.clone(); self.block_capacity].into_boxed_slice();
            self.blocks.push(block);
        }
    }

    /// Free trailing blocks that hold nothing but filler.
    ///
    /// Stops at the first non-empty block scanning backward from the
    /// end; interior empty blocks are left alone.
    pub fn trim_excess(&mut self) {
        #[cfg(feature = "profiling")]
        let span = info_span!("jagged.trim_excess", blocks = self.blocks.len());
        #[cfg(feature = "profiling")]
        let _guard = span.enter();

        while let Some(block) = self.blocks.last() {
            if block.iter().all(T::is_filler) {
                self.blocks.pop();
            } else {
                break;
            }
        }
        self.blocks.shrink_to_fit();
    }

    /// Reset every allocated slot to filler; capacity is unchanged
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            block.fill(self.filler.clone());
        }
    }
}

impl<T: SparseElement> Default for JaggedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Versions use -1 as "unset"; see the entity info index
impl SparseElement for i32 {
    fn filler() -> Self {
        -1
    }
}
