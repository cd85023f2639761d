//! # Range Allocator
//!
//! Carves an abstract offset range it cannot write through - typically a
//! region of a GPU-resident buffer - into variable-sized spans. All
//! bookkeeping lives outside the managed resource: block records sit in one
//! contiguous arena addressed by `u32` index, an offset-keyed table maps
//! span starts back to their records, and retired records are recycled
//! through the [`NodePool`] instead of being heap-allocated per operation.
//!
//! Because this allocator never touches backing bytes, a reallocation that
//! reports `moved = true` only hands back the new span; the caller performs
//! whatever data migration the move implies.

use std::collections::HashMap;

use crate::bucket::{bucket_index, BUCKET_COUNT};
use crate::error::ArenaError;
use crate::pool::NodePool;
use crate::report::{self, ArenaStats, BlockView};
use crate::Allocation;

/// Sentinel record index meaning "no record".
const NIL: u32 = u32::MAX;

/// Bookkeeping record for one contiguous span of the managed range.
///
/// The free-list links are only meaningful while `is_free` is set; both are
/// reset to [`NIL`] the moment a record leaves its bucket.
struct BlockNode {
    /// Start of the span this record describes.
    offset: usize,
    /// Length of the span in bytes.
    size: usize,
    /// Whether the span is available for allocation.
    is_free: bool,
    /// Record of the physically preceding span; [`NIL`] for the first block.
    prev_physical: u32,
    /// Next record in this block's size bucket.
    next_free: u32,
    /// Previous record in this block's size bucket.
    prev_free: u32,
}

/// Manual allocator for an address range backed by externally-owned storage.
///
/// The range `[0, capacity)` is fixed at construction and never grows.
/// Exhaustion returns [`Allocation::EMPTY`]; freeing or reallocating an
/// offset that is not a live allocation is undefined behavior guarded by
/// debug assertions only.
///
/// # Thread Safety
///
/// NOT thread-safe. Wrap the instance in external mutual exclusion if it
/// must be shared.
pub struct RangeAllocator {
    /// Record arena; records are reused via the pool, never removed.
    nodes: Vec<BlockNode>,
    /// Recycled record indices.
    pool: NodePool,
    /// Span start -> record index, for every block including the sentinel.
    lookup: HashMap<usize, u32>,
    /// Head record of each size-class free list, sorted ascending by size.
    buckets: [u32; BUCKET_COUNT],
    /// Total range capacity in bytes.
    total_size: usize,
    /// Bytes currently handed out.
    allocated: usize,
    /// Number of live allocations.
    live: usize,
}

impl RangeAllocator {
    /// Creates an allocator managing the range `[0, total_size)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ZeroCapacity`] if `total_size` is zero.
    pub fn new(total_size: usize) -> Result<Self, ArenaError> {
        Self::with_expected_size(total_size, 0)
    }

    /// Creates an allocator pre-sized for a typical allocation size.
    ///
    /// `expected_allocation_size` is a pure performance hint: it pre-sizes
    /// the record arena and the offset table for roughly
    /// `total_size / expected_allocation_size` live spans. Zero disables the
    /// hint. Behavior is identical either way.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ZeroCapacity`] if `total_size` is zero.
    pub fn with_expected_size(
        total_size: usize,
        expected_allocation_size: usize,
    ) -> Result<Self, ArenaError> {
        if total_size == 0 {
            return Err(ArenaError::ZeroCapacity);
        }
        let hint = if expected_allocation_size > 0 {
            (total_size / expected_allocation_size).clamp(16, 1 << 20)
        } else {
            16
        };
        let mut allocator = Self {
            nodes: Vec::with_capacity(hint + 2),
            pool: NodePool::with_capacity(hint),
            lookup: HashMap::with_capacity(hint + 2),
            buckets: [NIL; BUCKET_COUNT],
            total_size,
            allocated: 0,
            live: 0,
        };
        allocator.bootstrap();
        Ok(allocator)
    }

    /// Lays down the initial whole-range free block and the tail sentinel.
    fn bootstrap(&mut self) {
        self.nodes.push(BlockNode {
            offset: 0,
            size: self.total_size,
            is_free: true,
            prev_physical: NIL,
            next_free: NIL,
            prev_free: NIL,
        });
        // Permanent used record at the very end of the range. Merge and
        // traversal code can always ask for "the block after" without a
        // null check because this one is never freed and never merged.
        self.nodes.push(BlockNode {
            offset: self.total_size,
            size: 0,
            is_free: false,
            prev_physical: 0,
            next_free: NIL,
            prev_free: NIL,
        });
        self.lookup.insert(0, 0);
        self.lookup.insert(self.total_size, 1);
        self.buckets[bucket_index(self.total_size)] = 0;
    }

    /// Returns the total range capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.total_size
    }

    /// Returns the bytes not currently handed out to live allocations.
    #[inline]
    #[must_use]
    pub const fn free_space(&self) -> usize {
        self.total_size - self.allocated
    }

    /// Returns the number of live allocations.
    #[inline]
    #[must_use]
    pub const fn live_allocations(&self) -> usize {
        self.live
    }

    /// Carves a span of exactly `size` bytes out of the range.
    ///
    /// Scans size-class buckets upward from the request's own class and
    /// takes the first adequate free block, splitting off any excess as a
    /// new free block. Returns [`Allocation::EMPTY`] when no free block can
    /// hold the request.
    ///
    /// `size` must be non-zero (debug-asserted).
    pub fn allocate(&mut self, size: usize) -> Allocation {
        debug_assert!(size > 0, "zero-size allocation is a caller bug");
        if size == 0 {
            return Allocation::EMPTY;
        }
        let Some(index) = self.find_fit(size) else {
            tracing::debug!("range arena exhausted: no free block holds {size} bytes");
            return Allocation::EMPTY;
        };
        self.bucket_remove(index);
        self.node_mut(index).is_free = false;
        self.shrink_to(index, size);
        let offset = self.node(index).offset;
        self.allocated += size;
        self.live += 1;
        tracing::trace!("allocated [{offset}, {}) from range arena", offset + size);
        Allocation::new(offset, size)
    }

    /// Returns a span previously handed out by [`allocate`](Self::allocate).
    ///
    /// The block is merged with free physical neighbors before being filed
    /// back into its size bucket, so no two adjacent blocks are ever
    /// simultaneously free. Freeing an offset that is not a live allocation
    /// is undefined behavior (debug-asserted).
    pub fn free(&mut self, offset: usize) {
        let index = self.lookup.get(&offset).copied();
        debug_assert!(index.is_some(), "free of unknown offset {offset}");
        let Some(index) = index else { return };
        let (size, is_free) = {
            let node = self.node(index);
            (node.size, node.is_free)
        };
        debug_assert!(!is_free, "double free at offset {offset}");
        if is_free {
            return;
        }
        self.allocated -= size;
        self.live -= 1;
        self.release_block(index);
        tracing::trace!("freed [{offset}, {}) back to range arena", offset + size);
    }

    /// Resizes the span at `offset` to `new_size` bytes.
    ///
    /// Cheapest strategy first: merge with a free successor and finish in
    /// place, then merge with a free predecessor (the span's start moves),
    /// and finally fall back to releasing the span and claiming a fresh
    /// one. The returned flag is `true` whenever the start address changed;
    /// this allocator never copies backing bytes, so the caller must
    /// migrate its data (with memmove semantics - the new span may overlap
    /// the old one).
    ///
    /// If the fallback allocation fails the old span has already been
    /// released: the allocator stays fully consistent, the payload is lost,
    /// and the empty token reports the failure.
    pub fn reallocate(&mut self, offset: usize, new_size: usize) -> (Allocation, bool) {
        debug_assert!(new_size > 0, "zero-size reallocation is a caller bug");
        if new_size == 0 {
            return (Allocation::EMPTY, false);
        }
        let index = self.lookup.get(&offset).copied();
        debug_assert!(index.is_some(), "reallocate of unknown offset {offset}");
        let Some(index) = index else {
            return (Allocation::EMPTY, false);
        };
        debug_assert!(
            !self.node(index).is_free,
            "reallocate of a freed offset {offset}"
        );
        if self.node(index).is_free {
            return (Allocation::EMPTY, false);
        }

        let old_size = self.node(index).size;
        // Safe whether growing or shrinking, and it simplifies the fit check.
        self.absorb_next(index);
        let merged = self.node(index).size;

        if merged >= new_size {
            self.shrink_to(index, new_size);
            self.allocated = self.allocated - old_size + new_size;
            tracing::trace!("resized [{offset}, ..) in place to {new_size} bytes");
            return (Allocation::new(offset, new_size), false);
        }

        let prev = self.node(index).prev_physical;
        if prev != NIL && self.node(prev).is_free && self.node(prev).size + merged >= new_size {
            let survivor = self.merge_into_prev(index);
            self.node_mut(survivor).is_free = false;
            let new_offset = self.node(survivor).offset;
            self.shrink_to(survivor, new_size);
            self.allocated = self.allocated - old_size + new_size;
            tracing::trace!(
                "resized [{offset}, ..) into predecessor, now [{new_offset}, {})",
                new_offset + new_size
            );
            return (Allocation::new(new_offset, new_size), true);
        }

        // Last resort: the old span is released either way; on exhaustion
        // the empty token reports that the payload is gone.
        self.allocated -= old_size;
        self.live -= 1;
        self.release_block(index);
        let fresh = self.allocate(new_size);
        if fresh.is_empty() {
            tracing::debug!(
                "reallocate to {new_size} bytes exhausted the range arena; span at {offset} released"
            );
        }
        (fresh, true)
    }

    /// Returns the range to its freshly-constructed state: one free block
    /// covering everything, all previous allocations invalidated.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.pool.clear();
        self.lookup.clear();
        self.buckets = [NIL; BUCKET_COUNT];
        self.allocated = 0;
        self.live = 0;
        self.bootstrap();
    }

    /// Computes a statistics snapshot by walking the physical block chain.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        let mut stats = ArenaStats {
            capacity: self.total_size,
            ..ArenaStats::default()
        };
        for view in self.block_views() {
            if view.is_free {
                stats.free_space += view.size;
                stats.free_blocks += 1;
                stats.largest_free_block = stats.largest_free_block.max(view.size);
            } else {
                stats.allocated += view.size;
                stats.live_allocations += 1;
            }
        }
        stats
    }

    /// Renders the diagnostic dump: sequential block view plus per-bucket
    /// free lists. Debugging aid only, not part of the functional contract.
    #[must_use]
    pub fn dump(&self) -> String {
        let buckets = self.bucket_views();
        report::assert_bucket_placement(&buckets);
        report::render_dump("RangeAllocator", self.total_size, &self.block_views(), &buckets)
    }

    #[inline]
    fn node(&self, index: u32) -> &BlockNode {
        &self.nodes[index as usize]
    }

    #[inline]
    fn node_mut(&mut self, index: u32) -> &mut BlockNode {
        &mut self.nodes[index as usize]
    }

    /// First adequate free block, scanning buckets upward from the
    /// request's own size class. Each bucket list is ascending by size, so
    /// the first hit within a bucket is also the smallest workable block
    /// that bucket holds.
    fn find_fit(&self, size: usize) -> Option<u32> {
        for bucket in &self.buckets[bucket_index(size)..] {
            let mut cursor = *bucket;
            while cursor != NIL {
                if self.node(cursor).size >= size {
                    return Some(cursor);
                }
                cursor = self.node(cursor).next_free;
            }
        }
        None
    }

    /// Files a free block into the bucket for its size, keeping the list
    /// sorted ascending.
    fn bucket_insert(&mut self, index: u32) {
        let size = self.node(index).size;
        let bucket = bucket_index(size);
        let mut prev = NIL;
        let mut cursor = self.buckets[bucket];
        while cursor != NIL && self.node(cursor).size < size {
            prev = cursor;
            cursor = self.node(cursor).next_free;
        }
        {
            let node = self.node_mut(index);
            node.next_free = cursor;
            node.prev_free = prev;
        }
        if prev == NIL {
            self.buckets[bucket] = index;
        } else {
            self.node_mut(prev).next_free = index;
        }
        if cursor != NIL {
            self.node_mut(cursor).prev_free = index;
        }
    }

    /// Detaches a free block from its bucket and clears its list links.
    fn bucket_remove(&mut self, index: u32) {
        let (size, prev, next) = {
            let node = self.node(index);
            (node.size, node.prev_free, node.next_free)
        };
        if prev == NIL {
            self.buckets[bucket_index(size)] = next;
        } else {
            self.node_mut(prev).next_free = next;
        }
        if next != NIL {
            self.node_mut(next).prev_free = prev;
        }
        let node = self.node_mut(index);
        node.next_free = NIL;
        node.prev_free = NIL;
    }

    /// Mints a free record, recycling a retired index when one exists.
    fn mint_node(&mut self, offset: usize, size: usize, prev_physical: u32) -> u32 {
        let node = BlockNode {
            offset,
            size,
            is_free: true,
            prev_physical,
            next_free: NIL,
            prev_free: NIL,
        };
        if let Some(index) = self.pool.acquire() {
            self.nodes[index as usize] = node;
            index
        } else {
            self.nodes.push(node);
            (self.nodes.len() - 1) as u32
        }
    }

    /// Shrinks a used block to `keep` bytes, filing the excess (if any) as
    /// a new free block immediately after it.
    fn shrink_to(&mut self, index: u32, keep: usize) {
        let (offset, size) = {
            let node = self.node(index);
            (node.offset, node.size)
        };
        debug_assert!(size >= keep);
        let excess = size - keep;
        if excess == 0 {
            return;
        }
        self.node_mut(index).size = keep;
        let remainder_offset = offset + keep;
        let remainder = self.mint_node(remainder_offset, excess, index);
        let after = self.lookup[&(remainder_offset + excess)];
        self.node_mut(after).prev_physical = remainder;
        self.lookup.insert(remainder_offset, remainder);
        self.bucket_insert(remainder);
    }

    /// Marks a block free, coalesces it with free physical neighbors, and
    /// files the survivor under its final size.
    fn release_block(&mut self, index: u32) {
        self.node_mut(index).is_free = true;
        self.absorb_next(index);
        let survivor = self.merge_into_prev(index);
        self.bucket_insert(survivor);
    }

    /// Absorbs the physically next block into this one if it is free. The
    /// tail sentinel is permanently used, so the successor always exists.
    fn absorb_next(&mut self, index: u32) {
        let end = {
            let node = self.node(index);
            node.offset + node.size
        };
        let next = self.lookup[&end];
        if !self.node(next).is_free {
            return;
        }
        self.bucket_remove(next);
        let next_size = self.node(next).size;
        self.node_mut(index).size += next_size;
        let after = self.lookup[&(end + next_size)];
        self.node_mut(after).prev_physical = index;
        self.lookup.remove(&end);
        self.pool.release(next);
    }

    /// Merges this block into a free physical predecessor, which survives.
    /// Returns the surviving record.
    fn merge_into_prev(&mut self, index: u32) -> u32 {
        let prev = self.node(index).prev_physical;
        if prev == NIL || !self.node(prev).is_free {
            return index;
        }
        self.bucket_remove(prev);
        let (offset, size) = {
            let node = self.node(index);
            (node.offset, node.size)
        };
        self.node_mut(prev).size += size;
        let after = self.lookup[&(offset + size)];
        self.node_mut(after).prev_physical = prev;
        self.lookup.remove(&offset);
        self.pool.release(index);
        prev
    }

    /// All blocks in physical order, sentinel excluded.
    fn block_views(&self) -> Vec<BlockView> {
        let mut views = Vec::new();
        let mut offset = 0;
        while offset < self.total_size {
            let node = self.node(self.lookup[&offset]);
            views.push(BlockView {
                offset: node.offset,
                size: node.size,
                is_free: node.is_free,
            });
            offset = node.offset + node.size;
        }
        views
    }

    /// Free block sizes of each non-empty bucket, in list order.
    fn bucket_views(&self) -> Vec<(usize, Vec<usize>)> {
        let mut out = Vec::new();
        for (index, head) in self.buckets.iter().enumerate() {
            if *head == NIL {
                continue;
            }
            let mut sizes = Vec::new();
            let mut cursor = *head;
            while cursor != NIL {
                sizes.push(self.node(cursor).size);
                cursor = self.node(cursor).next_free;
            }
            out.push((index, sizes));
        }
        out
    }
}
