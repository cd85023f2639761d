//! # Buffer Allocator
//!
//! Carves a byte buffer it owns. Every block's bookkeeping record is a
//! fixed-size header written directly inside the buffer, immediately before
//! the bytes it governs, so the physically next block is always
//! `header + HEADER_SIZE + size`. Returned offsets point past the header at
//! usable data.
//!
//! ```text
//! [hdr|  payload  ][hdr|payload][hdr|      free      ] ... [sentinel hdr]
//!  0                                                        total - HDR
//! ```
//!
//! Header traffic goes through bytemuck Pod casts at explicit offsets; no
//! raw pointers, no unsafe. Because this variant owns the bytes, a moved
//! reallocation copies the live payload itself.

use bytemuck::{Pod, Zeroable};

use crate::bucket::{bucket_index, BUCKET_COUNT};
use crate::error::ArenaError;
use crate::report::{self, ArenaStats, BlockView};
use crate::Allocation;

/// Per-block metadata overhead of [`BufferAllocator`], in bytes.
///
/// Every block carries one header, and one extra sentinel header sits at
/// the end of the buffer. Requests only fit in a free block if the block
/// matches exactly or can donate a remainder that holds its own header.
pub const HEADER_SIZE: usize = std::mem::size_of::<BlockHeader>();

/// Sentinel header offset meaning "no block".
const NIL: usize = usize::MAX;

/// Header state tag: span is available.
const STATE_FREE: usize = 1;
/// Header state tag: span is handed out (or is the tail sentinel).
const STATE_USED: usize = 0;

/// On-buffer bookkeeping record, written immediately before the span it
/// describes. The free-list links are only meaningful while the state tag
/// is [`STATE_FREE`]; both are reset to [`NIL`] when the block leaves its
/// bucket.
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct BlockHeader {
    /// Usable bytes following this header (header itself excluded).
    size: usize,
    /// Header offset of the physically preceding block; [`NIL`] for the first.
    prev_physical: usize,
    /// Next header in this block's size bucket.
    next_free: usize,
    /// Previous header in this block's size bucket.
    prev_free: usize,
    /// [`STATE_FREE`] or [`STATE_USED`].
    state: usize,
}

/// Manual allocator that owns its byte buffer and embeds block headers in it.
///
/// The buffer is fixed at construction and never grows. Exhaustion returns
/// [`Allocation::EMPTY`]; freeing or reallocating an offset that is not a
/// live allocation is undefined behavior guarded by debug assertions only.
///
/// # Thread Safety
///
/// NOT thread-safe. Wrap the instance in external mutual exclusion if it
/// must be shared.
pub struct BufferAllocator {
    /// The owned arena; headers and payloads interleave inside it.
    storage: Box<[u8]>,
    /// Head header offset of each size-class free list, sorted ascending.
    buckets: [usize; BUCKET_COUNT],
    /// Total buffer capacity in bytes, headers included.
    total_size: usize,
    /// Number of live allocations.
    live: usize,
}

impl BufferAllocator {
    /// Creates an allocator owning a zeroed buffer of `total_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ZeroCapacity`] for a zero size and
    /// [`ArenaError::CapacityTooSmall`] when the buffer cannot hold the two
    /// bootstrap headers plus at least one usable byte.
    pub fn new(total_size: usize) -> Result<Self, ArenaError> {
        if total_size == 0 {
            return Err(ArenaError::ZeroCapacity);
        }
        let minimum = 2 * HEADER_SIZE + 1;
        if total_size < minimum {
            return Err(ArenaError::CapacityTooSmall {
                capacity: total_size,
                minimum,
            });
        }
        let mut allocator = Self {
            storage: vec![0u8; total_size].into_boxed_slice(),
            buckets: [NIL; BUCKET_COUNT],
            total_size,
            live: 0,
        };
        allocator.bootstrap();
        Ok(allocator)
    }

    /// Writes the initial whole-buffer free block and the tail sentinel.
    fn bootstrap(&mut self) {
        let first_size = self.total_size - 2 * HEADER_SIZE;
        self.write_header(
            0,
            &BlockHeader {
                size: first_size,
                prev_physical: NIL,
                next_free: NIL,
                prev_free: NIL,
                state: STATE_FREE,
            },
        );
        // Permanent used header at the end of the buffer; merge and
        // traversal code can always read "the block after" without a
        // bounds check because this one is never freed and never merged.
        self.write_header(
            self.sentinel_offset(),
            &BlockHeader {
                size: 0,
                prev_physical: 0,
                next_free: NIL,
                prev_free: NIL,
                state: STATE_USED,
            },
        );
        self.buckets[bucket_index(first_size)] = 0;
    }

    /// Returns the total buffer capacity in bytes, headers included.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.total_size
    }

    /// Returns the bytes sitting in free blocks.
    ///
    /// Computed by walking the block chain, so this is O(blocks); use
    /// [`stats`](Self::stats) when more than one figure is needed.
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.block_views()
            .iter()
            .filter(|view| view.is_free)
            .map(|view| view.size)
            .sum()
    }

    /// Returns the number of live allocations.
    #[inline]
    #[must_use]
    pub const fn live_allocations(&self) -> usize {
        self.live
    }

    /// Carves a span of exactly `size` usable bytes out of the buffer.
    ///
    /// Scans size-class buckets upward from the request's own class and
    /// takes the first free block that fits exactly or can donate a
    /// remainder big enough for its own header. The returned offset points
    /// past the block header, directly at usable data. Returns
    /// [`Allocation::EMPTY`] when nothing fits.
    ///
    /// `size` must be non-zero (debug-asserted).
    pub fn allocate(&mut self, size: usize) -> Allocation {
        debug_assert!(size > 0, "zero-size allocation is a caller bug");
        if size == 0 {
            return Allocation::EMPTY;
        }
        let Some(at) = self.find_fit(size) else {
            tracing::debug!("buffer arena exhausted: no free block holds {size} bytes");
            return Allocation::EMPTY;
        };
        self.bucket_remove(at);
        self.update_header(at, |header| header.state = STATE_USED);
        self.split_excess(at, size);
        self.live += 1;
        let offset = at + HEADER_SIZE;
        tracing::trace!("allocated [{offset}, {}) from buffer arena", offset + size);
        Allocation::new(offset, size)
    }

    /// Returns a span previously handed out by [`allocate`](Self::allocate).
    ///
    /// The block is merged with free physical neighbors - reclaiming their
    /// headers as payload space - before being filed back into its size
    /// bucket. Freeing an offset that is not a live allocation is undefined
    /// behavior (debug-asserted).
    pub fn free(&mut self, offset: usize) {
        if !self.is_plausible_data_offset(offset) {
            debug_assert!(false, "free of foreign offset {offset}");
            return;
        }
        let at = offset - HEADER_SIZE;
        let header = self.header(at);
        debug_assert_eq!(header.state, STATE_USED, "double free at offset {offset}");
        if header.state != STATE_USED {
            return;
        }
        self.live -= 1;
        self.release_block(at);
        tracing::trace!("freed [{offset}, {}) back to buffer arena", offset + header.size);
    }

    /// Resizes the span at `offset` to `new_size` usable bytes.
    ///
    /// Cheapest strategy first: merge with a free successor and finish in
    /// place, then merge with a free predecessor (the payload is copied
    /// toward the buffer start), and finally fall back to a fresh span.
    /// The fallback claims the new span while the old one is still live, so
    /// its payload copy always runs between disjoint regions, then releases
    /// the old block. The returned flag is `true` whenever the address
    /// changed; all payload copying is done here, by the allocator.
    ///
    /// If the fallback allocation fails the old span has already been
    /// released: the allocator stays fully consistent, the payload is lost,
    /// and the empty token reports the failure.
    pub fn reallocate(&mut self, offset: usize, new_size: usize) -> (Allocation, bool) {
        debug_assert!(new_size > 0, "zero-size reallocation is a caller bug");
        if new_size == 0 {
            return (Allocation::EMPTY, false);
        }
        if !self.is_plausible_data_offset(offset) {
            debug_assert!(false, "reallocate of foreign offset {offset}");
            return (Allocation::EMPTY, false);
        }
        let at = offset - HEADER_SIZE;
        debug_assert_eq!(
            self.header(at).state,
            STATE_USED,
            "reallocate of a freed offset {offset}"
        );
        if self.header(at).state != STATE_USED {
            return (Allocation::EMPTY, false);
        }

        let old_size = self.header(at).size;
        // Safe whether growing or shrinking, and it simplifies the fit check.
        self.absorb_next(at);
        let merged = self.header(at).size;

        if merged == new_size || merged > new_size + HEADER_SIZE {
            self.split_excess(at, new_size);
            tracing::trace!("resized [{offset}, ..) in place to {new_size} bytes");
            return (Allocation::new(offset, new_size), false);
        }

        let prev = self.header(at).prev_physical;
        if prev != NIL && self.header(prev).state == STATE_FREE {
            let combined = self.header(prev).size + HEADER_SIZE + merged;
            if combined == new_size || combined > new_size + HEADER_SIZE {
                let survivor = self.merge_into_prev(at);
                self.update_header(survivor, |header| header.state = STATE_USED);
                let new_offset = survivor + HEADER_SIZE;
                // The payload slides toward the buffer start; the regions
                // may overlap, which copy_within handles.
                self.storage
                    .copy_within(offset..offset + old_size.min(new_size), new_offset);
                self.split_excess(survivor, new_size);
                tracing::trace!(
                    "resized [{offset}, ..) into predecessor, now [{new_offset}, {})",
                    new_offset + new_size
                );
                return (Allocation::new(new_offset, new_size), true);
            }
        }

        // Fallback: claim the fresh span while the old block is still live,
        // so the two spans cannot overlap and the copy is a plain forward
        // copy. The old span is released either way; on exhaustion the
        // empty token reports that the payload is gone.
        let fresh = self.allocate(new_size);
        if fresh.is_empty() {
            tracing::debug!(
                "reallocate to {new_size} bytes exhausted the buffer arena; span at {offset} released"
            );
        } else {
            self.storage
                .copy_within(offset..offset + old_size.min(new_size), fresh.offset);
        }
        self.live -= 1;
        self.release_block(at);
        (fresh, true)
    }

    /// Read access to a live allocation's bytes.
    ///
    /// # Panics
    ///
    /// Panics if the span falls outside the buffer. Passing anything but a
    /// live allocation is a caller bug.
    #[must_use]
    pub fn bytes(&self, allocation: Allocation) -> &[u8] {
        &self.storage[allocation.offset..allocation.end()]
    }

    /// Write access to a live allocation's bytes.
    ///
    /// # Panics
    ///
    /// Panics if the span falls outside the buffer. Passing anything but a
    /// live allocation is a caller bug.
    pub fn bytes_mut(&mut self, allocation: Allocation) -> &mut [u8] {
        &mut self.storage[allocation.offset..allocation.end()]
    }

    /// Returns the buffer to its freshly-constructed state: one free block
    /// covering everything, all previous allocations invalidated. Payload
    /// bytes are left as-is; only the bookkeeping headers are rewritten.
    pub fn reset(&mut self) {
        self.buckets = [NIL; BUCKET_COUNT];
        self.live = 0;
        self.bootstrap();
    }

    /// Computes a statistics snapshot by walking the block chain.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        let views = self.block_views();
        let mut stats = ArenaStats {
            capacity: self.total_size,
            metadata: (views.len() + 1) * HEADER_SIZE,
            ..ArenaStats::default()
        };
        for view in &views {
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
        report::render_dump(
            "BufferAllocator",
            self.total_size,
            &self.block_views(),
            &buckets,
        )
    }

    /// Header offset of the permanent tail sentinel.
    #[inline]
    const fn sentinel_offset(&self) -> usize {
        self.total_size - HEADER_SIZE
    }

    /// Whether `offset` could be a data offset this allocator handed out.
    #[inline]
    fn is_plausible_data_offset(&self, offset: usize) -> bool {
        offset >= HEADER_SIZE && offset < self.sentinel_offset()
    }

    /// Reads the header stored at byte offset `at`.
    #[inline]
    fn header(&self, at: usize) -> BlockHeader {
        bytemuck::pod_read_unaligned(&self.storage[at..at + HEADER_SIZE])
    }

    /// Writes `header` at byte offset `at`.
    #[inline]
    fn write_header(&mut self, at: usize, header: &BlockHeader) {
        self.storage[at..at + HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(header));
    }

    /// Read-modify-writes the header at byte offset `at`.
    fn update_header(&mut self, at: usize, mutate: impl FnOnce(&mut BlockHeader)) {
        let mut header = self.header(at);
        mutate(&mut header);
        self.write_header(at, &header);
    }

    /// First free block that fits: exact match, or big enough that the
    /// remainder can hold its own header plus at least one usable byte.
    /// Scans buckets upward from the request's own size class; each bucket
    /// list is ascending by size.
    fn find_fit(&self, size: usize) -> Option<usize> {
        for bucket in &self.buckets[bucket_index(size)..] {
            let mut cursor = *bucket;
            while cursor != NIL {
                let candidate = self.header(cursor).size;
                if candidate == size || candidate > size + HEADER_SIZE {
                    return Some(cursor);
                }
                cursor = self.header(cursor).next_free;
            }
        }
        None
    }

    /// Files a free block into the bucket for its size, keeping the list
    /// sorted ascending.
    fn bucket_insert(&mut self, at: usize) {
        let size = self.header(at).size;
        let bucket = bucket_index(size);
        let mut prev = NIL;
        let mut cursor = self.buckets[bucket];
        while cursor != NIL && self.header(cursor).size < size {
            prev = cursor;
            cursor = self.header(cursor).next_free;
        }
        self.update_header(at, |header| {
            header.next_free = cursor;
            header.prev_free = prev;
        });
        if prev == NIL {
            self.buckets[bucket] = at;
        } else {
            self.update_header(prev, |header| header.next_free = at);
        }
        if cursor != NIL {
            self.update_header(cursor, |header| header.prev_free = at);
        }
    }

    /// Detaches a free block from its bucket and clears its list links.
    fn bucket_remove(&mut self, at: usize) {
        let header = self.header(at);
        if header.prev_free == NIL {
            self.buckets[bucket_index(header.size)] = header.next_free;
        } else {
            self.update_header(header.prev_free, |h| h.next_free = header.next_free);
        }
        if header.next_free != NIL {
            self.update_header(header.next_free, |h| h.prev_free = header.prev_free);
        }
        self.update_header(at, |h| {
            h.next_free = NIL;
            h.prev_free = NIL;
        });
    }

    /// Shrinks the used block at `at` to `keep` usable bytes; the excess
    /// becomes a free block with its own header immediately after.
    fn split_excess(&mut self, at: usize, keep: usize) {
        let size = self.header(at).size;
        debug_assert!(size == keep || size > keep + HEADER_SIZE);
        if size == keep {
            return;
        }
        let remainder_at = at + HEADER_SIZE + keep;
        let remainder_size = size - keep - HEADER_SIZE;
        self.update_header(at, |header| header.size = keep);
        self.write_header(
            remainder_at,
            &BlockHeader {
                size: remainder_size,
                prev_physical: at,
                next_free: NIL,
                prev_free: NIL,
                state: STATE_FREE,
            },
        );
        let after = remainder_at + HEADER_SIZE + remainder_size;
        self.update_header(after, |header| header.prev_physical = remainder_at);
        self.bucket_insert(remainder_at);
    }

    /// Marks a block free, coalesces it with free physical neighbors, and
    /// files the survivor under its final size.
    fn release_block(&mut self, at: usize) {
        self.update_header(at, |header| header.state = STATE_FREE);
        self.absorb_next(at);
        let survivor = self.merge_into_prev(at);
        self.bucket_insert(survivor);
    }

    /// Absorbs the physically next block - header and payload - into this
    /// one if it is free. The tail sentinel is permanently used, so the
    /// successor always exists.
    fn absorb_next(&mut self, at: usize) {
        let size = self.header(at).size;
        let next = at + HEADER_SIZE + size;
        let next_header = self.header(next);
        if next_header.state != STATE_FREE {
            return;
        }
        self.bucket_remove(next);
        let grown = size + HEADER_SIZE + next_header.size;
        self.update_header(at, |header| header.size = grown);
        let after = at + HEADER_SIZE + grown;
        self.update_header(after, |header| header.prev_physical = at);
    }

    /// Merges this block into a free physical predecessor, which survives.
    /// Returns the surviving header offset.
    fn merge_into_prev(&mut self, at: usize) -> usize {
        let prev = self.header(at).prev_physical;
        if prev == NIL || self.header(prev).state != STATE_FREE {
            return at;
        }
        self.bucket_remove(prev);
        let grown = self.header(prev).size + HEADER_SIZE + self.header(at).size;
        self.update_header(prev, |header| header.size = grown);
        let after = prev + HEADER_SIZE + grown;
        self.update_header(after, |header| header.prev_physical = prev);
        prev
    }

    /// All blocks in physical order, sentinel excluded. Offsets are data
    /// offsets, past each block's header.
    fn block_views(&self) -> Vec<BlockView> {
        let mut views = Vec::new();
        let mut at = 0;
        while at < self.sentinel_offset() {
            let header = self.header(at);
            views.push(BlockView {
                offset: at + HEADER_SIZE,
                size: header.size,
                is_free: header.state == STATE_FREE,
            });
            at += HEADER_SIZE + header.size;
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
                let header = self.header(cursor);
                sizes.push(header.size);
                cursor = header.next_free;
            }
            out.push((index, sizes));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts that payloads, free space, and headers exactly tile the buffer.
    fn assert_conservation(arena: &BufferAllocator) {
        let stats = arena.stats();
        assert_eq!(
            stats.allocated + stats.free_space + stats.metadata,
            stats.capacity,
            "blocks no longer tile the buffer:\n{}",
            arena.dump()
        );
    }

    #[test]
    fn test_construction_rejects_tiny_buffers() {
        assert!(matches!(
            BufferAllocator::new(0),
            Err(crate::ArenaError::ZeroCapacity)
        ));
        assert!(matches!(
            BufferAllocator::new(2 * HEADER_SIZE),
            Err(crate::ArenaError::CapacityTooSmall { .. })
        ));
    }

    #[test]
    fn test_bootstrap_single_free_block() {
        let arena = BufferAllocator::new(1024).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.capacity, 1024);
        assert_eq!(stats.free_space, 1024 - 2 * HEADER_SIZE);
        assert_eq!(stats.free_blocks, 1);
        assert_eq!(stats.metadata, 2 * HEADER_SIZE);
        assert_conservation(&arena);
    }

    #[test]
    fn test_allocate_returns_offset_past_header() {
        let mut arena = BufferAllocator::new(1024).unwrap();
        let a = arena.allocate(100);
        assert_eq!(a, Allocation::new(HEADER_SIZE, 100));
        assert_eq!(arena.live_allocations(), 1);
        assert_conservation(&arena);
    }

    #[test]
    fn test_payload_round_trip() {
        let mut arena = BufferAllocator::new(1024).unwrap();
        let a = arena.allocate(64);
        arena.bytes_mut(a).copy_from_slice(&[0xAB; 64]);
        assert_eq!(arena.bytes(a), &[0xAB; 64]);
    }

    #[test]
    fn test_block_unable_to_donate_header_is_skipped() {
        let mut arena = BufferAllocator::new(2 * HEADER_SIZE + 100).unwrap();
        // The only free block holds 100 bytes. A 60-byte request would
        // leave exactly HEADER_SIZE behind - no room for a usable
        // remainder - so it must not match.
        assert!(arena.allocate(100 - HEADER_SIZE).is_empty());
        // An exact request still consumes the block whole.
        assert_eq!(arena.allocate(100).size, 100);
        assert_conservation(&arena);
    }

    #[test]
    fn test_free_reclaims_absorbed_headers() {
        let mut arena = BufferAllocator::new(1024).unwrap();
        let spans: Vec<_> = (0..3).map(|_| arena.allocate(100)).collect();
        assert_eq!(arena.stats().metadata, 5 * HEADER_SIZE);
        for span in &spans {
            arena.free(span.offset);
        }
        let stats = arena.stats();
        assert_eq!(stats.free_blocks, 1);
        assert_eq!(stats.free_space, 1024 - 2 * HEADER_SIZE);
        assert_eq!(stats.metadata, 2 * HEADER_SIZE);
    }

    #[test]
    fn test_realloc_grows_in_place_into_free_successor() {
        let mut arena = BufferAllocator::new(1024).unwrap();
        let a = arena.allocate(100);
        arena.bytes_mut(a).copy_from_slice(&[7u8; 100]);
        let (grown, moved) = arena.reallocate(a.offset, 400);
        assert!(!moved);
        assert_eq!(grown, Allocation::new(a.offset, 400));
        assert_eq!(&arena.bytes(grown)[..100], &[7u8; 100]);
        assert_conservation(&arena);
    }

    #[test]
    fn test_realloc_backward_merge_copies_payload() {
        let mut arena = BufferAllocator::new(4096).unwrap();
        let a = arena.allocate(100);
        let b = arena.allocate(50);
        let pattern: Vec<u8> = (0..50).collect();
        arena.bytes_mut(b).copy_from_slice(&pattern);
        // Pin the successor so growth cannot happen in place.
        let tail = arena.stats().largest_free_block;
        let _c = arena.allocate(tail);
        arena.free(a.offset);
        let (moved_alloc, moved) = arena.reallocate(b.offset, 110);
        assert!(moved);
        assert_eq!(moved_alloc.offset, a.offset);
        assert_eq!(&arena.bytes(moved_alloc)[..50], pattern.as_slice());
        assert_conservation(&arena);
    }

    #[test]
    fn test_realloc_fallback_copies_payload_to_fresh_span() {
        let mut arena = BufferAllocator::new(4096).unwrap();
        let a = arena.allocate(100);
        let b = arena.allocate(50);
        let pattern: Vec<u8> = (0..100).collect();
        arena.bytes_mut(a).copy_from_slice(&pattern);
        let (fresh, moved) = arena.reallocate(a.offset, 200);
        assert!(moved);
        assert!(fresh.offset > b.offset);
        assert_eq!(&arena.bytes(fresh)[..100], pattern.as_slice());
        // a's old block is a free hole at the front now.
        assert_eq!(arena.stats().live_allocations, 2);
        assert_conservation(&arena);
    }

    #[test]
    fn test_realloc_exhaustion_releases_span() {
        let mut arena = BufferAllocator::new(2 * HEADER_SIZE + 200).unwrap();
        let a = arena.allocate(200);
        let (result, moved) = arena.reallocate(a.offset, 300);
        assert!(moved);
        assert!(result.is_empty());
        // The old span is gone but the arena is fully consistent.
        assert_eq!(arena.live_allocations(), 0);
        assert_eq!(arena.free_space(), 200);
        assert_eq!(arena.allocate(200).size, 200);
    }

    #[test]
    fn test_reset_restores_whole_buffer() {
        let mut arena = BufferAllocator::new(512).unwrap();
        let _a = arena.allocate(64);
        let _b = arena.allocate(32);
        arena.reset();
        let stats = arena.stats();
        assert_eq!(stats.free_blocks, 1);
        assert_eq!(stats.free_space, 512 - 2 * HEADER_SIZE);
        assert_eq!(arena.live_allocations(), 0);
    }

    #[test]
    fn test_dump_shows_both_views() {
        let mut arena = BufferAllocator::new(1024).unwrap();
        let _a = arena.allocate(100);
        let dump = arena.dump();
        assert!(dump.contains("used  100 B"));
        assert!(dump.contains("free buckets:"));
    }
}
