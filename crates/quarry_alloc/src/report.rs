//! # Arena Introspection
//!
//! Stats snapshots and the diagnostic text dump shared by both allocator
//! variants. The dump is a debugging aid, not part of the functional
//! contract: a sequential block view followed by the per-bucket free-list
//! view, with human-readable byte sizes.

use std::fmt::Write;

use crate::bucket::bucket_index;

/// Point-in-time statistics for an arena.
///
/// Snapshots are computed by walking the physical block chain, so they
/// reflect the actual bookkeeping structure rather than cached counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaStats {
    /// Total arena capacity in bytes.
    pub capacity: usize,
    /// Bytes handed out to live allocations.
    pub allocated: usize,
    /// Bytes sitting in free blocks.
    pub free_space: usize,
    /// Bytes consumed by embedded block headers (zero for the range variant).
    pub metadata: usize,
    /// Number of live allocations.
    pub live_allocations: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Size of the largest free block (the biggest request that can succeed).
    pub largest_free_block: usize,
}

impl ArenaStats {
    /// Fraction of the capacity handed out to live allocations.
    #[must_use]
    pub fn utilization(&self) -> f32 {
        if self.capacity > 0 {
            self.allocated as f32 / self.capacity as f32
        } else {
            0.0
        }
    }

    /// Fraction of free space unreachable by a single largest-block request.
    ///
    /// Zero means all free space is one contiguous block.
    #[must_use]
    pub fn fragmentation(&self) -> f32 {
        if self.free_space > 0 {
            1.0 - self.largest_free_block as f32 / self.free_space as f32
        } else {
            0.0
        }
    }
}

/// One block as seen by the dump: where it starts, how many usable bytes it
/// spans, and whether it is free.
pub(crate) struct BlockView {
    pub offset: usize,
    pub size: usize,
    pub is_free: bool,
}

/// Formats a byte count with a binary-prefix unit.
pub(crate) fn human_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.2} KiB", b / KIB)
    } else if b < GIB {
        format!("{:.2} MiB", b / MIB)
    } else {
        format!("{:.2} GiB", b / GIB)
    }
}

/// Renders the two-view diagnostic dump for an arena.
///
/// `blocks` must be in physical order; `bucket_sizes` holds the free block
/// sizes of each non-empty bucket in list order.
pub(crate) fn render_dump(
    name: &str,
    capacity: usize,
    blocks: &[BlockView],
    bucket_sizes: &[(usize, Vec<usize>)],
) -> String {
    let free: usize = blocks.iter().filter(|b| b.is_free).map(|b| b.size).sum();
    let free_count = blocks.iter().filter(|b| b.is_free).count();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{name}: capacity {}, {} free across {free_count} block(s)",
        human_bytes(capacity),
        human_bytes(free),
    );
    let _ = writeln!(out, "  blocks:");
    for block in blocks {
        let state = if block.is_free { "free" } else { "used" };
        let _ = writeln!(
            out,
            "    0x{:08x}  {state}  {}",
            block.offset,
            human_bytes(block.size),
        );
    }
    let _ = writeln!(out, "  free buckets:");
    for (index, sizes) in bucket_sizes {
        let lo = 1usize << index;
        let joined = sizes
            .iter()
            .map(|s| human_bytes(*s))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "    [{index:2}] {}..{}: {joined}",
            human_bytes(lo),
            human_bytes(lo << 1),
        );
    }
    out
}

/// Debug-build check that every listed free block sits in its own size class.
pub(crate) fn assert_bucket_placement(bucket_sizes: &[(usize, Vec<usize>)]) {
    for (index, sizes) in bucket_sizes {
        for size in sizes {
            debug_assert_eq!(
                bucket_index(*size),
                *index,
                "free block of {size} bytes filed under bucket {index}"
            );
        }
    }
}
