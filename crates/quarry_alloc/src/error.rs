//! # Arena Construction Errors
//!
//! Only construction can fail. Runtime exhaustion is reported through the
//! empty [`Allocation`](crate::Allocation) token, and misuse of a live
//! arena (double free, foreign offset, zero-size request) is undefined
//! behavior guarded by debug assertions - validation belongs to the layer
//! above this primitive.

use thiserror::Error;

/// Errors that can occur when constructing an arena allocator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// Arena capacity must be non-zero.
    #[error("arena capacity must be non-zero")]
    ZeroCapacity,

    /// The buffer cannot hold the allocator's bootstrap metadata.
    #[error("arena capacity {capacity} cannot hold allocator metadata (minimum {minimum})")]
    CapacityTooSmall {
        /// The capacity that was requested.
        capacity: usize,
        /// The smallest workable capacity.
        minimum: usize,
    },
}
