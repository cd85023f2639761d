//! # Size-Class Buckets
//!
//! Free blocks are segregated into power-of-two size classes. A block of
//! size `S` lives in bucket `floor(log2(S))`, so bucket `i` holds exactly
//! the sizes in `[2^i, 2^(i+1))`. Allocation scans buckets upward from the
//! request's own class, which bounds the search to the bucket count instead
//! of the free-block count.

/// Number of size-class buckets.
///
/// One bucket per possible bit position of a block size; sizes are `usize`,
/// so this covers every representable arena.
pub(crate) const BUCKET_COUNT: usize = usize::BITS as usize;

/// Maps a byte size to its power-of-two size class: `floor(log2(size))`.
///
/// `size` must be non-zero; zero has no size class.
#[inline]
pub(crate) fn bucket_index(size: usize) -> usize {
    debug_assert!(size > 0, "zero-size blocks have no size class");
    (usize::BITS - 1 - size.leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers_of_two_start_their_class() {
        assert_eq!(bucket_index(1), 0);
        assert_eq!(bucket_index(2), 1);
        assert_eq!(bucket_index(4), 2);
        assert_eq!(bucket_index(1024), 10);
    }

    #[test]
    fn test_class_covers_half_open_range() {
        assert_eq!(bucket_index(3), 1);
        assert_eq!(bucket_index(1023), 9);
        assert_eq!(bucket_index(1025), 10);
        assert_eq!(bucket_index(2047), 10);
        assert_eq!(bucket_index(2048), 11);
    }

    #[test]
    fn test_max_size_stays_in_table() {
        assert!(bucket_index(usize::MAX) < BUCKET_COUNT);
    }
}
