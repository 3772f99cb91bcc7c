mod digest;
mod error;
mod prefix;

pub use self::digest::Digest;
pub use error::{
    Malformation,
    MerkleError,
};
pub use prefix::Prefix;

/// Largest number of levels below the root. A tree over `u64::MAX` leaves has
/// exactly this many.
pub const MAX_DEPTH: usize = 64;

/// Number of levels below the root of a tree with `leaves_count` leaves.
///
/// Every level holds half of the level below it, rounded up, so the depth is
/// `ceil(log2(leaves_count))`. Returns 0 for zero or one leaf.
pub const fn depth(leaves_count: u64) -> usize {
    if leaves_count <= 1 {
        return 0;
    }
    (u64::BITS - (leaves_count - 1).leading_zeros()) as usize
}

/// Number of nodes on the level directly above a level of `count` nodes.
pub(crate) const fn parent_count(count: u64) -> u64 {
    count / 2 + count % 2
}
