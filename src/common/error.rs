use crate::common::MAX_DEPTH;

/// The structural defect that makes a proof unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Malformation {
    #[display(fmt = "sibling {index} is {actual} bytes long, expected {expected}")]
    DigestLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[display(
        fmt = "path has {actual} siblings but a tree of {leaves_count} leaves has depth {expected}"
    )]
    PathLength {
        leaves_count: u64,
        expected: usize,
        actual: usize,
    },
    #[display(fmt = "path of {_0} siblings exceeds the maximum depth {MAX_DEPTH}")]
    TooDeep(u64),
    #[display(fmt = "side flag {_0} is neither left (0) nor right (1)")]
    InvalidSide(u8),
    #[display(fmt = "proof is for a tree of zero leaves")]
    ZeroLeaves,
    #[display(fmt = "leaf index {index} is outside a tree of {leaves_count} leaves")]
    LeafIndex { index: u64, leaves_count: u64 },
    #[display(fmt = "encoding ends after {_0} bytes")]
    Truncated(usize),
    #[display(fmt = "{_0} bytes follow the encoded proof")]
    TrailingBytes(usize),
    #[display(fmt = "siblings are declared to be zero bytes long")]
    ZeroDigestSize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("cannot build a merkle tree over zero leaves")]
    EmptyInput,
    #[error("leaf index {index} is out of range for a tree of {leaves_count} leaves")]
    IndexOutOfRange { index: u64, leaves_count: u64 },
    #[error("malformed proof: {0}")]
    MalformedProof(Malformation),
    #[error("hasher produces {expected} byte digests, got {actual} bytes")]
    Configuration { expected: usize, actual: usize },
    #[error("leaf is not part of the tree")]
    LeafNotFound,
    #[error("leaf is part of the tree at index {0}")]
    LeafPresent(u64),
    #[error("leaves are not in strictly ascending order")]
    UnsortedLeaves,
}

impl From<Malformation> for MerkleError {
    fn from(malformation: Malformation) -> Self {
        MerkleError::MalformedProof(malformation)
    }
}
