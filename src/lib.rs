//! Binary Merkle trees over ordered leaf sets.
//!
//! Leaves are hashed as `H(0x00 || leaf)` and internal nodes as
//! `H(0x01 || left || right)`. When a level holds an odd number of nodes, the
//! trailing node is paired with itself. Proofs carry one `(sibling, side)` pair
//! per level together with the proven index and the number of leaves, and can
//! be checked with [`verify`] without access to the tree.
//!
//! ```
//! use merkleproof::{verify, MerkleTree, Sha256Hasher};
//!
//! let tree = MerkleTree::new(Sha256Hasher::new(), ["a", "b", "c"]).unwrap();
//! let proof = tree.prove(2).unwrap();
//!
//! assert!(verify(b"c", &proof, tree.root(), &Sha256Hasher::new()).unwrap());
//! assert!(!verify(b"a", &proof, tree.root(), &Sha256Hasher::new()).unwrap());
//! ```

#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod binary;
pub mod common;
pub mod hasher;


pub use binary::{
    verify,
    verify_absence,
    ExclusionProof,
    MerkleTree,
    Neighbour,
    Proof,
    ProofNode,
    Side,
};
pub use common::{
    Digest,
    Malformation,
    MerkleError,
};
pub use hasher::{
    DigestHasher,
    MerkleHasher,
    Sha256Hasher,
    Sha512Hasher,
};
