mod codec;
mod exclusion;
mod merkle_tree;
mod proof;
mod verify;

pub use exclusion::{
    verify_absence,
    ExclusionProof,
    Neighbour,
};
pub use merkle_tree::MerkleTree;
pub use proof::{
    Proof,
    ProofNode,
    Side,
};
pub use verify::verify;
