use crate::{
    binary::{
        verify,
        MerkleTree,
        Proof,
    },
    common::{
        Digest,
        MerkleError,
    },
    hasher::MerkleHasher,
};
use tracing::{
    debug,
    trace,
};

/// A leaf of a sorted tree together with its inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbour {
    leaf: Vec<u8>,
    proof: Proof,
}

impl Neighbour {
    pub fn new(leaf: impl Into<Vec<u8>>, proof: Proof) -> Self {
        Self {
            leaf: leaf.into(),
            proof,
        }
    }

    pub fn leaf(&self) -> &[u8] {
        &self.leaf
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }
}

/// Evidence that a value is absent from a tree whose leaves are strictly
/// ascending: the included leaves that bracket it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExclusionProof {
    /// The value sorts before the first leaf.
    Before { right: Neighbour },
    /// The value sorts after the last leaf.
    After { left: Neighbour },
    /// The value sorts between two adjacent leaves.
    Between { left: Neighbour, right: Neighbour },
}

impl<H> MerkleTree<H>
where
    H: MerkleHasher,
{
    /// Proves that `leaf` is not one of the tree's leaves.
    ///
    /// Only trees built over strictly ascending leaves can produce exclusion
    /// proofs.
    pub fn prove_absence(&self, leaf: &[u8]) -> Result<ExclusionProof, MerkleError> {
        if !self.is_sorted() {
            return Err(MerkleError::UnsortedLeaves)
        }

        let leaves = self.leaf_values();
        let insertion = match leaves.binary_search_by(|probe| probe.as_slice().cmp(leaf)) {
            Ok(index) => return Err(MerkleError::LeafPresent(index as u64)),
            Err(insertion) => insertion,
        };

        let neighbour = |index: usize| -> Result<Neighbour, MerkleError> {
            let proof = self.prove(index as u64)?;
            Ok(Neighbour::new(leaves[index].clone(), proof))
        };

        let proof = if insertion == 0 {
            ExclusionProof::Before {
                right: neighbour(0)?,
            }
        } else if insertion == leaves.len() {
            ExclusionProof::After {
                left: neighbour(insertion - 1)?,
            }
        } else {
            ExclusionProof::Between {
                left: neighbour(insertion - 1)?,
                right: neighbour(insertion)?,
            }
        };

        debug!(insertion, "generated exclusion proof");

        Ok(proof)
    }
}

/// Checks an exclusion proof for `leaf` against `root`.
///
/// Every neighbour proof is verified first, so structural defects surface as
/// errors exactly as they do from [`verify`](crate::verify). The result is
/// only meaningful when `root` is known to commit to a strictly ascending set
/// of leaves; an unsorted tree can bracket a value it contains.
pub fn verify_absence<H>(
    leaf: &[u8],
    proof: &ExclusionProof,
    root: &Digest,
    hasher: &H,
) -> Result<bool, MerkleError>
where
    H: MerkleHasher + ?Sized,
{
    let included = |neighbour: &Neighbour| {
        verify(neighbour.leaf(), neighbour.proof(), root, hasher)
    };

    let valid = match proof {
        ExclusionProof::Before { right } => {
            included(right)?
                && right.proof().leaf_index() == 0
                && leaf < right.leaf()
        }
        ExclusionProof::After { left } => {
            let last = left.proof().leaf_count().checked_sub(1);
            included(left)?
                && Some(left.proof().leaf_index()) == last
                && left.leaf() < leaf
        }
        ExclusionProof::Between { left, right } => {
            let (left_ok, right_ok) = (included(left)?, included(right)?);
            left_ok
                && right_ok
                && left.proof().leaf_count() == right.proof().leaf_count()
                && left.proof().leaf_index().checked_add(1)
                    == Some(right.proof().leaf_index())
                && left.leaf() < leaf
                && leaf < right.leaf()
        }
    };

    if !valid {
        trace!("exclusion proof does not bracket the leaf");
    }

    Ok(valid)
}
