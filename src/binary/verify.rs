use crate::{
    binary::{
        Proof,
        Side,
    },
    common::{
        depth,
        parent_count,
        Digest,
        Malformation,
        MerkleError,
        MAX_DEPTH,
    },
    hasher::MerkleHasher,
};
use tracing::trace;

/// Verifies that `proof` places `leaf` under `root`.
///
/// Returns `Ok(false)` for a well-formed proof that does not lead to `root`,
/// including proofs whose sides disagree with the claimed leaf index. Errors
/// are reserved for proofs that cannot be evaluated at all:
/// [`MerkleError::Configuration`] when `root` is not a digest of `hasher`, and
/// [`MerkleError::MalformedProof`] for structural defects.
///
/// The final root comparison does not exit at the first differing byte.
pub fn verify<H>(
    leaf: &[u8],
    proof: &Proof,
    root: &Digest,
    hasher: &H,
) -> Result<bool, MerkleError>
where
    H: MerkleHasher + ?Sized,
{
    let digest_size = hasher.output_size();
    if root.len() != digest_size {
        return Err(MerkleError::Configuration {
            expected: digest_size,
            actual: root.len(),
        });
    }
    check_structure(proof, digest_size)?;

    let mut position = proof.leaf_index();
    let mut count = proof.leaf_count();
    let mut sum = hasher.hash_leaf(leaf);

    for (height, node) in proof.path().iter().enumerate() {
        let expected_side = if position % 2 == 0 {
            Side::Right
        } else {
            Side::Left
        };
        if node.side() != expected_side {
            trace!(
                height,
                side = %node.side(),
                expected = %expected_side,
                "proof side disagrees with the leaf index"
            );
            return Ok(false);
        }

        // A trailing node on an odd level is paired with itself
        let is_trailing = position % 2 == 0 && position + 1 == count;
        if is_trailing && !node.digest().ct_eq(&sum) {
            trace!(height, "trailing node is not paired with itself");
            return Ok(false);
        }

        sum = match node.side() {
            Side::Right => hasher.hash_internal(&sum, node.digest()),
            Side::Left => hasher.hash_internal(node.digest(), &sum),
        };
        position /= 2;
        count = parent_count(count);
    }

    let verified = sum.ct_eq(root);
    trace!(
        leaf_index = proof.leaf_index(),
        leaf_count = proof.leaf_count(),
        verified,
        "verified inclusion proof"
    );
    Ok(verified)
}

fn check_structure(proof: &Proof, digest_size: usize) -> Result<(), Malformation> {
    let leaves_count = proof.leaf_count();
    if leaves_count == 0 {
        return Err(Malformation::ZeroLeaves);
    }
    if proof.leaf_index() >= leaves_count {
        return Err(Malformation::LeafIndex {
            index: proof.leaf_index(),
            leaves_count,
        });
    }
    if proof.len() > MAX_DEPTH {
        return Err(Malformation::TooDeep(proof.len() as u64));
    }
    let expected = depth(leaves_count);
    if proof.len() != expected {
        return Err(Malformation::PathLength {
            leaves_count,
            expected,
            actual: proof.len(),
        });
    }
    for (index, node) in proof.path().iter().enumerate() {
        if node.digest().len() != digest_size {
            return Err(Malformation::DigestLength {
                index,
                expected: digest_size,
                actual: node.digest().len(),
            });
        }
    }
    Ok(())
}
