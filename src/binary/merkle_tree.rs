use crate::{
    binary::{
        Proof,
        ProofNode,
        Side,
    },
    common::{
        depth,
        Digest,
        MerkleError,
    },
    hasher::{
        MerkleHasher,
        Sha256Hasher,
    },
};
use tracing::debug;

/// Binary Merkle tree over an ordered, non-empty list of leaves.
///
/// The tree is stored as a table of levels: `levels[0]` holds the leaf sums
/// and every following level holds the node sums of the level below, paired
/// left to right. When a level holds an odd number of nodes the trailing node
/// is paired with itself rather than promoted. The last level holds the root.
///
/// ```text
///             N3 = H(N1, N2)
///            /  \
///           /    \
///   H(L0, L1)    H(L2, L2)
///      /  \         |
///    L0    L1      L2
/// ```
///
/// A tree never changes after construction and can be shared between threads
/// to generate proofs concurrently.
#[derive(Clone, Debug)]
pub struct MerkleTree<H = Sha256Hasher> {
    hasher: H,
    leaves: Vec<Vec<u8>>,
    levels: Vec<Vec<Digest>>,
    sorted: bool,
}

impl MerkleTree<Sha256Hasher> {
    /// Builds a tree over `leaves` with SHA-256.
    pub fn from_leaves<I, T>(leaves: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::new(Sha256Hasher::new(), leaves)
    }
}

impl<H> MerkleTree<H>
where
    H: MerkleHasher,
{
    pub fn new<I, T>(hasher: H, leaves: I) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let leaves = leaves
            .into_iter()
            .map(|leaf| leaf.as_ref().to_vec())
            .collect::<Vec<_>>();
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let sorted = leaves.windows(2).all(|pair| pair[0] < pair[1]);

        let mut levels = Vec::with_capacity(depth(leaves.len() as u64) + 1);
        let mut level = leaves
            .iter()
            .map(|leaf| hasher.hash_leaf(leaf))
            .collect::<Vec<_>>();
        while level.len() > 1 {
            let parents = Self::join_level(&hasher, &level);
            levels.push(core::mem::replace(&mut level, parents));
        }
        levels.push(level);

        debug!(
            leaves_count = leaves.len(),
            depth = levels.len() - 1,
            sorted,
            "built merkle tree"
        );

        Ok(Self {
            hasher,
            leaves,
            levels,
            sorted,
        })
    }

    pub fn root(&self) -> &Digest {
        &self.levels[self.depth()][0]
    }

    pub fn leaves_count(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// Number of levels below the root; zero for a single leaf.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Node sums of level `height`, where level 0 holds the leaf sums.
    pub fn level(&self, height: usize) -> Option<&[Digest]> {
        self.levels.get(height).map(Vec::as_slice)
    }

    /// Raw bytes of the leaf at `index`.
    pub fn leaf(&self, index: u64) -> Option<&[u8]> {
        let index = usize::try_from(index).ok()?;
        self.leaves.get(index).map(Vec::as_slice)
    }

    pub fn leaves(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.leaves.iter().map(Vec::as_slice)
    }

    /// Index of the first leaf equal to `leaf`.
    pub fn position(&self, leaf: &[u8]) -> Option<u64> {
        self.leaves
            .iter()
            .position(|candidate| candidate == leaf)
            .map(|index| index as u64)
    }

    /// Whether the leaves are in strictly ascending byte order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Generates the inclusion proof for the leaf at `index`.
    pub fn prove(&self, index: u64) -> Result<Proof, MerkleError> {
        let leaves_count = self.leaves_count();
        let mut position = usize::try_from(index)
            .ok()
            .filter(|position| *position < self.leaves.len())
            .ok_or(MerkleError::IndexOutOfRange {
                index,
                leaves_count,
            })?;

        let path = self.levels[..self.depth()]
            .iter()
            .map(|level| {
                let sibling = position ^ 1;
                let node = match level.get(sibling) {
                    Some(digest) if sibling < position => {
                        ProofNode::new(digest.clone(), Side::Left)
                    }
                    Some(digest) => ProofNode::new(digest.clone(), Side::Right),
                    // The trailing node of an odd level is its own sibling
                    None => ProofNode::new(level[position].clone(), Side::Right),
                };
                position /= 2;
                node
            })
            .collect::<Vec<_>>();

        debug!(index, leaves_count, depth = path.len(), "generated inclusion proof");

        Ok(Proof::new(index, leaves_count, path))
    }

    /// Generates the inclusion proof for the first leaf equal to `leaf`.
    pub fn prove_leaf(&self, leaf: &[u8]) -> Result<Proof, MerkleError> {
        let index = self.position(leaf).ok_or(MerkleError::LeafNotFound)?;
        self.prove(index)
    }

    pub(crate) fn leaf_values(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    fn join_level(hasher: &H, level: &[Digest]) -> Vec<Digest> {
        level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                hasher.hash_internal(left, right)
            })
            .collect()
    }
}
