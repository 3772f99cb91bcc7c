use crate::{
    binary::verify,
    common::{
        Digest,
        Malformation,
        MerkleError,
    },
    hasher::MerkleHasher,
};

/// Position of a sibling relative to the node being proven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Side {
    #[display(fmt = "left")]
    Left = 0,
    #[display(fmt = "right")]
    Right = 1,
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side as u8
    }
}

impl TryFrom<u8> for Side {
    type Error = Malformation;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Side::Left),
            1 => Ok(Side::Right),
            _ => Err(Malformation::InvalidSide(byte)),
        }
    }
}

/// One step of an inclusion proof: the sibling digest and the side it sits on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofNode {
    digest: Digest,
    side: Side,
}

impl ProofNode {
    pub fn new(digest: Digest, side: Side) -> Self {
        Self { digest, side }
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

/// Inclusion proof for the leaf at `leaf_index` of a tree of `leaf_count`
/// leaves.
///
/// The path is ordered from the leaf's sibling up to the root's child. A proof
/// does not borrow the tree that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    leaf_index: u64,
    leaf_count: u64,
    path: Vec<ProofNode>,
}

impl Proof {
    pub fn new(leaf_index: u64, leaf_count: u64, path: Vec<ProofNode>) -> Self {
        Self {
            leaf_index,
            leaf_count,
            path,
        }
    }

    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    pub fn path(&self) -> &[ProofNode] {
        &self.path
    }

    /// Number of siblings in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// True for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// See [`verify`](crate::verify).
    pub fn verify<H>(
        &self,
        leaf: &[u8],
        root: &Digest,
        hasher: &H,
    ) -> Result<bool, MerkleError>
    where
        H: MerkleHasher + ?Sized,
    {
        verify(leaf, self, root, hasher)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn side_flags_round_trip_through_u8() {
        assert_eq!(u8::from(Side::Left), 0);
        assert_eq!(u8::from(Side::Right), 1);
        assert_eq!(Side::try_from(0), Ok(Side::Left));
        assert_eq!(Side::try_from(1), Ok(Side::Right));
        assert_eq!(Side::try_from(2), Err(Malformation::InvalidSide(2)));
        assert_eq!(Side::try_from(0xff), Err(Malformation::InvalidSide(0xff)));
    }

    #[test]
    fn side_displays_in_lowercase() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.to_string(), "right");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn proof_round_trips_through_json() {
        let tree = crate::MerkleTree::from_leaves(["a", "b", "c"]).unwrap();
        let proof = tree.prove(2).unwrap();

        let json = serde_json::to_string(&proof).unwrap();
        let decoded: Proof = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, proof);
    }
}
