use crate::{
    binary::{
        Proof,
        ProofNode,
        Side,
    },
    common::{
        Digest,
        Malformation,
        MerkleError,
        MAX_DEPTH,
    },
};

// leaf_index | leaf_count | path_len | digest_size
const HEADER_LEN: usize = 4 * core::mem::size_of::<u64>();

impl Proof {
    /// Length of the sibling digests, or zero for an empty path.
    pub fn digest_size(&self) -> usize {
        self.path().first().map_or(0, |node| node.digest().len())
    }

    /// Number of bytes [`to_bytes`](Proof::to_bytes) produces.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.len() * (self.digest_size() + 1)
    }

    /// Serializes the proof.
    ///
    /// All integers are big-endian `u64`. The header carries the leaf index,
    /// the leaf count, the path length and the digest size, and is followed by
    /// one record per sibling: the digest bytes, then the side flag (`0` for
    /// left, `1` for right).
    pub fn to_bytes(&self) -> Result<Vec<u8>, MerkleError> {
        let digest_size = self.digest_size();
        if let Some((index, node)) = self
            .path()
            .iter()
            .enumerate()
            .find(|(_, node)| node.digest().len() != digest_size)
        {
            return Err(Malformation::DigestLength {
                index,
                expected: digest_size,
                actual: node.digest().len(),
            }
            .into())
        }

        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.leaf_index().to_be_bytes());
        bytes.extend_from_slice(&self.leaf_count().to_be_bytes());
        bytes.extend_from_slice(&(self.len() as u64).to_be_bytes());
        bytes.extend_from_slice(&(digest_size as u64).to_be_bytes());
        for node in self.path() {
            bytes.extend_from_slice(node.digest().as_bytes());
            bytes.push(node.side().into());
        }
        Ok(bytes)
    }

    /// Deserializes a proof produced by [`to_bytes`](Proof::to_bytes).
    ///
    /// Only the encoding is checked here; whether the path fits the leaf
    /// count is left to the verifier.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MerkleError> {
        let mut reader = Reader::new(bytes);
        let leaf_index = reader.read_u64()?;
        let leaf_count = reader.read_u64()?;
        let path_len = reader.read_u64()?;
        let digest_size = reader.read_u64()?;

        if path_len > MAX_DEPTH as u64 {
            return Err(Malformation::TooDeep(path_len).into())
        }
        let path_len = path_len as usize;

        let path = if path_len == 0 {
            Vec::new()
        } else {
            if digest_size == 0 {
                return Err(Malformation::ZeroDigestSize.into())
            }
            let digest_size =
                usize::try_from(digest_size).map_err(|_| reader.truncated())?;
            let mut path = Vec::with_capacity(path_len);
            for _ in 0..path_len {
                let digest = Digest::from(reader.read(digest_size)?);
                let side = Side::try_from(reader.read_u8()?)?;
                path.push(ProofNode::new(digest, side));
            }
            path
        };

        reader.finish()?;
        Ok(Proof::new(leaf_index, leaf_count, path))
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn truncated(&self) -> Malformation {
        Malformation::Truncated(self.bytes.len())
    }

    fn read(&mut self, len: usize) -> Result<&'a [u8], Malformation> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| self.truncated())?;
        let chunk = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(chunk)
    }

    fn read_u8(&mut self) -> Result<u8, Malformation> {
        Ok(self.read(1)?[0])
    }

    fn read_u64(&mut self) -> Result<u64, Malformation> {
        let word = self.read(core::mem::size_of::<u64>())?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(word);
        Ok(u64::from_be_bytes(buf))
    }

    fn finish(self) -> Result<(), Malformation> {
        match self.bytes.len() - self.offset {
            0 => Ok(()),
            trailing => Err(Malformation::TrailingBytes(trailing)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        binary::MerkleTree,
        hasher::{
            MerkleHasher,
            Sha256Hasher,
        },
    };

    const HASHER: Sha256Hasher = Sha256Hasher::new();

    fn four_leaf_proof() -> (MerkleTree, Proof) {
        let tree = MerkleTree::from_leaves(["a", "b", "c", "d"]).unwrap();
        let proof = tree.prove(2).unwrap();
        (tree, proof)
    }

    #[test]
    fn to_bytes_lays_out_the_header_then_the_siblings() {
        let (_, proof) = four_leaf_proof();
        let d = HASHER.hash_leaf(b"d");
        let ab = HASHER.hash_internal(&HASHER.hash_leaf(b"a"), &HASHER.hash_leaf(b"b"));

        let bytes = proof.to_bytes().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u64.to_be_bytes());
        expected.extend_from_slice(&4u64.to_be_bytes());
        expected.extend_from_slice(&2u64.to_be_bytes());
        expected.extend_from_slice(&32u64.to_be_bytes());
        expected.extend_from_slice(d.as_bytes());
        expected.push(1);
        expected.extend_from_slice(ab.as_bytes());
        expected.push(0);
        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), proof.encoded_len());
    }

    #[test]
    fn from_bytes_restores_a_proof_that_still_verifies() {
        let (tree, proof) = four_leaf_proof();

        let decoded = Proof::from_bytes(&proof.to_bytes().unwrap()).unwrap();

        assert_eq!(decoded, proof);
        assert_eq!(decoded.verify(b"c", tree.root(), &HASHER), Ok(true));
    }

    #[test]
    fn single_leaf_proof_encodes_a_zero_digest_size() {
        let tree = MerkleTree::from_leaves(["only"]).unwrap();
        let proof = tree.prove(0).unwrap();

        let bytes = proof.to_bytes().unwrap();

        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[24..], &[0u8; 8]);
        assert_eq!(Proof::from_bytes(&bytes).unwrap(), proof);
    }

    #[test]
    fn digest_size_is_ignored_for_an_empty_path() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.extend_from_slice(&1u64.to_be_bytes());
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.extend_from_slice(&32u64.to_be_bytes());

        let proof = Proof::from_bytes(&bytes).unwrap();

        assert!(proof.is_empty());
        assert_eq!(proof.leaf_count(), 1);
    }

    #[test]
    fn from_bytes_reads_header_words_as_big_endian() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0102_0304_0506_0708u64.to_be_bytes());
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.extend_from_slice(&0u64.to_be_bytes());

        let proof = Proof::from_bytes(&bytes).unwrap();

        assert_eq!(proof.leaf_index(), 0x0102_0304_0506_0708);
        assert_eq!(proof.leaf_count(), u64::MAX);
        assert!(proof.is_empty());
    }

    #[test]
    fn to_bytes_rejects_siblings_of_mixed_length() {
        let path = vec![
            ProofNode::new(Digest::from([0u8; 32]), Side::Right),
            ProofNode::new(Digest::from([0u8; 31]), Side::Left),
        ];
        let proof = Proof::new(0, 4, path);

        assert_eq!(
            proof.to_bytes(),
            Err(MerkleError::MalformedProof(Malformation::DigestLength {
                index: 1,
                expected: 32,
                actual: 31,
            }))
        );
    }

    #[test]
    fn from_bytes_rejects_an_unknown_side_flag() {
        let (_, proof) = four_leaf_proof();
        let mut bytes = proof.to_bytes().unwrap();
        bytes[HEADER_LEN + 32] = 2;

        assert_eq!(
            Proof::from_bytes(&bytes),
            Err(MerkleError::MalformedProof(Malformation::InvalidSide(2)))
        );
    }

    #[test]
    fn from_bytes_rejects_truncated_input() {
        let (_, proof) = four_leaf_proof();
        let bytes = proof.to_bytes().unwrap();

        for len in [0, 7, HEADER_LEN - 1, HEADER_LEN, bytes.len() - 1] {
            assert_eq!(
                Proof::from_bytes(&bytes[..len]),
                Err(MerkleError::MalformedProof(Malformation::Truncated(len))),
                "length {len}"
            );
        }
    }

    #[test]
    fn from_bytes_rejects_trailing_bytes() {
        let (_, proof) = four_leaf_proof();
        let mut bytes = proof.to_bytes().unwrap();
        bytes.extend_from_slice(&[0xaa, 0xbb]);

        assert_eq!(
            Proof::from_bytes(&bytes),
            Err(MerkleError::MalformedProof(Malformation::TrailingBytes(2)))
        );
    }

    #[test]
    fn from_bytes_rejects_paths_deeper_than_the_maximum() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        bytes.extend_from_slice(&65u64.to_be_bytes());
        bytes.extend_from_slice(&32u64.to_be_bytes());

        assert_eq!(
            Proof::from_bytes(&bytes),
            Err(MerkleError::MalformedProof(Malformation::TooDeep(65)))
        );
    }

    #[test]
    fn from_bytes_rejects_zero_length_siblings() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.extend_from_slice(&2u64.to_be_bytes());
        bytes.extend_from_slice(&1u64.to_be_bytes());
        bytes.extend_from_slice(&0u64.to_be_bytes());
        bytes.push(1);

        assert_eq!(
            Proof::from_bytes(&bytes),
            Err(MerkleError::MalformedProof(Malformation::ZeroDigestSize))
        );
    }
}
