use crate::common::{
    Digest,
    Prefix,
};
use core::{
    fmt,
    marker::PhantomData,
};
use digest::Digest as DigestImpl;

/// Hash function used to commit to leaves and internal nodes.
///
/// Implementors provide [`digest`](MerkleHasher::digest) and
/// [`output_size`](MerkleHasher::output_size); the leaf and node sums are
/// domain separated by [`Prefix`], so a leaf sum can never be mistaken for a
/// node sum.
pub trait MerkleHasher {
    /// Length in bytes of every digest this hasher produces.
    fn output_size(&self) -> usize;

    /// Hashes the concatenation of `parts`.
    fn digest(&self, parts: &[&[u8]]) -> Digest;

    // MTH({d(0)}) = Hash(0x00 || d(0))
    fn hash_leaf(&self, data: &[u8]) -> Digest {
        self.digest(&[Prefix::Leaf.as_ref(), data])
    }

    // MTH(D[n]) = Hash(0x01 || MTH(left) || MTH(right))
    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
        self.digest(&[Prefix::Node.as_ref(), left.as_ref(), right.as_ref()])
    }
}

impl<H> MerkleHasher for &H
where
    H: MerkleHasher + ?Sized,
{
    fn output_size(&self) -> usize {
        (**self).output_size()
    }

    fn digest(&self, parts: &[&[u8]]) -> Digest {
        (**self).digest(parts)
    }

    fn hash_leaf(&self, data: &[u8]) -> Digest {
        (**self).hash_leaf(data)
    }

    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).hash_internal(left, right)
    }
}

/// [`MerkleHasher`] backed by any RustCrypto [`digest::Digest`].
///
/// Every call creates a fresh hash context, so one instance can be shared
/// between threads.
pub struct DigestHasher<D> {
    _marker: PhantomData<fn() -> D>,
}

pub type Sha256Hasher = DigestHasher<sha2::Sha256>;
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;

impl<D> DigestHasher<D> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for DigestHasher<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DigestHasher<D> {}

impl<D> fmt::Debug for DigestHasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestHasher")
            .field("algorithm", &core::any::type_name::<D>())
            .finish()
    }
}

impl<D> MerkleHasher for DigestHasher<D>
where
    D: DigestImpl,
{
    fn output_size(&self) -> usize {
        <D as DigestImpl>::output_size()
    }

    fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hash = D::new();
        for part in parts {
            hash.update(part);
        }
        Digest::from(hash.finalize().to_vec())
    }
}
