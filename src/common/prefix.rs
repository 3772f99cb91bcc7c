/// Domain separation tag prepended to every hash input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    Node,
    Leaf,
}

impl AsRef<[u8]> for Prefix {
    fn as_ref(&self) -> &[u8] {
        match self {
            Prefix::Node => &[0x01],
            Prefix::Leaf => &[0x00],
        }
    }
}
