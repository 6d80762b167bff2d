//! Opaque entity references used inside a [`crate::Function`].
//!
//! Blocks are referenced by index rather than by name everywhere except in
//! the textual formats (parser input, printers): a `BlockId` is a compact
//! `u32` wrapping a position in `Function::blocks`, in the spirit of
//! Cranelift's entity references, but sized for a single function's worth
//! of blocks rather than a whole program.

use std::fmt;

/// A reference to a [basic block](crate::Block) within a [`crate::Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Create a block reference from its raw index.
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// The raw index into `Function::blocks`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "block{}", self.0)
    }
}
