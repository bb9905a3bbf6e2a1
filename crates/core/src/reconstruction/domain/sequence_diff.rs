#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Insert,
    Delete,
}

/// One edit-script step turning `a[i1..i2]` into `b[j1..j2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { tag, i1, i2, j1, j2 }
    }
}

/// Domain interface for sequence alignment between two char sequences.
///
/// Opcodes must cover both sequences contiguously and in order.
pub trait SequenceDiff: Send + Sync {
    fn opcodes(&self, a: &[char], b: &[char]) -> Vec<Opcode>;
}
