use std::collections::HashMap;

use crate::reconstruction::domain::sequence_diff::{OpTag, Opcode, SequenceDiff};

/// Ratcliff/Obershelp diff: find the longest common block, then recurse on
/// the unmatched text to its left and right.
///
/// No junk heuristics are applied, so every character takes part in
/// matching. Ties prefer the earliest block in `a`, then in `b`.
pub struct MatchingBlocksDiff;

/// `(i, j, size)`: `a[i..i + size] == b[j..j + size]`.
type Block = (usize, usize, usize);

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b_positions: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b_positions.entry(ch).or_default().push(j);
        }
        Self { a, b, b_positions }
    }

    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        // run length of the match ending at b[j], for the previous row of a
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_positions.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        run_ending_at.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let size = prev + 1;
                    next_runs.insert(j, size);
                    if size > best_size {
                        best_i = i + 1 - size;
                        best_j = j + 1 - size;
                        best_size = size;
                    }
                }
            }
            run_ending_at = next_runs;
        }

        (best_i, best_j, best_size)
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            blocks.push((i, j, size));
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }
        blocks.sort_unstable();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for (i, j, size) in blocks {
            match merged.last_mut() {
                Some(last) if last.0 + last.2 == i && last.1 + last.2 == j => last.2 += size,
                _ => merged.push((i, j, size)),
            }
        }
        merged.push((self.a.len(), self.b.len(), 0));
        merged
    }
}

impl SequenceDiff for MatchingBlocksDiff {
    fn opcodes(&self, a: &[char], b: &[char]) -> Vec<Opcode> {
        let matcher = Matcher::new(a, b);
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);

        for (ai, bj, size) in matcher.matching_blocks() {
            let tag = match (i < ai, j < bj) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode::new(tag, i, ai, j, bj));
            }
            i = ai + size;
            j = bj + size;
            if size > 0 {
                opcodes.push(Opcode::new(OpTag::Equal, ai, i, bj, j));
            }
        }

        opcodes
    }
}
