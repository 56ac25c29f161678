use crate::seq::bitmap::{OccupiedRow, SeqBitmap, TierWidth};
use crate::seq::sequence::Support;

/// For every (sequence, itemset position) cell, the set of items whose last
/// occurrence in that sequence lies strictly after the position.
///
/// Items are addressed by their dense order, one bit each. Sequences are
/// addressed the way the bitmaps store them, by tier and row within the tier.
#[derive(Debug, Clone, Default)]
pub struct ItemIsExistTable {
    /// u64 words per cell
    words: usize,
    /// first cell of each tier, indexed by [`TierWidth::index`]
    tier_base: [usize; 5],
    cells: Vec<u64>,
}

impl ItemIsExistTable {
    /// Builds the table from the item bitmaps in dense order. All bitmaps
    /// must come from the same vertical database.
    pub fn fill(items: &[&SeqBitmap]) -> Self {
        let Some(layout) = items.first() else {
            return Self::default();
        };

        let words = items.len().div_ceil(64);
        let mut tier_base = [0; 5];
        let mut cell_count = 0;
        for width in TierWidth::ALL {
            tier_base[width.index()] = cell_count;
            cell_count += layout.tier_len(width) * width.bits();
        }

        let mut cells = vec![0; cell_count * words];
        for (order, bitmap) in items.iter().enumerate() {
            let (word, mask) = (order / 64, 1u64 << (order % 64));
            bitmap.for_each_occupied_row(|row| {
                let base = cell_index(&tier_base, &row, 0);
                for position in 0..row.last {
                    cells[(base + position) * words + word] |= mask;
                }
            });
        }

        Self {
            words,
            tier_base,
            cells,
        }
    }

    /// Candidates whose S-step from `prefix` reaches `min_count`.
    ///
    /// A sequence supports the S-step exactly when the candidate occurs after
    /// the prefix's first end position, that is when the candidate's bit is set
    /// at that position. Counting stops as soon as `min_count` is reached.
    pub fn frequent_items(&self, prefix: &SeqBitmap, candidates: &[usize], min_count: Support) -> Vec<usize> {
        let mut probes = Vec::new();
        prefix.for_each_occupied_row(|row| probes.push(cell_index(&self.tier_base, &row, row.first) * self.words));

        candidates
            .iter()
            .copied()
            .filter(|&candidate| {
                let (word, mask) = (candidate / 64, 1u64 << (candidate % 64));
                let mut support: Support = 0;
                for &probe in &probes {
                    if self.cells[probe + word] & mask != 0 {
                        support += 1;
                        if support >= min_count {
                            return true;
                        }
                    }
                }
                false
            })
            .collect()
    }
}

#[inline]
fn cell_index(tier_base: &[usize; 5], row: &OccupiedRow, position: usize) -> usize {
    tier_base[row.width.index()] + row.row * row.width.bits() + position
}
