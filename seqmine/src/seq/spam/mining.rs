use crate::seq::bitmap::{SeqBitmap, VerticalDatabase};
use crate::seq::error::Result;
use crate::seq::lapin::ItemIsExistTable;
use crate::seq::miner::{Algorithm, Branch, MiningContext, MiningOutcome};
use crate::seq::sequence::{Item, Sequence, Support};
use crate::seq::settings::MiningSettings;

/// Mines every frequent sequential pattern depth-first over bitmaps.
///
/// Every item of `vertical` reaching the minimum support seeds a branch, in
/// ascending item order. Infrequent items are never emitted nor used as
/// candidates.
pub fn spam_algorithm(vertical: &VerticalDatabase, settings: &MiningSettings) -> Result<MiningOutcome> {
    let context = MiningContext::new(Algorithm::Spam, settings)?;
    let (items, bitmaps) = dense_items(vertical, context.min_count);
    Ok(SpamSearch::new(&context, &items, &bitmaps, None).run())
}

/// Frequent items of `vertical` and their bitmaps, indexed by position in
/// item order.
pub(crate) fn dense_items(vertical: &VerticalDatabase, min_count: Support) -> (Vec<Item>, Vec<&SeqBitmap>) {
    vertical
        .iter()
        .filter(|(_, bitmap)| bitmap.support() >= min_count)
        .map(|(&item, bitmap)| (item, bitmap))
        .unzip()
}

/// Depth-first bitmap search. Candidates are dense indices into `items`, so
/// every candidate list handed down stays sorted by item.
pub(crate) struct SpamSearch<'r> {
    context: &'r MiningContext<'r>,
    items: &'r [Item],
    bitmaps: &'r [&'r SeqBitmap],
    existence: Option<&'r ItemIsExistTable>,
}

impl<'r> SpamSearch<'r> {
    pub(crate) fn new(
        context: &'r MiningContext<'r>,
        items: &'r [Item],
        bitmaps: &'r [&'r SeqBitmap],
        existence: Option<&'r ItemIsExistTable>,
    ) -> Self {
        Self {
            context,
            items,
            bitmaps,
            existence,
        }
    }

    /// One branch per item. Seed `i` may grow its itemset with items after it
    /// and its sequence with any item.
    pub(crate) fn run(&self) -> MiningOutcome {
        let order: Vec<usize> = (0..self.items.len()).collect();
        self.context.run(&order, |&seed, branch| {
            let bitmap = self.bitmaps[seed];
            let pattern = Sequence::from_item(self.items[seed], bitmap.support());
            self.extend(&pattern, bitmap, &order, &order[seed + 1..], branch);
        })
    }

    /// Reports `prefix` and explores its children.
    ///
    /// `s_candidates` may follow the prefix in a later itemset, `i_candidates`
    /// may join its last itemset.
    fn extend(
        &self,
        prefix: &Sequence,
        bitmap: &SeqBitmap,
        s_candidates: &[usize],
        i_candidates: &[usize],
        branch: &mut Branch,
    ) {
        if self.context.halted(branch) {
            return;
        }
        self.context.emit(prefix, branch);

        let (s_survivors, s_bitmaps) = match self.existence {
            Some(table) if !s_candidates.is_empty() => {
                let admitted = table.frequent_items(bitmap, s_candidates, self.context.min_count);
                self.frequent_steps(bitmap, &admitted, SeqBitmap::intersect_sequence_step)
            }
            _ => self.frequent_steps(bitmap, s_candidates, SeqBitmap::intersect_sequence_step),
        };
        self.descend(prefix, &s_survivors, &s_bitmaps, Sequence::s_step, &s_survivors, branch);

        let (i_survivors, i_bitmaps) = self.frequent_steps(bitmap, i_candidates, SeqBitmap::intersect_itemset_step);
        self.descend(prefix, &i_survivors, &i_bitmaps, Sequence::i_step, &s_survivors, branch);
    }

    /// Applies `step` to every candidate and keeps those reaching the minimum support.
    fn frequent_steps(
        &self,
        bitmap: &SeqBitmap,
        candidates: &[usize],
        step: fn(&SeqBitmap, &SeqBitmap) -> SeqBitmap,
    ) -> (Vec<usize>, Vec<SeqBitmap>) {
        let mut survivors = Vec::with_capacity(candidates.len());
        let mut bitmaps = Vec::with_capacity(candidates.len());
        for &candidate in candidates {
            let next = step(bitmap, self.bitmaps[candidate]);
            if next.support() >= self.context.min_count {
                survivors.push(candidate);
                bitmaps.push(next);
            }
        }
        (survivors, bitmaps)
    }

    // A child may add a later sibling to its last itemset and may be followed
    // by any item that survived the S-step here.
    fn descend(
        &self,
        prefix: &Sequence,
        survivors: &[usize],
        bitmaps: &[SeqBitmap],
        grow: fn(&Sequence, Item, Support) -> Sequence,
        s_candidates: &[usize],
        branch: &mut Branch,
    ) {
        for (k, (&candidate, bitmap)) in survivors.iter().zip(bitmaps).enumerate() {
            let child = grow(prefix, self.items[candidate], bitmap.support());
            self.extend(&child, bitmap, s_candidates, &survivors[k + 1..], branch);
        }
    }
}
