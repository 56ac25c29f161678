//! Bi-directional closure checks over a projected database.
//!
//! Both checks look for an item that can be inserted somewhere before the end
//! of the prefix in every supporting sequence. Such an item proves that a
//! super-sequence with the same support exists. The search walks the prefix
//! elements `e_n .. e_1` from the right and keeps, per sequence, a pointer to
//! the occurrence of the current element. For each element it intersects the
//! "period" of candidate items across all sequences.

use std::collections::HashSet;

use crate::seq::itemset::is_subset;
use crate::seq::prefixspan::{ProjectedDatabase, PseudoSequence};
use crate::seq::sequence::Item;

/// Which occurrence of each prefix element bounds its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Appearance {
    /// Last occurrence of `e_i` that still precedes the one picked for `e_{i+1}`,
    /// starting from the end of the sequence.
    LastInLast,
    /// Same walk, but starting from the end of the first instance of the
    /// whole prefix.
    LastInFirst,
}

/// Which items of the scanned span count as extension candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    /// Every item strictly before the appearance: a new element.
    Sequence,
    /// Items sharing an itemset with `e_i`, up to and including the
    /// appearance: an item joining `e_i`.
    Itemset { skip_top: bool },
}

/// True when the prefix has a backward extension, so it is not closed.
pub fn backward_extension_check(projected: &ProjectedDatabase<'_>) -> bool {
    has_witness(projected, Appearance::LastInLast, Period::Sequence)
        || has_witness(projected, Appearance::LastInLast, Period::Itemset { skip_top: false })
}

/// True when every extension of the prefix has a backward extension in its
/// first instance, so the whole branch can be pruned.
///
/// The I-type scan leaves out the last prefix element. Items joining it are
/// forward I-extensions, and counting them here would prune closed patterns.
pub fn back_scan(projected: &ProjectedDatabase<'_>) -> bool {
    has_witness(projected, Appearance::LastInFirst, Period::Sequence)
        || has_witness(projected, Appearance::LastInFirst, Period::Itemset { skip_top: true })
}

fn has_witness(projected: &ProjectedDatabase<'_>, appearance: Appearance, period: Period) -> bool {
    let prefix = projected.prefix();
    let members = projected.sequences();
    if prefix.is_empty() || members.is_empty() {
        return false;
    }

    let top = prefix.size() - 1;
    let mut pointers: Vec<Option<usize>> = vec![None; members.len()];
    let mut scratch: HashSet<Item> = HashSet::new();

    for i in (0..=top).rev() {
        let element = prefix.itemset(i);
        let mut shared: Option<HashSet<Item>> = None;
        // once the intersection is known to be empty, members only advance
        let mut exhausted = matches!(period, Period::Itemset { skip_top: true }) && i == top;

        for (member, pseudo) in members.iter().enumerate() {
            let at = appearance.locate(pseudo, element, pointers[member]);
            pointers[member] = Some(at);
            if exhausted {
                continue;
            }

            let start = match i {
                0 => 0,
                _ => pseudo.first_instances().get(i - 1).map_or(0, |&previous| previous + 1),
            };
            scratch.clear();
            period.collect(pseudo, element, start, at, &mut scratch);

            match shared.as_mut() {
                None => shared = Some(scratch.clone()),
                Some(items) => items.retain(|item| scratch.contains(item)),
            }
            if shared.as_ref().is_some_and(|items| !items.is_empty()) {
                continue;
            }
            if i == 0 {
                return false;
            }
            exhausted = true;
        }

        if shared.is_some_and(|items| !items.is_empty()) {
            return true;
        }
    }
    false
}

impl Appearance {
    fn locate(self, pseudo: &PseudoSequence<'_>, element: &[Item], previous: Option<usize>) -> usize {
        let end = match (self, previous) {
            (_, Some(previous)) => previous,
            (Appearance::LastInLast, None) => pseudo.raw_size(),
            (Appearance::LastInFirst, None) => {
                return pseudo.first_instances().last().copied().unwrap_or(0);
            }
        };
        (0..end)
            .rev()
            .find(|&position| is_subset(element, pseudo.raw_itemset(position)))
            .unwrap_or(0)
    }
}

impl Period {
    fn collect(self, pseudo: &PseudoSequence<'_>, element: &[Item], start: usize, at: usize, out: &mut HashSet<Item>) {
        match self {
            Period::Sequence => {
                for position in start..at {
                    out.extend(pseudo.raw_itemset(position).iter().copied());
                }
            }
            Period::Itemset { .. } => {
                for position in start..=at {
                    let itemset = pseudo.raw_itemset(position);
                    if is_subset(element, itemset) {
                        out.extend(itemset.iter().copied());
                    }
                }
                out.retain(|item| element.binary_search(item).is_err());
            }
        }
    }
}
