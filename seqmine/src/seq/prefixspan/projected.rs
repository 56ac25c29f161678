use std::collections::HashMap;

use log::trace;

use super::pseudo::PseudoSequence;
use crate::seq::database::SequenceDatabase;
use crate::seq::itemset::is_subset_upto;
use crate::seq::sequence::{Item, Sequence, Support};

/// How projections treat sequences with nothing left after the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Drop empty projections. Frequent-pattern mining can never extend them.
    Frequent,
    /// Keep empty projections and track first instances; the closure checks
    /// look backwards into every supporting sequence.
    Closed,
}

impl ProjectionMode {
    fn keeps_empty(self) -> bool {
        matches!(self, ProjectionMode::Closed)
    }
}

/// A prefix together with the postfixes of every sequence that contains it.
#[derive(Debug, Clone)]
pub struct ProjectedDatabase<'a> {
    prefix: Sequence,
    sequences: Vec<PseudoSequence<'a>>,
}

impl<'a> ProjectedDatabase<'a> {
    /// The unprojected database under the empty prefix.
    pub fn from_database(database: &'a SequenceDatabase) -> Self {
        Self {
            prefix: Sequence::empty(),
            sequences: database.iter().map(PseudoSequence::new).collect(),
        }
    }

    pub fn prefix(&self) -> &Sequence {
        &self.prefix
    }

    pub fn sequences(&self) -> &[PseudoSequence<'a>] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Projects every member on `prefix`, a one-item extension of this
    /// database's prefix.
    ///
    /// Returns `None` as soon as more than `len - min_count` members fail to
    /// project, since the extension can no longer be frequent.
    pub fn project(&self, prefix: Sequence, min_count: Support, mode: ProjectionMode) -> Option<ProjectedDatabase<'a>> {
        let target = prefix.last_item()?;
        let keep_empty = mode.keeps_empty();
        let mut slack = self.sequences.len() as i64 - i64::from(min_count);
        let mut sequences = Vec::with_capacity(self.sequences.len());

        for pseudo in &self.sequences {
            let projected = pseudo
                .position_of(target)
                .and_then(|tid| pseudo.project(&prefix, tid, !keep_empty, keep_empty))
                .filter(|projected| keep_empty || !projected.is_empty());
            match projected {
                Some(projected) => sequences.push(projected),
                None => {
                    slack -= 1;
                    if slack < 0 {
                        trace!("projection on {} cut: too few supporting sequences", prefix);
                        return None;
                    }
                }
            }
        }

        Some(ProjectedDatabase { prefix, sequences })
    }

    /// One pass collecting the items that extend the prefix.
    ///
    /// Items of a continuation itemset are I-step candidates. Items of a full
    /// itemset are S-step candidates, and also I-step candidates once the whole
    /// last prefix itemset has appeared earlier in that itemset. Each item
    /// counts at most once per member.
    pub fn find_local_frequent_items(&self, min_count: Support) -> LocalItems {
        let prefix_last = self.prefix.last_itemset().unwrap_or(&[]);
        // item -> (support, 1 + index of the last member that counted it)
        let mut s_counts: HashMap<Item, (Support, usize)> = HashMap::new();
        let mut i_counts: HashMap<Item, (Support, usize)> = HashMap::new();

        for (index, pseudo) in self.sequences.iter().enumerate() {
            let stamp = index + 1;
            for tid in 0..pseudo.size() {
                let itemset = pseudo.itemset(tid);
                if tid == 0 && pseudo.is_continuation() {
                    for &item in itemset {
                        count_once(&mut i_counts, item, stamp);
                    }
                    continue;
                }

                let mut holds_prefix = false;
                for (position, &item) in itemset.iter().enumerate() {
                    count_once(&mut s_counts, item, stamp);
                    if !holds_prefix && position > 0 {
                        holds_prefix = is_subset_upto(prefix_last, itemset, position - 1);
                    }
                    if holds_prefix {
                        count_once(&mut i_counts, item, stamp);
                    }
                }
            }
        }

        LocalItems {
            sequence_extensions: frequent_sorted(s_counts, min_count),
            itemset_extensions: frequent_sorted(i_counts, min_count),
        }
    }
}

#[inline]
fn count_once(counts: &mut HashMap<Item, (Support, usize)>, item: Item, stamp: usize) {
    let entry = counts.entry(item).or_insert((0, 0));
    if entry.1 != stamp {
        entry.0 += 1;
        entry.1 = stamp;
    }
}

fn frequent_sorted(counts: HashMap<Item, (Support, usize)>, min_count: Support) -> Vec<(Item, Support)> {
    let mut frequent: Vec<(Item, Support)> = counts
        .into_iter()
        .filter(|&(_, (support, _))| support >= min_count)
        .map(|(item, (support, _))| (item, support))
        .collect();
    frequent.sort_unstable_by_key(|&(item, _)| item);
    frequent
}

/// Frequent extensions of a prefix, each list sorted by item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalItems {
    pub sequence_extensions: Vec<(Item, Support)>,
    pub itemset_extensions: Vec<(Item, Support)>,
}

impl LocalItems {
    pub fn is_empty(&self) -> bool {
        self.sequence_extensions.is_empty() && self.itemset_extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sequence_extensions.len() + self.itemset_extensions.len()
    }

    /// Child patterns of `prefix`: every S-step, then every I-step.
    pub fn extend(&self, prefix: &Sequence) -> Vec<Sequence> {
        let s_steps = self
            .sequence_extensions
            .iter()
            .map(|&(item, support)| prefix.s_step(item, support));
        let i_steps = self
            .itemset_extensions
            .iter()
            .map(|&(item, support)| prefix.i_step(item, support));
        s_steps.chain(i_steps).collect()
    }
}
