use std::collections::HashMap;

use super::bitmap::VerticalDatabase;
use super::error::{MiningError, Result};
use super::sequence::{validate_itemsets, Item, Sequence, Support};
use super::statistics::DatabaseStatistics;

/// Horizontal sequence database. It is validated once at construction and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SequenceDatabase {
    sequences: Vec<Sequence>,
}

impl SequenceDatabase {
    /// Builds a database from nested item lists, one entry per sequence.
    ///
    /// Itemsets must already be strictly ascending. See [`Self::from_unsorted`]
    /// for raw input.
    pub fn new(sequences: Vec<Vec<Vec<Item>>>) -> Result<Self> {
        check_sequence_count(sequences.len())?;
        for (index, itemsets) in sequences.iter().enumerate() {
            validate_itemsets(index, itemsets)?;
        }
        Ok(Self {
            sequences: sequences.into_iter().map(Sequence::from_validated).collect(),
        })
    }

    /// Like [`Self::new`], but sorts and deduplicates every itemset first.
    pub fn from_unsorted(mut sequences: Vec<Vec<Vec<Item>>>) -> Result<Self> {
        for itemset in sequences.iter_mut().flatten() {
            itemset.sort_unstable();
            itemset.dedup();
        }
        Self::new(sequences)
    }

    /// Wraps sequences that were validated on construction.
    pub fn from_sequences(sequences: Vec<Sequence>) -> Result<Self> {
        check_sequence_count(sequences.len())?;
        if let Some(index) = sequences.iter().position(Sequence::is_empty) {
            return Err(MiningError::EmptySequence { sequence: index });
        }
        Ok(Self { sequences })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// One pass over the database counting, per item, the sequences that
    /// contain it. Returns the items reaching `min_count` as 1-length
    /// patterns sorted by item.
    pub fn find_one_length_patterns(&self, min_count: Support) -> Vec<Sequence> {
        // item -> (support, 1 + index of the last sequence that counted it)
        let mut counts: HashMap<Item, (Support, usize)> = HashMap::new();
        for (index, sequence) in self.sequences.iter().enumerate() {
            let stamp = index + 1;
            for &item in sequence.itemsets().flatten() {
                let entry = counts.entry(item).or_insert((0, 0));
                if entry.1 != stamp {
                    entry.0 += 1;
                    entry.1 = stamp;
                }
            }
        }

        let mut frequent: Vec<(Item, Support)> = counts
            .into_iter()
            .filter(|&(_, (support, _))| support >= min_count)
            .map(|(item, (support, _))| (item, support))
            .collect();
        frequent.sort_unstable_by_key(|&(item, _)| item);

        frequent
            .into_iter()
            .map(|(item, support)| Sequence::from_item(item, support))
            .collect()
    }

    /// Vertical bitmap view restricted to `frequent_items`.
    pub fn to_vertical(&self, frequent_items: &[Item]) -> Result<VerticalDatabase> {
        VerticalDatabase::from_database(self, frequent_items)
    }

    pub fn statistics(&self) -> DatabaseStatistics {
        DatabaseStatistics::from_sequences(&self.sequences)
    }
}

impl<'a> IntoIterator for &'a SequenceDatabase {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

fn check_sequence_count(count: usize) -> Result<()> {
    if count > Support::MAX as usize {
        return Err(MiningError::TooManySequences(count));
    }
    Ok(())
}
