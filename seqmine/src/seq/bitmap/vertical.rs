use std::collections::btree_map;
use std::collections::BTreeMap;

use log::debug;

use super::seq_bitmap::{SeqBitmap, TierWidth, MAX_SEQUENCE_SIZE};
use crate::seq::database::SequenceDatabase;
use crate::seq::error::{MiningError, Result};
use crate::seq::sequence::Item;

/// One occurrence bitmap per frequent item, ordered by item.
#[derive(Debug, Clone, Default)]
pub struct VerticalDatabase {
    bitmaps: BTreeMap<Item, SeqBitmap>,
    sequences: usize,
}

impl VerticalDatabase {
    /// Marks every itemset position at which each of `frequent_items` occurs.
    ///
    /// Other items are ignored. Fails for sequences longer than
    /// [`MAX_SEQUENCE_SIZE`] itemsets.
    pub fn from_database(database: &SequenceDatabase, frequent_items: &[Item]) -> Result<Self> {
        let mut bitmaps: BTreeMap<Item, SeqBitmap> =
            frequent_items.iter().map(|&item| (item, SeqBitmap::new())).collect();

        for (index, sequence) in database.iter().enumerate() {
            let width = TierWidth::for_size(sequence.size()).ok_or(MiningError::SequenceTooLong {
                sequence: index,
                itemsets: sequence.size(),
                max: MAX_SEQUENCE_SIZE,
            })?;
            for bitmap in bitmaps.values_mut() {
                bitmap.add_sequence(width);
            }
            for (position, itemset) in sequence.itemsets().enumerate() {
                for item in itemset {
                    if let Some(bitmap) = bitmaps.get_mut(item) {
                        bitmap.set_bit(position);
                    }
                }
            }
        }

        for bitmap in bitmaps.values_mut() {
            bitmap.seal();
        }
        debug!(
            "vertical database: {} items over {} sequences",
            bitmaps.len(),
            database.len()
        );

        Ok(Self {
            bitmaps,
            sequences: database.len(),
        })
    }

    pub fn get(&self, item: Item) -> Option<&SeqBitmap> {
        self.bitmaps.get(&item)
    }

    /// Items in ascending order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.bitmaps.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Item, SeqBitmap> {
        self.bitmaps.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences
    }
}
