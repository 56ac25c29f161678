use crate::seq::itemset::is_subset_upto;
use crate::seq::sequence::{Item, Sequence};

/// A postfix view of a database sequence.
///
/// The view starts at itemset `offset` of its source. When `continuation` is
/// set, the first visible itemset is the tail of the source itemset starting
/// at `first_start`, the part left over after a mid-itemset match. No item
/// data is copied.
///
/// `first_instances[i]` is the source position of the itemset that matched
/// prefix element `i` in the first (leftmost) embedding of the prefix. It is
/// only tracked for closed-pattern mining.
#[derive(Debug, Clone)]
pub struct PseudoSequence<'a> {
    source: &'a Sequence,
    offset: usize,
    first_start: usize,
    continuation: bool,
    first_instances: Vec<usize>,
}

impl<'a> PseudoSequence<'a> {
    /// View over the whole of `source`.
    pub fn new(source: &'a Sequence) -> Self {
        Self {
            source,
            offset: 0,
            first_start: 0,
            continuation: false,
            first_instances: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a Sequence {
        self.source
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_continuation(&self) -> bool {
        self.continuation
    }

    pub fn first_instances(&self) -> &[usize] {
        &self.first_instances
    }

    /// Number of visible itemsets.
    #[inline]
    pub fn size(&self) -> usize {
        self.source.size().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Visible itemset `tid`. `tid` must be below [`Self::size`].
    #[inline]
    pub fn itemset(&self, tid: usize) -> &'a [Item] {
        let itemset = self.source.itemset(self.offset + tid);
        if tid == 0 {
            &itemset[self.first_start..]
        } else {
            itemset
        }
    }

    /// Itemset at an absolute source position, ignoring the view.
    #[inline]
    pub fn raw_itemset(&self, position: usize) -> &'a [Item] {
        self.source.itemset(position)
    }

    pub fn raw_size(&self) -> usize {
        self.source.size()
    }

    /// First visible itemset containing `item`.
    pub fn position_of(&self, item: Item) -> Option<usize> {
        (0..self.size()).find(|&tid| self.itemset(tid).binary_search(&item).is_ok())
    }

    /// Projects this view on `prefix`, scanning from visible itemset `search_from`.
    ///
    /// The match is the last item of `prefix`. After an S-step the match may not
    /// sit in a continuation itemset. After an I-step a continuation itemset
    /// always qualifies, while a full itemset must also hold the rest of the
    /// prefix's last itemset before the match. With `remove_empty`, a match on
    /// the final item of the view yields `None` instead of an empty projection.
    pub fn project(
        &self,
        prefix: &Sequence,
        search_from: usize,
        remove_empty: bool,
        track_instances: bool,
    ) -> Option<PseudoSequence<'a>> {
        let target = prefix.last_item()?;
        let prefix_last = prefix.last_itemset()?;
        let i_extension = prefix.is_last_i_extension();
        let size = self.size();

        for tid in search_from..size {
            let postfix = tid == 0 && self.continuation;
            if postfix && !i_extension {
                continue;
            }

            let itemset = self.itemset(tid);
            let Ok(index) = itemset.binary_search(&target) else {
                continue;
            };
            let last_index = itemset.len() - 1;
            if remove_empty && tid + 1 == size && index == last_index {
                return None;
            }
            if i_extension && !postfix && !is_subset_upto(prefix_last, itemset, index) {
                continue;
            }

            let position = self.offset + tid;
            let first_instances = if track_instances {
                self.advance_instances(position, i_extension)
            } else {
                Vec::new()
            };

            return Some(if index == last_index {
                PseudoSequence {
                    source: self.source,
                    offset: position + 1,
                    first_start: 0,
                    continuation: false,
                    first_instances,
                }
            } else {
                let base = if tid == 0 { self.first_start } else { 0 };
                PseudoSequence {
                    source: self.source,
                    offset: position,
                    first_start: base + index + 1,
                    continuation: true,
                    first_instances,
                }
            });
        }
        None
    }

    // An I-step grows the last prefix element, so its instance moves instead
    // of a new one being appended.
    fn advance_instances(&self, position: usize, i_extension: bool) -> Vec<usize> {
        let mut instances = self.first_instances.clone();
        match instances.last_mut() {
            Some(last) if i_extension => *last = position,
            _ => instances.push(position),
        }
        instances
    }
}
