use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::{MiningError, Result};
use super::itemset::{is_strictly_ascending, is_subset};
use super::settings::ItemLabels;

/// Item identifier. Items are totally ordered by value.
pub type Item = u32;

/// Number of database sequences containing a pattern.
pub type Support = u32;

/// An ordered list of itemsets, used both for database rows and for patterns.
///
/// Itemsets are reference counted so that extending a pattern shares every
/// untouched itemset with its parent. Equality and hashing only look at the
/// itemsets, never at the support or the extension flag.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    itemsets: Vec<Arc<[Item]>>,
    length: usize,
    support: Support,
    last_i_extension: bool,
}

impl Sequence {
    /// Builds a sequence from owned itemsets.
    ///
    /// Every itemset must be non-empty and strictly ascending, and there must be
    /// at least one itemset. Errors report the sequence as index 0.
    pub fn new(itemsets: Vec<Vec<Item>>) -> Result<Self> {
        validate_itemsets(0, &itemsets)?;
        Ok(Self::from_validated(itemsets))
    }

    pub(crate) fn from_validated(itemsets: Vec<Vec<Item>>) -> Self {
        let length = itemsets.iter().map(Vec::len).sum();
        Self {
            itemsets: itemsets.into_iter().map(Arc::from).collect(),
            length,
            support: 0,
            last_i_extension: false,
        }
    }

    /// The root prefix: no itemsets, no support.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A 1-length pattern `<item>`.
    pub fn from_item(item: Item, support: Support) -> Self {
        Self {
            itemsets: vec![Arc::from([item])],
            length: 1,
            support,
            last_i_extension: false,
        }
    }

    pub fn with_support(mut self, support: Support) -> Self {
        self.support = support;
        self
    }

    pub fn support(&self) -> Support {
        self.support
    }

    /// Total number of items over all itemsets.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of itemsets.
    pub fn size(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Whether this pattern was produced by an I-step (item appended to the
    /// last itemset) rather than an S-step.
    pub fn is_last_i_extension(&self) -> bool {
        self.last_i_extension
    }

    #[inline]
    pub fn itemset(&self, index: usize) -> &[Item] {
        &self.itemsets[index]
    }

    pub fn itemsets(&self) -> impl ExactSizeIterator<Item = &[Item]> + '_ {
        self.itemsets.iter().map(|itemset| &**itemset)
    }

    #[inline]
    pub fn last_itemset(&self) -> Option<&[Item]> {
        self.itemsets.last().map(|itemset| &**itemset)
    }

    #[inline]
    pub fn last_item(&self) -> Option<Item> {
        self.last_itemset().and_then(|itemset| itemset.last().copied())
    }

    /// S-step: appends `<item>` as a new trailing itemset.
    pub fn s_step(&self, item: Item, support: Support) -> Sequence {
        let mut itemsets: Vec<Arc<[Item]>> = Vec::with_capacity(self.itemsets.len() + 1);
        itemsets.extend(self.itemsets.iter().cloned());
        itemsets.push(Arc::from([item]));
        Sequence {
            itemsets,
            length: self.length + 1,
            support,
            last_i_extension: false,
        }
    }

    /// I-step: inserts `item` into the last itemset, keeping it ascending.
    ///
    /// On the empty sequence this degenerates to an S-step.
    pub fn i_step(&self, item: Item, support: Support) -> Sequence {
        let Some((last, head)) = self.itemsets.split_last() else {
            return self.s_step(item, support);
        };

        let at = last.partition_point(|&existing| existing < item);
        let mut extended = Vec::with_capacity(last.len() + 1);
        extended.extend_from_slice(&last[..at]);
        extended.push(item);
        extended.extend_from_slice(&last[at..]);

        let mut itemsets: Vec<Arc<[Item]>> = Vec::with_capacity(self.itemsets.len());
        itemsets.extend(head.iter().cloned());
        itemsets.push(Arc::from(extended));
        Sequence {
            itemsets,
            length: self.length + 1,
            support,
            last_i_extension: true,
        }
    }

    /// The first `count` itemsets, without support.
    pub fn prefix(&self, count: usize) -> Sequence {
        let itemsets: Vec<Arc<[Item]>> = self.itemsets.iter().take(count).cloned().collect();
        let length = itemsets.iter().map(|itemset| itemset.len()).sum();
        Sequence {
            itemsets,
            length,
            support: 0,
            last_i_extension: false,
        }
    }

    /// The itemsets after the first `count`, without support.
    pub fn suffix(&self, count: usize) -> Sequence {
        let itemsets: Vec<Arc<[Item]>> = self.itemsets.iter().skip(count).cloned().collect();
        let length = itemsets.iter().map(|itemset| itemset.len()).sum();
        Sequence {
            itemsets,
            length,
            support: 0,
            last_i_extension: false,
        }
    }

    /// Whether `self` is a sub-sequence of `other`: its itemsets embed, in
    /// order, into distinct itemsets of `other`, each as a subset.
    pub fn is_subsequence_of(&self, other: &Sequence) -> bool {
        let mut matched = 0;
        for candidate in &other.itemsets {
            if matched == self.itemsets.len() {
                break;
            }
            if is_subset(&self.itemsets[matched], candidate) {
                matched += 1;
            }
        }
        matched == self.itemsets.len()
    }

    pub fn to_vecs(&self) -> Vec<Vec<Item>> {
        self.itemsets.iter().map(|itemset| itemset.to_vec()).collect()
    }

    /// Renders `00042 - <(1 2) 3>`, quoting item labels when a lookup is given.
    pub fn render(&self, labels: Option<&dyn ItemLabels>) -> String {
        let mut out = format!("{:05} - ", self.support);
        self.write_items(&mut out, labels);
        out
    }

    fn write_items(&self, out: &mut String, labels: Option<&dyn ItemLabels>) {
        out.push('<');
        for (position, itemset) in self.itemsets.iter().enumerate() {
            if position > 0 {
                out.push(' ');
            }
            let grouped = itemset.len() > 1;
            if grouped {
                out.push('(');
            }
            for (index, &item) in itemset.iter().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                match labels {
                    Some(labels) => {
                        out.push('\'');
                        out.push_str(&labels.label(item));
                        out.push('\'');
                    }
                    None => out.push_str(&item.to_string()),
                }
            }
            if grouped {
                out.push(')');
            }
        }
        out.push('>');
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.itemsets == other.itemsets
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.itemsets.len().hash(state);
        for itemset in &self.itemsets {
            itemset[..].hash(state);
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

pub(crate) fn validate_itemsets(sequence: usize, itemsets: &[Vec<Item>]) -> Result<()> {
    if itemsets.is_empty() {
        return Err(MiningError::EmptySequence { sequence });
    }
    for (itemset, items) in itemsets.iter().enumerate() {
        if items.is_empty() {
            return Err(MiningError::EmptyItemset { sequence, itemset });
        }
        if !is_strictly_ascending(items) {
            return Err(MiningError::UnsortedItemset { sequence, itemset });
        }
    }
    Ok(())
}
