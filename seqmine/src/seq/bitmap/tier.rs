use super::word::BitWord;
use crate::seq::sequence::Support;

/// Bitmap rows for every sequence that fits in one `W`.
///
/// Row `r` belongs to the `r`-th sequence routed to this tier. Bit `p` is set
/// when the pattern ends at itemset `p` of that sequence.
#[derive(Debug, Clone, Default)]
pub struct Tier<W> {
    rows: Vec<W>,
    support: Option<Support>,
}

impl<W: BitWord> Tier<W> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            support: None,
        }
    }

    /// Appends an all-zero row for the next sequence.
    pub fn add_sequence(&mut self) {
        self.rows.push(W::ZERO);
        self.support = None;
    }

    /// Marks `position` in the row added last.
    pub fn set_bit(&mut self, position: usize) {
        debug_assert!(position < W::BITS);
        if let Some(row) = self.rows.last_mut() {
            *row = *row | W::bit(position);
            self.support = None;
        }
    }

    pub fn rows(&self) -> &[W] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of non-zero rows.
    pub fn support(&self) -> Support {
        self.support.unwrap_or_else(|| self.count_support())
    }

    /// Caches the support once building is done.
    pub fn seal(&mut self) {
        self.support = Some(self.count_support());
    }

    fn count_support(&self) -> Support {
        self.rows.iter().filter(|row| !row.is_zero()).count() as Support
    }

    /// Row-wise AND: both patterns end at the same itemset.
    ///
    /// `None` when no row survives.
    pub fn intersect_itemset_step(&self, other: &Tier<W>) -> Option<Tier<W>> {
        self.combine(other, |prefix, item| prefix & item)
    }

    /// The item occurs strictly after the first position of the prefix.
    ///
    /// `None` when no row survives.
    pub fn intersect_sequence_step(&self, other: &Tier<W>) -> Option<Tier<W>> {
        self.combine(other, |prefix, item| {
            if prefix.is_zero() {
                W::ZERO
            } else {
                W::after(prefix.first_set_bit()) & item
            }
        })
    }

    #[inline]
    fn combine(&self, other: &Tier<W>, step: impl Fn(W, W) -> W) -> Option<Tier<W>> {
        let mut support: Support = 0;
        let rows: Vec<W> = self
            .rows
            .iter()
            .zip(&other.rows)
            .map(|(&prefix, &item)| {
                let row = step(prefix, item);
                if !row.is_zero() {
                    support += 1;
                }
                row
            })
            .collect();
        if support == 0 {
            return None;
        }
        Some(Tier {
            rows,
            support: Some(support),
        })
    }
}
