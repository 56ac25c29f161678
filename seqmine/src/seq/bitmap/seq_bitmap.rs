use super::tier::Tier;
use super::word::BitWord;
use crate::seq::sequence::Support;

/// Longest sequence, in itemsets, a bitmap row can hold.
pub const MAX_SEQUENCE_SIZE: usize = 128;

/// Row width a sequence is routed to, by its number of itemsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierWidth {
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl TierWidth {
    pub const ALL: [TierWidth; 5] = [
        TierWidth::W8,
        TierWidth::W16,
        TierWidth::W32,
        TierWidth::W64,
        TierWidth::W128,
    ];

    /// Narrowest width holding `size` itemsets, `None` beyond 128.
    pub fn for_size(size: usize) -> Option<Self> {
        match size {
            0..=8 => Some(TierWidth::W8),
            9..=16 => Some(TierWidth::W16),
            17..=32 => Some(TierWidth::W32),
            33..=64 => Some(TierWidth::W64),
            65..=MAX_SEQUENCE_SIZE => Some(TierWidth::W128),
            _ => None,
        }
    }

    pub fn bits(self) -> usize {
        match self {
            TierWidth::W8 => 8,
            TierWidth::W16 => 16,
            TierWidth::W32 => 32,
            TierWidth::W64 => 64,
            TierWidth::W128 => 128,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Occurrence bitmap of one pattern over the whole database.
///
/// Sequences are split across five tiers by length, so short sequences do not
/// pay for 128-bit rows. A derived bitmap drops the tiers in which no row
/// survived.
#[derive(Debug, Clone, Default)]
pub struct SeqBitmap {
    t8: Option<Tier<u8>>,
    t16: Option<Tier<u16>>,
    t32: Option<Tier<u32>>,
    t64: Option<Tier<u64>>,
    t128: Option<Tier<u128>>,
    current: Option<TierWidth>,
    support: Option<Support>,
}

/// A non-empty row seen through [`SeqBitmap::for_each_occupied_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedRow {
    pub width: TierWidth,
    /// Row index within its tier
    pub row: usize,
    pub first: usize,
    pub last: usize,
}

impl SeqBitmap {
    /// An empty bitmap ready to receive rows.
    pub fn new() -> Self {
        Self {
            t8: Some(Tier::new()),
            t16: Some(Tier::new()),
            t32: Some(Tier::new()),
            t64: Some(Tier::new()),
            t128: Some(Tier::new()),
            current: None,
            support: None,
        }
    }

    /// Appends a row for the next sequence in the tier of `width`.
    pub fn add_sequence(&mut self, width: TierWidth) {
        self.current = Some(width);
        self.support = None;
        match width {
            TierWidth::W8 => self.t8.get_or_insert_with(Tier::new).add_sequence(),
            TierWidth::W16 => self.t16.get_or_insert_with(Tier::new).add_sequence(),
            TierWidth::W32 => self.t32.get_or_insert_with(Tier::new).add_sequence(),
            TierWidth::W64 => self.t64.get_or_insert_with(Tier::new).add_sequence(),
            TierWidth::W128 => self.t128.get_or_insert_with(Tier::new).add_sequence(),
        }
    }

    /// Marks itemset `position` in the row added last.
    pub fn set_bit(&mut self, position: usize) {
        self.support = None;
        match self.current {
            Some(TierWidth::W8) => set_tier_bit(&mut self.t8, position),
            Some(TierWidth::W16) => set_tier_bit(&mut self.t16, position),
            Some(TierWidth::W32) => set_tier_bit(&mut self.t32, position),
            Some(TierWidth::W64) => set_tier_bit(&mut self.t64, position),
            Some(TierWidth::W128) => set_tier_bit(&mut self.t128, position),
            None => {}
        }
    }

    /// Freezes the support of a built bitmap.
    pub fn seal(&mut self) {
        seal_tier(&mut self.t8);
        seal_tier(&mut self.t16);
        seal_tier(&mut self.t32);
        seal_tier(&mut self.t64);
        seal_tier(&mut self.t128);
        self.current = None;
        self.support = Some(self.count_support());
    }

    /// Number of sequences with at least one occurrence.
    pub fn support(&self) -> Support {
        self.support.unwrap_or_else(|| self.count_support())
    }

    fn count_support(&self) -> Support {
        tier_support(&self.t8)
            + tier_support(&self.t16)
            + tier_support(&self.t32)
            + tier_support(&self.t64)
            + tier_support(&self.t128)
    }

    /// Rows held by the tier of `width`.
    pub fn tier_len(&self, width: TierWidth) -> usize {
        match width {
            TierWidth::W8 => self.t8.as_ref().map_or(0, Tier::len),
            TierWidth::W16 => self.t16.as_ref().map_or(0, Tier::len),
            TierWidth::W32 => self.t32.as_ref().map_or(0, Tier::len),
            TierWidth::W64 => self.t64.as_ref().map_or(0, Tier::len),
            TierWidth::W128 => self.t128.as_ref().map_or(0, Tier::len),
        }
    }

    /// Pattern extended by an item in the same itemset.
    pub fn intersect_itemset_step(&self, item: &SeqBitmap) -> SeqBitmap {
        self.derive(item, Step::Itemset)
    }

    /// Pattern extended by an item in a later itemset.
    pub fn intersect_sequence_step(&self, item: &SeqBitmap) -> SeqBitmap {
        self.derive(item, Step::Sequence)
    }

    fn derive(&self, item: &SeqBitmap, step: Step) -> SeqBitmap {
        let mut derived = SeqBitmap {
            t8: step.combine(&self.t8, &item.t8),
            t16: step.combine(&self.t16, &item.t16),
            t32: step.combine(&self.t32, &item.t32),
            t64: step.combine(&self.t64, &item.t64),
            t128: step.combine(&self.t128, &item.t128),
            current: None,
            support: None,
        };
        derived.support = Some(derived.count_support());
        derived
    }

    /// Visits every non-zero row with its first and last set positions.
    pub fn for_each_occupied_row(&self, mut visit: impl FnMut(OccupiedRow)) {
        visit_tier(TierWidth::W8, &self.t8, &mut visit);
        visit_tier(TierWidth::W16, &self.t16, &mut visit);
        visit_tier(TierWidth::W32, &self.t32, &mut visit);
        visit_tier(TierWidth::W64, &self.t64, &mut visit);
        visit_tier(TierWidth::W128, &self.t128, &mut visit);
    }
}

fn set_tier_bit<W: BitWord>(tier: &mut Option<Tier<W>>, position: usize) {
    if let Some(tier) = tier {
        tier.set_bit(position);
    }
}

fn seal_tier<W: BitWord>(tier: &mut Option<Tier<W>>) {
    if let Some(tier) = tier {
        tier.seal();
    }
}

fn tier_support<W: BitWord>(tier: &Option<Tier<W>>) -> Support {
    tier.as_ref().map_or(0, Tier::support)
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Itemset,
    Sequence,
}

impl Step {
    fn combine<W: BitWord>(self, prefix: &Option<Tier<W>>, item: &Option<Tier<W>>) -> Option<Tier<W>> {
        let (Some(prefix), Some(item)) = (prefix, item) else {
            return None;
        };
        match self {
            Step::Itemset => prefix.intersect_itemset_step(item),
            Step::Sequence => prefix.intersect_sequence_step(item),
        }
    }
}

fn visit_tier<W: BitWord>(width: TierWidth, tier: &Option<Tier<W>>, visit: &mut impl FnMut(OccupiedRow)) {
    let Some(tier) = tier else {
        return;
    };
    for (row, &word) in tier.rows().iter().enumerate() {
        if word.is_zero() {
            continue;
        }
        visit(OccupiedRow {
            width,
            row,
            first: word.first_set_bit(),
            last: word.last_set_bit(),
        });
    }
}
