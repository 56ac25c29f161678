use std::collections::HashSet;
use std::fmt;

use super::sequence::Sequence;

/// Shape summary of a sequence database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseStatistics {
    pub sequences: usize,
    /// Total number of itemsets
    pub elements: usize,
    pub items: usize,
    pub distinct_items: usize,
    pub average_elements: f64,
    pub average_items: f64,
    pub average_items_per_element: f64,
    pub longest_sequence_elements: usize,
    pub longest_sequence_items: usize,
    pub longest_element: usize,
}

impl DatabaseStatistics {
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let mut stats = Self::default();
        let mut distinct = HashSet::new();

        for sequence in sequences {
            for itemset in sequence.itemsets() {
                distinct.extend(itemset.iter().copied());
                stats.longest_element = stats.longest_element.max(itemset.len());
            }
            stats.elements += sequence.size();
            stats.items += sequence.length();
            stats.longest_sequence_elements = stats.longest_sequence_elements.max(sequence.size());
            stats.longest_sequence_items = stats.longest_sequence_items.max(sequence.length());
        }

        stats.sequences = sequences.len();
        stats.distinct_items = distinct.len();
        stats.average_elements = ratio(stats.elements, stats.sequences);
        stats.average_items = ratio(stats.items, stats.sequences);
        stats.average_items_per_element = ratio(stats.items, stats.elements);
        stats
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for DatabaseStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sequence statistics:")?;
        writeln!(
            f,
            "{} sequences, containing a total of {} elements and {} items",
            self.sequences, self.elements, self.items
        )?;
        writeln!(f, "{} unique items", self.distinct_items)?;
        writeln!(
            f,
            "On average, a sequence contains {:.2} elements and a total of {:.2} items",
            self.average_elements, self.average_items
        )?;
        writeln!(
            f,
            "On average, an element contains {:.2} items",
            self.average_items_per_element
        )?;
        writeln!(
            f,
            "The longest sequence has {} elements, the most items in a sequence is {}",
            self.longest_sequence_elements, self.longest_sequence_items
        )?;
        write!(f, "The longest element contains {} items", self.longest_element)
    }
}
