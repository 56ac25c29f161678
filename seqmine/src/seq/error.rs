use thiserror::Error;

/// Everything that can go wrong before a mining run starts.
///
/// Search itself never fails: a branch that cannot reach the minimum support
/// is simply not explored, and a stop request ends the run with the patterns
/// found so far.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    #[error("sequence {sequence} has no itemsets")]
    EmptySequence { sequence: usize },

    #[error("itemset {itemset} of sequence {sequence} is empty")]
    EmptyItemset { sequence: usize, itemset: usize },

    #[error("itemset {itemset} of sequence {sequence} is not strictly ascending")]
    UnsortedItemset { sequence: usize, itemset: usize },

    #[error("minimum support must be a finite non-negative count, got {0}")]
    InvalidMinSupport(f64),

    #[error("database holds {0} sequences, more than a support counter can represent")]
    TooManySequences(usize),

    #[error("sequence {sequence} has {itemsets} itemsets, bitmap mining supports at most {max}")]
    SequenceTooLong {
        sequence: usize,
        itemsets: usize,
        max: usize,
    },

    #[error("seed {index} has {length} items, seeds must be 1-length patterns")]
    InvalidSeed { index: usize, length: usize },

    #[error("minimum confidence must lie within [0, 1], got {0}")]
    InvalidConfidence(f64),

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, MiningError>;
