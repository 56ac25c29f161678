pub mod seq;

#[cfg(feature = "python")]
mod python;

pub use seq::{
    bide_algorithm, lapin_spam_algorithm, prefixspan_algorithm, spam_algorithm, Algorithm, Item,
    MiningError, MiningOutcome, MiningSettings, MiningStats, RuleGenerator, Sequence,
    SequenceDatabase, SequentialRule, Support,
};
