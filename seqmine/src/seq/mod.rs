pub mod bide;
pub mod bitmap;
pub mod database;
pub mod error;
pub mod itemset;
pub mod lapin;
pub mod miner;
pub mod prefixspan;
pub mod rules;
pub mod sequence;
pub mod settings;
pub mod spam;
pub mod statistics;

#[cfg(test)]
mod tests;

pub use bide::bide_algorithm;
pub use bitmap::{SeqBitmap, VerticalDatabase};
pub use database::SequenceDatabase;
pub use error::{MiningError, Result};
pub use lapin::lapin_spam_algorithm;
pub use miner::{Algorithm, MiningOutcome, MiningStats};
pub use prefixspan::prefixspan_algorithm;
pub use rules::{RuleGenerator, SequentialRule};
pub use sequence::{Item, Sequence, Support};
pub use settings::{ItemLabels, MiningSettings, StopSignal};
pub use spam::spam_algorithm;
pub use statistics::DatabaseStatistics;
