//! Tiered vertical bitmaps for SPAM-style mining.

pub mod seq_bitmap;
pub mod tier;
pub mod vertical;
pub mod word;


pub use seq_bitmap::{OccupiedRow, SeqBitmap, TierWidth, MAX_SEQUENCE_SIZE};
pub use tier::Tier;
pub use vertical::VerticalDatabase;
pub use word::{debruijn, BitWord};
