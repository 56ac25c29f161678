use log::debug;

use super::exist_table::ItemIsExistTable;
use crate::seq::bitmap::VerticalDatabase;
use crate::seq::error::Result;
use crate::seq::miner::{Algorithm, MiningContext, MiningOutcome};
use crate::seq::settings::MiningSettings;
use crate::seq::spam::mining::{dense_items, SpamSearch};

/// SPAM with S-step candidates screened through an [`ItemIsExistTable`], so
/// bitmaps are only intersected for candidates known to be frequent.
pub fn lapin_spam_algorithm(vertical: &VerticalDatabase, settings: &MiningSettings) -> Result<MiningOutcome> {
    let context = MiningContext::new(Algorithm::LapinSpam, settings)?;
    let (items, bitmaps) = dense_items(vertical, context.min_count);
    let table = ItemIsExistTable::fill(&bitmaps);
    debug!(
        "existence table: {} items over {} sequences",
        items.len(),
        vertical.sequence_count()
    );
    Ok(SpamSearch::new(&context, &items, &bitmaps, Some(&table)).run())
}
