use super::projected::{ProjectedDatabase, ProjectionMode};
use crate::seq::database::SequenceDatabase;
use crate::seq::error::Result;
use crate::seq::miner::{Algorithm, Branch, MiningContext, MiningOutcome};
use crate::seq::settings::MiningSettings;

/// Mines every frequent sequential pattern by growing prefixes over
/// pseudo-projected databases.
///
/// Patterns come out in depth-first order: each seed, then its S-step children
/// before its I-step children, each group by ascending item.
pub fn prefixspan_algorithm(database: &SequenceDatabase, settings: &MiningSettings) -> Result<MiningOutcome> {
    let context = MiningContext::new(Algorithm::PrefixSpan, settings)?;
    let seeds = context.seeds(database)?;
    let root = ProjectedDatabase::from_database(database);

    Ok(context.run(&seeds, |seed, branch| {
        context.emit(seed, branch);
        if let Some(projected) = root.project(seed.clone(), context.min_count, ProjectionMode::Frequent) {
            if !projected.is_empty() {
                prefixspan_recursive(&context, &projected, branch);
            }
        }
    }))
}

fn prefixspan_recursive(context: &MiningContext<'_>, projected: &ProjectedDatabase<'_>, branch: &mut Branch) {
    if context.halted(branch) {
        return;
    }

    let children = projected
        .find_local_frequent_items(context.min_count)
        .extend(projected.prefix());

    for child in children {
        if context.halted(branch) {
            return;
        }
        context.emit(&child, branch);
        if let Some(next) = projected.project(child, context.min_count, ProjectionMode::Frequent) {
            if !next.is_empty() {
                prefixspan_recursive(context, &next, branch);
            }
        }
    }
}
