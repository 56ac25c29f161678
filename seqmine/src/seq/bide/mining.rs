use log::trace;

use super::closure::{back_scan, backward_extension_check};
use crate::seq::database::SequenceDatabase;
use crate::seq::error::Result;
use crate::seq::miner::{Algorithm, Branch, MiningContext, MiningOutcome};
use crate::seq::prefixspan::{ProjectedDatabase, ProjectionMode};
use crate::seq::sequence::Sequence;
use crate::seq::settings::MiningSettings;

/// Mines closed sequential patterns: frequent patterns with no proper
/// super-sequence of equal support.
///
/// The search is PrefixSpan's, with two checks added. A prefix is reported
/// only when no forward or backward extension keeps its support. A branch is
/// skipped entirely when the back-scan check shows that no pattern below it
/// can be closed.
pub fn bide_algorithm(database: &SequenceDatabase, settings: &MiningSettings) -> Result<MiningOutcome> {
    let context = MiningContext::new(Algorithm::Bide, settings)?;
    let seeds = context.seeds(database)?;
    let root = ProjectedDatabase::from_database(database);

    Ok(context.run(&seeds, |seed, branch| {
        descend(&context, &root, seed.clone(), branch);
    }))
}

fn descend(context: &MiningContext<'_>, parent: &ProjectedDatabase<'_>, pattern: Sequence, branch: &mut Branch) {
    let Some(projected) = parent.project(pattern, context.min_count, ProjectionMode::Closed) else {
        return;
    };
    if projected.is_empty() {
        return;
    }
    if back_scan(&projected) {
        trace!("back-scan pruned {}", projected.prefix());
        branch.pruned += 1;
        return;
    }
    bide_recursive(context, &projected, branch);
}

fn bide_recursive(context: &MiningContext<'_>, projected: &ProjectedDatabase<'_>, branch: &mut Branch) {
    if context.halted(branch) {
        return;
    }

    let prefix = projected.prefix();
    let children = projected
        .find_local_frequent_items(context.min_count)
        .extend(prefix);

    let forward_extension = children.iter().any(|child| child.support() == prefix.support());
    if forward_extension || backward_extension_check(projected) {
        branch.non_closed += 1;
    } else {
        context.emit(prefix, branch);
    }

    for child in children {
        descend(context, projected, child, branch);
    }
}
