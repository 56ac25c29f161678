use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, info, log_enabled, Level};
use rayon::prelude::*;

use super::bide::bide_algorithm;
use super::database::SequenceDatabase;
use super::error::{MiningError, Result};
use super::lapin::lapin_spam_algorithm;
use super::prefixspan::prefixspan_algorithm;
use super::sequence::{Item, Sequence, Support};
use super::settings::MiningSettings;
use super::spam::spam_algorithm;

/// Log target for per-pattern records when `log_patterns` is set.
pub const PATTERN_LOG_TARGET: &str = "seqmine::patterns";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    PrefixSpan,
    Bide,
    Spam,
    LapinSpam,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::PrefixSpan,
        Algorithm::Bide,
        Algorithm::Spam,
        Algorithm::LapinSpam,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::PrefixSpan => "PrefixSpan",
            Algorithm::Bide => "BIDE",
            Algorithm::Spam => "SPAM",
            Algorithm::LapinSpam => "LAPIN-SPAM",
        }
    }

    /// BIDE only reports closed patterns; the others report every frequent one.
    pub fn closed_only(self) -> bool {
        matches!(self, Algorithm::Bide)
    }

    /// Runs this algorithm over a horizontal database.
    ///
    /// The bitmap miners build their vertical view from the seed items first.
    pub fn mine(self, database: &SequenceDatabase, settings: &MiningSettings) -> Result<MiningOutcome> {
        match self {
            Algorithm::PrefixSpan => prefixspan_algorithm(database, settings),
            Algorithm::Bide => bide_algorithm(database, settings),
            Algorithm::Spam | Algorithm::LapinSpam => {
                let min_count = settings.validate()?;
                describe_database(self, database);
                let items: Vec<Item> = seed_patterns(database, settings, min_count)?
                    .iter()
                    .filter_map(Sequence::last_item)
                    .collect();
                let vertical = database.to_vertical(&items)?;
                if self == Algorithm::Spam {
                    spam_algorithm(&vertical, settings)
                } else {
                    lapin_spam_algorithm(&vertical, settings)
                }
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MiningError;

    fn from_str(name: &str) -> Result<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "prefixspan" => Ok(Algorithm::PrefixSpan),
            "bide" => Ok(Algorithm::Bide),
            "spam" => Ok(Algorithm::Spam),
            "lapinspam" | "lapin" => Ok(Algorithm::LapinSpam),
            _ => Err(MiningError::UnknownAlgorithm(name.to_string())),
        }
    }
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningStats {
    pub patterns: usize,
    /// Prefixes BIDE explored but did not report because they are not closed
    pub non_closed: usize,
    /// Branches BIDE cut with the back-scan check
    pub pruned: usize,
    /// Whether the stop signal cut the run short
    pub stopped: bool,
}

/// Patterns in discovery order plus run counters.
#[derive(Debug, Clone, Default)]
pub struct MiningOutcome {
    pub patterns: Vec<Sequence>,
    pub stats: MiningStats,
}

impl MiningOutcome {
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.patterns.iter()
    }

    fn absorb(&mut self, branch: Branch) {
        self.patterns.extend(branch.patterns);
        self.stats.non_closed += branch.non_closed;
        self.stats.pruned += branch.pruned;
        self.stats.stopped |= branch.stopped;
    }
}

impl IntoIterator for MiningOutcome {
    type Item = Sequence;
    type IntoIter = std::vec::IntoIter<Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

/// Output of one top-level branch of the search.
#[derive(Debug, Default)]
pub(crate) struct Branch {
    pub(crate) patterns: Vec<Sequence>,
    pub(crate) non_closed: usize,
    pub(crate) pruned: usize,
    pub(crate) stopped: bool,
}

/// Per-run state shared by every search frame. Read-only once built, so
/// parallel branches share it by reference.
pub(crate) struct MiningContext<'s> {
    algorithm: Algorithm,
    settings: &'s MiningSettings,
    pub(crate) min_count: Support,
    started: Instant,
}

impl<'s> MiningContext<'s> {
    pub(crate) fn new(algorithm: Algorithm, settings: &'s MiningSettings) -> Result<Self> {
        let min_count = settings.validate()?;
        info!(
            "{}: mining with min support {} (count {}){}",
            algorithm,
            settings.min_support,
            min_count,
            if settings.parallel { ", parallel branches" } else { "" }
        );
        Ok(Self {
            algorithm,
            settings,
            min_count,
            started: Instant::now(),
        })
    }

    /// Polls the stop signal and records a hit in the branch.
    #[inline]
    pub(crate) fn halted(&self, branch: &mut Branch) -> bool {
        if self.settings.should_stop() {
            branch.stopped = true;
            return true;
        }
        false
    }

    pub(crate) fn emit(&self, pattern: &Sequence, branch: &mut Branch) {
        if self.settings.log_patterns {
            info!(target: PATTERN_LOG_TARGET, "{}", pattern.render(self.settings.labels()));
        }
        branch.patterns.push(pattern.clone());
    }

    pub(crate) fn seeds(&self, database: &SequenceDatabase) -> Result<Vec<Sequence>> {
        describe_database(self.algorithm, database);
        seed_patterns(database, self.settings, self.min_count)
    }

    /// Mines every top-level seed and concatenates the branches in seed order.
    pub(crate) fn run<T, F>(&self, seeds: &[T], mine: F) -> MiningOutcome
    where
        T: Sync,
        F: Fn(&T, &mut Branch) + Sync,
    {
        let branches: Vec<Branch> = if self.settings.parallel {
            seeds
                .par_iter()
                .map(|seed| {
                    let mut branch = Branch::default();
                    if !self.halted(&mut branch) {
                        mine(seed, &mut branch);
                    }
                    branch
                })
                .collect()
        } else {
            let mut branch = Branch::default();
            for seed in seeds {
                if self.halted(&mut branch) {
                    break;
                }
                mine(seed, &mut branch);
            }
            vec![branch]
        };

        let mut outcome = MiningOutcome::default();
        for branch in branches {
            outcome.absorb(branch);
        }
        outcome.stats.patterns = outcome.patterns.len();

        info!(
            "{}: {} patterns from {} seeds in {:.2?}{}",
            self.algorithm,
            outcome.stats.patterns,
            seeds.len(),
            self.started.elapsed(),
            if outcome.stats.stopped { " (stopped)" } else { "" }
        );
        if self.algorithm.closed_only() {
            debug!(
                "{}: {} non-closed prefixes, {} branches pruned",
                self.algorithm, outcome.stats.non_closed, outcome.stats.pruned
            );
        }
        outcome
    }
}

fn describe_database(algorithm: Algorithm, database: &SequenceDatabase) {
    if log_enabled!(Level::Debug) {
        debug!("{}: {}", algorithm, database.statistics());
    }
}

/// Frequent 1-length patterns sorted by item. Caller-supplied seeds only
/// select which items to grow; their supports are recounted against the
/// database and those below `min_count` are dropped.
fn seed_patterns(database: &SequenceDatabase, settings: &MiningSettings, min_count: Support) -> Result<Vec<Sequence>> {
    let frequent = database.find_one_length_patterns(min_count);
    let requested = match &settings.one_length_patterns {
        Some(patterns) if !patterns.is_empty() => patterns,
        _ => return Ok(frequent),
    };

    let mut items = BTreeSet::new();
    for (index, pattern) in requested.iter().enumerate() {
        match pattern.last_item() {
            Some(item) if pattern.length() == 1 => {
                items.insert(item);
            }
            _ => {
                return Err(MiningError::InvalidSeed {
                    index,
                    length: pattern.length(),
                })
            }
        }
    }

    let seeds: Vec<Sequence> = frequent
        .into_iter()
        .filter(|pattern| pattern.last_item().is_some_and(|item| items.contains(&item)))
        .collect();
    debug!("{} of {} seed items are frequent", seeds.len(), items.len());
    Ok(seeds)
}
