use std::collections::HashMap;
use std::fmt;

use log::debug;

use super::error::{MiningError, Result};
use super::sequence::{Sequence, Support};
use super::settings::ItemLabels;

/// `antecedent => pattern`: a sequence containing the antecedent goes on to
/// contain the whole pattern with probability `confidence`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialRule {
    /// Leading itemsets of `pattern`
    pub antecedent: Sequence,
    pub pattern: Sequence,
    /// Support of the pattern over the support of the antecedent
    pub confidence: f64,
}

impl SequentialRule {
    /// The itemsets of the pattern that follow the antecedent.
    pub fn consequent(&self) -> Sequence {
        self.pattern.suffix(self.antecedent.size())
    }

    pub fn render(&self, labels: Option<&dyn ItemLabels>) -> String {
        let mut out = self.antecedent.render(labels);
        out.push_str(" => ");
        out.push_str(&self.pattern.render(labels));
        out.push_str(&format!(" ({:.3})", self.confidence));
        out
    }
}

impl fmt::Display for SequentialRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Derives rules from a set of mined patterns.
///
/// The patterns should be complete (every frequent pattern, not only the
/// closed ones): an antecedent only yields a rule when it is itself one of the
/// patterns.
pub struct RuleGenerator<'p> {
    patterns: &'p [Sequence],
    supports: HashMap<&'p Sequence, Support>,
}

impl<'p> RuleGenerator<'p> {
    pub fn new(patterns: &'p [Sequence]) -> Self {
        let supports = patterns.iter().map(|pattern| (pattern, pattern.support())).collect();
        Self { patterns, supports }
    }

    /// Support of a known pattern.
    pub fn support_of(&self, pattern: &Sequence) -> Option<Support> {
        self.supports.get(pattern).copied()
    }

    /// Every rule with confidence at least `min_confidence`.
    ///
    /// Each pattern with two or more itemsets splits after each of its itemsets
    /// except the last: the leading itemsets become the antecedent and the
    /// rest the consequent.
    pub fn generate(&self, min_confidence: f64) -> Result<Vec<SequentialRule>> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(MiningError::InvalidConfidence(min_confidence));
        }

        let mut rules = Vec::new();
        for pattern in self.patterns.iter().filter(|pattern| pattern.size() > 1) {
            for split in 1..pattern.size() {
                let antecedent = pattern.prefix(split);
                let Some(antecedent_support) = self.support_of(&antecedent).filter(|&support| support > 0) else {
                    continue;
                };
                let confidence = f64::from(pattern.support()) / f64::from(antecedent_support);
                if confidence < min_confidence {
                    continue;
                }
                rules.push(SequentialRule {
                    antecedent: antecedent.with_support(antecedent_support),
                    pattern: pattern.clone(),
                    confidence,
                });
            }
        }

        debug!(
            "{} rules from {} patterns at min confidence {}",
            rules.len(),
            self.patterns.len(),
            min_confidence
        );
        Ok(rules)
    }
}
