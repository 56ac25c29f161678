use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::{MiningError, Result};
use super::sequence::{Item, Sequence, Support};

/// Cooperative cancellation, polled at the entry of every search frame.
pub trait StopSignal: Send + Sync {
    fn should_stop(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Maps item ids to human-readable text for rendering and logging.
pub trait ItemLabels: Send + Sync {
    fn label(&self, item: Item) -> String;
}

impl ItemLabels for HashMap<Item, String> {
    fn label(&self, item: Item) -> String {
        self.get(&item).cloned().unwrap_or_else(|| item.to_string())
    }
}

/// Configuration for a mining run
#[derive(Clone)]
pub struct MiningSettings {
    /// Absolute minimum support. Fractions are rounded up.
    pub min_support: f64,
    /// Log every emitted pattern under the `seqmine::patterns` target
    pub log_patterns: bool,
    /// Seed 1-length patterns. When absent they are computed from the database.
    pub one_length_patterns: Option<Vec<Sequence>>,
    /// Mine top-level branches on the rayon pool
    pub parallel: bool,
    pub stop: Option<Arc<dyn StopSignal>>,
    pub labels: Option<Arc<dyn ItemLabels>>,
}

impl MiningSettings {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            log_patterns: false,
            one_length_patterns: None,
            parallel: false,
            stop: None,
            labels: None,
        }
    }

    pub fn with_pattern_logging(mut self, enabled: bool) -> Self {
        self.log_patterns = enabled;
        self
    }

    pub fn with_one_length_patterns(mut self, patterns: Vec<Sequence>) -> Self {
        self.one_length_patterns = Some(patterns);
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_stop_signal(mut self, stop: Arc<dyn StopSignal>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_labels(mut self, labels: Arc<dyn ItemLabels>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Converts `min_support` into the integer count the miners compare against.
    ///
    /// The count is rounded up and never below 1. Values beyond the support
    /// range saturate, which simply yields no patterns.
    pub fn validate(&self) -> Result<Support> {
        let min_support = self.min_support;
        if !min_support.is_finite() || min_support < 0.0 {
            return Err(MiningError::InvalidMinSupport(min_support));
        }
        let count = min_support.ceil().max(1.0);
        if count >= Support::MAX as f64 {
            return Ok(Support::MAX);
        }
        Ok(count as Support)
    }

    pub fn should_stop(&self) -> bool {
        self.stop.as_ref().is_some_and(|stop| stop.should_stop())
    }

    pub fn labels(&self) -> Option<&dyn ItemLabels> {
        self.labels.as_deref()
    }
}

impl Default for MiningSettings {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Debug for MiningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiningSettings")
            .field("min_support", &self.min_support)
            .field("log_patterns", &self.log_patterns)
            .field(
                "one_length_patterns",
                &self.one_length_patterns.as_ref().map(Vec::len),
            )
            .field("parallel", &self.parallel)
            .field("stop", &self.stop.is_some())
            .field("labels", &self.labels.is_some())
            .finish()
    }
}
