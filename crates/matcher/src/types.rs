use std::time::Duration;

use corpus::{CandidateRecord, QueryStats};
use descriptor::DescriptorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for corpus scans.
///
/// `SearchConfig` is cheap to clone and serde-friendly so it can be loaded
/// from configuration files or embedded in higher-level configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Candidates evaluated between deadline and cancellation checks.
    /// Smaller batches react faster to both; larger batches amortise the
    /// checks better.
    #[serde(default = "SearchConfig::default_batch_size")]
    pub batch_size: usize,
    /// Whether batches are evaluated on the rayon thread pool rather than
    /// sequentially. Results are identical either way.
    #[serde(default = "SearchConfig::default_parallel")]
    pub parallel: bool,
    /// Wall-clock budget for a whole scan. A scan that exceeds it fails
    /// with [`MatchError::SearchTimedOut`] and returns no partial results.
    #[serde(default)]
    pub deadline: Option<Duration>,
}

impl SearchConfig {
    pub(crate) fn default_batch_size() -> usize {
        256
    }

    pub(crate) fn default_parallel() -> bool {
        true
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Validate the configuration before a scanner is built from it.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.batch_size == 0 {
            return Err(MatchError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: Self::default_batch_size(),
            parallel: Self::default_parallel(),
            deadline: None,
        }
    }
}


/// One candidate retained by a scan, borrowing the record it scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    /// The mugshot that matched.
    pub candidate: &'a CandidateRecord,
    /// Ranking score derived from the distance; `1.0` is identical.
    pub similarity: f32,
    /// Euclidean distance between the weighted descriptors.
    pub distance: f32,
}

/// Everything a completed search produces.
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    /// Matching candidates, best first. Ties keep enrollment order.
    pub results: Vec<MatchResult<'a>>,
    /// Statistics for the sketch record; the caller is responsible for
    /// persisting them.
    pub updated_stats: QueryStats,
    /// Candidates the scan looked at, inactive ones included.
    pub candidates_scanned: usize,
    /// Candidates dropped because their stored descriptor was unusable.
    pub candidates_skipped: usize,
}

/// Errors produced by the matching layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The sketch descriptor is unusable; nothing was scanned.
    #[error("sketch descriptor rejected: {0}")]
    QueryDescriptor(#[from] DescriptorError),
    /// Invalid scan configuration.
    #[error("invalid search config: {0}")]
    InvalidConfig(String),
    /// The scan exceeded its wall-clock budget. Partial results are
    /// discarded.
    #[error("search exceeded its {budget_ms} ms budget after scanning {scanned} candidates")]
    SearchTimedOut { budget_ms: u128, scanned: usize },
    /// The caller raised the cancellation flag mid-scan.
    #[error("search cancelled after scanning {scanned} candidates")]
    Cancelled { scanned: usize },
}
