use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, span, warn, Level};

use corpus::{CandidateRecord, QueryRecord, QueryStats};
use descriptor::{apply_weights, compare, Descriptor, WeightProfile};

use crate::metrics::metrics_recorder;
use crate::types::{MatchError, MatchResult, SearchConfig, SearchOutcome};


#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanTally {
    pub(crate) scanned: usize,
    pub(crate) skipped: usize,
}

/// Linear scanner over candidate records.
///
/// Every active candidate is evaluated against the weighted query; there is
/// no pre-filtering or approximate index in front of it, so recall is
/// exact. Scans check their deadline and cancellation flag once per batch.
pub struct CorpusScanner {
    config: SearchConfig,
}

impl CorpusScanner {
    pub fn new(config: SearchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Scan `candidates` against an already validated query descriptor and
    /// return the retained matches, best first.
    pub fn scan<'a>(
        &self,
        query: &Descriptor,
        profile: &WeightProfile,
        candidates: &'a [CandidateRecord],
    ) -> Result<Vec<MatchResult<'a>>, MatchError> {
        self.scan_counted(query, profile, candidates, None)
            .map(|(hits, _)| hits)
    }

    pub(crate) fn scan_counted<'a>(
        &self,
        query: &Descriptor,
        profile: &WeightProfile,
        candidates: &'a [CandidateRecord],
        cancel: Option<&AtomicBool>,
    ) -> Result<(Vec<MatchResult<'a>>, ScanTally), MatchError> {
        let started = Instant::now();
        let weighted_query = apply_weights(query, profile);
        let skipped = AtomicUsize::new(0);

        let mut hits: Vec<MatchResult<'a>> = Vec::new();
        let mut scanned = 0usize;

        for batch in candidates.chunks(self.config.batch_size) {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(MatchError::Cancelled { scanned });
                }
            }
            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    return Err(MatchError::SearchTimedOut {
                        budget_ms: deadline.as_millis(),
                        scanned,
                    });
                }
            }

            if self.config.parallel {
                let batch_hits: Vec<MatchResult<'a>> = batch
                    .par_iter()
                    .filter_map(|candidate| {
                        evaluate_candidate(&weighted_query, profile, candidate, &skipped)
                    })
                    .collect();
                hits.extend(batch_hits);
            } else {
                hits.extend(batch.iter().filter_map(|candidate| {
                    evaluate_candidate(&weighted_query, profile, candidate, &skipped)
                }));
            }
            scanned += batch.len();
        }

        // Stable sort, so equal similarities keep enrollment order.
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok((
            hits,
            ScanTally {
                scanned,
                skipped: skipped.load(Ordering::Relaxed),
            },
        ))
    }
}

fn evaluate_candidate<'a>(
    weighted_query: &Descriptor,
    profile: &WeightProfile,
    candidate: &'a CandidateRecord,
    skipped: &AtomicUsize,
) -> Option<MatchResult<'a>> {
    if !candidate.active {
        return None;
    }
    let stored = match Descriptor::from_slice(&candidate.features) {
        Ok(stored) => stored,
        Err(err) => {
            skipped.fetch_add(1, Ordering::Relaxed);
            warn!(candidate_id = %candidate.id, error = %err, "candidate_skipped");
            return None;
        }
    };
    let comparison = compare(weighted_query, &apply_weights(&stored, profile));
    comparison.is_match.then(|| MatchResult {
        candidate,
        similarity: comparison.similarity,
        distance: comparison.distance,
    })
}

/// One sketch search from query validation through ranked results and the
/// statistics the caller should persist.
pub struct MatchSession {
    scanner: CorpusScanner,
}

impl MatchSession {
    pub fn new(config: SearchConfig) -> Result<Self, MatchError> {
        Ok(Self {
            scanner: CorpusScanner::new(config)?,
        })
    }

    pub fn scanner(&self) -> &CorpusScanner {
        &self.scanner
    }

    /// Run a search for `sketch` over `candidates` and return ordered
    /// matches together with updated sketch statistics.
    pub fn run_search<'a>(
        &self,
        sketch: &QueryRecord,
        candidates: &'a [CandidateRecord],
    ) -> Result<SearchOutcome<'a>, MatchError> {
        self.instrumented_search(sketch, candidates, None)
    }

    /// Like [`run_search`], but aborts with [`MatchError::Cancelled`] once
    /// `cancel` is raised. The flag is checked between batches.
    ///
    /// [`run_search`]: MatchSession::run_search
    pub fn run_search_with_signal<'a>(
        &self,
        sketch: &QueryRecord,
        candidates: &'a [CandidateRecord],
        cancel: &AtomicBool,
    ) -> Result<SearchOutcome<'a>, MatchError> {
        self.instrumented_search(sketch, candidates, Some(cancel))
    }

    fn instrumented_search<'a>(
        &self,
        sketch: &QueryRecord,
        candidates: &'a [CandidateRecord],
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchOutcome<'a>, MatchError> {
        let start = Instant::now();
        let search_span = span!(Level::INFO, "matcher.search", sketch_id = %sketch.id);
        let _guard = search_span.enter();

        let result = self.search_inner(sketch, candidates, cancel);
        let latency = start.elapsed();
        let elapsed_micros = latency.as_micros() as u64;
        match &result {
            Ok(outcome) => {
                info!(
                    hit_count = outcome.results.len(),
                    scanned = outcome.candidates_scanned,
                    skipped = outcome.candidates_skipped,
                    elapsed_micros,
                    "search_success"
                );
                if let Some(recorder) = metrics_recorder() {
                    recorder.record_search(
                        &sketch.id,
                        latency,
                        outcome.candidates_scanned,
                        outcome.results.len(),
                    );
                }
            }
            Err(err) => {
                warn!(error = %err, elapsed_micros, "search_failure");
            }
        }
        result
    }

    fn search_inner<'a>(
        &self,
        sketch: &QueryRecord,
        candidates: &'a [CandidateRecord],
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchOutcome<'a>, MatchError> {
        let query = Descriptor::from_slice(&sketch.features)?;

        let profile = sketch.feature_weights.sanitized();
        if profile != sketch.feature_weights {
            warn!(sketch_id = %sketch.id, "weight_profile_sanitized");
        }

        let (results, tally) = self
            .scanner
            .scan_counted(&query, &profile, candidates, cancel)?;

        Ok(SearchOutcome {
            results,
            updated_stats: QueryStats {
                last_matched_at: Utc::now(),
                match_count: sketch.match_count + 1,
            },
            candidates_scanned: tally.scanned,
            candidates_skipped: tally.skipped,
        })
    }
}
