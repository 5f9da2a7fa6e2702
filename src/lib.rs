//! Workspace umbrella crate for the sketch-to-mugshot lineup pipeline.
//!
//! This crate stitches together feature extraction (`extractor`), the face
//! corpus (`corpus`), and descriptor matching (`matcher`) so callers can
//! enroll images and run searches through a single API entry point.

pub mod config;

pub use corpus::{
    CandidateRecord, CorpusStats, CorpusStore, FaceRecord, MemoryStore, QueryRecord, QueryStats,
    SketchSummary, StoreError, SubjectMetadata, derive_record_id,
};
pub use descriptor::{
    Comparison, DESCRIPTOR_LEN, Descriptor, DescriptorError, FeatureRegion, MATCH_THRESHOLD,
    WeightProfile, apply_weights, compare,
};
pub use extractor::{
    ExtractorError, FaceBox, FaceObservation, FeatureExtractor, ImageInput, LANDMARK_POINTS,
    Landmark, SyntheticExtractor,
};
pub use matcher::{
    CorpusScanner, MatchError, MatchResult, MatchSession, SearchConfig, SearchMetrics,
    SearchOutcome, set_search_metrics,
};

pub use crate::config::{ConfigLoadError, EnrollmentConfig, LineupConfig};

use std::error::Error;
use std::fmt;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{Level, info, span, warn};

/// Errors that can occur while an enrollment or search moves through the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Extraction(ExtractorError),
    Store(StoreError),
    Search(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Extraction(err) => write!(f, "feature extraction failure: {err}"),
            PipelineError::Store(err) => write!(f, "corpus storage failure: {err}"),
            PipelineError::Search(err) => write!(f, "search failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Extraction(err) => Some(err),
            PipelineError::Store(err) => Some(err),
            PipelineError::Search(err) => Some(err),
        }
    }
}

impl From<ExtractorError> for PipelineError {
    fn from(value: ExtractorError) -> Self {
        PipelineError::Extraction(value)
    }
}

impl From<StoreError> for PipelineError {
    fn from(value: StoreError) -> Self {
        PipelineError::Store(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Search(value)
    }
}

/// A mugshot handed to [`enroll_mugshot`].
#[derive(Debug, Clone)]
pub struct MugshotSubmission {
    /// Image the extractor runs on.
    pub image: ImageInput,
    /// Where the stored image lives. Also feeds record id derivation.
    pub image_url: String,
    pub description: String,
    pub metadata: SubjectMetadata,
    pub uploaded_by: Option<String>,
    /// Explicit record id. Leave `None` to derive one from `image_url`
    /// and `uploaded_by`.
    pub id: Option<String>,
}

/// A composite sketch handed to [`enroll_sketch`].
#[derive(Debug, Clone)]
pub struct SketchSubmission {
    pub image: ImageInput,
    pub image_url: String,
    pub description: String,
    /// Witness confidence per feature region, applied on every search of
    /// this sketch.
    pub feature_weights: WeightProfile,
    pub uploaded_by: Option<String>,
    pub id: Option<String>,
}

/// Extract a descriptor from a booking photo and enroll it as a mugshot.
///
/// The image must contain exactly one detectable face. The stored record
/// is returned; its id is the submitted one, or a derived id when the
/// submission left it out.
pub fn enroll_mugshot(
    submission: MugshotSubmission,
    extractor: &dyn FeatureExtractor,
    store: &dyn CorpusStore,
    config: &EnrollmentConfig,
) -> Result<CandidateRecord, PipelineError> {
    let start = Instant::now();
    let enroll_span = span!(
        Level::INFO,
        "lineup.enroll",
        kind = "mugshot",
        image_url = %submission.image_url
    );
    let _guard = enroll_span.enter();

    match enroll_mugshot_inner(submission, extractor, store, config) {
        Ok(record) => {
            info!(
                record_id = %record.id,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "enroll_success"
            );
            Ok(record)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "enroll_failure"
            );
            Err(err)
        }
    }
}

fn enroll_mugshot_inner(
    submission: MugshotSubmission,
    extractor: &dyn FeatureExtractor,
    store: &dyn CorpusStore,
    config: &EnrollmentConfig,
) -> Result<CandidateRecord, PipelineError> {
    let MugshotSubmission {
        image,
        image_url,
        description,
        metadata,
        uploaded_by,
        id,
    } = submission;

    let observation = extractor.extract(&image)?;
    let id = id.unwrap_or_else(|| {
        derive_record_id(&config.id_namespace, &image_url, uploaded_by.as_deref())
    });

    let record = CandidateRecord {
        id,
        image_url,
        features: observation.descriptor.into_vec(),
        description,
        metadata,
        uploaded_by,
        created_at: Utc::now(),
        active: true,
    };
    store.put(FaceRecord::Mugshot(record.clone()))?;
    Ok(record)
}

/// Extract a descriptor from a composite sketch and enroll it as a query
/// record with zeroed match statistics.
pub fn enroll_sketch(
    submission: SketchSubmission,
    extractor: &dyn FeatureExtractor,
    store: &dyn CorpusStore,
    config: &EnrollmentConfig,
) -> Result<QueryRecord, PipelineError> {
    let start = Instant::now();
    let enroll_span = span!(
        Level::INFO,
        "lineup.enroll",
        kind = "sketch",
        image_url = %submission.image_url
    );
    let _guard = enroll_span.enter();

    match enroll_sketch_inner(submission, extractor, store, config) {
        Ok(record) => {
            info!(
                record_id = %record.id,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "enroll_success"
            );
            Ok(record)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "enroll_failure"
            );
            Err(err)
        }
    }
}

fn enroll_sketch_inner(
    submission: SketchSubmission,
    extractor: &dyn FeatureExtractor,
    store: &dyn CorpusStore,
    config: &EnrollmentConfig,
) -> Result<QueryRecord, PipelineError> {
    let SketchSubmission {
        image,
        image_url,
        description,
        feature_weights,
        uploaded_by,
        id,
    } = submission;

    let observation = extractor.extract(&image)?;
    let id = id.unwrap_or_else(|| {
        derive_record_id(&config.id_namespace, &image_url, uploaded_by.as_deref())
    });

    let record = QueryRecord {
        id,
        image_url,
        features: observation.descriptor.into_vec(),
        feature_weights,
        description,
        uploaded_by,
        created_at: Utc::now(),
        last_matched_at: None,
        match_count: 0,
    };
    store.put(FaceRecord::Sketch(record.clone()))?;
    Ok(record)
}

/// One ranked row of a [`SearchReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRow {
    pub candidate_id: String,
    pub image_url: String,
    pub description: String,
    pub metadata: SubjectMetadata,
    pub similarity: f32,
}

/// Outcome of [`run_search`], after the sketch statistics were committed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub sketch_id: String,
    /// Matching candidates, best first.
    pub rows: Vec<SearchRow>,
    pub stats: QueryStats,
    pub candidates_scanned: usize,
    pub candidates_skipped: usize,
}

/// Run a stored sketch against the whole mugshot corpus.
///
/// Resolves the sketch, scans every enrolled mugshot, commits the updated
/// usage statistics back to the store, and reports the matches in rank
/// order. Unknown or non-sketch ids fail with
/// [`StoreError::RecordNotFound`].
pub fn run_search(
    sketch_id: &str,
    store: &dyn CorpusStore,
    session: &MatchSession,
) -> Result<SearchReport, PipelineError> {
    let start = Instant::now();
    let search_span = span!(Level::INFO, "lineup.search", sketch_id = %sketch_id);
    let _guard = search_span.enter();

    match run_search_inner(sketch_id, store, session) {
        Ok(report) => {
            info!(
                hit_count = report.rows.len(),
                scanned = report.candidates_scanned,
                skipped = report.candidates_skipped,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "search_success"
            );
            Ok(report)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "search_failure"
            );
            Err(err)
        }
    }
}

fn run_search_inner(
    sketch_id: &str,
    store: &dyn CorpusStore,
    session: &MatchSession,
) -> Result<SearchReport, PipelineError> {
    let sketch = store.sketch(sketch_id)?;
    let candidates = store.mugshots()?;

    let outcome = session.run_search(&sketch, &candidates)?;
    store.commit_stats(&sketch.id, &outcome.updated_stats)?;

    let rows = outcome
        .results
        .iter()
        .map(|hit| SearchRow {
            candidate_id: hit.candidate.id.clone(),
            image_url: hit.candidate.image_url.clone(),
            description: hit.candidate.description.clone(),
            metadata: hit.candidate.metadata.clone(),
            similarity: hit.similarity,
        })
        .collect();

    Ok(SearchReport {
        sketch_id: sketch.id,
        rows,
        stats: outcome.updated_stats,
        candidates_scanned: outcome.candidates_scanned,
        candidates_skipped: outcome.candidates_skipped,
    })
}

/// Sketches one uploader has enrolled, newest first.
pub fn sketch_history(
    uploader: &str,
    store: &dyn CorpusStore,
) -> Result<Vec<SketchSummary>, PipelineError> {
    Ok(store.sketches_by_uploader(uploader)?)
}
