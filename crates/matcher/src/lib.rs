//! # Lineup Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the descriptor model (`descriptor`) and the
//! record store (`corpus`). It is responsible for turning a stored sketch
//! into a ranked list of candidate mugshots: applying the witness weight
//! profile to both sides, scanning the corpus under the Euclidean metric,
//! retaining candidates inside the match threshold, and producing the
//! session statistics the caller persists back onto the sketch.
//!
//! In a typical deployment you will:
//! - Enroll mugshots and sketches into a [`corpus::CorpusStore`].
//! - Use [`MatchSession::run_search`] to service searches over the stored
//!   mugshots, then commit the returned statistics.
//!
//! ## Core Types
//!
//! - [`SearchConfig`]: scan tuning knobs such as `batch_size`, `parallel`,
//!   and the optional `deadline`.
//! - [`CorpusScanner`]: the exhaustive linear scan over candidates.
//! - [`MatchSession`]: one search end to end, including validation,
//!   weight sanitation, and statistics.
//! - [`MatchResult`] / [`SearchOutcome`]: ranked hits plus scan counters.
//!
//! ## Example Usage
//!
//! ```
//! use chrono::Utc;
//! use corpus::{CandidateRecord, QueryRecord, SubjectMetadata};
//! use descriptor::WeightProfile;
//! use matcher::{MatchSession, SearchConfig};
//!
//! let mugshot = CandidateRecord {
//!     id: "mug-1".into(),
//!     image_url: "mugshots/mug-1.png".into(),
//!     features: vec![0.5; 128],
//!     description: "booking 2024-117".into(),
//!     metadata: SubjectMetadata::default(),
//!     uploaded_by: None,
//!     created_at: Utc::now(),
//!     active: true,
//! };
//! let sketch = QueryRecord {
//!     id: "sketch-1".into(),
//!     image_url: "sketches/sketch-1.png".into(),
//!     features: vec![0.5; 128],
//!     feature_weights: WeightProfile::default().with_eyes(2.0),
//!     description: "witness composite".into(),
//!     uploaded_by: Some("det-rivera".into()),
//!     created_at: Utc::now(),
//!     last_matched_at: None,
//!     match_count: 0,
//! };
//!
//! let session = MatchSession::new(SearchConfig::default())?;
//! let outcome = session.run_search(&sketch, std::slice::from_ref(&mugshot))?;
//! assert_eq!(outcome.results[0].candidate.id, "mug-1");
//! assert_eq!(outcome.updated_stats.match_count, 1);
//! # Ok::<(), matcher::MatchError>(())
//! ```
//!
//! ## Observability
//!
//! Install a [`SearchMetrics`] implementation via [`set_search_metrics`] to
//! record per-search latency, scan counts, and hit counts. This is
//! typically done once during service startup so all sessions share the
//! same metrics backend. Searches also emit `tracing` events under the
//! `matcher.search` span.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::{CorpusScanner, MatchSession};
pub use crate::metrics::{set_search_metrics, SearchMetrics};
pub use crate::types::{MatchError, MatchResult, SearchConfig, SearchOutcome};
