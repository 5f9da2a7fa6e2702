//! Record model and storage seam for the face corpus.
//!
//! The corpus holds two kinds of [`FaceRecord`]: enrolled mugshots
//! ([`CandidateRecord`]) that searches scan over, and composite sketches
//! ([`QueryRecord`]) that drive searches and accumulate usage statistics.
//! Records carry their descriptor as a raw `Vec<f32>` exactly as it came
//! off the wire; validation happens when a search parses it back into a
//! typed descriptor, so one corrupt record cannot poison the whole store.
//!
//! [`CorpusStore`] is the storage boundary. The bundled [`MemoryStore`] is
//! a thread-safe in-memory implementation that preserves enrollment order,
//! which keeps ranking deterministic when similarities tie.

mod error;
mod record;
mod store;

pub use crate::error::StoreError;
pub use crate::record::{
    derive_record_id, CandidateRecord, FaceRecord, QueryRecord, QueryStats, SubjectMetadata,
};
pub use crate::store::{CorpusStats, CorpusStore, MemoryStore, SketchSummary};
