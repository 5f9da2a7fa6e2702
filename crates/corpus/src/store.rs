use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreError;
use crate::record::{CandidateRecord, FaceRecord, QueryRecord, QueryStats};

/// One row of a sketch history listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchSummary {
    pub id: String,
    pub image_url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub last_matched_at: Option<DateTime<Utc>>,
    pub match_count: u64,
}

/// Corpus-wide record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub total: usize,
    pub mugshots: usize,
    pub sketches: usize,
    pub active_mugshots: usize,
}

/// Storage boundary for face records.
///
/// Implementations must be safe to share across threads; searches read the
/// corpus while enrollment writes to it. `mugshots` must return candidates
/// in enrollment order so that ranking stays deterministic when
/// similarities tie.
pub trait CorpusStore: Send + Sync {
    /// Insert or replace a record. Replacing keeps the record's original
    /// enrollment position.
    fn put(&self, record: FaceRecord) -> Result<(), StoreError>;

    /// Fetch any record by id.
    fn get(&self, id: &str) -> Result<Option<FaceRecord>, StoreError>;

    /// Fetch a sketch by id. Missing ids and mugshot ids both come back
    /// as [`StoreError::RecordNotFound`].
    fn sketch(&self, id: &str) -> Result<QueryRecord, StoreError>;

    /// All mugshots in enrollment order, inactive ones included.
    fn mugshots(&self) -> Result<Vec<CandidateRecord>, StoreError>;

    /// Soft-delete a mugshot. The record stays in the corpus but searches
    /// no longer consider it. Sketch ids and missing ids are
    /// [`StoreError::RecordNotFound`].
    fn deactivate(&self, id: &str) -> Result<(), StoreError>;

    /// Apply search statistics to a sketch record.
    fn commit_stats(&self, sketch_id: &str, stats: &QueryStats) -> Result<(), StoreError>;

    /// Sketches uploaded by one user, newest first.
    fn sketches_by_uploader(&self, uploader: &str) -> Result<Vec<SketchSummary>, StoreError>;

    /// Record counts for the whole corpus.
    fn stats(&self) -> Result<CorpusStats, StoreError>;
}

/// Thread-safe in-memory store.
///
/// Keeps an insertion log next to the record map so `mugshots` and
/// `sketches_by_uploader` iterate in enrollment order rather than hash
/// order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Shelf>,
}

#[derive(Debug, Default)]
struct Shelf {
    records: HashMap<String, FaceRecord>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CorpusStore for MemoryStore {
    fn put(&self, record: FaceRecord) -> Result<(), StoreError> {
        let mut shelf = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let id = record.id().to_owned();
        if !shelf.records.contains_key(&id) {
            shelf.order.push(id.clone());
        }
        shelf.records.insert(id, record);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<FaceRecord>, StoreError> {
        let shelf = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(shelf.records.get(id).cloned())
    }

    fn sketch(&self, id: &str) -> Result<QueryRecord, StoreError> {
        let shelf = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        shelf
            .records
            .get(id)
            .and_then(FaceRecord::as_sketch)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn mugshots(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        let shelf = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(shelf
            .order
            .iter()
            .filter_map(|id| shelf.records.get(id))
            .filter_map(FaceRecord::as_mugshot)
            .cloned()
            .collect())
    }

    fn deactivate(&self, id: &str) -> Result<(), StoreError> {
        let mut shelf = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        match shelf.records.get_mut(id) {
            Some(FaceRecord::Mugshot(record)) => {
                record.active = false;
                Ok(())
            }
            _ => Err(StoreError::not_found(id)),
        }
    }

    fn commit_stats(&self, sketch_id: &str, stats: &QueryStats) -> Result<(), StoreError> {
        let mut shelf = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        match shelf.records.get_mut(sketch_id) {
            Some(FaceRecord::Sketch(record)) => {
                record.last_matched_at = Some(stats.last_matched_at);
                record.match_count = stats.match_count;
                Ok(())
            }
            _ => Err(StoreError::not_found(sketch_id)),
        }
    }

    fn sketches_by_uploader(&self, uploader: &str) -> Result<Vec<SketchSummary>, StoreError> {
        let shelf = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let mut summaries: Vec<SketchSummary> = shelf
            .order
            .iter()
            .filter_map(|id| shelf.records.get(id))
            .filter_map(FaceRecord::as_sketch)
            .filter(|sketch| sketch.uploaded_by.as_deref() == Some(uploader))
            .map(|sketch| SketchSummary {
                id: sketch.id.clone(),
                image_url: sketch.image_url.clone(),
                description: sketch.description.clone(),
                created_at: sketch.created_at,
                last_matched_at: sketch.last_matched_at,
                match_count: sketch.match_count,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    fn stats(&self) -> Result<CorpusStats, StoreError> {
        let shelf = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let mut stats = CorpusStats {
            total: shelf.records.len(),
            mugshots: 0,
            sketches: 0,
            active_mugshots: 0,
        };
        for record in shelf.records.values() {
            match record {
                FaceRecord::Mugshot(mugshot) => {
                    stats.mugshots += 1;
                    if mugshot.active {
                        stats.active_mugshots += 1;
                    }
                }
                FaceRecord::Sketch(_) => stats.sketches += 1,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SubjectMetadata;
    use chrono::TimeZone;

    fn stamp(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn mugshot(id: &str) -> FaceRecord {
        FaceRecord::Mugshot(CandidateRecord {
            id: id.into(),
            image_url: format!("mugshots/{id}.png"),
            features: vec![0.5; 4],
            description: String::new(),
            metadata: SubjectMetadata::default(),
            uploaded_by: None,
            created_at: stamp(0),
            active: true,
        })
    }

    fn sketch(id: &str, uploader: &str, minute: u32) -> FaceRecord {
        FaceRecord::Sketch(QueryRecord {
            id: id.into(),
            image_url: format!("sketches/{id}.png"),
            features: vec![0.25; 4],
            feature_weights: Default::default(),
            description: String::new(),
            uploaded_by: Some(uploader.into()),
            created_at: stamp(minute),
            last_matched_at: None,
            match_count: 0,
        })
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put(mugshot("m-1")).unwrap();
        let record = store.get("m-1").unwrap().unwrap();
        assert_eq!(record.id(), "m-1");
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn mugshots_preserve_enrollment_order() {
        let store = MemoryStore::new();
        for id in ["m-c", "m-a", "m-b"] {
            store.put(mugshot(id)).unwrap();
        }
        let ids: Vec<String> = store
            .mugshots()
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, ["m-c", "m-a", "m-b"]);
    }

    #[test]
    fn replacing_a_record_keeps_its_slot() {
        let store = MemoryStore::new();
        store.put(mugshot("m-1")).unwrap();
        store.put(mugshot("m-2")).unwrap();

        let mut updated = mugshot("m-1");
        if let FaceRecord::Mugshot(record) = &mut updated {
            record.description = "updated booking".into();
        }
        store.put(updated).unwrap();

        let records = store.mugshots().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "m-1");
        assert_eq!(records[0].description, "updated booking");
        assert_eq!(records[1].id, "m-2");
    }

    #[test]
    fn sketch_lookup_rejects_mugshot_ids() {
        let store = MemoryStore::new();
        store.put(mugshot("m-1")).unwrap();
        store.put(sketch("s-1", "det-rivera", 1)).unwrap();

        assert!(store.sketch("s-1").is_ok());
        assert_eq!(store.sketch("m-1").unwrap_err(), StoreError::not_found("m-1"));
        assert_eq!(
            store.sketch("missing").unwrap_err(),
            StoreError::not_found("missing")
        );
    }

    #[test]
    fn deactivate_flips_only_mugshots() {
        let store = MemoryStore::new();
        store.put(mugshot("m-1")).unwrap();
        store.put(sketch("s-1", "det-rivera", 1)).unwrap();

        store.deactivate("m-1").unwrap();
        let record = store.get("m-1").unwrap().unwrap();
        assert!(!record.as_mugshot().unwrap().active);

        assert!(store.deactivate("s-1").is_err());
        assert!(store.deactivate("missing").is_err());
    }

    #[test]
    fn commit_stats_updates_the_sketch() {
        let store = MemoryStore::new();
        store.put(sketch("s-1", "det-rivera", 1)).unwrap();

        let stats = QueryStats {
            last_matched_at: stamp(30),
            match_count: 4,
        };
        store.commit_stats("s-1", &stats).unwrap();

        let sketch = store.sketch("s-1").unwrap();
        assert_eq!(sketch.last_matched_at, Some(stamp(30)));
        assert_eq!(sketch.match_count, 4);

        store.put(mugshot("m-1")).unwrap();
        assert!(store.commit_stats("m-1", &stats).is_err());
    }

    #[test]
    fn uploader_history_is_newest_first() {
        let store = MemoryStore::new();
        store.put(sketch("s-old", "det-rivera", 5)).unwrap();
        store.put(sketch("s-new", "det-rivera", 45)).unwrap();
        store.put(sketch("s-mid", "det-rivera", 25)).unwrap();
        store.put(sketch("s-other", "det-okafor", 59)).unwrap();

        let history = store.sketches_by_uploader("det-rivera").unwrap();
        let ids: Vec<&str> = history.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["s-new", "s-mid", "s-old"]);

        assert!(store.sketches_by_uploader("nobody").unwrap().is_empty());
    }

    #[test]
    fn corpus_stats_count_by_kind_and_active() {
        let store = MemoryStore::new();
        store.put(mugshot("m-1")).unwrap();
        store.put(mugshot("m-2")).unwrap();
        store.put(sketch("s-1", "det-rivera", 1)).unwrap();
        store.deactivate("m-2").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.mugshots, 2);
        assert_eq!(stats.sketches, 1);
        assert_eq!(stats.active_mugshots, 1);
    }
}
