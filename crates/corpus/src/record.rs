use chrono::{DateTime, Utc};
use descriptor::WeightProfile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record in the face corpus, tagged by kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FaceRecord {
    Mugshot(CandidateRecord),
    Sketch(QueryRecord),
}

impl FaceRecord {
    pub fn id(&self) -> &str {
        match self {
            FaceRecord::Mugshot(record) => &record.id,
            FaceRecord::Sketch(record) => &record.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            FaceRecord::Mugshot(record) => record.created_at,
            FaceRecord::Sketch(record) => record.created_at,
        }
    }

    pub fn uploaded_by(&self) -> Option<&str> {
        match self {
            FaceRecord::Mugshot(record) => record.uploaded_by.as_deref(),
            FaceRecord::Sketch(record) => record.uploaded_by.as_deref(),
        }
    }

    pub fn as_mugshot(&self) -> Option<&CandidateRecord> {
        match self {
            FaceRecord::Mugshot(record) => Some(record),
            FaceRecord::Sketch(_) => None,
        }
    }

    pub fn as_sketch(&self) -> Option<&QueryRecord> {
        match self {
            FaceRecord::Sketch(record) => Some(record),
            FaceRecord::Mugshot(_) => None,
        }
    }
}

/// An enrolled mugshot, the unit a search scans over.
///
/// `features` is the descriptor exactly as extracted at enrollment time.
/// It is deliberately untyped here; searches validate it per candidate and
/// skip records that fail, so a bad import never blocks matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: String,
    pub image_url: String,
    pub features: Vec<f32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: SubjectMetadata,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag. Inactive mugshots stay in the corpus but are
    /// never considered by searches.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A composite sketch, the query side of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub id: String,
    pub image_url: String,
    pub features: Vec<f32>,
    /// Witness confidence per feature region. Missing on the wire means
    /// the neutral profile.
    #[serde(default)]
    pub feature_weights: WeightProfile,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_matched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub match_count: u64,
}

/// Booking details recorded alongside a mugshot. Every field is optional;
/// what gets filled in depends on the source system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facial_hair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glasses: Option<bool>,
}

/// Usage statistics computed by a completed search, applied to the sketch
/// record with [`CorpusStore::commit_stats`].
///
/// [`CorpusStore::commit_stats`]: crate::CorpusStore::commit_stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    pub last_matched_at: DateTime<Utc>,
    pub match_count: u64,
}

fn default_active() -> bool {
    true
}

/// Deterministic record id: a UUIDv5 over the image URL and uploader
/// under the given namespace. Re-enrolling the same image by the same
/// uploader yields the same id, so duplicate submissions collapse.
pub fn derive_record_id(namespace: &Uuid, image_url: &str, uploaded_by: Option<&str>) -> String {
    let uploader = uploaded_by.unwrap_or_default();
    let mut material = Vec::with_capacity(image_url.len() + 1 + uploader.len());
    material.extend_from_slice(image_url.as_bytes());
    material.push(0);
    material.extend_from_slice(uploader.as_bytes());
    Uuid::new_v5(namespace, &material).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn mugshot_serializes_with_wire_names() {
        let record = FaceRecord::Mugshot(CandidateRecord {
            id: "m-1".into(),
            image_url: "mugshots/m-1.png".into(),
            features: vec![0.5; 4],
            description: "booking 2024-117".into(),
            metadata: SubjectMetadata {
                age: Some(34),
                hair_color: Some("black".into()),
                ..SubjectMetadata::default()
            },
            uploaded_by: Some("det-rivera".into()),
            created_at: stamp(),
            active: true,
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "mugshot");
        assert_eq!(json["imageUrl"], "mugshots/m-1.png");
        assert_eq!(json["uploadedBy"], "det-rivera");
        assert_eq!(json["metadata"]["hairColor"], "black");
        assert_eq!(json["active"], true);
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn sketch_round_trips_through_json() {
        let record = FaceRecord::Sketch(QueryRecord {
            id: "s-1".into(),
            image_url: "sketches/s-1.png".into(),
            features: vec![0.25; 4],
            feature_weights: WeightProfile::default().with_eyes(2.0),
            description: "witness composite".into(),
            uploaded_by: Some("det-okafor".into()),
            created_at: stamp(),
            last_matched_at: None,
            match_count: 3,
        });

        let json = serde_json::to_string(&record).unwrap();
        let back: FaceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn minimal_sketch_document_fills_defaults() {
        let json = r#"{
            "type": "sketch",
            "id": "s-2",
            "imageUrl": "sketches/s-2.png",
            "features": [0.1, 0.2],
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let record: FaceRecord = serde_json::from_str(json).unwrap();
        let sketch = record.as_sketch().unwrap();
        assert_eq!(sketch.feature_weights, WeightProfile::default());
        assert_eq!(sketch.description, "");
        assert_eq!(sketch.match_count, 0);
        assert!(sketch.last_matched_at.is_none());
        assert!(sketch.uploaded_by.is_none());
    }

    #[test]
    fn mugshot_active_defaults_to_true() {
        let json = r#"{
            "type": "mugshot",
            "id": "m-2",
            "imageUrl": "mugshots/m-2.png",
            "features": [0.1],
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let record: FaceRecord = serde_json::from_str(json).unwrap();
        assert!(record.as_mugshot().unwrap().active);
    }

    #[test]
    fn kind_accessors_are_exclusive() {
        let mugshot = FaceRecord::Mugshot(CandidateRecord {
            id: "m-3".into(),
            image_url: "mugshots/m-3.png".into(),
            features: vec![],
            description: String::new(),
            metadata: SubjectMetadata::default(),
            uploaded_by: None,
            created_at: stamp(),
            active: true,
        });
        assert!(mugshot.as_mugshot().is_some());
        assert!(mugshot.as_sketch().is_none());
        assert_eq!(mugshot.id(), "m-3");
        assert_eq!(mugshot.created_at(), stamp());
    }

    #[test]
    fn record_id_is_deterministic() {
        let ns = Uuid::NAMESPACE_URL;
        let a = derive_record_id(&ns, "mugshots/m-1.png", Some("det-rivera"));
        let b = derive_record_id(&ns, "mugshots/m-1.png", Some("det-rivera"));
        assert_eq!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn record_id_varies_with_inputs() {
        let ns = Uuid::NAMESPACE_URL;
        let base = derive_record_id(&ns, "mugshots/m-1.png", Some("det-rivera"));
        assert_ne!(
            base,
            derive_record_id(&ns, "mugshots/m-2.png", Some("det-rivera"))
        );
        assert_ne!(
            base,
            derive_record_id(&ns, "mugshots/m-1.png", Some("det-okafor"))
        );
        assert_ne!(base, derive_record_id(&ns, "mugshots/m-1.png", None));
    }

    #[test]
    fn record_id_separator_blocks_boundary_shifts() {
        let ns = Uuid::NAMESPACE_URL;
        assert_ne!(
            derive_record_id(&ns, "ab", Some("c")),
            derive_record_id(&ns, "a", Some("bc"))
        );
    }
}
