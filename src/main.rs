use std::error::Error;

use lineup::{
    EnrollmentConfig, ImageInput, MatchSession, MemoryStore, MugshotSubmission, SearchConfig,
    SketchSubmission, SubjectMetadata, SyntheticExtractor, WeightProfile, enroll_mugshot,
    enroll_sketch, run_search,
};

fn main() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let extractor = SyntheticExtractor::new();
    let enrollment = EnrollmentConfig::default();

    for (name, payload) in [
        ("alvarez", "booking-2024-081"),
        ("keller", "booking-2024-114"),
        ("osei", "booking-2024-117"),
    ] {
        let record = enroll_mugshot(
            MugshotSubmission {
                image: ImageInput::new(
                    format!("mugshots/{name}.png"),
                    payload.as_bytes().to_vec(),
                ),
                image_url: format!("mugshots/{name}.png"),
                description: format!("booking photo, {name}"),
                metadata: SubjectMetadata::default(),
                uploaded_by: Some("det-rivera".into()),
                id: None,
            },
            &extractor,
            &store,
            &enrollment,
        )?;
        println!("enrolled mugshot {} ({})", record.id, record.image_url);
    }

    // The composite shares image bytes with the second booking photo, so
    // the synthetic extractor gives it an identical descriptor.
    let sketch = enroll_sketch(
        SketchSubmission {
            image: ImageInput::new("sketches/case-301.png", b"booking-2024-114".to_vec()),
            image_url: "sketches/case-301.png".into(),
            description: "witness composite, case 301".into(),
            feature_weights: WeightProfile::default().with_eyes(2.0).with_hair(0.5),
            uploaded_by: Some("det-rivera".into()),
            id: None,
        },
        &extractor,
        &store,
        &enrollment,
    )?;
    println!("enrolled sketch {}", sketch.id);

    let session = MatchSession::new(SearchConfig::default())?;
    let report = run_search(&sketch.id, &store, &session)?;

    println!(
        "scanned {} candidates ({} skipped), {} match(es):",
        report.candidates_scanned,
        report.candidates_skipped,
        report.rows.len()
    );
    for row in &report.rows {
        println!("  {:<28} similarity {:.3}", row.image_url, row.similarity);
    }

    Ok(())
}
