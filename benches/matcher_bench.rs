use std::hint::black_box;

use chrono::Utc;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lineup::{
    CandidateRecord, CorpusScanner, DESCRIPTOR_LEN, Descriptor, MatchSession, QueryRecord,
    SearchConfig, SubjectMetadata, WeightProfile, apply_weights, compare,
};

fn sample_candidates(count: usize) -> Vec<CandidateRecord> {
    (0..count)
        .map(|i| CandidateRecord {
            id: format!("bench-m-{i}"),
            image_url: format!("mugshots/bench-m-{i}.png"),
            features: vec![0.40 + (i % 50) as f32 * 0.004; DESCRIPTOR_LEN],
            description: String::new(),
            metadata: SubjectMetadata::default(),
            uploaded_by: None,
            created_at: Utc::now(),
            active: true,
        })
        .collect()
}

fn sample_sketch() -> QueryRecord {
    QueryRecord {
        id: "bench-s-1".into(),
        image_url: "sketches/bench-s-1.png".into(),
        features: vec![0.5; DESCRIPTOR_LEN],
        feature_weights: WeightProfile::default().with_eyes(2.0).with_hair(0.5),
        description: String::new(),
        uploaded_by: None,
        created_at: Utc::now(),
        last_matched_at: None,
        match_count: 0,
    }
}

fn bench_descriptor_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptor_ops");
    let descriptor = Descriptor::uniform(0.5);
    let profile = WeightProfile::default().with_eyes(2.0).with_hair(0.5);
    group.bench_function("apply_weights", |b| {
        b.iter(|| apply_weights(black_box(&descriptor), black_box(&profile)))
    });

    let query = apply_weights(&Descriptor::uniform(0.5), &profile);
    let candidate = apply_weights(&Descriptor::uniform(0.52), &profile);
    group.bench_function("compare", |b| {
        b.iter(|| compare(black_box(&query), black_box(&candidate)))
    });
    group.finish();
}

fn bench_corpus_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("corpus_scan");
    let query = Descriptor::uniform(0.5);
    let profile = WeightProfile::default().with_eyes(2.0).with_hair(0.5);

    for &size in [100, 1_000, 10_000].iter() {
        let candidates = sample_candidates(size);
        group.throughput(Throughput::Elements(size as u64));

        let sequential = CorpusScanner::new(SearchConfig::default().with_parallel(false))
            .expect("config should be valid");
        group.bench_function(format!("sequential_{size}"), |b| {
            b.iter(|| {
                sequential
                    .scan(
                        black_box(&query),
                        black_box(&profile),
                        black_box(&candidates),
                    )
                    .expect("scan should succeed")
            })
        });

        let parallel = CorpusScanner::new(SearchConfig::default().with_parallel(true))
            .expect("config should be valid");
        group.bench_function(format!("parallel_{size}"), |b| {
            b.iter(|| {
                parallel
                    .scan(
                        black_box(&query),
                        black_box(&profile),
                        black_box(&candidates),
                    )
                    .expect("scan should succeed")
            })
        });
    }
    group.finish();
}

fn bench_full_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_search");
    let sketch = sample_sketch();
    let candidates = sample_candidates(1_000);
    let session = MatchSession::new(SearchConfig::default()).expect("config should be valid");

    group.throughput(Throughput::Elements(1_000));
    group.bench_function("run_search_1000", |b| {
        b.iter(|| {
            session
                .run_search(black_box(&sketch), black_box(&candidates))
                .expect("search should succeed")
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_descriptor_ops,
    bench_corpus_scan,
    bench_full_search
);
criterion_main!(benches);
