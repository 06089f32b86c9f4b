use criterion::{criterion_group, criterion_main, Criterion};
use prep_core::{build_summary, DEFAULT_CAPACITY};
use serde_json::{json, Value};

fn bench_build_summary(c: &mut Criterion) {
    let keywords: Vec<Value> = (0..200)
        .map(|i| json!({ "id": i, "name": format!("keyword {} phrase {}", i % 17, i) }))
        .collect();
    c.bench_function("build_summary_200_phrases", |b| {
        b.iter(|| build_summary(&keywords, DEFAULT_CAPACITY))
    });
}

criterion_group!(benches, bench_build_summary);
criterion_main!(benches);
