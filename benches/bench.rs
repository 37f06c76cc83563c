//! Criterion benchmarks for the trawl search pipeline.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use trawl::{
    FilterOperator, FuzzyConfig, SearchFilter, apply_filters, score_records, subsequence_score,
};

/// Generate synthetic records for benchmarking.
fn generate_records(count: usize) -> Vec<Value> {
    let words = [
        "search", "engine", "query", "record", "filter", "facet", "score", "rank", "highlight",
        "session", "debounce", "fuzzy", "exact", "match", "result",
    ];

    (0..count)
        .map(|i| {
            let name = format!(
                "{} {} {}",
                words[i % words.len()],
                words[(i * 7) % words.len()],
                words[(i * 13) % words.len()],
            );
            json!({
                "id": i,
                "name": name,
                "group": i % 8,
                "rank": (i * 31) % 1000,
            })
        })
        .collect()
}

fn bench_fuzzy_scoring(c: &mut Criterion) {
    let query: Vec<char> = "sren".chars().collect();
    let text: Vec<char> = "a fast embeddable search and ranking engine".chars().collect();

    let mut group = c.benchmark_group("fuzzy");
    group.throughput(Throughput::Elements(1));
    group.bench_function("subsequence_score", |b| {
        b.iter(|| subsequence_score(black_box(&query), black_box(&text)));
    });
    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let records = generate_records(10_000);
    let filters = vec![
        SearchFilter::new("rank", 500).operator(FilterOperator::Lt),
        SearchFilter::new("group", 3).operator(FilterOperator::Neq),
    ];

    let mut group = c.benchmark_group("filter");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("apply_filters_10k", |b| {
        b.iter(|| apply_filters(black_box(&records), black_box(&filters)));
    });
    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let records = generate_records(10_000);
    let refs: Vec<&Value> = records.iter().collect();
    let fields = vec!["name".to_string()];
    let exact = FuzzyConfig::default();
    let fuzzy = FuzzyConfig::new().enabled(true);

    let mut group = c.benchmark_group("match");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("exact_10k", |b| {
        b.iter(|| {
            score_records(
                black_box(&refs),
                black_box("search"),
                &fields,
                &exact,
                false,
            )
        });
    });
    group.bench_function("fuzzy_10k", |b| {
        b.iter(|| {
            score_records(
                black_box(&refs),
                black_box("srch"),
                &fields,
                &fuzzy,
                false,
            )
        });
    });
    group.bench_function("fuzzy_10k_parallel", |b| {
        b.iter(|| {
            score_records(black_box(&refs), black_box("srch"), &fields, &fuzzy, true)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_fuzzy_scoring, bench_filtering, bench_matching);
criterion_main!(benches);
