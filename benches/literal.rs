//! Throughput benchmark for the literal matcher (spec §8, performance
//! notes), `criterion`-based as `ed-rust`/`ori-lang` both are in the
//! retrieval pack.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vecawk::literal::LiteralMatcher;

fn make_haystack(repeats: usize) -> Vec<u8> {
    "the quick brown fox jumps over the lazy dog\n"
        .repeat(repeats)
        .into_bytes()
}

fn bench_literal_find(c: &mut Criterion) {
    let haystack = make_haystack(10_000);
    let matcher = LiteralMatcher::new(b"lazy", false);

    c.bench_function("literal_find_common_pattern", |b| {
        b.iter(|| matcher.find(black_box(&haystack)))
    });

    let rare = LiteralMatcher::new(b"zzz_never_present", false);
    c.bench_function("literal_find_absent_pattern", |b| {
        b.iter(|| rare.find(black_box(&haystack)))
    });

    let ci_matcher = LiteralMatcher::new(b"LAZY", true);
    c.bench_function("literal_find_case_insensitive", |b| {
        b.iter(|| ci_matcher.find(black_box(&haystack)))
    });
}

criterion_group!(benches, bench_literal_find);
criterion_main!(benches);
