//! Throughput benchmark for the regex compiler and executor (spec §8).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vecawk::regex::Program;

fn make_haystack(repeats: usize) -> Vec<u8> {
    "user=alice id=4021 status=ok\nuser=bob id=90210 status=error\n"
        .repeat(repeats)
        .into_bytes()
}

fn bench_regex_compile(c: &mut Criterion) {
    c.bench_function("regex_compile", |b| {
        b.iter(|| Program::compile(black_box(b"user=[a-z]+ id=[0-9]+ status=(ok|error)"), false).unwrap())
    });
}

fn bench_regex_exec(c: &mut Criterion) {
    let haystack = make_haystack(5_000);
    let prog = Program::compile(b"id=[0-9]+", false).unwrap();

    c.bench_function("regex_find_numeric_field", |b| {
        b.iter(|| prog.find(black_box(&haystack)))
    });

    let alternation = Program::compile(b"status=(ok|error)", false).unwrap();
    c.bench_function("regex_find_alternation", |b| {
        b.iter(|| alternation.find(black_box(&haystack)))
    });
}

criterion_group!(benches, bench_regex_compile, bench_regex_exec);
criterion_main!(benches);
