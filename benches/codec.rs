use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_ednb::{from_bytes, parse, parse_with_options, to_bytes, KeyCheck, ParseOptions};

fn flat_map_text(entries: usize) -> String {
    let body: Vec<String> = (0..entries)
        .map(|i| format!("\"key-{}\" \"value-{}\"", i, i))
        .collect();
    format!("{{{}}}", body.join(" "))
}

fn nested_text(depth: usize) -> String {
    let mut text = String::from("\"leaf\"");
    for i in 0..depth {
        text = format!("{{\"level-{}\" {} \"sibling-{}\" \"x\"}}", i, text, i);
    }
    text
}

fn benchmark_parse_simple(c: &mut Criterion) {
    let text = r#"{"name" "Alice" "email" "alice@example.com" "role" {"team" "core"}}"#;

    c.bench_function("parse_simple_map", |b| b.iter(|| parse(black_box(text))));
}

fn benchmark_parse_nested(c: &mut Criterion) {
    let text = nested_text(10);

    c.bench_function("parse_nested_depth_10", |b| b.iter(|| parse(black_box(&text))));
}

fn benchmark_key_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_check");

    for size in [10, 100, 1000].iter() {
        let text = flat_map_text(*size);

        group.bench_with_input(BenchmarkId::new("pairwise", size), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });

        group.bench_with_input(BenchmarkId::new("hashed", size), &text, |b, text| {
            let options = ParseOptions::new().with_key_check(KeyCheck::Hashed);
            b.iter(|| parse_with_options(black_box(text), options.clone()))
        });
    }

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [10, 100, 1000].iter() {
        let value = parse(&flat_map_text(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| to_bytes(black_box(value)))
        });
    }

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [10, 100, 1000].iter() {
        let bytes = to_bytes(&parse(&flat_map_text(*size)).unwrap()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| from_bytes(black_box(bytes)))
        });
    }

    group.finish();
}

fn benchmark_equality(c: &mut Criterion) {
    let a = parse(&flat_map_text(200)).unwrap();
    let b = a.clone();

    c.bench_function("structural_equality_200", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b))
    });
}

criterion_group!(
    benches,
    benchmark_parse_simple,
    benchmark_parse_nested,
    benchmark_key_check,
    benchmark_encode,
    benchmark_decode,
    benchmark_equality
);
criterion_main!(benches);
