use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use flexquery::analysis::{TokenizerAnalyzer, TokenizerConfig};
use flexquery::search::NumericRangeQuery;
use flexquery::{
    NumericConfig, NumericType, PrecedenceQueryParser, QueryConfigHandler, StandardQueryParser,
};

const QUERIES: &[(&str, &str)] = &[
    ("term", "rust"),
    ("boolean", "title:rust AND -status:draft OR tags:book"),
    ("grouped", "title:(rust OR go OR zig)^2 AND body:(systems programming)"),
    ("range", "year:[2000 TO 2024} AND price:[* TO 99.5]"),
    ("wildcard", "title:prog* OR title:comp?ler"),
];

fn catalog_config() -> QueryConfigHandler {
    QueryConfigHandler::default()
        .with_allow_leading_wildcard(true)
        .with_numeric_config("year", NumericConfig::new(NumericType::Int, 4).unwrap())
        .with_numeric_config("price", NumericConfig::new(NumericType::Double, 8).unwrap())
}

/// Generate a long flat sequence alternating AND and OR
fn long_sequence(clauses: usize) -> String {
    (0..clauses)
        .map(|i| format!("term{i}"))
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|pair| pair.join(" AND "))
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn bench_parse(c: &mut Criterion) {
    let standard = StandardQueryParser::with_config(catalog_config());
    let precedence = PrecedenceQueryParser::with_config(catalog_config());

    let mut group = c.benchmark_group("parse");
    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::new("standard", name), query, |b, query| {
            b.iter(|| standard.parse(black_box(query), "body").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("precedence", name), query, |b, query| {
            b.iter(|| precedence.parse(black_box(query), "body").unwrap())
        });
    }
    group.finish();
}

fn bench_long_sequences(c: &mut Criterion) {
    let precedence = PrecedenceQueryParser::new();

    let mut group = c.benchmark_group("precedence_regroup");
    for clauses in [8, 64, 512] {
        let query = long_sequence(clauses);
        group.bench_with_input(BenchmarkId::from_parameter(clauses), &query, |b, query| {
            b.iter(|| precedence.parse(black_box(query), "body").unwrap())
        });
    }
    group.finish();
}

fn bench_analyzed(c: &mut Criterion) {
    let analyzer = Arc::new(TokenizerAnalyzer::new(&TokenizerConfig::default()));
    let parser = StandardQueryParser::with_analyzer(analyzer);

    c.bench_function("parse_analyzed", |b| {
        b.iter(|| {
            parser
                .parse(black_box("title:\"Running Compilers\" AND the fastest systems"), "body")
                .unwrap()
        })
    });
}

fn bench_sub_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric_sub_ranges");
    for step in [2, 4, 8, 16] {
        let query = NumericRangeQuery::new_long_range(
            "n",
            step,
            Some(-1_000_000),
            Some(123_456_789),
            true,
            false,
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(step), &query, |b, query| {
            b.iter(|| black_box(query).sub_ranges())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_long_sequences,
    bench_analyzed,
    bench_sub_ranges
);
criterion_main!(benches);
