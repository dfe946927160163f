//! Performance benchmarks for rule evaluation and the value cache.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use formgate::core::{FieldId, ValueCache, parses_as_number};
use formgate::prelude::*;
use std::collections::BTreeSet;

/// Benchmark each rule on a representative valid input
fn benchmark_rules(c: &mut Criterion) {
    let emojis: BTreeSet<String> = ["📚", "🧪", "🎨"].into_iter().map(String::from).collect();
    let cases = [
        ("required_string", Rule::required_string(), "ic-app-crumbs"),
        ("required_number", Rule::required_number(), "2"),
        (
            "json_string_object",
            Rule::json_string_object(),
            r#"{"COMP101":"Intro","MATH102":"Calc"}"#,
        ),
        (
            "json_emoji_object",
            Rule::json_emoji_object(emojis),
            r#"{"ART":"🎨","CHEM":"🧪"}"#,
        ),
        ("time_zone", Rule::time_zone(), "Pacific/Auckland"),
    ];

    let mut group = c.benchmark_group("rule_evaluate");
    for (name, rule, text) in &cases {
        let input = RawInput::from(*text);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| black_box(rule.evaluate(black_box(input))));
        });
    }
    group.finish();
}

/// Benchmark the numeric string grammar
fn benchmark_number_grammar(c: &mut Criterion) {
    let mut group = c.benchmark_group("parses_as_number");
    for text in ["42", "  -1.5e10  ", "0x1F", "12px"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), &text, |b, text| {
            b.iter(|| black_box(parses_as_number(black_box(text))));
        });
    }
    group.finish();
}

/// Benchmark lock-free cache reads
fn benchmark_cache_read(c: &mut Criterion) {
    let cache = ValueCache::new();
    let field = FieldId::from("notion-key");
    cache.store(&field, "secret_abc");

    c.bench_function("cache_get", |b| {
        b.iter(|| black_box(cache.get(&field)));
    });
}

criterion_group!(
    benches,
    benchmark_rules,
    benchmark_number_grammar,
    benchmark_cache_read
);
criterion_main!(benches);
