use benches::{synthetic_dump, synthetic_native, HEADER};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ir::{parse_clang_ast, Node};
use parsers::{enrich, parse_result_from_json, NativeAst};
use std::path::Path;

const RECORDS: usize = 500;

fn bench_ingest(c: &mut Criterion) {
    let dump = synthetic_dump(RECORDS);
    c.bench_function("ingest_and_link", |b| {
        b.iter(|| parse_result_from_json(black_box(&dump)).unwrap())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let result = parse_result_from_json(&synthetic_dump(RECORDS)).unwrap();
    let types: Vec<_> = result.files[0]
        .nodes
        .iter()
        .filter_map(|n| match n {
            Node::Clazz(c) => Some(c.member_variables[1].ty.clone()),
            _ => None,
        })
        .collect();
    c.bench_function("resolve_node_by_type", |b| {
        b.iter(|| {
            for ty in &types {
                black_box(result.resolve_node_by_type(ty));
            }
        })
    });
}

fn bench_enrich(c: &mut Criterion) {
    let dump = synthetic_dump(RECORDS);
    let root = parse_clang_ast(&synthetic_native(RECORDS)).unwrap();
    let asts = vec![NativeAst::new(Path::new(HEADER), root)];
    c.bench_function("enrich", |b| {
        b.iter_batched(
            || parse_result_from_json(&dump).unwrap(),
            |mut result| enrich(&mut result, black_box(&asts), None),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_ingest, bench_resolve, bench_enrich);
criterion_main!(benches);
