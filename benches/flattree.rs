use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flattree::{convert_to_trees, Forest};

/// Records for a complete tree with the given branching factor, listed
/// deepest first so that most children come before their parents.
fn make_records(size: usize, branching: usize) -> Vec<(usize, Option<usize>)> {
    (0..size)
        .rev()
        .map(|id| (id, id.checked_sub(1).map(|p| p / branching)))
        .collect()
}

fn make_forest(size: usize) -> Forest<(usize, Option<usize>)> {
    convert_to_trees(make_records(size, 4))
}

fn bench_convert(c: &mut Criterion) {
    let mut g = c.benchmark_group("forest construction");

    for size in [0, 100, 10_000, 1_000_000] {
        g.bench_with_input(
            BenchmarkId::new("convert_to_trees", size),
            &size,
            |b, size| {
                let records = make_records(*size, 4);
                b.iter(|| black_box(convert_to_trees(records.iter())))
            },
        );
    }
}

fn bench_walk(c: &mut Criterion) {
    let mut g = c.benchmark_group("forest walks");

    for size in [0, 100, 10_000, 1_000_000] {
        g.bench_with_input(BenchmarkId::new("flatten", size), &size, |b, size| {
            let forest = make_forest(*size);
            b.iter(|| black_box(forest.flatten()))
        });

        g.bench_with_input(BenchmarkId::new("find_missing", size), &size, |b, size| {
            let forest = make_forest(*size);
            b.iter(|| black_box(forest.find_node_by_id(usize::MAX)))
        });
    }
}

criterion_group!(benches, bench_convert, bench_walk);
criterion_main!(benches);
