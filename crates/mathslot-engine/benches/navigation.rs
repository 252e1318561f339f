use criterion::{Criterion, criterion_group, criterion_main};
use mathslot_engine::view::headless::HeadlessLayout;
use mathslot_engine::{Cursor, Dir, VDir};
use std::hint::black_box;
mod common;

fn bench_vertical(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertical");
    group.sample_size(20);

    let (doc, fractions) = common::nested_fractions(12);
    let layout = HeadlessLayout::compute(&doc);
    let deepest = fractions
        .last()
        .and_then(|&frac| doc.child(frac, 1))
        .unwrap_or(doc.root());
    let start = Cursor::at_end(&doc, deepest, Dir::Right);

    group.bench_function("climb_nested_12", |b| {
        b.iter(|| {
            let mut cursor = start;
            while cursor.move_vertical(&doc, VDir::Up, &layout).moved() {}
            black_box(cursor)
        });
    });

    let (doc, matrix) = common::filled_matrix(8, 8);
    let layout = HeadlessLayout::compute(&doc);
    let top = doc.child(matrix, 3).unwrap_or(doc.root());
    let start = Cursor::at_end(&doc, top, Dir::Right);

    group.bench_function("matrix_column_8x8", |b| {
        b.iter(|| {
            let mut cursor = start;
            while cursor.move_vertical(&doc, VDir::Down, &layout).moved() {}
            black_box(cursor)
        });
    });

    group.bench_function("layout_matrix_8x8", |b| {
        b.iter(|| black_box(HeadlessLayout::compute(&doc)));
    });

    group.finish();
}

criterion_group!(benches, bench_vertical);
criterion_main!(benches);
