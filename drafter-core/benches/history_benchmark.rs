use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use drafter_core::{Change, Entity, EntityProps, EntityStore, Point, StateLog};

fn create_test_line(i: usize) -> Entity {
    let x = i as f64;
    Entity::line(Point::new(x, 0.0), Point::new(x, 10.0))
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("State Log");
    group.throughput(Throughput::Elements(1));

    group.bench_function("commit_create", |b| {
        // Capacity keeps the log bounded; the store keeps growing.
        let mut store = EntityStore::new();
        let mut log = StateLog::new(10);
        let mut i = 0;
        b.iter(|| {
            log.commit(&mut store, vec![Change::Create(black_box(create_test_line(i)))]);
            i += 1;
        })
    });

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("State Log");
    group.throughput(Throughput::Elements(100));

    // 100 entities modified in one batch, so each undo/redo walks 100 lookups.
    let mut store = EntityStore::new();
    let mut log = StateLog::new(10);
    let lines: Vec<Entity> = (0..100).map(create_test_line).collect();
    log.commit(&mut store, lines.iter().cloned().map(Change::Create).collect());
    log.commit(
        &mut store,
        lines
            .iter()
            .map(|e| Change::modify(e.id, EntityProps::default().with_layer("moved")))
            .collect(),
    );

    group.bench_function("undo_redo_batch_100", |b| {
        b.iter(|| {
            black_box(log.undo(&mut store));
            black_box(log.redo(&mut store));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_commit, bench_undo_redo);
criterion_main!(benches);
