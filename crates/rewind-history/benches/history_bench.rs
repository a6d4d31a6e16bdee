//! Benchmarks for commit/execute, undo and redo throughput.
//!
//! Run with: cargo bench -p rewind-history --bench history_bench

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use rewind_history::{AddCmd, CommandHistory, HistoryConfig, SnapshotHistory};

const STEPS: usize = 1_000;

fn bench_snapshot_commit(c: &mut Criterion) {
    c.bench_function("snapshot_commit_1000", |b| {
        b.iter(|| {
            let mut h = SnapshotHistory::new(0_u64);
            for i in 0..STEPS as u64 {
                h.commit(black_box(i));
            }
            h
        });
    });
}

fn bench_snapshot_commit_arc(c: &mut Criterion) {
    let payload = Arc::new(vec![0u8; 4096]);
    c.bench_function("snapshot_commit_arc_4k_1000", |b| {
        b.iter(|| {
            let mut h = SnapshotHistory::new(Vec::new());
            for _ in 0..STEPS {
                h.commit_arc(Arc::clone(&payload));
            }
            h
        });
    });
}

fn bench_undo_redo_sweep(c: &mut Criterion) {
    c.bench_function("snapshot_undo_redo_sweep_1000", |b| {
        b.iter_batched(
            || {
                let mut h = SnapshotHistory::new(0_u64);
                for i in 0..STEPS as u64 {
                    h.commit(i);
                }
                h
            },
            |mut h| {
                while h.undo() {}
                while h.redo() {}
                black_box(*h.current_value())
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("command_undo_redo_sweep_1000", |b| {
        b.iter_batched(
            || {
                let mut h = CommandHistory::new(0_i64);
                for i in 0..STEPS as i64 {
                    h.execute_cmd(AddCmd::new(i));
                }
                h
            },
            |mut h| {
                while h.undo() {}
                while h.redo() {}
                black_box(*h.current_value())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_bounded_eviction(c: &mut Criterion) {
    c.bench_function("snapshot_commit_bounded_100_of_1000", |b| {
        b.iter(|| {
            let mut h = SnapshotHistory::with_config(0_u64, HistoryConfig::new(100));
            for i in 0..STEPS as u64 {
                h.commit(black_box(i));
            }
            h
        });
    });
}

criterion_group!(
    benches,
    bench_snapshot_commit,
    bench_snapshot_commit_arc,
    bench_undo_redo_sweep,
    bench_bounded_eviction
);
criterion_main!(benches);
