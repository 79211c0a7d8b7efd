use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use voxedit::{
    BlockPosition, BlockState, CuboidRegion, EditConfig, EditSession, ExistingBlockMask,
    GaussianKernel, MemoryExtent, Negate, SingleBlockPattern,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn filled_session(size: i32) -> EditSession {
    let mut session =
        EditSession::new(Box::new(MemoryExtent::cube(size)), &EditConfig::default());
    let region = CuboidRegion::new(
        BlockPosition::new(0, 0, 0),
        BlockPosition::new(size - 1, size / 2, size - 1),
    );
    session
        .set_blocks(&region, &SingleBlockPattern::new(BlockState::new("minecraft:stone")))
        .expect("bench fill failed");
    session
}

// ── Benchmarks ───────────────────────────────────────────────────────────────

fn bench_set_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_blocks");
    group.measurement_time(Duration::from_secs(3));

    for &size in &[16, 32] {
        group.bench_function(format!("{}_cube", size), |b| {
            let pattern = SingleBlockPattern::new(BlockState::new("minecraft:stone"));
            let region = CuboidRegion::new(
                BlockPosition::new(0, 0, 0),
                BlockPosition::new(size - 1, size - 1, size - 1),
            );
            b.iter(|| {
                let mut session =
                    EditSession::new(Box::new(MemoryExtent::cube(size)), &EditConfig::default());
                let affected = session.set_blocks(&region, &pattern).unwrap();
                black_box(affected);
            });
        });
    }
    group.finish();
}

fn bench_masked_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("masked_replace");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("32_air_mask", |b| {
        let pattern = SingleBlockPattern::new(BlockState::new("minecraft:dirt"));
        let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(31, 31, 31));
        b.iter(|| {
            let mut session = filled_session(32)
                .with_mask(Box::new(Negate::new(Box::new(ExistingBlockMask))));
            let affected = session.set_blocks(&region, &pattern).unwrap();
            black_box(affected);
        });
    });
    group.finish();
}

fn bench_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("32_full_journal", |b| {
        b.iter(|| {
            let (mut extent, journal) = filled_session(32).finish();
            black_box(journal.undo(extent.as_mut()));
        });
    });
    group.finish();
}

fn bench_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("32_gaussian_r5", |b| {
        let kernel = GaussianKernel::new(5, 1.0);
        let region = CuboidRegion::new(BlockPosition::new(0, 0, 0), BlockPosition::new(31, 31, 31));
        b.iter(|| {
            let mut session = filled_session(32);
            let affected = session.smooth(&region, &kernel, 1).unwrap();
            black_box(affected);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_set_blocks,
    bench_masked_replace,
    bench_undo,
    bench_smooth
);
criterion_main!(benches);
