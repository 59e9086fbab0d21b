//! Benchmarks for collision queries and pointer-move resolution.
//!
//! Run with: cargo bench -p gridboard-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use gridboard_core::{Placement, PointerSample};
use gridboard_layout::{
    GridState, InteractionController, ItemId, ResizeEdge, collides, collides_on_axes,
};
use std::hint::black_box;

/// Tile `n` 2x2 items row-major across the 12 columns.
fn tiled_grid(n: u64) -> GridState {
    let mut grid = GridState::new(20);
    for idx in 0..n {
        let col = (idx % 6) as u32 * 2 + 1;
        let row = (idx / 6) as u32 * 2 + 1;
        let id = ItemId::new(idx + 1).expect("non-zero");
        grid.register(id, Placement::new(col, row, 2, 2), format!("Card{idx}"))
            .expect("tiles are disjoint");
    }
    grid
}

fn bench_collides(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/collides");
    let probe = Placement::new(4, 4, 4, 4);
    let exclude = ItemId::MIN;

    for n in [12, 60, 240] {
        let grid = tiled_grid(n);
        group.bench_with_input(BenchmarkId::new("tiled", n), &grid, |b, grid| {
            b.iter(|| black_box(collides(black_box(&probe), exclude, grid)))
        });
    }

    group.finish();
}

fn bench_axes(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/axes");
    let original = Placement::new(1, 1, 2, 2);
    let candidate = Placement::new(3, 3, 2, 2);

    for n in [12, 60, 240] {
        let grid = tiled_grid(n);
        group.bench_with_input(BenchmarkId::new("diagonal", n), &grid, |b, grid| {
            b.iter(|| {
                black_box(collides_on_axes(
                    ItemId::MIN,
                    Some(&candidate),
                    Some(&candidate),
                    &original,
                    grid,
                ))
            })
        });
    }

    group.finish();
}

fn bench_pointer_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction/pointer_move");

    for n in [12, 120] {
        let grid = tiled_grid(n);
        group.bench_with_input(BenchmarkId::new("resize_sweep", n), &grid, |b, grid| {
            b.iter_batched(
                || {
                    let grid = grid.clone();
                    let target = ItemId::new(n).expect("non-zero");
                    let mut controller = InteractionController::default();
                    controller.begin_resize(
                        &grid,
                        target,
                        ResizeEdge::BottomRight,
                        PointerSample::at(0.0, 0.0, 1200.0),
                    );
                    (grid, controller)
                },
                |(mut grid, mut controller)| {
                    for step in 0..64 {
                        let offset = f64::from(step) * 12.0;
                        black_box(controller.pointer_move(
                            &mut grid,
                            PointerSample::at(offset, offset, 1200.0),
                        ));
                    }
                    controller.pointer_up(&grid)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_collides, bench_axes, bench_pointer_moves);
criterion_main!(benches);
