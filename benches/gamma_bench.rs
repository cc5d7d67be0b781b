use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use gamma::board::{same_region, Position};
use gamma::moves::simulate;
use gamma::Game;

/// A board striped with alternating rows of players 1 and 2, leaving every
/// fourth column free so moves still have somewhere to go.
fn crowded_game(size: u32) -> Game {
    let mut game = Game::with_dimensions(size, size, 2, size * size).unwrap();
    for y in 0..size {
        let player = y % 2 + 1;
        for x in (0..size).filter(|x| x % 4 != 3) {
            game.play_move(player, x, y);
        }
    }
    game
}

fn bench_move_on_crowded_board(c: &mut Criterion) {
    let game = crowded_game(64);
    c.bench_function("move_merging_two_areas_64x64", |b| {
        b.iter_batched(
            || game.clone(),
            |mut g| g.play_move(black_box(1), black_box(3), black_box(0)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_free_fields_large_board(c: &mut Criterion) {
    let mut game = Game::with_dimensions(512, 512, 4, 1).unwrap();
    for x in 0..256 {
        game.play_move(1, x, 100);
    }
    c.bench_function("free_fields_at_limit_512x512", |b| {
        b.iter(|| game.free_fields(black_box(1)))
    });
    c.bench_function("free_fields_below_limit_512x512", |b| {
        b.iter(|| game.free_fields(black_box(2)))
    });
}

fn bench_golden_move_validation(c: &mut Criterion) {
    let game = crowded_game(64);
    c.bench_function("golden_move_check_64x64", |b| {
        b.iter(|| game.check_golden_move(black_box(2), black_box(10), black_box(0)))
    });
    c.bench_function("simulate_capture_64x64", |b| {
        b.iter(|| simulate(game.grid(), black_box(Position::new(10, 0)), black_box(2)))
    });
}

fn bench_same_region_far_apart(c: &mut Criterion) {
    let mut game = Game::with_dimensions(128, 128, 1, 1).unwrap();
    for y in 0..128 {
        game.play_move(1, 0, y);
    }
    for x in 1..128 {
        game.play_move(1, x, 127);
    }
    c.bench_function("same_region_snake_128x128", |b| {
        b.iter(|| {
            same_region(
                game.grid(),
                black_box(Position::new(0, 0)),
                black_box(Position::new(127, 127)),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_move_on_crowded_board,
    bench_free_fields_large_board,
    bench_golden_move_validation,
    bench_same_region_far_apart,
);
criterion_main!(benches);
