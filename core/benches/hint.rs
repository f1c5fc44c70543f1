use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sumfun_core::*;

/// Plays `moves` first-open-cell moves on a large board so the hint scan has work to do.
fn crowded_session(moves: usize) -> GameSession {
    let config = GameConfig {
        grid_size: 32,
        max_moves: MoveCount::MAX,
        ..GameConfig::standard()
    };
    let mut game = GameSession::with_seed(config, 0x5eed).expect("valid config");
    for _ in 0..moves {
        let Some(cell) = game.grid().iter_open_cells().nth(7) else {
            break;
        };
        game.apply_move(cell).expect("session in progress");
    }
    game
}

fn bench_suggest(c: &mut Criterion) {
    let game = crowded_session(600);
    c.bench_function("suggest_32x32", |b| b.iter(|| black_box(&game).suggest()));
}

fn bench_apply_move(c: &mut Criterion) {
    let game = crowded_session(200);
    let cell = game.grid().iter_open_cells().next().expect("open cell left");
    c.bench_function("apply_move_32x32", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| black_box(game.apply_move(cell)),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_suggest, bench_apply_move);
criterion_main!(benches);
