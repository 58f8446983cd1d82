use agar_core::{Arena, ArenaConfig, Key};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn populated(seed: u64, config: ArenaConfig) -> Arena {
    let mut arena = Arena::new(config, seed).expect("bench config is valid");
    arena.populate().expect("bench population fits");
    arena.key_down(Key::Right);
    arena.key_down(Key::Char('s'));
    arena
}

fn bench_arena_tick(c: &mut Criterion) {
    // Each iteration starts from the same freshly populated arena so a game
    // ending mid-run cannot skew the numbers.
    let arena = populated(42, ArenaConfig::default());

    c.bench_function("arena_tick", |b| {
        b.iter_batched(
            || arena.clone(),
            |mut arena| black_box(arena.update()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_arena_tick_crowded(c: &mut Criterion) {
    // Denser field: more collisions to resolve per tick
    let config = ArenaConfig {
        autonomous_population: 150,
        radius_constant: 300.0,
        ..ArenaConfig::default()
    };
    let arena = populated(7, config);

    c.bench_function("arena_tick_crowded", |b| {
        b.iter_batched(
            || arena.clone(),
            |mut arena| black_box(arena.update()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_populate(c: &mut Criterion) {
    c.bench_function("populate", |b| {
        b.iter(|| black_box(populated(black_box(3), ArenaConfig::default())));
    });
}

criterion_group!(benches, bench_arena_tick, bench_arena_tick_crowded, bench_populate);
criterion_main!(benches);
