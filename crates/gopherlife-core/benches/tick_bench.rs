use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gopherlife_core::{SearchSettings, SearchStrategyKind, SpiralWorld, SpiralWorldSettings, World, WorldSettings};

fn bench_settings(strategy: SearchStrategyKind) -> WorldSettings {
    WorldSettings {
        width: 500,
        height: 500,
        initial_population: 5_000,
        max_population: 20_000,
        food_count: 20_000,
        seed: 1,
        search: SearchSettings {
            strategy,
            ..SearchSettings::default()
        },
        ..WorldSettings::default()
    }
}

fn bench_tick(c: &mut Criterion, name: &str, strategy: SearchStrategyKind) {
    c.bench_function(name, |b| {
        b.iter_batched(
            || World::new(bench_settings(strategy)).unwrap(),
            |mut world| {
                world.advance_one_tick().unwrap();
                world
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_partition_tick(c: &mut Criterion) {
    bench_tick(c, "tick_partition_5k", SearchStrategyKind::Partition);
}

fn bench_spiral_tick(c: &mut Criterion) {
    bench_tick(c, "tick_spiral_5k", SearchStrategyKind::Spiral);
}

fn bench_spiral_world(c: &mut Criterion) {
    let mut world = SpiralWorld::new(SpiralWorldSettings::default()).unwrap();
    // Warm up to a steady population before measuring.
    for _ in 0..300 {
        world.advance_one_tick().unwrap();
    }
    c.bench_function("spiral_world_tick", |b| {
        b.iter(|| world.advance_one_tick().unwrap())
    });
}

criterion_group!(
    benches,
    bench_partition_tick,
    bench_spiral_tick,
    bench_spiral_world
);
criterion_main!(benches);
