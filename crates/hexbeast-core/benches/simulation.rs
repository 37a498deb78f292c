use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hexbeast_core::prelude::*;
use hexbeast_logic::pathfinding::{find_path, HexNavigator};
use hexbeast_logic::{Hex, HexMap, Terrain};

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticks");

    for radius in [6i32, 10, 16] {
        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, &radius| {
            b.iter_batched(
                || {
                    let config = GameConfig {
                        map_radius: radius,
                        settlement_count: 3,
                        ..Default::default()
                    };
                    GameEngine::new(config).expect("valid config")
                },
                |mut engine| {
                    engine.run_ticks(100);
                    engine
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Rings of water with one gap each, alternating sides.
fn maze(radius: i32) -> HexMap {
    let mut map = HexMap::hexagon(radius);
    for ring in (2..radius).step_by(2) {
        let hexes = Hex::ORIGIN.ring(ring);
        let gap = if ring % 4 == 0 { 0 } else { hexes.len() / 2 };
        for (i, hex) in hexes.into_iter().enumerate() {
            if i != gap {
                map.set_terrain(hex, Terrain::Water);
            }
        }
    }
    map
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");

    for radius in [8i32, 16, 32] {
        let map = maze(radius);
        let goal = Hex::new(radius - 1, 0);
        group.bench_with_input(BenchmarkId::new("maze", radius), &map, |b, map| {
            b.iter(|| find_path(map, Hex::ORIGIN, goal))
        });
    }

    let map = maze(16);
    group.bench_function("navigator_cached", |b| {
        let mut nav = HexNavigator::new();
        b.iter(|| nav.find_path(&map, Hex::ORIGIN, Hex::new(15, 0)))
    });

    group.finish();
}

criterion_group!(simulation_benches, bench_ticks, bench_paths);
criterion_main!(simulation_benches);
