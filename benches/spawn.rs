use std::hint::black_box;

use criterion::*;
use sparse_ecs::EntityManager;

mod common;
use common::*;

fn spawn_benchmark(c: &mut Criterion) {
    init_components();

    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_100k_agents", |b| {
        b.iter(|| {
            let mut world = EntityManager::new();
            populate(&mut world, AGENTS_MED);
            black_box(world);
        });
    });

    group.bench_function("spawn_despawn_respawn_100k", |b| {
        b.iter_batched(
            || {
                let mut world = EntityManager::new();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                let live: Vec<_> = {
                    let view = world.view::<(Position,), ()>().unwrap();
                    let mut handles = Vec::with_capacity(AGENTS_MED);
                    view.for_each(|entity, _| handles.push(entity));
                    handles
                };
                for entity in &live {
                    world.despawn(*entity);
                }
                // Respawn through the freelist.
                for _ in 0..live.len() {
                    let agent = world.spawn();
                    world.attach(agent, Position { x: 1.0, y: 1.0 }).unwrap();
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
