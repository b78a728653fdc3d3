use std::hint::black_box;

use criterion::*;
use sparse_ecs::EntityManager;

mod common;
use common::*;

fn iterate_benchmark(c: &mut Criterion) {
    init_components();

    let mut group = c.benchmark_group("iterate");

    group.bench_function("for_each_write_wealth_100k", |b| {
        b.iter_batched(
            || {
                let mut world = EntityManager::new();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                let mut view = world.view_mut::<(Wealth,), ()>().unwrap();
                view.for_each(|_, (wealth,)| {
                    wealth.value *= 1.0001;
                });
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("for_each_read_position_100k", |b| {
        b.iter_batched(
            || {
                let mut world = EntityManager::new();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                let mut total = 0.0f32;
                let view = world.view::<(Position,), ()>().unwrap();
                view.for_each(|_, (position,)| {
                    total += position.x + position.y;
                });
                black_box(total);
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("integrate_position_velocity_100k", |b| {
        b.iter_batched(
            || {
                let mut world = EntityManager::new();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                let mut view = world.view_mut::<(Position, Velocity), ()>().unwrap();
                view.for_each(|_, (position, velocity)| {
                    position.x += velocity.dx;
                    position.y += velocity.dy;
                });
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("integrate_excluding_dormant_100k", |b| {
        b.iter_batched(
            || {
                let mut world = EntityManager::new();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                let mut view = world
                    .view_mut::<(Position, Velocity), (Dormant,)>()
                    .unwrap();
                view.for_each(|_, (position, velocity)| {
                    position.x += velocity.dx;
                    position.y += velocity.dy;
                });
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, iterate_benchmark);
criterion_main!(benches);
